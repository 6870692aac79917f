use async_trait::async_trait;

use crate::{audio::SpeechAudio, error::Result};

/// Text generation capability. Given the current story text, returns the
/// whole extended text (input plus continuation).
#[async_trait]
pub trait Writer: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// Image generation capability. Returns encoded PNG bytes.
#[async_trait]
pub trait Painter: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}

/// Speech synthesis capability. Returns mono samples at the model's native
/// sample rate.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn synthesize_speech(&self, text: &str) -> Result<SpeechAudio>;
}
