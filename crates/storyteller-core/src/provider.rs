//! HTTP backends for the three model capabilities.
//!
//! The pipeline treats inference as opaque: each backend posts to an
//! OpenAI-compatible server and hands back the decoded result. Model id,
//! device, dtype and step counts come from [`StoryTellerConfig`]; a
//! deterministic per-request seed is drawn from the process RNG.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use crate::{
    audio::SpeechAudio,
    config::StoryTellerConfig,
    error::{Result, StoryTellerError},
    models::{Painter, Speaker, Writer},
    seed,
};

/// Text generation over `/v1/completions`.
pub struct HttpWriter {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    max_new_tokens: u32,
    device: String,
    dtype: String,
}

impl HttpWriter {
    pub fn new(config: &StoryTellerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/v1/completions", config.api_base),
            model: config.writer.clone(),
            max_new_tokens: config.max_new_tokens,
            device: config.writer_device.clone(),
            dtype: config.writer_dtype.to_string(),
        }
    }
}

#[async_trait]
impl Writer for HttpWriter {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let request_seed = seed::next_seed();
        debug!(model = %self.model, request_seed, "requesting text completion");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
                "max_tokens": self.max_new_tokens,
                "seed": request_seed,
                "extra_body": {
                    "device": self.device,
                    "dtype": self.dtype,
                },
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let completion = response["choices"][0]["text"].as_str().ok_or_else(|| {
            StoryTellerError::TextGenerationFailed {
                reason: format!("Invalid API response: {:?}", response),
            }
        })?;

        // The caller expects the whole extended text, as a local
        // text-generation pipeline would return it.
        Ok(format!("{}{}", prompt, completion))
    }
}

/// Image generation over `/v1/images/generations`.
pub struct HttpPainter {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    device: String,
    dtype: String,
    num_steps: u32,
    attention_slicing: bool,
    dpm_solver: bool,
}

impl HttpPainter {
    pub fn new(config: &StoryTellerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/v1/images/generations", config.api_base),
            model: config.painter.clone(),
            device: config.painter_device.clone(),
            dtype: config.painter_dtype.to_string(),
            num_steps: config.num_painter_steps,
            attention_slicing: config.enable_attention_slicing,
            dpm_solver: config.use_dpm_solver,
        }
    }
}

#[async_trait]
impl Painter for HttpPainter {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let request_seed = seed::next_seed();
        debug!(model = %self.model, request_seed, "requesting image");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
                "n": 1,
                "response_format": "b64_json",
                "seed": request_seed,
                "extra_body": {
                    "device": self.device,
                    "dtype": self.dtype,
                    "num_inference_steps": self.num_steps,
                    "enable_attention_slicing": self.attention_slicing,
                    "use_dpm_solver": self.dpm_solver,
                },
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let encoded = response["data"][0]["b64_json"].as_str().ok_or_else(|| {
            StoryTellerError::ImageGenerationFailed {
                reason: format!("Invalid API response: {:?}", response),
            }
        })?;

        BASE64
            .decode(encoded)
            .map_err(|e| StoryTellerError::ImageGenerationFailed {
                reason: format!("Undecodable image payload: {}", e),
            })
    }
}

/// Speech synthesis over `/v1/audio/speech`, WAV response body.
pub struct HttpSpeaker {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpSpeaker {
    pub fn new(config: &StoryTellerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/v1/audio/speech", config.api_base),
            model: config.speaker.clone(),
        }
    }
}

#[async_trait]
impl Speaker for HttpSpeaker {
    async fn synthesize_speech(&self, text: &str) -> Result<SpeechAudio> {
        let request_seed = seed::next_seed();
        debug!(model = %self.model, request_seed, "requesting speech");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "model": self.model,
                "input": text,
                "response_format": "wav",
                "seed": request_seed,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoryTellerError::SpeechSynthesisFailed {
                reason: format!("Server returned {}", response.status()),
            });
        }

        let bytes = response.bytes().await?;
        SpeechAudio::from_wav_bytes(&bytes)
    }
}
