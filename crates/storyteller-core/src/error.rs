use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoryTellerError {
    #[error("`ffmpeg` not found on PATH. Please install `ffmpeg` and try again.")]
    FfmpegNotFound,

    #[error("Sentence boundary rules unavailable: {reason}")]
    SentenceRulesUnavailable { reason: String },

    #[error("Unsupported dtype `{value}`")]
    UnsupportedDtype { value: String },

    #[error("Text generation failed: {reason}")]
    TextGenerationFailed { reason: String },

    #[error("Image generation failed: {reason}")]
    ImageGenerationFailed { reason: String },

    #[error("Speech synthesis failed: {reason}")]
    SpeechSynthesisFailed { reason: String },

    #[error("Story generation stalled after {rounds} rounds without producing enough sentences")]
    StoryStalled { rounds: u32 },

    #[error("ffmpeg {stage} exited with {status}")]
    EncodingFailed { stage: &'static str, status: std::process::ExitStatus },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, StoryTellerError>;
