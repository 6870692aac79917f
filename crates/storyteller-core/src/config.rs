use std::{path::PathBuf, str::FromStr};

use crate::error::StoryTellerError;

/// Numeric precision identifier forwarded to the inference server.
///
/// Parsed once during configuration so an unknown identifier fails before
/// any generation work begins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dtype {
    Float16,
    Bfloat16,
    #[default]
    Float32,
    Float64,
}

impl Dtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dtype::Float16 => "float16",
            Dtype::Bfloat16 => "bfloat16",
            Dtype::Float32 => "float32",
            Dtype::Float64 => "float64",
        }
    }
}

impl FromStr for Dtype {
    type Err = StoryTellerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float16" | "fp16" | "half" => Ok(Dtype::Float16),
            "bfloat16" | "bf16" => Ok(Dtype::Bfloat16),
            "float32" | "fp32" | "float" => Ok(Dtype::Float32),
            "float64" | "fp64" | "double" => Ok(Dtype::Float64),
            other => Err(StoryTellerError::UnsupportedDtype {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation parameters for one run. Constructed once, read-only after.
#[derive(Clone, Debug)]
pub struct StoryTellerConfig {
    /// Maximum number of new tokens per writer call.
    pub max_new_tokens: u32,
    /// Text generation model id.
    pub writer: String,
    /// Image generation model id.
    pub painter: String,
    /// Text-to-speech model id.
    pub speaker: String,
    /// Device the writer model runs on.
    pub writer_device: String,
    /// Device the painter model runs on.
    pub painter_device: String,
    pub writer_dtype: Dtype,
    pub painter_dtype: Dtype,
    pub enable_attention_slicing: bool,
    pub use_dpm_solver: bool,
    /// Diffusion inference steps per image.
    pub num_painter_steps: u32,
    /// Directory all artifacts are written into.
    pub output_dir: PathBuf,
    pub seed: u64,
    /// Upper bound on writer rounds in the segmentation loop.
    pub max_story_rounds: u32,
    /// Surface non-zero ffmpeg exit codes as errors instead of ignoring them.
    pub strict_encoding: bool,
    /// Root URL of the OpenAI-compatible inference server.
    pub api_base: String,
}

impl Default for StoryTellerConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 50,
            writer: "gpt2".to_string(),
            painter: "stabilityai/stable-diffusion-2".to_string(),
            speaker: "tts_models/en/ljspeech/glow-tts".to_string(),
            writer_device: "cpu".to_string(),
            painter_device: "cpu".to_string(),
            writer_dtype: Dtype::Float32,
            painter_dtype: Dtype::Float32,
            enable_attention_slicing: false,
            use_dpm_solver: true,
            num_painter_steps: 20,
            output_dir: PathBuf::from("out"),
            seed: 42,
            max_story_rounds: 64,
            strict_encoding: false,
            api_base: "http://127.0.0.1:8000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_dtypes() {
        assert_eq!("float16".parse::<Dtype>().unwrap(), Dtype::Float16);
        assert_eq!("bf16".parse::<Dtype>().unwrap(), Dtype::Bfloat16);
        assert_eq!("float32".parse::<Dtype>().unwrap(), Dtype::Float32);
        assert_eq!("double".parse::<Dtype>().unwrap(), Dtype::Float64);
    }

    #[test]
    fn rejects_unknown_dtype() {
        let err = "int8".parse::<Dtype>().unwrap_err();
        assert!(matches!(
            err,
            StoryTellerError::UnsupportedDtype { value } if value == "int8"
        ));
    }
}
