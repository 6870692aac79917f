//! storyteller core library
//!
//! Turns a text prompt into a narrated slideshow video: a text model extends
//! the prompt into a story, each sentence becomes a still image plus a spoken
//! narration clip with burnt-in subtitles, and ffmpeg stitches the clips into
//! one video.

pub mod audio;
pub mod config;
pub mod encoder;
pub mod error;
pub mod format;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod seed;
pub mod sentence;

// Re-export commonly used items at crate root
pub use audio::SpeechAudio;
pub use config::{Dtype, StoryTellerConfig};
pub use encoder::{FfmpegEncoder, VideoEncoder};
pub use error::{Result, StoryTellerError};
pub use format::{format_time, make_subtitle, make_timeline_string};
pub use models::{Painter, Speaker, Writer};
pub use pipeline::StoryTeller;
pub use provider::{HttpPainter, HttpSpeaker, HttpWriter};
pub use seed::set_seed;
pub use sentence::SentenceSplitter;
