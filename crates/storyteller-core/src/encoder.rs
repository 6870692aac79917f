use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, StoryTellerError};

/// Seam over the external media tool. Production binds to ffmpeg; tests
/// substitute a stub that fabricates clip files.
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    /// Compose a still image, a narration track and burnt-in subtitles into
    /// one clip. Duration follows the shortest input stream, looping the
    /// image to cover it.
    async fn compose_clip(
        &self,
        image: &Path,
        audio: &Path,
        subtitles: &Path,
        clip: &Path,
    ) -> Result<()>;

    /// Concatenate the clips listed in `manifest` into `output` via stream
    /// copy. Runs from `workdir` so the manifest's bare filenames resolve.
    async fn concat_clips(&self, manifest: &Path, output: &Path, workdir: &Path) -> Result<()>;
}

/// ffmpeg-backed encoder. Output of the tool is discarded; by default its
/// exit status is too, matching the historical fire-and-forget behavior.
/// `strict` turns a non-zero exit into [`StoryTellerError::EncodingFailed`].
pub struct FfmpegEncoder {
    program: PathBuf,
    strict: bool,
}

impl FfmpegEncoder {
    /// Resolve ffmpeg on PATH. Missing binary is a startup failure, before
    /// any generation work begins.
    pub fn new(strict: bool) -> Result<Self> {
        let program = which::which("ffmpeg").map_err(|_| StoryTellerError::FfmpegNotFound)?;
        Ok(Self { program, strict })
    }

    /// Bind to an explicit binary, bypassing PATH resolution.
    pub fn with_program(program: PathBuf, strict: bool) -> Self {
        Self { program, strict }
    }

    async fn run_quiet(
        &self,
        stage: &'static str,
        workdir: Option<&Path>,
        args: &[&OsStr],
    ) -> Result<()> {
        let mut command = Command::new(&self.program);
        if let Some(dir) = workdir {
            command.current_dir(dir);
        }
        let status = command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if !status.success() {
            if self.strict {
                return Err(StoryTellerError::EncodingFailed { stage, status });
            }
            warn!(stage, %status, "ffmpeg exited non-zero; continuing");
        }
        Ok(())
    }
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    async fn compose_clip(
        &self,
        image: &Path,
        audio: &Path,
        subtitles: &Path,
        clip: &Path,
    ) -> Result<()> {
        debug!(clip = %clip.display(), "composing segment clip");
        let filter = format!("subtitles={}", subtitles.display());
        let args: [&OsStr; 13] = [
            OsStr::new("-y"),
            OsStr::new("-loop"),
            OsStr::new("1"),
            OsStr::new("-i"),
            image.as_os_str(),
            OsStr::new("-i"),
            audio.as_os_str(),
            OsStr::new("-vf"),
            OsStr::new(&filter),
            OsStr::new("-tune"),
            OsStr::new("stillimage"),
            OsStr::new("-shortest"),
            clip.as_os_str(),
        ];
        self.run_quiet("compose", None, &args).await
    }

    async fn concat_clips(&self, manifest: &Path, output: &Path, workdir: &Path) -> Result<()> {
        debug!(output = %output.display(), "concatenating clips");
        let args: [&OsStr; 8] = [
            OsStr::new("-y"),
            OsStr::new("-f"),
            OsStr::new("concat"),
            OsStr::new("-i"),
            manifest.as_os_str(),
            OsStr::new("-c"),
            OsStr::new("copy"),
            output.as_os_str(),
        ];
        self.run_quiet("concat", Some(workdir), &args).await
    }
}
