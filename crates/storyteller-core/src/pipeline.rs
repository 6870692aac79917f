use std::path::PathBuf;

use tokio::fs;
use tracing::info;

use crate::{
    config::StoryTellerConfig,
    encoder::{FfmpegEncoder, VideoEncoder},
    error::{Result, StoryTellerError},
    format::make_subtitle,
    models::{Painter, Speaker, Writer},
    provider::{HttpPainter, HttpSpeaker, HttpWriter},
    seed,
    sentence::SentenceSplitter,
};

/// Drives the whole prompt-to-video flow: story segmentation, one rendered
/// clip per sentence, then concatenation into the final artifact.
///
/// Everything runs sequentially; segments are never rendered in parallel and
/// concatenation starts only after every clip exists on disk.
pub struct StoryTeller {
    config: StoryTellerConfig,
    splitter: SentenceSplitter,
    writer: Box<dyn Writer>,
    painter: Box<dyn Painter>,
    speaker: Box<dyn Speaker>,
    encoder: Box<dyn VideoEncoder>,
}

impl StoryTeller {
    /// Build a pipeline bound to the HTTP inference backends and ffmpeg.
    ///
    /// Dependency checks run first: a missing ffmpeg binary or unavailable
    /// sentence rules fail here, before any generation work begins.
    pub fn new(config: StoryTellerConfig) -> Result<Self> {
        let encoder = FfmpegEncoder::new(config.strict_encoding)?;
        let splitter = SentenceSplitter::new()?;
        seed::set_seed(config.seed);
        let writer = Box::new(HttpWriter::new(&config));
        let painter = Box::new(HttpPainter::new(&config));
        let speaker = Box::new(HttpSpeaker::new(&config));
        Ok(Self {
            config,
            splitter,
            writer,
            painter,
            speaker,
            encoder: Box::new(encoder),
        })
    }

    /// Build a pipeline from explicit components. External tools are the
    /// caller's responsibility here; only the sentence rules are checked.
    pub fn with_components(
        config: StoryTellerConfig,
        writer: Box<dyn Writer>,
        painter: Box<dyn Painter>,
        speaker: Box<dyn Speaker>,
        encoder: Box<dyn VideoEncoder>,
    ) -> Result<Self> {
        let splitter = SentenceSplitter::new()?;
        seed::set_seed(config.seed);
        Ok(Self {
            config,
            splitter,
            writer,
            painter,
            speaker,
            encoder,
        })
    }

    pub fn config(&self) -> &StoryTellerConfig {
        &self.config
    }

    fn output_path(&self, file: &str) -> PathBuf {
        self.config.output_dir.join(file)
    }

    /// Extend the prompt until the story holds strictly more than
    /// `num_sentences` sentences, then truncate to exactly that many.
    ///
    /// The overshoot guards against degenerate short completions: the last
    /// sentence of a completion is often a fragment, and requiring one
    /// sentence beyond the target means every returned sentence is complete.
    /// Bounded by `max_story_rounds`; hitting the bound is a hard error.
    pub async fn write_story(&self, prompt: &str, num_sentences: usize) -> Result<Vec<String>> {
        let mut text = prompt.to_string();
        let mut sentences = Vec::new();
        let mut rounds = 0u32;
        while sentences.len() < num_sentences + 1 {
            if rounds >= self.config.max_story_rounds {
                return Err(StoryTellerError::StoryStalled { rounds });
            }
            text = self.writer.generate_text(&text).await?;
            sentences = self.splitter.split(&text);
            rounds += 1;
        }
        sentences.truncate(num_sentences);
        Ok(sentences)
    }

    /// Render the artifacts for one segment and return the clip path.
    ///
    /// Writes `{ordinal}.png`, `{ordinal}.wav`, `{ordinal}.srt` and
    /// `{ordinal}.mp4` into the output directory.
    pub async fn render_segment(
        &self,
        ordinal: usize,
        sentence: &str,
        painter_prompt_prefix: &str,
    ) -> Result<PathBuf> {
        let image_path = self.output_path(&format!("{}.png", ordinal));
        let audio_path = self.output_path(&format!("{}.wav", ordinal));
        let subtitle_path = self.output_path(&format!("{}.srt", ordinal));
        let clip_path = self.output_path(&format!("{}.mp4", ordinal));

        let image = self
            .painter
            .generate_image(&format!("{} {}", painter_prompt_prefix, sentence))
            .await?;
        fs::write(&image_path, &image).await?;

        let mut audio = self.speaker.synthesize_speech(sentence).await?;
        let duration = audio.pad_to_whole_seconds();
        audio.write_wav(&audio_path)?;

        fs::write(&subtitle_path, make_subtitle(sentence, duration)).await?;

        self.encoder
            .compose_clip(&image_path, &audio_path, &subtitle_path, &clip_path)
            .await?;

        Ok(clip_path)
    }

    /// Concatenate clips, in the order given, into `out.mp4`.
    ///
    /// The manifest lists bare filenames, one `file <name>` line per clip,
    /// and the concat invocation runs from the output directory so they
    /// resolve.
    pub async fn concat_videos(&self, clip_paths: &[PathBuf]) -> Result<PathBuf> {
        let manifest_path = self.output_path("files.txt");
        let output_path = self.output_path("out.mp4");

        let mut manifest = String::new();
        for clip in clip_paths {
            let name = clip
                .file_name()
                .ok_or_else(|| {
                    StoryTellerError::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("clip path has no file name: {}", clip.display()),
                    ))
                })?
                .to_string_lossy();
            manifest.push_str(&format!("file {}\n", name));
        }
        fs::write(&manifest_path, manifest).await?;

        self.encoder
            .concat_clips(&manifest_path, &output_path, &self.config.output_dir)
            .await?;

        Ok(output_path)
    }

    /// End-to-end run: prompt → sentences → per-segment clips → final video.
    /// Returns the path of the concatenated output.
    pub async fn generate(
        &self,
        prompt: &str,
        painter_prompt_prefix: &str,
        num_sentences: usize,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.output_dir).await?;

        let sentences = self.write_story(prompt, num_sentences).await?;
        info!(count = sentences.len(), "story segmented");

        let mut clip_paths = Vec::with_capacity(sentences.len());
        for (ordinal, sentence) in sentences.iter().enumerate() {
            info!(ordinal, %sentence, "rendering segment");
            let clip = self
                .render_segment(ordinal, sentence, painter_prompt_prefix)
                .await?;
            clip_paths.push(clip);
        }

        self.concat_videos(&clip_paths).await
    }
}
