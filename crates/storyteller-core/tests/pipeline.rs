use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tempfile::TempDir;

use storyteller_core::{
    Painter, Result, Speaker, SpeechAudio, StoryTeller, StoryTellerConfig, StoryTellerError,
    VideoEncoder, Writer,
};

/// Appends one fixed sentence per call, the way a deterministic
/// text-generation backend would extend the running story.
struct StubWriter {
    calls: Mutex<u32>,
}

impl StubWriter {
    fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Writer for StubWriter {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        Ok(format!("{} Sentence {}.", prompt, *calls))
    }
}

/// Returns the same text forever, so the sentence count never grows.
struct StalledWriter;

#[async_trait]
impl Writer for StalledWriter {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

struct StubPainter;

#[async_trait]
impl Painter for StubPainter {
    async fn generate_image(&self, _prompt: &str) -> Result<Vec<u8>> {
        Ok(b"\x89PNG test image".to_vec())
    }
}

struct StubSpeaker;

#[async_trait]
impl Speaker for StubSpeaker {
    async fn synthesize_speech(&self, _text: &str) -> Result<SpeechAudio> {
        // One and a half seconds, forcing the padding path.
        Ok(SpeechAudio {
            samples: vec![0.25; 22050 + 11025],
            sample_rate: 22050,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
enum EncoderCall {
    Compose(PathBuf),
    Concat(PathBuf),
}

/// Fabricates clip files instead of running ffmpeg and records call order.
struct StubEncoder {
    log: Arc<Mutex<Vec<EncoderCall>>>,
}

impl StubEncoder {
    fn new() -> (Self, Arc<Mutex<Vec<EncoderCall>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }
}

#[async_trait]
impl VideoEncoder for StubEncoder {
    async fn compose_clip(
        &self,
        _image: &Path,
        _audio: &Path,
        _subtitles: &Path,
        clip: &Path,
    ) -> Result<()> {
        std::fs::write(clip, b"clip")?;
        self.log
            .lock()
            .unwrap()
            .push(EncoderCall::Compose(clip.to_path_buf()));
        Ok(())
    }

    async fn concat_clips(&self, _manifest: &Path, output: &Path, _workdir: &Path) -> Result<()> {
        std::fs::write(output, b"final")?;
        self.log
            .lock()
            .unwrap()
            .push(EncoderCall::Concat(output.to_path_buf()));
        Ok(())
    }
}

fn stub_pipeline(output_dir: &Path) -> (StoryTeller, Arc<Mutex<Vec<EncoderCall>>>) {
    let config = StoryTellerConfig {
        output_dir: output_dir.to_path_buf(),
        ..StoryTellerConfig::default()
    };
    let (encoder, log) = StubEncoder::new();
    let teller = StoryTeller::with_components(
        config,
        Box::new(StubWriter::new()),
        Box::new(StubPainter),
        Box::new(StubSpeaker),
        Box::new(encoder),
    )
    .unwrap();
    (teller, log)
}

#[tokio::test]
async fn write_story_returns_exactly_n_sentences() {
    let dir = TempDir::new().unwrap();

    for n in 1..=5 {
        let (teller, _) = stub_pipeline(dir.path());
        let sentences = teller.write_story("Hello world.", n).await.unwrap();
        assert_eq!(sentences.len(), n);
        assert_eq!(sentences[0], "Hello world.");
        // In generation order, nothing from beyond the nth.
        for (i, sentence) in sentences.iter().enumerate().skip(1) {
            assert_eq!(sentence, &format!("Sentence {}.", i));
        }
    }
}

#[tokio::test]
async fn write_story_stalls_out_at_the_round_bound() {
    let dir = TempDir::new().unwrap();
    let config = StoryTellerConfig {
        output_dir: dir.path().to_path_buf(),
        max_story_rounds: 8,
        ..StoryTellerConfig::default()
    };
    let (encoder, _) = StubEncoder::new();
    let teller = StoryTeller::with_components(
        config,
        Box::new(StalledWriter),
        Box::new(StubPainter),
        Box::new(StubSpeaker),
        Box::new(encoder),
    )
    .unwrap();

    let err = teller.write_story("One sentence only.", 3).await.unwrap_err();
    assert!(matches!(err, StoryTellerError::StoryStalled { rounds: 8 }));
}

#[tokio::test]
async fn render_segment_writes_ordinal_named_artifacts() {
    let dir = TempDir::new().unwrap();
    let (teller, _) = stub_pipeline(dir.path());

    let clip = teller
        .render_segment(7, "A knight rode forth.", "Beautiful painting")
        .await
        .unwrap();

    assert_eq!(clip, dir.path().join("7.mp4"));
    for artifact in ["7.png", "7.wav", "7.srt", "7.mp4"] {
        assert!(dir.path().join(artifact).exists(), "missing {}", artifact);
    }

    // Padded to two whole seconds, so the cue window is two seconds wide.
    let srt = std::fs::read_to_string(dir.path().join("7.srt")).unwrap();
    assert_eq!(srt, "0\n00:00:00,000 --> 00:00:02,000\nA knight rode forth.\n");
}

#[tokio::test]
async fn generate_concatenates_in_ordinal_order() {
    let dir = TempDir::new().unwrap();
    let (teller, log) = stub_pipeline(dir.path());

    let output = teller
        .generate("Hello world.", "Beautiful painting", 3)
        .await
        .unwrap();
    assert_eq!(output, dir.path().join("out.mp4"));

    let manifest = std::fs::read_to_string(dir.path().join("files.txt")).unwrap();
    assert_eq!(manifest, "file 0.mp4\nfile 1.mp4\nfile 2.mp4\n");

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            EncoderCall::Compose(dir.path().join("0.mp4")),
            EncoderCall::Compose(dir.path().join("1.mp4")),
            EncoderCall::Compose(dir.path().join("2.mp4")),
            EncoderCall::Concat(dir.path().join("out.mp4")),
        ]
    );
}

#[tokio::test]
async fn end_to_end_produces_the_full_artifact_set() {
    let dir = TempDir::new().unwrap();
    let (teller, _) = stub_pipeline(dir.path());

    teller
        .generate("Hello world.", "Beautiful painting", 2)
        .await
        .unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "0.mp4", "0.png", "0.srt", "0.wav", "1.mp4", "1.png", "1.srt", "1.wav", "files.txt",
            "out.mp4",
        ]
    );

    let manifest = std::fs::read_to_string(dir.path().join("files.txt")).unwrap();
    assert_eq!(manifest, "file 0.mp4\nfile 1.mp4\n");
}
