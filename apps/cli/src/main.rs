use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use storyteller_core::{Dtype, StoryTeller, StoryTellerConfig};

#[derive(Parser)]
#[command(name = "storyteller")]
#[command(about = "Turn a text prompt into a narrated slideshow video")]
struct Cli {
    /// Seed prompt the story grows from
    #[arg(
        long,
        default_value = "Once upon a time, unicorns roamed the Earth."
    )]
    writer_prompt: String,

    /// Prefix prepended to every image prompt
    #[arg(long, default_value = "Beautiful painting")]
    painter_prompt_prefix: String,

    /// Number of story segments (one image, narration clip and subtitle each)
    #[arg(long, default_value_t = 10)]
    num_images: usize,

    /// Directory all artifacts are written into
    #[arg(long, default_value = "out")]
    output_dir: PathBuf,

    /// Seed for every source of randomness in the run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum new tokens per writer call
    #[arg(long, default_value_t = 50)]
    max_new_tokens: u32,

    /// Text generation model
    #[arg(long, default_value = "gpt2")]
    writer: String,

    /// Image generation model
    #[arg(long, default_value = "stabilityai/stable-diffusion-2")]
    painter: String,

    /// Text-to-speech model
    #[arg(long, default_value = "tts_models/en/ljspeech/glow-tts")]
    speaker: String,

    /// Text generation device
    #[arg(long, default_value = "cpu")]
    writer_device: String,

    /// Image generation device
    #[arg(long, default_value = "cpu")]
    painter_device: String,

    /// Text generation dtype (float16, bfloat16, float32, float64)
    #[arg(long, default_value = "float32")]
    writer_dtype: String,

    /// Image generation dtype
    #[arg(long, default_value = "float32")]
    painter_dtype: String,

    /// Enable attention slicing for diffusion
    #[arg(long)]
    enable_attention_slicing: bool,

    /// Use the DPM solver for faster image generation
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    use_dpm_solver: bool,

    /// Diffusion inference steps per image
    #[arg(long, default_value_t = 20)]
    num_painter_steps: u32,

    /// Root URL of the OpenAI-compatible inference server
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    api_base: String,

    /// Fail on non-zero ffmpeg exit codes instead of ignoring them
    #[arg(long)]
    strict_encoding: bool,
}

impl Cli {
    fn into_config(self) -> Result<StoryTellerConfig> {
        Ok(StoryTellerConfig {
            max_new_tokens: self.max_new_tokens,
            writer: self.writer,
            painter: self.painter,
            speaker: self.speaker,
            writer_device: self.writer_device,
            painter_device: self.painter_device,
            writer_dtype: self.writer_dtype.parse::<Dtype>()?,
            painter_dtype: self.painter_dtype.parse::<Dtype>()?,
            enable_attention_slicing: self.enable_attention_slicing,
            use_dpm_solver: self.use_dpm_solver,
            num_painter_steps: self.num_painter_steps,
            output_dir: self.output_dir,
            seed: self.seed,
            strict_encoding: self.strict_encoding,
            api_base: self.api_base,
            ..StoryTellerConfig::default()
        })
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let writer_prompt = cli.writer_prompt.clone();
    let painter_prompt_prefix = cli.painter_prompt_prefix.clone();
    let num_images = cli.num_images;
    let config = cli.into_config()?;

    println!(
        "\n{}  {}\n",
        style("storyteller").cyan().bold(),
        style("Narrated Slideshow Generator").dim()
    );

    // Fails here on missing ffmpeg, broken sentence rules or bad dtypes,
    // before any generation work starts.
    let story_teller = match StoryTeller::new(config) {
        Ok(teller) => teller,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let started = Instant::now();
    let spinner = create_spinner(&format!(
        "Generating {} segments from \"{}\"...",
        num_images, writer_prompt
    ));
    let output = story_teller
        .generate(&writer_prompt, &painter_prompt_prefix, num_images)
        .await?;
    spinner.finish_with_message(format!(
        "{} Generated {} segments in {}",
        style("✓").green().bold(),
        num_images,
        format_elapsed(started.elapsed())
    ));

    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(output.display()).cyan()
    );

    Ok(())
}
