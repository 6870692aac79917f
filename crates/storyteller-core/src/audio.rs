use std::{io::Cursor, path::Path};

use crate::error::Result;

/// Mono narration audio at the speech model's native sample rate.
#[derive(Clone, Debug)]
pub struct SpeechAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SpeechAudio {
    /// Round the clip up to a whole number of seconds and return that
    /// duration.
    ///
    /// If the sample count is not an exact multiple of the sample rate, the
    /// tail is zero-padded so the subtitle window never outlives the audio.
    pub fn pad_to_whole_seconds(&mut self) -> u64 {
        let rate = self.sample_rate as u64;
        let len = self.samples.len() as u64;
        let (mut duration, remainder) = (len / rate, len % rate);
        if remainder != 0 {
            duration += 1;
            self.samples.resize((duration * rate) as usize, 0.0);
        }
        duration
    }

    /// Write the clip as a mono 32-bit float WAV at the native rate.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Decode WAV bytes (as returned by the speech endpoint) into samples.
    /// Integer PCM is normalized into the f32 range.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<hound::Result<Vec<_>>>()?,
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max))
                    .collect::<hound::Result<Vec<_>>>()?
            }
        };
        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }
}
