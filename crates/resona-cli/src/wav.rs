//! WAV file reading and writing.

use std::path::Path;

use anyhow::{Context, bail};
use hound::{SampleFormat, WavReader, WavWriter};
use resona_core::StereoBuffer;

/// WAV metadata read from the header without loading samples.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Sample frames per channel.
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> anyhow::Result<WavInfo> {
    let reader = WavReader::open(&path)
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
    })
}

/// Read a WAV file as stereo f32 samples plus its sample rate.
///
/// Mono files are duplicated to both channels; files with more than two
/// channels are rejected.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> anyhow::Result<(StereoBuffer, u32)> {
    let reader = WavReader::open(&path)
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let buffer = match spec.channels {
        1 => StereoBuffer::from_mono(samples),
        2 => StereoBuffer::from_interleaved(&samples),
        n => bail!("unsupported channel count: {n} (expected mono or stereo)"),
    };

    Ok((buffer, spec.sample_rate))
}

/// Write a stereo buffer as a 32-bit float WAV file.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoBuffer,
    sample_rate: u32,
) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(&path, spec)
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    for sample in samples.to_interleaved() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}
