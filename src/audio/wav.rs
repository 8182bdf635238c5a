//! WAV encoding for finalized captures.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use tracing::info;

/// Write mono 16-bit linear PCM to `path`, overwriting any previous
/// recording there. Returns the size of the PCM payload in bytes.
pub fn write_pcm16(path: &Path, samples: &[f32], sample_rate: u32) -> Result<u64> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create recording directory")?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).context("Failed to open recording file")?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    let data_bytes = samples.len() as u64 * 2;
    info!(
        "Recording saved: {:?} ({} samples, {} bytes)",
        path,
        samples.len(),
        data_bytes
    );
    Ok(data_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_pcm16_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");

        let samples = vec![0.0, 0.5, -0.5, 1.0, -1.0];
        let data_bytes = write_pcm16(&path, &samples, 44_100).unwrap();
        assert_eq!(data_bytes, 10);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded[0], 0);
        assert_eq!(decoded[3], i16::MAX);
    }

    #[test]
    fn test_write_pcm16_overwrites_previous_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");

        write_pcm16(&path, &[0.1; 1000], 44_100).unwrap();
        let bytes = write_pcm16(&path, &[0.1; 10], 44_100).unwrap();
        assert_eq!(bytes, 20);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 10);
    }

    #[test]
    fn test_empty_capture_has_zero_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");
        let data_bytes = write_pcm16(&path, &[], 44_100).unwrap();
        assert_eq!(data_bytes, 0);
    }
}
