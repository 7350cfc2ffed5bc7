//! WAV serialization for upload payloads.
//!
//! The backend expects canonical 16-bit PCM WAV (RIFF/WAVE, format tag 1,
//! 44-byte header, little-endian throughout). `encode_wav` produces that
//! layout byte-for-byte from a decoded float buffer; `read_wav_file` is the
//! file-input path for `--input`, normalizing whatever hound can read into
//! the same `AudioBuffer` shape.

use anyhow::{Context, Result};
use hound::SampleFormat;
use std::path::Path;

/// Decoded multi-channel audio: one `Vec<f32>` per channel, samples
/// nominally in [-1.0, 1.0], all channels the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build from per-channel sample data. All channels must be the same
    /// length; the shorter of any mismatched pair decides the frame count.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        debug_assert!(!channels.is_empty(), "AudioBuffer needs at least one channel");
        debug_assert!(
            channels.windows(2).all(|w| w[0].len() == w[1].len()),
            "channel lengths differ"
        );
        Self {
            sample_rate,
            channels,
        }
    }

    /// Build from channel-interleaved capture data (the layout cpal input
    /// callbacks deliver). Trailing samples that do not fill a whole frame
    /// are dropped.
    pub fn from_interleaved(sample_rate: u32, num_channels: u16, interleaved: &[f32]) -> Self {
        let num_channels = num_channels.max(1) as usize;
        let frames = interleaved.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                channels[ch].push(sample);
            }
        }
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of sample frames per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, ch: usize) -> &[f32] {
        &self.channels[ch]
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f32 / self.sample_rate as f32
    }
}

/// Serialize a buffer as canonical 16-bit PCM WAV.
///
/// Pure and infallible: out-of-range samples are clamped to [-1, 1], never
/// rejected. Full scale maps to ±32767 — the clamp is applied before the
/// 0x7FFF scale, so -1.0 encodes to -32767 rather than the -32768 floor.
/// NaN samples encode to 0 (NaN survives the clamp and the saturating i16
/// cast sends it to zero).
pub fn encode_wav(buffer: &AudioBuffer) -> Vec<u8> {
    let num_channels = buffer.num_channels() as u16;
    let sample_rate = buffer.sample_rate();
    let frames = buffer.len();
    let data_bytes = (frames * num_channels as usize * 2) as u32;

    let mut out = Vec::with_capacity(44 + data_bytes as usize);

    // RIFF chunk
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_bytes).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk: PCM, 16 bits per sample
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * num_channels as u32 * 2).to_le_bytes());
    out.extend_from_slice(&(num_channels * 2).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());

    // data chunk, channel-interleaved
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_bytes.to_le_bytes());
    for i in 0..frames {
        for ch in 0..buffer.num_channels() {
            let sample = buffer.channel(ch)[i].clamp(-1.0, 1.0);
            let value = (sample * 32767.0) as i16;
            out.extend_from_slice(&value.to_le_bytes());
        }
    }

    out
}

/// Read a WAV file into an `AudioBuffer`, normalizing integer PCM to f32.
pub fn read_wav_file<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("Failed to read float samples")?,
        SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()
                .context("Failed to read integer samples")?
        }
    };

    Ok(AudioBuffer::from_interleaved(
        spec.sample_rate,
        spec.channels,
        &interleaved,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le_u32(bytes: &[u8]) -> u32 {
        u32::from_le_bytes(bytes.try_into().unwrap())
    }

    fn le_u16(bytes: &[u8]) -> u16 {
        u16::from_le_bytes(bytes.try_into().unwrap())
    }

    fn le_i16(bytes: &[u8]) -> i16 {
        i16::from_le_bytes(bytes.try_into().unwrap())
    }

    #[test]
    fn empty_mono_buffer_is_a_bare_header() {
        let buffer = AudioBuffer::from_channels(16_000, vec![vec![]]);
        let bytes = encode_wav(&buffer);

        assert_eq!(bytes.len(), 44);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(le_u32(&bytes[4..8]), 36);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(le_u32(&bytes[16..20]), 16);
        assert_eq!(le_u16(&bytes[20..22]), 1); // PCM
        assert_eq!(le_u16(&bytes[22..24]), 1); // mono
        assert_eq!(le_u32(&bytes[24..28]), 16_000);
        assert_eq!(le_u32(&bytes[28..32]), 32_000); // byte rate
        assert_eq!(le_u16(&bytes[32..34]), 2); // block align
        assert_eq!(le_u16(&bytes[34..36]), 16); // bits per sample
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(le_u32(&bytes[40..44]), 0);
    }

    #[test]
    fn output_length_matches_frame_count() {
        let buffer = AudioBuffer::from_channels(44_100, vec![vec![0.0; 100], vec![0.0; 100]]);
        assert_eq!(encode_wav(&buffer).len(), 44 + 100 * 2 * 2);
    }

    #[test]
    fn full_scale_clamp_is_asymmetric() {
        let buffer = AudioBuffer::from_channels(8_000, vec![vec![1.0, -1.0, 2.0, -2.0]]);
        let bytes = encode_wav(&buffer);
        assert_eq!(le_i16(&bytes[44..46]), 32_767);
        assert_eq!(le_i16(&bytes[46..48]), -32_767);
        // Out-of-range samples clamp to the same bounds
        assert_eq!(le_i16(&bytes[48..50]), 32_767);
        assert_eq!(le_i16(&bytes[50..52]), -32_767);
    }

    #[test]
    fn nan_samples_encode_to_zero() {
        let buffer = AudioBuffer::from_channels(8_000, vec![vec![f32::NAN]]);
        let bytes = encode_wav(&buffer);
        assert_eq!(le_i16(&bytes[44..46]), 0);
    }

    #[test]
    fn stereo_samples_are_interleaved() {
        let left = vec![0.25, 0.5];
        let right = vec![-0.25, -0.5];
        let buffer = AudioBuffer::from_channels(16_000, vec![left.clone(), right.clone()]);
        let bytes = encode_wav(&buffer);

        for i in 0..2 {
            let l = le_i16(&bytes[44 + 4 * i..44 + 4 * i + 2]);
            let r = le_i16(&bytes[44 + 4 * i + 2..44 + 4 * i + 4]);
            assert_eq!(l, (left[i] * 32767.0) as i16);
            assert_eq!(r, (right[i] * 32767.0) as i16);
        }
    }

    #[test]
    fn encoding_is_idempotent() {
        let buffer = AudioBuffer::from_channels(22_050, vec![vec![0.1, -0.9, 0.33, 1.5]]);
        assert_eq!(encode_wav(&buffer), encode_wav(&buffer));
    }

    #[test]
    fn interleaved_constructor_deinterleaves() {
        let buffer = AudioBuffer::from_interleaved(48_000, 2, &[0.1, -0.1, 0.2, -0.2, 0.3]);
        // Trailing partial frame (0.3) is dropped
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.channel(0), &[0.1, 0.2]);
        assert_eq!(buffer.channel(1), &[-0.1, -0.2]);
    }

    #[test]
    fn read_back_through_hound() {
        let buffer = AudioBuffer::from_channels(16_000, vec![vec![0.5, -0.5, 0.0]]);
        let bytes = encode_wav(&buffer);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encoded.wav");
        std::fs::write(&path, &bytes).unwrap();

        let read = read_wav_file(&path).unwrap();
        assert_eq!(read.sample_rate(), 16_000);
        assert_eq!(read.num_channels(), 1);
        assert_eq!(read.len(), 3);
        // 0.5 scales to 16383/32768 on the way back; just check the sign and ballpark
        assert!((read.channel(0)[0] - 0.5).abs() < 0.01);
        assert!((read.channel(0)[1] + 0.5).abs() < 0.01);
    }
}
