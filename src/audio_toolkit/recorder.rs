//! Microphone capture.
//!
//! `MicRecorder` is a per-recording session object: `start` opens a cpal
//! input stream on the requested device, samples accumulate in an
//! interleaved buffer, and `stop` tears the stream down and hands back an
//! [`AudioBuffer`]. Dropping a live recorder releases the device the same
//! way, so an abandoned recording never leaves the microphone open.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use super::wav::AudioBuffer;

/// Names of the input devices the host exposes.
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .context("Failed to enumerate input devices")?;
    Ok(devices.filter_map(|d| d.name().ok()).collect())
}

fn find_input_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    match name {
        Some(name) => host
            .input_devices()
            .context("Failed to enumerate input devices")?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| anyhow!("Input device '{}' not found", name)),
        None => host
            .default_input_device()
            .ok_or_else(|| anyhow!("No default input device available")),
    }
}

pub struct MicRecorder {
    stream: cpal::Stream,
    samples: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
    channels: u16,
}

impl MicRecorder {
    /// Open the device and start capturing immediately.
    pub fn start(device_name: Option<&str>) -> Result<Self> {
        let device = find_input_device(device_name)?;
        let device_label = device.name().unwrap_or_else(|_| "<unknown>".to_string());
        let config = device
            .default_input_config()
            .with_context(|| format!("Failed to query input config for '{}'", device_label))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        let sample_format = config.sample_format();
        debug!(
            "Recording from '{}': {} Hz, {} channel(s), {:?}",
            device_label, sample_rate, channels, sample_format
        );

        let samples: Arc<Mutex<Vec<f32>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = samples.clone();
        let err_fn = |err: cpal::StreamError| warn!("Input stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _| {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _| {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend(data.iter().map(|&s| s as f32 / 32_768.0));
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::U16 => device.build_input_stream(
                &config.into(),
                move |data: &[u16], _| {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend(data.iter().map(|&s| (s as f32 - 32_768.0) / 32_768.0));
                    }
                },
                err_fn,
                None,
            ),
            other => return Err(anyhow!("Unsupported input sample format: {:?}", other)),
        }
        .context("Failed to build input stream")?;

        stream.play().context("Failed to start input stream")?;
        info!("Recording started on '{}'", device_label);

        Ok(Self {
            stream,
            samples,
            sample_rate,
            channels,
        })
    }

    /// Stop capturing, release the device, and return what was recorded.
    pub fn stop(self) -> Result<AudioBuffer> {
        let Self {
            stream,
            samples,
            sample_rate,
            channels,
        } = self;

        // Tear the callback down before reading the buffer
        drop(stream);

        let interleaved = samples
            .lock()
            .map_err(|_| anyhow!("Recording buffer lock poisoned"))?
            .clone();
        let buffer = AudioBuffer::from_interleaved(sample_rate, channels, &interleaved);
        info!(
            "Recording stopped: {:.2}s, {} frame(s), {} channel(s)",
            buffer.duration_secs(),
            buffer.len(),
            buffer.num_channels()
        );
        Ok(buffer)
    }
}
