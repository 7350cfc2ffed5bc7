//! Playback of synthesized agent speech.

use anyhow::{Context, Result};
use log::debug;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;

/// Decode and play an in-memory audio payload (MP3 from the TTS endpoint)
/// through the default output device, blocking until it finishes.
pub fn play_audio(bytes: Vec<u8>) -> Result<()> {
    debug!("Playing {} bytes of synthesized audio", bytes.len());

    let (_stream, handle) =
        OutputStream::try_default().context("Failed to open audio output device")?;
    let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;
    let source = Decoder::new(Cursor::new(bytes)).context("Failed to decode synthesized audio")?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
