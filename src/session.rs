//! Conversation session: one recording per turn, strictly ordered
//! record → encode → upload → render → speak.

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::signal;

use crate::api::ApiClient;
use crate::audio_toolkit::{encode_wav, read_wav_file, AudioBuffer, MicRecorder};
use crate::playback;
use crate::settings::Settings;
use crate::transcript::{Speaker, Transcript};

pub struct ConversationSession {
    client: ApiClient,
    settings: Settings,
    transcript: Transcript,
}

impl ConversationSession {
    pub fn new(client: ApiClient, settings: Settings) -> Self {
        Self {
            client,
            settings,
            transcript: Transcript::new(),
        }
    }

    /// Interactive loop: Enter starts a recording, Enter stops it, Ctrl-C
    /// quits. Ctrl-C mid-recording still goes through `MicRecorder::stop`,
    /// so the device is always released.
    pub async fn run(&mut self) -> Result<()> {
        if !self.settings.no_greet {
            self.greet().await;
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            println!();
            println!("Press Enter to record (Ctrl-C to quit)");
            if !wait_for_enter(&mut lines).await? {
                break;
            }

            let recorder = MicRecorder::start(self.settings.device.as_deref())?;
            println!("● Recording... press Enter to stop.");
            let completed = wait_for_enter(&mut lines).await?;
            let buffer = recorder.stop()?;
            if !completed {
                info!("Recording cancelled");
                break;
            }

            if buffer.is_empty() {
                println!("Didn't catch that. Please speak again...");
                continue;
            }

            if self.converse_once(buffer).await? {
                break;
            }
        }

        info!("Session ended after {} turn(s)", self.transcript.turns().len());
        Ok(())
    }

    /// Single round with a prerecorded WAV file instead of the microphone.
    pub async fn run_file(&mut self, path: &Path) -> Result<()> {
        if !self.settings.no_greet {
            self.greet().await;
        }

        let buffer = read_wav_file(path)
            .with_context(|| format!("Failed to load input file {}", path.display()))?;
        debug!(
            "Loaded {}: {:.2}s, {} channel(s) at {} Hz",
            path.display(),
            buffer.duration_secs(),
            buffer.num_channels(),
            buffer.sample_rate()
        );
        self.converse_once(buffer).await?;
        Ok(())
    }

    async fn greet(&mut self) {
        match self.client.greet().await {
            Ok(Some(greeting)) => {
                self.transcript.push(Speaker::Agent, &greeting);
                self.speak(greeting.clone()).await;
            }
            Ok(None) => debug!("Server sent no greeting"),
            Err(e) => warn!("Failed to fetch greeting: {:#}", e),
        }
    }

    /// Encode, upload, render one round. Returns true when the
    /// conversation is over (the user said "exit").
    async fn converse_once(&mut self, buffer: AudioBuffer) -> Result<bool> {
        let wav_bytes = encode_wav(&buffer);
        debug!(
            "Encoded {} frame(s) x {} channel(s) at {} Hz into {} bytes",
            buffer.len(),
            buffer.num_channels(),
            buffer.sample_rate(),
            wav_bytes.len()
        );

        self.transcript.show_thinking();
        match self.client.converse(wav_bytes).await {
            Ok(response) => {
                let user_text = response
                    .user_input
                    .clone()
                    .unwrap_or_else(|| "(unintelligible)".to_string());
                self.transcript.push(Speaker::User, &user_text);
                self.transcript.push(Speaker::Agent, &response.ai_response);
                self.speak(response.ai_response.clone()).await;

                let done = response
                    .user_input
                    .as_deref()
                    .is_some_and(|t| t.trim().eq_ignore_ascii_case("exit"));
                Ok(done)
            }
            Err(e) => {
                self.transcript.push_error();
                error!("Converse round failed: {:#}", e);
                Ok(false)
            }
        }
    }

    /// Best effort: synthesize and play the agent's reply. Failures are
    /// logged and never end the session.
    async fn speak(&self, text: String) {
        if self.settings.mute {
            return;
        }
        match self.client.synthesize(&text).await {
            Ok(bytes) => {
                let played = tokio::task::block_in_place(|| playback::play_audio(bytes));
                if let Err(e) = played {
                    warn!("Playback failed: {:#}", e);
                }
            }
            Err(e) => debug!("Speech synthesis unavailable: {:#}", e),
        }
    }
}

/// Wait for an Enter press; false on EOF or Ctrl-C.
async fn wait_for_enter(lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
    tokio::select! {
        line = lines.next_line() => {
            Ok(line.context("Failed to read stdin")?.is_some())
        }
        _ = signal::ctrl_c() => Ok(false),
    }
}
