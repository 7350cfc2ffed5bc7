//! HTTP client for the conversational backend.
//!
//! Three endpoints: `GET /greet` for the opening message, `POST /converse`
//! with a multipart WAV upload for a full transcription + response round,
//! and `POST /tts` for synthesized speech of a given text (base64 MP3).

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{debug, info};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upload filename the backend stores the recording under.
const UPLOAD_FILE_NAME: &str = "recorded.wav";

#[derive(Debug, Deserialize)]
pub struct ConverseResponse {
    /// Transcription of the uploaded audio. `None` when the backend could
    /// not understand the input.
    pub user_input: Option<String>,
    pub ai_response: String,
}

#[derive(Debug, Deserialize)]
struct GreetResponse {
    greeting: Option<String>,
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    success: bool,
    audio: String,
    format: String,
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the opening greeting. `None` means the backend has already
    /// greeted this session.
    pub async fn greet(&self) -> Result<Option<String>> {
        let url = format!("{}/greet", self.base_url);
        debug!("Fetching greeting from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Greeting request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Greeting returned status {}: {}", status, body));
        }

        let result: GreetResponse = response
            .json()
            .await
            .context("Failed to parse greeting response")?;
        Ok(result.greeting)
    }

    /// Upload a WAV payload and get the transcription + agent response.
    pub async fn converse(&self, wav_bytes: Vec<u8>) -> Result<ConverseResponse> {
        let url = format!("{}/converse", self.base_url);
        debug!("Uploading {} WAV bytes to: {}", wav_bytes.len(), url);

        let file_part = multipart::Part::bytes(wav_bytes)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("audio/wav")
            .context("Failed to create file part")?;
        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Converse request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Converse returned status {}: {}", status, body));
        }

        let result: ConverseResponse = response
            .json()
            .await
            .context("Failed to parse converse response")?;
        info!(
            "Converse round complete: {} response chars",
            result.ai_response.len()
        );
        Ok(result)
    }

    /// Synthesize speech for a text and return the decoded audio bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/tts", self.base_url);
        debug!("Requesting speech synthesis from: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&TtsRequest { text })
            .send()
            .await
            .context("TTS request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("TTS returned status {}: {}", status, body));
        }

        let result: TtsResponse = response
            .json()
            .await
            .context("Failed to parse TTS response")?;
        if !result.success {
            return Err(anyhow!("TTS reported failure"));
        }
        debug!("TTS payload format: {}", result.format);

        BASE64
            .decode(result.audio.as_bytes())
            .context("Failed to decode TTS audio payload")
    }
}
