//! # ElevenLabs speech client
//!
//! Converts reply text into spoken audio (MP3) with a fixed voice. One request per call,
//! no retries: errors are returned to the caller as [`SpeechError`].

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_SPEECH_MODEL: &str = "eleven_monolingual_v1";

/// ElevenLabs rejects long inputs; longer text is cut at a char boundary.
pub const MAX_TEXT_CHARS: usize = 2500;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Text to synthesize is empty")]
    EmptyText,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Text-to-speech client bound to one voice.
#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    api_key: String,
    voice_id: String,
    base_url: String,
    model: String,
}

impl SpeechClient {
    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            voice_id: voice_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_SPEECH_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    /// Synthesizes `text` and returns the MP3 bytes.
    #[tracing::instrument(skip(self, text))]
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let input: String = trimmed.chars().take(MAX_TEXT_CHARS).collect();

        tracing::info!(
            voice_id = %self.voice_id,
            model = %self.model,
            text_len = input.len(),
            "ElevenLabs speech request"
        );

        let url = format!("{}/text-to-speech/{}", self.base_url, self.voice_id);
        let body = SpeechRequest {
            text: &input,
            model_id: &self.model,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::RequestFailed(e.to_string()))?;

        tracing::info!(audio_bytes = bytes.len(), "ElevenLabs speech completed");
        Ok(bytes.to_vec())
    }
}
