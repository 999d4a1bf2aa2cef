//! Voice output: turns the final reply into an MP3 voice note.

use speech_client::{SpeechClient, SpeechError};
use tracing::info;

use super::ToolError;

pub const SPEECH_TOOL_NAME: &str = "generate_speech";

#[derive(Clone)]
pub struct SpeechTool {
    client: SpeechClient,
}

impl SpeechTool {
    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            client: SpeechClient::new(api_key, voice_id),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    pub fn name(&self) -> &'static str {
        SPEECH_TOOL_NAME
    }

    pub fn voice_id(&self) -> &str {
        self.client.voice_id()
    }

    /// MP3 bytes for `text`.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ToolError> {
        let audio = self.client.synthesize(text).await.map_err(|e| match e {
            SpeechError::EmptyText => ToolError::InvalidInput(e.to_string()),
            other => ToolError::Upstream(other.to_string()),
        })?;
        info!(voice_id = %self.voice_id(), bytes = audio.len(), "Voice note synthesized");
        Ok(audio)
    }
}
