use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::DomainError;
use crate::ports::SpeechSynthesizer;

/// Request body for the speech synthesis endpoint.
#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

/// Synthesizer backed by an OpenAI-style `/v1/audio/speech` API.
/// The response body is the encoded audio (MP3 by default).
pub struct OpenAiSpeech {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl OpenAiSpeech {
    /// Create a new synthesis client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing.
    pub fn new(
        base_url: &str,
        api_key: String,
        model: String,
        voice: String,
    ) -> Result<Self, DomainError> {
        if api_key.is_empty() {
            return Err(DomainError::Config(
                "API key required for speech synthesis".to_string(),
            ));
        }

        Ok(Self {
            client: super::HTTP_CLIENT.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            voice,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, DomainError> {
        tracing::debug!(model = %self.model, voice = %self.voice, input_chars = text.len(), "requesting synthesis");

        let request = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
        };

        let response = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis API error");
            return Err(DomainError::Synthesis(format!(
                "synthesis API error {status}: {body}"
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| DomainError::Synthesis(e.to_string()))?;

        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}
