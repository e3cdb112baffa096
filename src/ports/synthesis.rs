use async_trait::async_trait;

use crate::domain::DomainError;

/// Port for the speech synthesis provider.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize the given text, returning playable audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, DomainError>;
}
