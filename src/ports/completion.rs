use async_trait::async_trait;

use crate::domain::DomainError;

/// Port for the language-model completion provider.
///
/// One prompt in, one completion out; no streaming. The session controller
/// guarantees at most one request is outstanding at a time.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request a completion for the given prompt as the sole user message.
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;
}
