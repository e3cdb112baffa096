use crate::domain::session::CaptureError;
use thiserror::Error;

/// Domain-level errors for EchoNote.
///
/// Variants fall into distinct recovery tiers:
/// - `CapabilityUnavailable` is fatal to starting a session and reported once.
/// - `Capture` is recovered locally; the session returns to `Idle`.
/// - `Completion` is recovered locally by substituting a fallback response.
/// - `Synthesis` and `Audio` are logged and swallowed; they never affect the
///   text response path.
/// - `NoteStore` is propagated to the boundary caller unchanged.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Speech capture is not available on this platform")]
    CapabilityUnavailable,

    #[error("Speech capture error: {0}")]
    Capture(CaptureError),

    #[error("A capture session is already active")]
    SessionActive,

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Audio playback error: {0}")]
    Audio(String),

    #[error("Note store error: {0}")]
    NoteStore(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
