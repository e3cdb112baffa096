use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::domain::{CaptureError, DomainError};

/// Configuration handed to the capture provider at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Keep the session open across utterances instead of ending after one.
    pub continuous: bool,
    /// Deliver interim (partial) results in addition to finalized ones.
    pub interim_results: bool,
    /// Recognition language tag (e.g. "en-US").
    pub language: String,
}

impl CaptureConfig {
    /// Continuous, final-results-only session in the given language.
    /// This is the only mode the voice session uses.
    pub fn continuous(language: impl Into<String>) -> Self {
        Self {
            continuous: true,
            interim_results: false,
            language: language.into(),
        }
    }
}

/// Events emitted by an active capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A recognition result. Only results with `is_final` set feed the
    /// completion pipeline; interim results are display-only.
    Transcript { text: String, is_final: bool },
    /// The provider reported an error; the session is over.
    Error(CaptureError),
    /// The provider ended the session on its own (platform timeout).
    Ended,
}

/// Port for the platform speech capture provider.
///
/// Implementations turn live audio into transcript events. The session
/// controller drives them exclusively through this seam so the state
/// machine can be exercised with scripted doubles.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Whether speech capture exists on the current platform.
    fn is_available(&self) -> bool;

    /// Begin a recognition session; events arrive on the returned channel.
    /// The channel closes when the session ends for any reason.
    async fn start(
        &self,
        config: &CaptureConfig,
    ) -> Result<mpsc::Receiver<CaptureEvent>, DomainError>;

    /// End the active session. Must not fail when no session is active.
    async fn stop(&self);
}
