use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Voice session state machine.
///
/// State transitions:
/// - Idle -> Listening (start)
/// - Listening -> Processing (finalized transcript received)
/// - Processing -> Listening (completion resolved, session still active)
/// - Processing -> Idle (completion resolved after an explicit stop)
/// - Listening -> Error -> Idle (capture provider error, automatic)
/// - any -> Idle (stop)
///
/// Note: `Processing` means exactly one completion request is outstanding.
/// The UI must gate the record toggle on `is_processing()` so a second
/// session cannot be started mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SessionStatus {
    /// No active capture session.
    Idle = 0,
    /// Capture session open, waiting for finalized transcripts.
    Listening = 1,
    /// A completion request is outstanding.
    Processing = 2,
    /// The capture provider reported an error; transient before Idle.
    Error = 3,
}

impl SessionStatus {
    /// Check if a new capture session can be started from this state.
    #[must_use]
    pub fn can_start(&self) -> bool {
        matches!(self, SessionStatus::Idle)
    }

    /// Check if the session is mid-completion.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(self, SessionStatus::Processing)
    }
}

impl From<u8> for SessionStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => SessionStatus::Idle,
            1 => SessionStatus::Listening,
            2 => SessionStatus::Processing,
            _ => SessionStatus::Error,
        }
    }
}

impl From<SessionStatus> for u8 {
    fn from(status: SessionStatus) -> Self {
        status as u8
    }
}

/// Atomic wrapper for SessionStatus for lock-free reads from the UI thread.
#[derive(Debug)]
pub struct AtomicSessionStatus(AtomicU8);

impl AtomicSessionStatus {
    pub fn new(status: SessionStatus) -> Self {
        Self(AtomicU8::new(status.into()))
    }

    pub fn load(&self) -> SessionStatus {
        self.0.load(Ordering::Acquire).into()
    }

    /// Store a new status, returning the previous one.
    pub fn swap(&self, status: SessionStatus) -> SessionStatus {
        self.0.swap(status.into(), Ordering::AcqRel).into()
    }

    pub fn store(&self, status: SessionStatus) {
        self.0.store(status.into(), Ordering::Release);
    }

    /// Store `to` only if the current status is `from`; returns whether the
    /// exchange happened. Lets a transition lose cleanly against a
    /// concurrent writer that already moved the machine elsewhere.
    pub fn compare_exchange(&self, from: SessionStatus, to: SessionStatus) -> bool {
        self.0
            .compare_exchange(from.into(), to.into(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for AtomicSessionStatus {
    fn default() -> Self {
        Self::new(SessionStatus::Idle)
    }
}

/// Errors reported by the speech capture provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureError {
    /// The provider heard nothing before giving up.
    NoSpeech,
    /// The session was aborted by the platform.
    Aborted,
    /// Any other provider error code.
    Other(String),
}

impl CaptureError {
    /// Map a provider error to the message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::NoSpeech => {
                "No speech detected. Please try speaking again.".to_string()
            }
            CaptureError::Aborted => {
                "Speech recognition was aborted. Please try again.".to_string()
            }
            CaptureError::Other(code) => format!("Error: {code}"),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoSpeech => write!(f, "no-speech"),
            CaptureError::Aborted => write!(f, "aborted"),
            CaptureError::Other(code) => write!(f, "{code}"),
        }
    }
}

/// Events emitted by the voice session for UI consumption.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    /// Session status changed.
    StateChanged {
        from: SessionStatus,
        to: SessionStatus,
    },
    /// A finalized transcript was received from the capture provider.
    TranscriptFinalized { text: String },
    /// A completion (or its fallback) is ready to display.
    ResponseReady { text: String },
    /// The capture provider failed; `message` is user-facing.
    CaptureFailed { message: String },
}

/// User-controlled voice settings.
///
/// Toggling `use_audio_response` off while playback is active must stop
/// playback synchronously as part of the same setting change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub use_audio_response: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            use_audio_response: true,
        }
    }
}

/// Fallback shown and spoken when the completion provider fails outright.
pub const COMPLETION_ERROR_FALLBACK: &str =
    "Sorry, I encountered an error. Please try again.";

/// Fallback shown and spoken when the provider returns an empty completion.
pub const EMPTY_COMPLETION_FALLBACK: &str =
    "I couldn't process that. Please try again.";
