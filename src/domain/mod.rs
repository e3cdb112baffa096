pub mod config;
pub mod error;
pub mod note;
pub mod session;

pub use config::{ApiConfig, AppConfig, LoggingConfig, SpeechConfig};
pub use error::DomainError;
pub use note::{append_to_draft, format_timestamp, NewNote, Note};
pub use session::{
    AtomicSessionStatus, CaptureError, SessionEvent, SessionStatus, VoiceSettings,
};
