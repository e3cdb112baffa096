#![forbid(unsafe_code)]

//! EchoNote: a voice assistant core for AI-powered notetaking.
//!
//! The crate coordinates continuous speech capture, single-flight
//! completion requests, exclusive synthesized-audio playback, and a
//! timestamped note store. Every external collaborator sits behind a port
//! in [`ports`]; production adapters live in [`adapters`]; the session
//! state machine and its UI-facing surface live in [`app`].

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use app::{AppController, NotesService, VoiceAssistant};
pub use domain::{
    AppConfig, CaptureError, DomainError, NewNote, Note, SessionEvent, SessionStatus,
    VoiceSettings,
};
