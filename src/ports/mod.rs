pub mod capture;
pub mod completion;
pub mod config;
pub mod note_store;
pub mod playback;
pub mod synthesis;

pub use capture::{CaptureConfig, CaptureEvent, SpeechCapture};
pub use completion::CompletionProvider;
pub use config::ConfigStore;
pub use note_store::NoteStore;
pub use playback::{AudioOutput, PlaybackHandle};
pub use synthesis::SpeechSynthesizer;
