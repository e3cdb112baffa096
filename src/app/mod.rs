pub mod controller;
pub mod notes;
pub mod voice;

pub use controller::AppController;
pub use notes::NotesService;
pub use voice::VoiceAssistant;
