pub mod config_store;
pub mod openai_completion;
pub mod openai_speech;
pub mod rest_note_store;
pub mod rodio_output;

pub use config_store::TomlConfigStore;
pub use openai_completion::OpenAiCompletion;
pub use openai_speech::OpenAiSpeech;
pub use rest_note_store::RestNoteStore;
pub use rodio_output::RodioOutput;

use once_cell::sync::Lazy;
use reqwest::Client;

/// Shared HTTP client for all remote adapters.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .use_rustls_tls()
        .user_agent(format!("EchoNote/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client - this should not happen")
});
