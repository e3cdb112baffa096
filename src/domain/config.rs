use serde::{Deserialize, Serialize};

/// Speech pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Recognition language tag passed to the capture provider.
    pub language: String,
    /// Model identifier for the completion provider.
    pub completion_model: String,
    /// Model identifier for the synthesis provider.
    pub synthesis_model: String,
    /// Voice identifier for the synthesis provider.
    pub synthesis_voice: String,
    /// Maximum consecutive capture restarts after the provider ends a
    /// session on its own. The counter resets on each finalized transcript.
    pub max_consecutive_restarts: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            completion_model: "gpt-3.5-turbo".to_string(),
            synthesis_model: "tts-1".to_string(),
            synthesis_voice: "alloy".to_string(),
            max_consecutive_restarts: 5,
        }
    }
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for the OpenAI-style completion and synthesis endpoints.
    pub openai_base_url: String,
    /// Environment variable holding the API key for those endpoints.
    pub openai_key_env: String,
    /// Base URL of the note-store collection.
    pub notes_base_url: String,
    /// Environment variable holding the note-store API key, if any.
    pub notes_key_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            openai_base_url: "https://api.openai.com".to_string(),
            openai_key_env: "OPENAI_API_KEY".to_string(),
            notes_base_url: "https://api.echonote.dev/v1/notes".to_string(),
            notes_key_env: "ECHONOTE_NOTES_API_KEY".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub speech: SpeechConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
