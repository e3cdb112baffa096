use std::env;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{OpenAiCompletion, OpenAiSpeech, RestNoteStore, RodioOutput, TomlConfigStore};
use crate::app::{NotesService, VoiceAssistant};
use crate::domain::{AppConfig, DomainError};
use crate::infrastructure::init_logging;
use crate::ports::{ConfigStore, SpeechCapture};

/// Application controller that orchestrates initialization and wires the
/// production adapters into the voice assistant and notes service.
///
/// The speech capture provider is platform-supplied and injected by the
/// embedder; everything else is built from configuration.
pub struct AppController {
    config: RwLock<AppConfig>,
    config_store: Arc<TomlConfigStore>,
    assistant: Arc<VoiceAssistant>,
    notes: Arc<NotesService>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize configuration, logging, and the provider adapters.
    pub fn new(capture: Arc<dyn SpeechCapture>) -> Result<Self, DomainError> {
        let config_store = Arc::new(TomlConfigStore::new()?);
        let config = config_store.load()?;

        let log_guard = init_logging(
            &config_store.logs_dir(),
            &config.logging.level,
            config.logging.file_logging,
        )?;

        info!("EchoNote starting up");

        let openai_key = env::var(&config.api.openai_key_env).map_err(|_| {
            DomainError::Config(format!(
                "missing API key: set the {} environment variable",
                config.api.openai_key_env
            ))
        })?;

        let completion = Arc::new(OpenAiCompletion::new(
            &config.api.openai_base_url,
            openai_key.clone(),
            config.speech.completion_model.clone(),
        )?);
        let synthesizer = Arc::new(OpenAiSpeech::new(
            &config.api.openai_base_url,
            openai_key,
            config.speech.synthesis_model.clone(),
            config.speech.synthesis_voice.clone(),
        )?);
        let output = Arc::new(RodioOutput::new()?);

        let assistant = Arc::new(VoiceAssistant::new(
            capture,
            completion,
            synthesizer,
            output,
            config.speech.clone(),
        ));

        let notes_key = env::var(&config.api.notes_key_env).ok();
        let store = Arc::new(RestNoteStore::new(&config.api.notes_base_url, notes_key)?);
        let notes = Arc::new(NotesService::new(store));

        info!(
            language = %config.speech.language,
            completion_model = %config.speech.completion_model,
            "AppController initialized"
        );

        Ok(Self {
            config: RwLock::new(config),
            config_store,
            assistant,
            notes,
            _log_guard: log_guard,
        })
    }

    /// The voice session surface.
    pub fn assistant(&self) -> Arc<VoiceAssistant> {
        Arc::clone(&self.assistant)
    }

    /// The notes boundary surface.
    pub fn notes(&self) -> Arc<NotesService> {
        Arc::clone(&self.notes)
    }

    /// Get the current configuration.
    pub fn config(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Persist a new configuration. Provider endpoints and models are read
    /// at startup; changes to them take effect on the next launch.
    pub fn update_config(&self, config: AppConfig) -> Result<(), DomainError> {
        self.config_store.save(&config)?;
        *self.config.write() = config;
        info!("Configuration updated");
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path(&self) -> String {
        self.config_store.config_path().to_string_lossy().to_string()
    }

    /// Get the logs directory path.
    pub fn logs_dir(&self) -> String {
        self.config_store.logs_dir().to_string_lossy().to_string()
    }
}
