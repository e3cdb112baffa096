use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

/// Application directory name under the OS config/data roots.
const APP_DIR: &str = "EchoNote";

/// TOML-based configuration store with OS-specific paths.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    /// Create a new TomlConfigStore rooted at the OS config directory
    /// (e.g. `~/.config/EchoNote/` on Linux).
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = dirs::config_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or_else(|| {
                DomainError::Config("Could not find application data directory".to_string())
            })?;

        fs::create_dir_all(&data_dir)?;
        info!(data_dir = ?data_dir, "ConfigStore initialized");

        Ok(Self { data_dir })
    }

    /// Store rooted at an explicit directory; used by tests.
    #[cfg(test)]
    fn at(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let config_path = self.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            info!(path = ?config_path, "Configuration file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let config_path = self.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_store_paths() {
        let store = TomlConfigStore::at(PathBuf::from("/tmp/echonote"));
        assert!(store.config_path().ends_with("config.toml"));
        assert!(store.logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = env::temp_dir().join("echonote_config_test");
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).unwrap();

        let store = TomlConfigStore::at(temp_dir.clone());

        let mut config = AppConfig::new();
        config.speech.language = "de-DE".to_string();
        config.logging.level = "debug".to_string();

        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.speech.language, "de-DE");
        assert_eq!(loaded.logging.level, "debug");

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_load_creates_default_when_missing() {
        let temp_dir = env::temp_dir().join("echonote_config_default_test");
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).unwrap();

        let store = TomlConfigStore::at(temp_dir.clone());
        let config = store.load().unwrap();
        assert_eq!(config.speech.language, "en-US");
        assert!(store.config_path().exists());

        let _ = fs::remove_dir_all(&temp_dir);
    }
}
