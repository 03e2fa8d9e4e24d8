//! Configuration resolution for Fellah.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (`<config dir>/fellah/settings.json`)
//! 3. Environment variables (highest priority below CLI flags)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::i18n::Language;

/// Complete Fellah configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Database file path; `None` resolves to the default location.
    pub database_path: Option<PathBuf>,
}

/// Speech synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// External synthesizer program (espeak-ng compatible argument shape).
    pub program: String,
    /// Whether read-aloud is offered at all.
    pub enabled: bool,
    /// Words per minute for Arabic; slower than French for clearer
    /// pronunciation.
    pub arabic_rate: u32,
    /// Words per minute for French.
    pub french_rate: u32,
    /// Upper bound on waiting for the voice list to load before speaking
    /// with only a locale hint.
    pub voices_timeout_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "espeak-ng".to_string(),
            enabled: true,
            arabic_rate: 130,
            french_rate: 150,
            voices_timeout_ms: 1500,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Startup language code (`ar` or `fr`).
    pub language: String,
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: "ar".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// The startup language; unparseable codes fall back to Arabic.
    pub fn language(&self) -> Language {
        Language::parse(&self.ui.language).unwrap_or_default()
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            let global = load_config_file(&global_path)?;
            merge_config(&mut config, global);
        }
    }

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Path of the global settings file, if a config dir exists on this platform.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fellah").join("settings.json"))
}

/// Default database location next to the settings file.
pub fn default_database_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fellah").join("fellah.db"))
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: Config) {
    if overlay.storage.database_path.is_some() {
        base.storage.database_path = overlay.storage.database_path;
    }
    base.speech = overlay.speech;
    base.ui = overlay.ui;
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(val) = std::env::var("FELLAH_DB") {
        config.storage.database_path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("FELLAH_LANG") {
        config.ui.language = val;
    }
    if let Ok(val) = std::env::var("FELLAH_LOG_LEVEL") {
        config.ui.log_level = val;
    }
    if let Ok(val) = std::env::var("FELLAH_SPEECH_PROGRAM") {
        config.speech.program = val;
    }
    if let Ok(val) = std::env::var("FELLAH_SPEECH_ENABLED") {
        if let Ok(enabled) = val.parse() {
            config.speech.enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_speak_arabic_first() {
        let config = Config::default();
        assert_eq!(config.language(), Language::Ar);
        assert!(config.speech.enabled);
        assert!(config.speech.arabic_rate < config.speech.french_rate);
    }

    #[test]
    fn unknown_language_code_falls_back_to_arabic() {
        let config = Config {
            ui: UiConfig {
                language: "de".to_string(),
                ..UiConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(config.language(), Language::Ar);
    }

    #[test]
    fn overlay_replaces_sections_but_keeps_unset_db_path() {
        let mut base = Config {
            storage: StorageConfig {
                database_path: Some(PathBuf::from("/tmp/base.db")),
            },
            ..Config::default()
        };
        let overlay = Config {
            ui: UiConfig {
                language: "fr".to_string(),
                ..UiConfig::default()
            },
            ..Config::default()
        };

        merge_config(&mut base, overlay);
        assert_eq!(base.ui.language, "fr");
        assert_eq!(base.storage.database_path, Some(PathBuf::from("/tmp/base.db")));
    }

    #[test]
    fn config_file_parses_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"ui": {"language": "fr", "log_level": "info"}}"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.ui.language, "fr");
        // Untouched sections keep their defaults.
        assert_eq!(config.speech.program, "espeak-ng");
    }

    #[test]
    fn malformed_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            load_config_file(&path),
            Err(Error::Config(_))
        ));
    }
}
