use anyhow::{Result, anyhow};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY: &str = "TOGETHER_API_KEY";
pub const LANGUAGE: &str = "TRANSCRIPTION_LANGUAGE";
pub const ENDPOINT: &str = "TRANSCRIPTION_URL";
pub const MODEL: &str = "TRANSCRIPTION_MODEL";
pub const TIMEOUT_SECS: &str = "TRANSCRIPTION_TIMEOUT_SECS";
pub const CLASSIFIER_SCRIPT: &str = "ROLE_CLASSIFIER_SCRIPT";
pub const CLASSIFIER_INTERPRETER: &str = "ROLE_CLASSIFIER_INTERPRETER";

pub const DEFAULT_ENDPOINT: &str = "https://api.together.ai/v1/audio/transcriptions";
pub const DEFAULT_MODEL: &str = "openai/whisper-large-v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CLASSIFIER_SCRIPT: &str = "python/main.py";
pub const DEFAULT_CLASSIFIER_INTERPRETER: &str = "python3";

pub trait SettingsSource {
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Debug, Default)]
pub struct EnvFileSettings {
    values: HashMap<String, String>,
}

impl EnvFileSettings {
    /// A missing file is not an error; lookups then go straight to the environment.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {}, using environment only", path.display());
            return Ok(Self::default());
        }

        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| anyhow!("Failed to open settings file {}: {}", path.display(), e))?;

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| anyhow!("Invalid line in {}: {}", path.display(), e))?;
            values.insert(key, value);
        }

        info!("Loaded {} settings from {}", values.len(), path.display());
        Ok(Self { values })
    }
}

impl SettingsSource for EnvFileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
    }
}

#[derive(Clone, Debug)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub language: String,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl TranscriptionConfig {
    pub fn from_settings(settings: &dyn SettingsSource) -> Result<Self> {
        let timeout = match settings.get(TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    anyhow!(
                        "{} must be a whole number of seconds, got '{}'",
                        TIMEOUT_SECS,
                        raw
                    )
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_key: settings.get(API_KEY).filter(|key| !key.is_empty()),
            language: settings.get(LANGUAGE).unwrap_or_default(),
            endpoint: settings
                .get(ENDPOINT)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: settings
                .get(MODEL)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    pub interpreter: String,
    pub script: PathBuf,
}

impl ClassifierConfig {
    pub fn from_settings(settings: &dyn SettingsSource) -> Self {
        Self {
            interpreter: settings
                .get(CLASSIFIER_INTERPRETER)
                .unwrap_or_else(|| DEFAULT_CLASSIFIER_INTERPRETER.to_string()),
            script: settings
                .get(CLASSIFIER_SCRIPT)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CLASSIFIER_SCRIPT)),
        }
    }
}
