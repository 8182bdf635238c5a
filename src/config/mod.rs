use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcription: TranscriptionConfig,
    pub rewrite: RewriteConfig,
    pub audio: AudioConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub api_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// Fixed sampling temperature for every rewrite call.
    pub temperature: f32,
    pub api_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// Override for the well-known recording path. Defaults to
    /// `recording.wav` in the data directory.
    pub recording_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Some("whisper-1".to_string()),
            language: Some("en".to_string()),
            api_endpoint: None,
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Some("gpt-4o".to_string()),
            temperature: 0.7,
            api_endpoint: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            recording_path: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3740 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// The single well-known recording path, overwritten on each new
    /// recording.
    pub fn recording_path(&self) -> Result<PathBuf> {
        match &self.audio.recording_path {
            Some(path) => Ok(path.clone()),
            None => global::recording_file(),
        }
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.audio.sample_rate, 44_100);
        assert_eq!(config.rewrite.temperature, 0.7);
        assert_eq!(config.rewrite.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.transcription.model.as_deref(), Some("whisper-1"));
        assert!(config.transcription.api_key.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [transcription]
            api_key = "sk-test"

            [rewrite]
            temperature = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.transcription.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.transcription.model.as_deref(), Some("whisper-1"));
        assert_eq!(config.rewrite.temperature, 0.2);
        assert_eq!(config.audio.sample_rate, 44_100);
    }
}
