//! TOML configuration file loading
//!
//! Supports `~/.config/herald/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct HeraldConfigFile {
    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Microphone listening limits
    #[serde(default)]
    pub listen: ListenFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Outgoing mail account
    #[serde(default)]
    pub mail: MailFileConfig,

    /// Extra sites for the "open" command, keyed by spoken name
    #[serde(default)]
    pub sites: BTreeMap<String, String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,
}

/// Listening limits, all in seconds
#[derive(Debug, Default, Deserialize)]
pub struct ListenFileConfig {
    pub calibration_secs: Option<f32>,
    pub start_timeout_secs: Option<f32>,
    pub phrase_limit_secs: Option<f32>,
    pub pause_secs: Option<f32>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub weather: Option<String>,
    pub wolfram: Option<String>,
}

/// SMTP account configuration
#[derive(Debug, Default, Deserialize)]
pub struct MailFileConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
}

/// Load the TOML config file from the standard path
///
/// Returns `HeraldConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> HeraldConfigFile {
    config_file_path().map_or_else(HeraldConfigFile::default, |path| load_from(&path))
}

/// Load a config file from an explicit path, falling back to defaults
pub fn load_from(path: &Path) -> HeraldConfigFile {
    if !path.exists() {
        return HeraldConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                HeraldConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            HeraldConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/herald/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("herald").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let fc: HeraldConfigFile = toml::from_str(
            r#"
            [voice]
            enabled = false

            [listen]
            start_timeout_secs = 4.0

            [sites]
            reddit = "https://reddit.com"
            "#,
        )
        .unwrap();

        assert_eq!(fc.voice.enabled, Some(false));
        assert_eq!(fc.listen.start_timeout_secs, Some(4.0));
        assert!(fc.listen.phrase_limit_secs.is_none());
        assert_eq!(fc.sites.get("reddit").map(String::as_str), Some("https://reddit.com"));
        assert!(fc.api_keys.openai.is_none());
    }

    #[test]
    fn test_missing_file_is_default() {
        let fc = load_from(Path::new("/nonexistent/herald/config.toml"));
        assert!(fc.voice.enabled.is_none());
        assert!(fc.sites.is_empty());
    }
}
