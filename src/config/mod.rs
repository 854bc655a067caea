//! Configuration management for Herald
//!
//! Sources, highest precedence first: process environment (after `.env` is
//! loaded), `~/.config/herald/config.toml`, built-in defaults.

pub mod file;

use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::SecretString;

use self::file::HeraldConfigFile;

/// Herald configuration
#[derive(Debug)]
pub struct Config {
    /// Voice configuration
    pub voice: VoiceConfig,

    /// Microphone listening limits
    pub listen: ListenConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Outgoing mail, present only when both user and password are set
    pub mail: Option<MailConfig>,

    /// Extra sites for the "open" command
    pub sites: BTreeMap<String, String>,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Use the microphone and speakers; when false the assistant is text-only
    pub enabled: bool,

    /// Whisper model for transcription
    pub stt_model: String,

    /// TTS model
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// Limits applied to a single microphone capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenConfig {
    /// Ambient noise sampled before listening
    pub calibration: Duration,

    /// Maximum wait for speech to start
    pub start_timeout: Duration,

    /// Maximum length of one phrase
    pub phrase_limit: Duration,

    /// Trailing silence that ends a phrase
    pub pause: Duration,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            calibration: Duration::from_secs(2),
            start_timeout: Duration::from_secs(10),
            phrase_limit: Duration::from_secs(8),
            pause: Duration::from_millis(2500),
        }
    }
}

/// API keys for external services
#[derive(Debug, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper STT and TTS)
    pub openai: Option<SecretString>,

    /// `OpenWeatherMap` API key
    pub weather: Option<SecretString>,

    /// Wolfram|Alpha app ID
    pub wolfram: Option<SecretString>,
}

/// SMTP account used to send mail
#[derive(Debug)]
pub struct MailConfig {
    /// Account name, also used as the From address
    pub user: String,

    /// Account password
    pub password: SecretString,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS)
    pub smtp_port: u16,
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// `text_only` forces voice off regardless of other sources.
    #[must_use]
    pub fn load(text_only: bool) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }

        let fc = file::load_config_file();
        let config = Self::from_sources(fc, |key| std::env::var(key).ok());

        if text_only {
            tracing::info!("voice explicitly disabled via --text-only");
            return Self {
                voice: VoiceConfig {
                    enabled: false,
                    ..config.voice
                },
                ..config
            };
        }

        config
    }

    /// Build configuration from a parsed file and an environment lookup
    pub fn from_sources(fc: HeraldConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |key: &str, fallback: Option<String>| {
            env(key)
                .or(fallback)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };

        let api_keys = ApiKeys {
            openai: secret("OPENAI_API_KEY", fc.api_keys.openai),
            weather: secret("WEATHER_API_KEY", fc.api_keys.weather),
            wolfram: secret("WOLFRAM_APP_ID", fc.api_keys.wolfram),
        };

        let defaults = VoiceConfig::default();
        let tts_speed = fc.voice.tts_speed.unwrap_or(defaults.tts_speed);
        let text_only = env("HERALD_TEXT_ONLY")
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        let voice = VoiceConfig {
            enabled: !text_only && fc.voice.enabled.unwrap_or(defaults.enabled),
            stt_model: env("HERALD_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or(defaults.stt_model),
            tts_model: env("HERALD_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or(defaults.tts_model),
            tts_voice: env("HERALD_TTS_VOICE")
                .or(fc.voice.tts_voice)
                .unwrap_or(defaults.tts_voice),
            tts_speed: tts_speed.clamp(0.25, 4.0),
        };

        let base = ListenConfig::default();
        let secs = |value: Option<f32>, fallback: Duration| {
            value
                .filter(|s| s.is_finite() && *s > 0.0)
                .map_or(fallback, Duration::from_secs_f32)
        };
        let listen = ListenConfig {
            calibration: secs(fc.listen.calibration_secs, base.calibration),
            start_timeout: secs(fc.listen.start_timeout_secs, base.start_timeout),
            phrase_limit: secs(fc.listen.phrase_limit_secs, base.phrase_limit),
            pause: secs(fc.listen.pause_secs, base.pause),
        };

        let user = env("EMAIL_USER").or(fc.mail.user);
        let password = env("EMAIL_PASS").or(fc.mail.password);
        let mail = match (user, password) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some(MailConfig {
                    user,
                    password: SecretString::from(password),
                    smtp_host: env("HERALD_SMTP_HOST")
                        .or(fc.mail.smtp_host)
                        .unwrap_or_else(|| "smtp.gmail.com".to_string()),
                    smtp_port: env("HERALD_SMTP_PORT")
                        .and_then(|p| p.parse().ok())
                        .or(fc.mail.smtp_port)
                        .unwrap_or(587),
                })
            }
            _ => None,
        };

        if api_keys.weather.is_none() {
            tracing::info!("WEATHER_API_KEY not set, weather disabled");
        }
        if api_keys.wolfram.is_none() {
            tracing::info!("WOLFRAM_APP_ID not set, computation disabled");
        }
        if mail.is_none() {
            tracing::info!("EMAIL_USER/EMAIL_PASS not set, email disabled");
        }

        let sites = fc
            .sites
            .into_iter()
            .map(|(name, url)| (name.trim().to_lowercase(), url))
            .collect();

        Self {
            voice,
            listen,
            api_keys,
            mail,
            sites,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = Config::from_sources(HeraldConfigFile::default(), |_| None);

        assert!(config.voice.enabled);
        assert_eq!(config.voice.stt_model, "whisper-1");
        assert_eq!(config.listen, ListenConfig::default());
        assert!(config.api_keys.openai.is_none());
        assert!(config.api_keys.weather.is_none());
        assert!(config.mail.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let fc: HeraldConfigFile = toml::from_str(
            r#"
            [api_keys]
            weather = "from-file"
            wolfram = "wolfram-file"
            "#,
        )
        .unwrap();

        let config = Config::from_sources(fc, env_from(&[("WEATHER_API_KEY", "from-env")]));

        assert_eq!(
            config.api_keys.weather.as_ref().map(|k| k.expose_secret()),
            Some("from-env")
        );
        assert_eq!(
            config.api_keys.wolfram.as_ref().map(|k| k.expose_secret()),
            Some("wolfram-file")
        );
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config =
            Config::from_sources(HeraldConfigFile::default(), env_from(&[("WOLFRAM_APP_ID", " ")]));
        assert!(config.api_keys.wolfram.is_none());
    }

    #[test]
    fn test_mail_requires_user_and_password() {
        let only_user = Config::from_sources(
            HeraldConfigFile::default(),
            env_from(&[("EMAIL_USER", "me@x.com")]),
        );
        assert!(only_user.mail.is_none());

        let both = Config::from_sources(
            HeraldConfigFile::default(),
            env_from(&[
                ("EMAIL_USER", "me@x.com"),
                ("EMAIL_PASS", "pw"),
                ("HERALD_SMTP_PORT", "2525"),
            ]),
        );
        let mail = both.mail.unwrap();
        assert_eq!(mail.user, "me@x.com");
        assert_eq!(mail.smtp_host, "smtp.gmail.com");
        assert_eq!(mail.smtp_port, 2525);
    }

    #[test]
    fn test_text_only_env_disables_voice() {
        for value in ["1", "true", "TRUE"] {
            let config = Config::from_sources(
                HeraldConfigFile::default(),
                env_from(&[("HERALD_TEXT_ONLY", value)]),
            );
            assert!(!config.voice.enabled, "HERALD_TEXT_ONLY={value}");
        }

        for value in ["0", "false", ""] {
            let config = Config::from_sources(
                HeraldConfigFile::default(),
                env_from(&[("HERALD_TEXT_ONLY", value)]),
            );
            assert!(config.voice.enabled, "HERALD_TEXT_ONLY={value}");
        }
    }

    #[test]
    fn test_listen_limits_from_file() {
        let fc: HeraldConfigFile = toml::from_str(
            r"
            [listen]
            start_timeout_secs = 3.5
            pause_secs = -1.0
            ",
        )
        .unwrap();

        let config = Config::from_sources(fc, |_| None);
        assert_eq!(config.listen.start_timeout, Duration::from_millis(3500));
        assert_eq!(config.listen.pause, ListenConfig::default().pause);
    }
}
