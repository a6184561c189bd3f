use crate::domain::user::UserId;
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Auth
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub admin_user_ids: HashSet<UserId>,
    // OpenAI
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_transcription_model: String,
    pub openai_tts_model: String,
    /// One voice for every language; unset picks a voice per language
    pub openai_tts_voice: Option<String>,
    // Limits
    pub tts_speed: f32,
    pub tts_max_characters: usize,
    pub translation_max_input_characters: usize,
    pub translation_max_tokens: u32,
    pub translation_display_truncate: usize,
    pub max_audio_bytes: usize,
    // Remote calls
    pub remote_max_attempts: u32,
    pub remote_retry_base_ms: u64,
    pub remote_timeout_secs: u64,
    pub fanout_deadline_secs: u64,
    // Caches
    pub translation_cache_ttl_secs: u64,
    pub translation_cache_capacity: u64,
    pub tts_cache_ttl_secs: u64,
    pub tts_cache_capacity: u64,
    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_limit_messages_per_minute: u32,
    pub rate_limit_voice_per_hour: u32,
    pub rate_limit_admin_bypass: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{0}")]
    OutOfRange(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, then validate it
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let config = Config {
            database_url: vars.required("DATABASE_URL")?,
            host: vars.string("HOST", "0.0.0.0"),
            port: vars.parse("PORT", 8080)?,
            environment: vars.parse("ENVIRONMENT", Environment::Development)?,
            log_format: vars.parse("LOG_FORMAT", LogFormat::Pretty)?,
            jwt_secret: vars.required("JWT_SECRET")?,
            jwt_expiration_hours: vars.parse("JWT_EXPIRATION_HOURS", 1)?,
            admin_user_ids: parse_admin_ids(&vars.string("ADMIN_USER_IDS", ""))?,
            openai_api_key: vars.required("OPENAI_API_KEY")?,
            openai_model: vars.string("OPENAI_MODEL", "gpt-4o"),
            openai_transcription_model: vars.string("OPENAI_TRANSCRIPTION_MODEL", "whisper-1"),
            openai_tts_model: vars.string("OPENAI_TTS_MODEL", "tts-1"),
            openai_tts_voice: vars.get("OPENAI_TTS_VOICE"),
            tts_speed: vars.parse("TTS_SPEED", 1.0)?,
            tts_max_characters: vars.parse("TTS_MAX_CHARACTERS", 500)?,
            translation_max_input_characters: vars.parse("TRANSLATION_MAX_INPUT_CHARACTERS", 2000)?,
            translation_max_tokens: vars.parse("TRANSLATION_MAX_TOKENS", 500)?,
            translation_display_truncate: vars.parse("TRANSLATION_DISPLAY_TRUNCATE", 100)?,
            max_audio_bytes: vars.parse("MAX_AUDIO_BYTES", 20 * 1024 * 1024)?,
            remote_max_attempts: vars.parse("REMOTE_MAX_ATTEMPTS", 3)?,
            remote_retry_base_ms: vars.parse("REMOTE_RETRY_BASE_MS", 1000)?,
            remote_timeout_secs: vars.parse("REMOTE_TIMEOUT_SECS", 30)?,
            fanout_deadline_secs: vars.parse("FANOUT_DEADLINE_SECS", 90)?,
            translation_cache_ttl_secs: vars.parse("TRANSLATION_CACHE_TTL_SECS", 3600)?,
            translation_cache_capacity: vars.parse("TRANSLATION_CACHE_CAPACITY", 1000)?,
            tts_cache_ttl_secs: vars.parse("TTS_CACHE_TTL_SECS", 1800)?,
            tts_cache_capacity: vars.parse("TTS_CACHE_CAPACITY", 500)?,
            rate_limit_enabled: vars.flag("RATE_LIMIT_ENABLED", true),
            rate_limit_messages_per_minute: vars.parse("RATE_LIMIT_MESSAGES_PER_MINUTE", 10)?,
            rate_limit_voice_per_hour: vars.parse("RATE_LIMIT_VOICE_PER_HOUR", 20)?,
            rate_limit_admin_bypass: vars.flag("RATE_LIMIT_ADMIN_BYPASS", true),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values outside the ranges the providers accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, message: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange(message.to_string()))
            }
        }

        check(
            (0.25..=4.0).contains(&self.tts_speed),
            "TTS_SPEED must be between 0.25 and 4.0",
        )?;
        check(
            (1..=4000).contains(&self.tts_max_characters),
            "TTS_MAX_CHARACTERS must be between 1 and 4000",
        )?;
        check(
            (1..=10_000).contains(&self.translation_max_input_characters),
            "TRANSLATION_MAX_INPUT_CHARACTERS must be between 1 and 10000",
        )?;
        check(
            (1..=4000).contains(&self.translation_max_tokens),
            "TRANSLATION_MAX_TOKENS must be between 1 and 4000",
        )?;
        check(
            self.translation_display_truncate >= 4,
            "TRANSLATION_DISPLAY_TRUNCATE must be at least 4",
        )?;
        check(self.max_audio_bytes > 0, "MAX_AUDIO_BYTES must be positive")?;
        check(
            (1..=10).contains(&self.remote_max_attempts),
            "REMOTE_MAX_ATTEMPTS must be between 1 and 10",
        )?;
        check(
            self.remote_timeout_secs > 0,
            "REMOTE_TIMEOUT_SECS must be positive",
        )?;
        check(
            self.translation_cache_ttl_secs > 0 && self.tts_cache_ttl_secs > 0,
            "cache TTLs must be positive",
        )?;
        check(
            self.translation_cache_capacity > 0 && self.tts_cache_capacity > 0,
            "cache capacities must be positive",
        )?;
        check(
            self.rate_limit_messages_per_minute > 0 && self.rate_limit_voice_per_hour > 0,
            "rate limits must be positive",
        )?;
        check(self.jwt_expiration_hours > 0, "JWT_EXPIRATION_HOURS must be positive")?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.remote_retry_base_ms)
    }

    /// `None` disables the whole-fanout deadline
    pub fn fanout_deadline(&self) -> Option<Duration> {
        (self.fanout_deadline_secs > 0).then(|| Duration::from_secs(self.fanout_deadline_secs))
    }

    pub fn translation_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.translation_cache_ttl_secs)
    }

    pub fn tts_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.tts_cache_ttl_secs)
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(default)
    }
}

fn parse_admin_ids(raw: &str) -> Result<HashSet<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse().map_err(|_| ConfigError::Invalid {
                key: "ADMIN_USER_IDS",
                value: id.to_string(),
            })
        })
        .collect()
}
