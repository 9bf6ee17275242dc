use std::env::var;
use std::time::Duration;

use chrono_tz::Tz;
use dotenvy::dotenv;
use thiserror::Error;

use crate::exaroton::DEFAULT_BASE_URL;
use crate::validation;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    /// Env: DISCORD_TOKEN (required)
    pub discord_token: String,

    /// Channel the live status message is posted in
    /// Env: CHANNEL_ID (required)
    pub channel_id: u64,

    /// Exaroton API key
    /// Env: EXAROTON_API_KEY (required)
    pub exaroton_api_key: String,

    /// Exaroton server to watch
    /// Env: SERVER_ID (required)
    pub server_id: String,

    /// Env: EXAROTON_BASE_URL (default: https://api.exaroton.com/v1)
    pub exaroton_base_url: String,

    /// How often the server is polled
    /// Env: POLL_INTERVAL_SECS (default: 10)
    pub poll_interval: Duration,

    /// Timeout for a single poll request
    /// Env: POLL_TIMEOUT_SECS (default: 5)
    pub poll_timeout: Duration,

    /// Timezone for midnight resets and displayed times
    /// Env: TIMEZONE (default: Europe/Berlin)
    pub timezone: Tz,

    /// How many recent channel messages are scanned when the status message is re-posted
    /// Env: MESSAGE_HISTORY_LIMIT (default: 50, max 100)
    pub message_history_limit: u8,

    /// Server port
    /// Env: PORT (default: 10000)
    pub port: u16,

    /// Request body size limit in bytes
    /// Env: REQUEST_BODY_LIMIT (default: 65536 = 64KB)
    pub request_body_limit: usize,

    /// Request timeout in seconds
    /// Env: REQUEST_TIMEOUT_SECS (default: 30)
    pub request_timeout: Duration,

    /// Rate limit for the JSON API (requests per second)
    /// Env: RATE_LIMIT_GENERAL_PER_SEC (default: 10)
    pub rate_limit_general_per_sec: u64,

    /// Burst size for the JSON API
    /// Env: RATE_LIMIT_GENERAL_BURST (default: 20)
    pub rate_limit_general_burst: u32,
}

impl Config {
    /// Load configuration from environment variables (and `.env`) with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv(); //for debugging mostly
        Self::from_lookup(|key| var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let channel_id = required(&lookup, "CHANNEL_ID")?;
        let channel_id = channel_id.parse().map_err(|_| ConfigError::Invalid {
            key: "CHANNEL_ID",
            value: channel_id,
        })?;

        let server_id = required(&lookup, "SERVER_ID")?;
        if validation::validate_server_id(&server_id).is_err() {
            return Err(ConfigError::Invalid {
                key: "SERVER_ID",
                value: server_id,
            });
        }

        let timezone = match lookup("TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|_| ConfigError::Invalid {
                key: "TIMEZONE",
                value: name,
            })?,
            None => defaults.timezone,
        };

        let poll_interval = env_or_default(&lookup, "POLL_INTERVAL_SECS", 10u64).max(1);

        Ok(Self {
            discord_token: required(&lookup, "DISCORD_TOKEN")?,
            channel_id,
            exaroton_api_key: required(&lookup, "EXAROTON_API_KEY")?,
            server_id,
            exaroton_base_url: lookup("EXAROTON_BASE_URL").unwrap_or(defaults.exaroton_base_url),
            poll_interval: Duration::from_secs(poll_interval),
            poll_timeout: Duration::from_secs(env_or_default(&lookup, "POLL_TIMEOUT_SECS", 5)),
            timezone,
            message_history_limit: env_or_default(&lookup, "MESSAGE_HISTORY_LIMIT", 50u8).min(100),
            port: env_or_default(&lookup, "PORT", defaults.port),
            request_body_limit: env_or_default(
                &lookup,
                "REQUEST_BODY_LIMIT",
                defaults.request_body_limit,
            ),
            request_timeout: Duration::from_secs(env_or_default(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                30,
            )),
            rate_limit_general_per_sec: env_or_default(&lookup, "RATE_LIMIT_GENERAL_PER_SEC", 10),
            rate_limit_general_burst: env_or_default(&lookup, "RATE_LIMIT_GENERAL_BURST", 20),
        })
    }
}

impl Default for Config {
    /// Create configuration with all default values and empty credentials
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            channel_id: 0,
            exaroton_api_key: String::new(),
            server_id: String::new(),
            exaroton_base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(10),
            poll_timeout: Duration::from_secs(5),
            timezone: chrono_tz::Europe::Berlin,
            message_history_limit: 50,
            port: 10000,
            request_body_limit: 64 * 1024, // 64 KB
            request_timeout: Duration::from_secs(30),
            rate_limit_general_per_sec: 10,
            rate_limit_general_burst: 20,
        }
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Parse variable or return default value
fn env_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}
