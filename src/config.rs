use std::{env, fmt};

use chrono_tz::Tz;

use crate::models::Ticker;
use crate::service::chat::slack::DEFAULT_API_URL as DEFAULT_SLACK_API_URL;
use crate::service::market_data::alphavantage::DEFAULT_BASE_URL as DEFAULT_ALPHA_VANTAGE_URL;

const PREFIX: &str = "PLUMMET_";
const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(String),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_url: String,
    pub slack_token: String,
    pub slack_channel: String,
    pub slack_api_url: String,
    pub symbols: Vec<Ticker>,
    pub timezone: Tz,
    pub log_level: String,
    pub log_pretty: bool,
    pub port: u16,
}

impl Config {
    /// Load from the process environment. Call `dotenv` first to honor `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key lookup. Keys are the full variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = Reader { lookup };

        Ok(Self {
            alpha_vantage_api_key: reader.required("ALPHA_VANTAGE_API_KEY")?,
            alpha_vantage_url: reader
                .optional("ALPHA_VANTAGE_URL")
                .unwrap_or_else(|| DEFAULT_ALPHA_VANTAGE_URL.to_string()),
            slack_token: reader.required("SLACK_TOKEN")?,
            slack_channel: reader.required("SLACK_CHANNEL")?,
            slack_api_url: reader
                .optional("SLACK_API_URL")
                .unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string()),
            symbols: reader
                .optional("SYMBOLS")
                .map(|raw| raw.split(',').filter_map(Ticker::parse).collect())
                .unwrap_or_default(),
            timezone: match reader.optional("TIMEZONE") {
                Some(raw) => raw
                    .parse::<Tz>()
                    .map_err(|e| invalid(&prefixed("TIMEZONE"), e.to_string()))?,
                None => DEFAULT_TIMEZONE,
            },
            log_level: reader
                .optional("LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_pretty: match reader.optional("LOG_PRETTY") {
                Some(raw) => parse_bool(&raw).ok_or_else(|| {
                    invalid(&prefixed("LOG_PRETTY"), format!("{raw:?} is not a boolean"))
                })?,
                None => false,
            },
            // Hosting platforms set PORT without our prefix.
            port: match reader.raw("PORT") {
                Some(raw) => raw
                    .parse::<u16>()
                    .map_err(|e| invalid("PORT", e.to_string()))?,
                None => DEFAULT_PORT,
            },
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("alpha_vantage_api_key", &"<redacted>")
            .field("alpha_vantage_url", &self.alpha_vantage_url)
            .field("slack_token", &"<redacted>")
            .field("slack_channel", &self.slack_channel)
            .field("slack_api_url", &self.slack_api_url)
            .field("symbols", &self.symbols)
            .field("timezone", &self.timezone)
            .field("log_level", &self.log_level)
            .field("log_pretty", &self.log_pretty)
            .field("port", &self.port)
            .finish()
    }
}

struct Reader<F> {
    lookup: F,
}

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Unprefixed lookup; blank values count as unset.
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.raw(&prefixed(key))
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        let key = prefixed(key);
        self.raw(&key).ok_or(ConfigError::Missing(key))
    }
}

fn prefixed(key: &str) -> String {
    format!("{PREFIX}{key}")
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" => Some(true),
        "0" | "false" | "f" | "no" => Some(false),
        _ => None,
    }
}
