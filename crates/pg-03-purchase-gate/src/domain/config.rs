//! Gate configuration with validation.
//!
//! Loaded from TOML; every section and field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! [auth]
//! replay_window_ms = 300000
//! session_ttl = "1h"
//! store_timeout = "2s"
//!
//! [purchase]
//! daily_limit_usd = "1000"
//! oracle_timeout = "2s"
//! store_timeout = "2s"
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use pg_01_wallet_auth::{DEFAULT_REPLAY_WINDOW_MS, DEFAULT_SESSION_TTL_MS, DEFAULT_STORE_TIMEOUT};
use pg_02_purchase_validation::{PurchasePolicy, DEFAULT_DAILY_LIMIT_USD, DEFAULT_EXTERNAL_TIMEOUT};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Environment variables read by [`GateConfig::apply_env`].
pub mod env {
    pub const REPLAY_WINDOW_MS: &str = "PG_REPLAY_WINDOW_MS";
    pub const DAILY_LIMIT_USD: &str = "PG_DAILY_LIMIT_USD";
    pub const LOG_LEVEL: &str = "PG_LOG_LEVEL";
    pub const JSON_LOGS: &str = "PG_JSON_LOGS";
}

/// Main gate configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Signature and session settings
    pub auth: AuthConfig,
    /// Purchase validation settings
    pub purchase: PurchaseConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl GateConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.replay_window_ms == 0 {
            return Err(ConfigError::InvalidWindow(
                "replay_window_ms cannot be 0".into(),
            ));
        }

        if self.auth.session_ttl.is_zero() {
            return Err(ConfigError::InvalidTimeout("session_ttl cannot be 0".into()));
        }

        if self.auth.store_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "auth.store_timeout cannot be 0".into(),
            ));
        }

        if self.purchase.oracle_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "oracle_timeout cannot be 0".into(),
            ));
        }

        if self.purchase.store_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "purchase.store_timeout cannot be 0".into(),
            ));
        }

        if self.purchase.daily_limit_usd <= Decimal::ZERO {
            return Err(ConfigError::InvalidLimit(
                "daily_limit_usd must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Apply `PG_*` overrides from the process environment, then re-validate.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any name -> value lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(env::REPLAY_WINDOW_MS) {
            self.auth.replay_window_ms = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_override(env::REPLAY_WINDOW_MS, &raw))?;
        }

        if let Some(raw) = lookup(env::DAILY_LIMIT_USD) {
            self.purchase.daily_limit_usd = Decimal::from_str(raw.trim())
                .map_err(|_| ConfigError::invalid_override(env::DAILY_LIMIT_USD, &raw))?;
        }

        if let Some(raw) = lookup(env::LOG_LEVEL) {
            self.logging.level = raw;
        }

        if let Some(raw) = lookup(env::JSON_LOGS) {
            self.logging.json = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::invalid_override(env::JSON_LOGS, &raw)),
            };
        }

        self.validate()
    }
}

/// Authentication stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accepted |server time - request timestamp| in milliseconds
    pub replay_window_ms: u64,
    /// Session lifetime
    #[serde(with = "humantime_serde")]
    pub session_ttl: Duration,
    /// Bound on a nonce or session store call
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            replay_window_ms: DEFAULT_REPLAY_WINDOW_MS,
            session_ttl: Duration::from_millis(DEFAULT_SESSION_TTL_MS),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl AuthConfig {
    pub fn session_ttl_ms(&self) -> u64 {
        u64::try_from(self.session_ttl.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Purchase stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseConfig {
    /// Per-wallet spend cap per UTC day, all tokens combined
    pub daily_limit_usd: Decimal,
    #[serde(with = "humantime_serde")]
    pub oracle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            daily_limit_usd: DEFAULT_DAILY_LIMIT_USD,
            oracle_timeout: DEFAULT_EXTERNAL_TIMEOUT,
            store_timeout: DEFAULT_EXTERNAL_TIMEOUT,
        }
    }
}

impl PurchaseConfig {
    pub fn policy(&self) -> PurchasePolicy {
        PurchasePolicy {
            daily_limit_usd: self.daily_limit_usd,
            oracle_timeout: self.oracle_timeout,
            store_timeout: self.store_timeout,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// One JSON object per line instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(String),
    #[error("cannot parse configuration: {0}")]
    Parse(String),
    /// Invalid replay window
    #[error("invalid window: {0}")]
    InvalidWindow(String),
    /// Invalid timeout or TTL value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Invalid spend limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid value {value:?} for {var}")]
    InvalidOverride { var: &'static str, value: String },
}

impl ConfigError {
    fn invalid_override(var: &'static str, value: &str) -> Self {
        ConfigError::InvalidOverride {
            var,
            value: value.to_string(),
        }
    }
}

/// Durations as short human strings: `"300ms"`, `"2s"`, `"5m"`, `"1h"`.
/// A bare number is seconds.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s" and "m"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else if let Some(hours) = s.strip_suffix('h') {
            hours
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|h| h.checked_mul(3600))
                .map(Duration::from_secs)
                .ok_or("invalid hours")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
