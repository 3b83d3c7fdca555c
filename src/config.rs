//! Configuration types for notional-guard

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding `guard.exposure_ceiling`
pub const ENV_MAX_NOTIONAL: &str = "MAX_NOTIONAL";
/// Environment variable overriding `guard.poll_interval_secs`
pub const ENV_SLEEP_INTERVAL: &str = "SLEEP_INTERVAL";
/// Environment variable supplying the API key when none is configured
pub const ENV_API_KEY: &str = "BINANCE_API_KEY";
/// Environment variable supplying the API secret when none is configured
pub const ENV_API_SECRET: &str = "BINANCE_API_SECRET";

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value {value:?} for {var}")]
    InvalidOverride { var: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("API keys not found. Set BINANCE_API_KEY / BINANCE_API_SECRET or configure [credentials]")]
    MissingCredentials,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Risk guard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GuardConfig {
    /// Maximum notional per position, in quote currency
    #[serde(default = "default_exposure_ceiling")]
    pub exposure_ceiling: Decimal,

    /// Pause between polling cycles (seconds)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_exposure_ceiling() -> Decimal {
    Decimal::new(100, 0)
}
fn default_poll_interval_secs() -> u64 {
    5
}

impl GuardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            exposure_ceiling: default_exposure_ceiling(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Venue connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Signed request validity window (milliseconds)
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Live submits orders; paper records them locally
    #[serde(default)]
    pub mode: ExecutionMode,
}

fn default_base_url() -> String {
    crate::exchange::BINANCE_FUTURES_URL.to_string()
}
fn default_recv_window_ms() -> u64 {
    5000
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            recv_window_ms: default_recv_window_ms(),
            timeout_secs: default_timeout_secs(),
            mode: ExecutionMode::default(),
        }
    }
}

/// Execution mode: paper trading or live
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Paper,
    #[default]
    Live,
}

/// API credentials as written in the config file; blanks are filled from
/// the environment
#[derive(Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialsConfig {
    /// Resolve into usable credentials, failing when either half is missing
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        let api_key = non_blank(self.api_key.as_deref());
        let api_secret = non_blank(self.api_secret.as_deref());

        match (api_key, api_secret) {
            (Some(api_key), Some(api_secret)) => Ok(Credentials {
                api_key: api_key.to_string(),
                api_secret: api_secret.to_string(),
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolved venue API credentials
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: crate::telemetry::LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: crate::telemetry::LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment overrides.
    ///
    /// `MAX_NOTIONAL` and `SLEEP_INTERVAL` replace the file values;
    /// `BINANCE_API_KEY` and `BINANCE_API_SECRET` only fill credentials the
    /// file leaves blank.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_NOTIONAL) {
            self.guard.exposure_ceiling =
                parse_override(ENV_MAX_NOTIONAL, &value, |v| Decimal::from_str(v).ok())?;
        }

        if let Some(value) = lookup(ENV_SLEEP_INTERVAL) {
            self.guard.poll_interval_secs =
                parse_override(ENV_SLEEP_INTERVAL, &value, |v| v.parse().ok())?;
        }

        if non_blank(self.credentials.api_key.as_deref()).is_none() {
            self.credentials.api_key = lookup(ENV_API_KEY);
        }
        if non_blank(self.credentials.api_secret.as_deref()).is_none() {
            self.credentials.api_secret = lookup(ENV_API_SECRET);
        }

        Ok(())
    }

    /// Reject values the guard cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guard.exposure_ceiling <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "exposure_ceiling must be positive, got {}",
                self.guard.exposure_ceiling
            )));
        }
        if self.guard.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.exchange.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_override<T>(
    var: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    parse(value.trim()).ok_or_else(|| ConfigError::InvalidOverride {
        var,
        value: value.to_string(),
    })
}
