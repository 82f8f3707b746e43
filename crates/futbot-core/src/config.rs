//! Gateway configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `BINANCE_API_KEY`, `BINANCE_API_SECRET`: testnet credentials (required)
//! - `FUTBOT_BASE_URL`: REST base URL (default: `https://testnet.binancefuture.com`)
//! - `FUTBOT_RECV_WINDOW_MS`: signed-request validity window (default: 5000)
//! - `FUTBOT_HTTP_TIMEOUT_MS`: per-request transport timeout (default: 10000)
//!
//! A `.env` file in the working directory or any ancestor is loaded first;
//! variables already set in the process environment win.

use std::fmt::{Debug, Formatter};

use thiserror::Error;

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";
pub const BASE_URL_VAR: &str = "FUTBOT_BASE_URL";
pub const RECV_WINDOW_VAR: &str = "FUTBOT_RECV_WINDOW_MS";
pub const HTTP_TIMEOUT_VAR: &str = "FUTBOT_HTTP_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "https://testnet.binancefuture.com";
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// The venue caps `recvWindow` at one minute.
const MAX_RECV_WINDOW_MS: u64 = 60_000;

/// Missing or malformed configuration. Raised before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "BINANCE_API_KEY and BINANCE_API_SECRET must be set in the environment or a .env file (missing: {})",
        .missing.join(", ")
    )]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("{name} has invalid value '{value}': {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("API secret cannot be used as a signing key")]
    InvalidSecret,

    #[error("HTTP client setup failed: {0}")]
    Transport(String),
}

/// API key pair. `Debug` never prints the values.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Everything the Binance adapter needs to reach the venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub recv_window_ms: u64,
    pub timeout_ms: u64,
    pub credentials: Credentials,
}

impl GatewayConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            credentials,
        }
    }

    /// Load `.env`, then read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = read(API_KEY_VAR);
        let api_secret = read(API_SECRET_VAR);
        let (api_key, api_secret) = match (api_key, api_secret) {
            (Some(key), Some(secret)) => (key, secret),
            (key, secret) => {
                let mut missing = Vec::with_capacity(2);
                if key.is_none() {
                    missing.push(API_KEY_VAR);
                }
                if secret.is_none() {
                    missing.push(API_SECRET_VAR);
                }
                return Err(ConfigError::MissingCredentials { missing });
            }
        };

        let mut config = Self::new(Credentials::new(api_key, api_secret));

        if let Some(base_url) = read(BASE_URL_VAR) {
            config.base_url = parse_base_url(base_url)?;
        }
        if let Some(raw) = read(RECV_WINDOW_VAR) {
            config.recv_window_ms = parse_millis(RECV_WINDOW_VAR, raw)?;
            if config.recv_window_ms > MAX_RECV_WINDOW_MS {
                return Err(ConfigError::InvalidSetting {
                    name: RECV_WINDOW_VAR,
                    value: config.recv_window_ms.to_string(),
                    reason: "must not exceed 60000",
                });
            }
        }
        if let Some(raw) = read(HTTP_TIMEOUT_VAR) {
            config.timeout_ms = parse_millis(HTTP_TIMEOUT_VAR, raw)?;
        }

        Ok(config)
    }
}

fn parse_base_url(value: String) -> Result<String, ConfigError> {
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(ConfigError::InvalidSetting {
            name: BASE_URL_VAR,
            value,
            reason: "must start with http:// or https://",
        });
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn parse_millis(name: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(millis) if millis > 0 => Ok(millis),
        _ => Err(ConfigError::InvalidSetting {
            name,
            value,
            reason: "expected a positive number of milliseconds",
        }),
    }
}

/// Load a `.env` file from the current directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
