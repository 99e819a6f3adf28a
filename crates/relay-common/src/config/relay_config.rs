//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub relay: RelaySettings,
    pub identity: IdentityConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse an `APP_ENV` value, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Listening endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Byte relay tuning
#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    /// Largest chunk read from the TCP peer; each chunk becomes one binary frame
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Capacity of the per-connection outbound frame queue
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
    /// Close the WebSocket when a control message cannot be decoded
    #[serde(default)]
    pub close_on_malformed: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            outbound_buffer: default_outbound_buffer(),
            close_on_malformed: false,
        }
    }
}

/// Identity provider (session server) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_session_server_url")]
    pub session_server_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl IdentityConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            session_server_url: default_session_server_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "ws-tcp-relay".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    30023
}

fn default_read_buffer_size() -> usize {
    0x1F_FFFF // just under 2 MiB
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_session_server_url() -> String {
    "https://sessionserver.mojang.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl RelayConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => default_env(),
        };

        let relay = RelaySettings {
            read_buffer_size: parse_var(&lookup, "RELAY_READ_BUFFER_SIZE")?
                .unwrap_or_else(default_read_buffer_size),
            outbound_buffer: parse_var(&lookup, "RELAY_OUTBOUND_BUFFER")?
                .unwrap_or_else(default_outbound_buffer),
            close_on_malformed: parse_var(&lookup, "RELAY_CLOSE_ON_MALFORMED")?.unwrap_or(false),
        };
        if relay.read_buffer_size == 0 {
            return Err(ConfigError::InvalidValue(
                "RELAY_READ_BUFFER_SIZE",
                "0".to_string(),
            ));
        }
        if relay.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "RELAY_OUTBOUND_BUFFER",
                "0".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "GATEWAY_PORT")?.unwrap_or_else(default_port),
            },
            relay,
            identity: IdentityConfig {
                session_server_url: lookup("IDENTITY_SESSION_SERVER_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_session_server_url),
                request_timeout_secs: parse_var(&lookup, "IDENTITY_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout_secs),
            },
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
