//! Tracing and logging setup
//!
//! Configures the `tracing` subscriber with environment-based filtering.
//! `RUST_LOG` always wins over the built-in directives.

use crate::config::Environment;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Tracing configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Filter directives used when `RUST_LOG` is unset
    pub directives: String,
    /// Enable JSON output format
    pub json: bool,
    /// Include span events (new, close)
    pub span_events: bool,
    /// Include file and line numbers
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl TracingConfig {
    /// Logging profile for a deployment environment.
    ///
    /// Development logs per-frame relay activity; staging and production emit
    /// JSON and keep HTTP request tracing quiet.
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                directives: "info,relay_gateway=debug".to_string(),
                json: false,
                span_events: false,
                file_line: true,
            },
            Environment::Staging | Environment::Production => Self {
                directives: "info,tower_http=warn".to_string(),
                json: true,
                span_events: false,
                file_line: false,
            },
        }
    }

    /// Profile for `APP_ENV`, with `LOG_FORMAT=json|text` overriding the format
    #[must_use]
    pub fn from_env() -> Self {
        let env = std::env::var("APP_ENV")
            .ok()
            .and_then(|raw| Environment::parse(&raw))
            .unwrap_or_default();
        let mut config = Self::for_environment(env);

        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.json = format.eq_ignore_ascii_case("json");
        }
        config
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.directives))
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let layer = fmt::layer()
            .with_file(self.file_line)
            .with_line_number(self.file_line)
            .with_span_events(span_events);

        if self.json {
            // JSON format for production/structured logging
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }
}

/// Initialize the tracing subscriber for the current environment
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init_tracing() {
    init_tracing_with_config(TracingConfig::from_env());
}

/// Initialize the tracing subscriber with custom configuration
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init_tracing_with_config(config: TracingConfig) {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .init();
}

/// Try to initialize tracing for the current environment
///
/// Unlike `init_tracing`, this function will not panic if called multiple times.
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::from_env())
}

/// Try to initialize tracing with custom configuration
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
