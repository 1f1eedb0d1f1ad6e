//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured filter.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{config, Error, Result};

const MODULE_WHITELIST: &[&str] = &["glossary", "tower_http"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum LogLevel {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Format {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

/// Builds the filter directive for `config`.
#[must_use]
pub fn filter_directive(config: &config::Logger) -> String {
    config.override_filter.clone().unwrap_or_else(|| {
        MODULE_WHITELIST
            .iter()
            .map(|module| format!("{module}={}", config.level))
            .collect::<Vec<_>>()
            .join(",")
    })
}

/// Installs the global tracing subscriber.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Fails when the filter directive is invalid or a subscriber is already set.
pub fn init(config: &config::Logger) -> Result<()> {
    if !config.enable {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(config)))
        .map_err(|err| Error::Message(format!("invalid log filter: {err}")))?;

    let layer = match config.format {
        Format::Compact => fmt::layer().compact().with_ansi(true).boxed(),
        Format::Pretty => fmt::layer().pretty().with_ansi(true).boxed(),
        Format::Json => fmt::layer().json().with_ansi(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|err| Error::Message(format!("cannot install tracing subscriber: {err}")))
}
