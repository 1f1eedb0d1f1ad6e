//! Deployment environment the service runs in.
//!
//! The environment selects the configuration file (`config/{env}.yaml`). It is
//! taken from the `--environment` flag, then `GLOSSARY_ENV`, and defaults to
//! `development`.

use std::{fmt, str::FromStr};

use crate::{config::Config, Result};

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const ENV_VAR: &str = "GLOSSARY_ENV";

/// Resolves the environment name from `GLOSSARY_ENV`.
#[must_use]
pub fn resolve_from_env() -> String {
    std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
    Test,
    Any(String),
}

impl Environment {
    /// Loads the configuration for this environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file is invalid.
    pub fn load(&self) -> Result<Config> {
        Config::new(self)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
            Self::Test => f.write_str("test"),
            Self::Any(name) => f.write_str(name),
        }
    }
}

impl From<String> for Environment {
    fn from(env: String) -> Self {
        Self::from_str(&env).unwrap_or(Self::Any(env))
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match input {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            "test" => Self::Test,
            other => Self::Any(other.to_string()),
        })
    }
}
