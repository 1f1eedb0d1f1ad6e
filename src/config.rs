//! # Configuration
//!
//! Configuration is read from `config/{environment}.yaml`. The file is first
//! rendered as a template, so values can be pulled from the process
//! environment:
//!
//! ```yaml
//! server:
//!   port: {{ get_env(name="PORT", default="8000") }}
//! ```
//!
//! and then parsed into [`Config`]. Every section has defaults, so a missing
//! file or a missing section falls back to a working local setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    environment::Environment,
    glossary::repositories::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    logger, Error, Result,
};

const DEFAULT_FOLDER: &str = "config";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub glossary: GlossarySettings,
}

/// Logger configuration.
///
/// Example (development):
/// ```yaml
/// logger:
///   enable: true
///   level: debug
///   format: compact
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logger {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default)]
    pub level: logger::LogLevel,
    #[serde(default)]
    pub format: logger::Format,
    /// Replaces the filter built from `level` entirely, e.g.
    /// `glossary=trace,tower_http=debug`.
    #[serde(default)]
    pub override_filter: Option<String>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: logger::LogLevel::default(),
            format: logger::Format::default(),
            override_filter: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Server {
    #[serde(default = "default_binding")]
    pub binding: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: Cors,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            binding: default_binding(),
            port: default_port(),
            cors: Cors::default(),
        }
    }
}

impl Server {
    #[must_use]
    pub fn full_url(&self) -> String {
        format!("http://{}:{}", self.binding, self.port)
    }
}

/// Cross origin settings applied to every route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cors {
    #[serde(default = "default_true")]
    pub enable: bool,
    /// `["*"]` allows any origin.
    #[serde(default = "default_origins")]
    pub allow_origins: Vec<String>,
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            enable: true,
            allow_origins: default_origins(),
        }
    }
}

/// Storage backend holding the glossary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlossaryBackend {
    #[default]
    JsonFile,
}

/// What a create does when the derived id is already stored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the stored record.
    #[default]
    Overwrite,
    /// Fail the create with a conflict.
    Reject,
}

/// Glossary store configuration.
///
/// Example:
/// ```yaml
/// glossary:
///   path: data/glossary.json
///   default_page_size: 100
///   max_page_size: 1000
///   on_id_collision: overwrite
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlossarySettings {
    #[serde(default)]
    pub backend: GlossaryBackend,
    #[serde(default = "default_document_path")]
    pub path: PathBuf,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default)]
    pub on_id_collision: CollisionPolicy,
}

impl Default for GlossarySettings {
    fn default() -> Self {
        Self {
            backend: GlossaryBackend::default(),
            path: default_document_path(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            on_id_collision: CollisionPolicy::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_binding() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_document_path() -> PathBuf {
    PathBuf::from("data/glossary.json")
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> usize {
    MAX_PAGE_SIZE
}

impl Config {
    /// Loads the configuration of `env` from the default `config` folder.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be rendered, parsed or validated.
    pub fn new(env: &Environment) -> Result<Self> {
        Self::from_folder(env, Path::new(DEFAULT_FOLDER))
    }

    /// Loads `{env}.yaml` from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be rendered, parsed or validated.
    pub fn from_folder(env: &Environment, path: &Path) -> Result<Self> {
        let file = path.join(format!("{env}.yaml"));
        if !file.exists() {
            tracing::info!(path = %file.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&file)?;
        Self::from_yaml(&content)
    }

    /// Renders and parses a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Fails on template, YAML or validation errors.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let rendered = tera::Tera::one_off(content, &tera::Context::new(), false)?;
        let config: Self = serde_yaml::from_str(&rendered)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let glossary = &self.glossary;
        if glossary.max_page_size == 0 {
            return Err(Error::Message(
                "glossary.max_page_size must be greater than zero".to_string(),
            ));
        }
        if glossary.default_page_size == 0 || glossary.default_page_size > glossary.max_page_size {
            return Err(Error::Message(format!(
                "glossary.default_page_size must be between 1 and {}",
                glossary.max_page_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use rstest::rstest;

    use super::{CollisionPolicy, Config};
    use crate::{environment::Environment, logger};

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").expect("config");
        assert!(config.logger.enable);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.glossary.path, PathBuf::from("data/glossary.json"));
        assert_eq!(config.glossary.default_page_size, 100);
        assert_eq!(config.glossary.max_page_size, 1000);
        assert_eq!(config.glossary.on_id_collision, CollisionPolicy::Overwrite);
    }

    #[test]
    fn renders_environment_lookups() {
        let config = Config::from_yaml(
            r#"
logger:
  level: warn
  format: json
server:
  port: {{ get_env(name="GLOSSARY_TEST_UNSET_PORT", default="5150") }}
glossary:
  path: /tmp/terms.json
  on_id_collision: reject
"#,
        )
        .expect("config");
        assert_eq!(config.server.port, 5150);
        assert_eq!(config.logger.level, logger::LogLevel::Warn);
        assert_eq!(config.logger.format, logger::Format::Json);
        assert_eq!(config.glossary.path, PathBuf::from("/tmp/terms.json"));
        assert_eq!(config.glossary.on_id_collision, CollisionPolicy::Reject);
    }

    #[test]
    fn rejects_inconsistent_page_sizes() {
        let err = Config::from_yaml("glossary:\n  default_page_size: 50\n  max_page_size: 10\n")
            .expect_err("invalid page sizes");
        assert!(err.to_string().contains("default_page_size"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::from_folder(&Environment::Test, dir.path()).expect("config");
        assert_eq!(config.server.binding, "localhost");
    }

    #[rstest]
    #[case(Environment::Development)]
    #[case(Environment::Test)]
    #[case(Environment::Production)]
    fn shipped_files_are_valid(#[case] env: Environment) {
        let config = Config::from_folder(&env, Path::new("config")).expect("config");
        assert_eq!(config.glossary.max_page_size, 1000);
        assert!(config.server.port > 0);
    }

    #[test]
    fn reads_environment_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("test.yaml"), "server:\n  port: 3000\n").expect("write");
        let config = Config::from_folder(&Environment::Test, dir.path()).expect("config");
        assert_eq!(config.server.port, 3000);
    }
}
