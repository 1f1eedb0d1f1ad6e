//! Fixtures for unit and integration tests.

pub mod config {
    use std::path::Path;

    use crate::config::{self, Config, GlossarySettings};

    /// Configuration for tests: logging off, the document at `path`.
    #[must_use]
    pub fn test_config(path: &Path) -> Config {
        Config {
            logger: config::Logger {
                enable: false,
                ..config::Logger::default()
            },
            server: config::Server::default(),
            glossary: GlossarySettings {
                path: path.to_path_buf(),
                ..GlossarySettings::default()
            },
        }
    }
}

pub mod app {
    use tempfile::TempDir;

    use super::config::test_config;
    use crate::{
        app::AppContext,
        boot,
        config::Config,
        environment::Environment,
        glossary::{Relation, RelationType, TermInput},
    };

    /// A booted context whose document lives in a temporary directory.
    ///
    /// The directory is removed when the value is dropped.
    pub struct TestApp {
        pub ctx: AppContext,
        pub dir: TempDir,
    }

    /// Boots a context over an empty glossary.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory or the document cannot be created.
    pub async fn get_app_context() -> TestApp {
        let dir = tempfile::tempdir().expect("temporary directory");
        let config = test_config(&dir.path().join("glossary.json"));
        with_config(dir, config).await
    }

    /// Boots a context from `config`, keeping `dir` alive alongside it.
    ///
    /// # Panics
    ///
    /// Panics when the glossary cannot be loaded.
    pub async fn with_config(dir: TempDir, config: Config) -> TestApp {
        let ctx = boot::create_context(&Environment::Test, config)
            .await
            .expect("test context");
        TestApp { ctx, dir }
    }

    /// Boots a context over a small glossary:
    ///
    /// | id | category | relations |
    /// |---|---|---|
    /// | `machine_learning` | `AI` | has `dataset` |
    /// | `dataset` | `Data` | is-part-of `machine_learning`, used-in `missing_term` |
    /// | `neural_network` | `AI` | none |
    ///
    /// # Panics
    ///
    /// Panics when seeding fails.
    pub async fn get_seeded_app_context() -> TestApp {
        let app = get_app_context().await;
        let repository = app.ctx.glossary.repository();
        for input in [
            TermInput::new("Machine Learning", "Algorithms that learn from data")
                .with_category("AI")
                .with_relation(Relation::new("dataset", RelationType::Has)),
            TermInput::new("Dataset", "A collection of records")
                .with_category("Data")
                .with_relation(Relation::new("machine_learning", RelationType::IsPartOf))
                .with_relation(Relation::new("missing_term", RelationType::UsedIn)),
            TermInput::new("Neural Network", "Layers of weighted units").with_category("AI"),
        ] {
            repository.create(input).await.expect("seed term");
        }
        app
    }
}
