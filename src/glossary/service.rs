use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::{GlossaryBackend, GlossarySettings},
    glossary::{repositories::TermRepository, store::JsonFileTermStore, value_objects::TermId},
};

/// Type alias simplifying repository trait object usage inside the service.
pub type RepositoryHandle = dyn TermRepository<Error = GlossaryError> + Send + Sync + 'static;

/// Process wide glossary handle shared through the application context.
#[derive(Clone)]
pub struct GlossaryService {
    repository: Arc<RepositoryHandle>,
    settings: GlossarySettings,
}

impl GlossaryService {
    /// Creates a new [`GlossaryService`] from a repository handle.
    pub fn new(repository: Arc<RepositoryHandle>, settings: GlossarySettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Builds a service instance from configuration settings.
    ///
    /// # Errors
    ///
    /// Fails when the configured document cannot be loaded or created.
    pub fn from_config(settings: &GlossarySettings) -> Result<Self, GlossaryError> {
        let repository: Arc<RepositoryHandle> = match settings.backend {
            GlossaryBackend::JsonFile => Arc::new(JsonFileTermStore::open(settings)?),
        };
        Ok(Self::new(repository, settings.clone()))
    }

    /// Returns a clone of the repository handle.
    pub fn repository(&self) -> Arc<RepositoryHandle> {
        Arc::clone(&self.repository)
    }

    /// Returns the active glossary settings.
    pub fn settings(&self) -> &GlossarySettings {
        &self.settings
    }
}

/// Errors raised by glossary components.
#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    /// Referenced term was not found.
    #[error("term `{id}` not found")]
    NotFound { id: TermId },
    /// A create derived the identifier of a stored term.
    #[error("term `{id}` already exists as `{existing}`")]
    Conflict { id: TermId, existing: String },
    /// Caller supplied fields failed validation.
    #[error("invalid term: {0}")]
    Validation(#[from] validator::ValidationErrors),
    /// Reading or writing the glossary document failed.
    #[error("failed to access glossary document `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The glossary document does not hold a valid term collection.
    #[error("malformed glossary document `{path}`: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl GlossaryError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns `true` for failures of the backing document rather than of the
    /// request.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Malformed { .. })
    }
}
