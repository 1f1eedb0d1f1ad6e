use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use validator::Validate;

use crate::config::{CollisionPolicy, GlossarySettings};

use super::{
    document::{self, TermCollection},
    entities::{Term, TermInput},
    integrity,
    repositories::{IntegrityReport, Pagination, RelatedTerm, TermPage, TermRepository},
    service::GlossaryError,
    value_objects::TermId,
};

/// Term repository mirrored to a single JSON document.
///
/// Every operation runs under one lock. Mutations rewrite the whole document
/// before the lock is released; when the write fails the in-memory collection
/// is put back to its state before the mutation. The write itself runs on the
/// blocking pool so a slow disk does not stall runtime workers.
#[derive(Debug)]
pub struct JsonFileTermStore {
    path: PathBuf,
    max_page_size: usize,
    on_id_collision: CollisionPolicy,
    terms: Mutex<TermCollection>,
}

impl JsonFileTermStore {
    /// Loads the document at `settings.path`, creating an empty one when it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Fails when the document cannot be read, is malformed, or the empty
    /// document cannot be written.
    pub fn open(settings: &GlossarySettings) -> Result<Self, GlossaryError> {
        let path = settings.path.clone();
        let terms = if let Some(terms) = document::read(&path)? {
            tracing::info!(path = %path.display(), terms = terms.len(), "glossary document loaded");
            terms
        } else {
            let terms = TermCollection::new();
            document::write(&path, &terms)?;
            tracing::info!(path = %path.display(), "glossary document created");
            terms
        };

        Ok(Self {
            path,
            max_page_size: settings.max_page_size.max(1),
            on_id_collision: settings.on_id_collision,
            terms: Mutex::new(terms),
        })
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn guard(&self) -> MutexGuard<'_, TermCollection> {
        self.terms.lock().await
    }

    /// Writes `terms` to the document, restoring `before` when that fails.
    ///
    /// Callers hold the lock for the whole call.
    async fn persist(
        &self,
        terms: &mut TermCollection,
        before: TermCollection,
    ) -> Result<(), GlossaryError> {
        let written = match document::encode(&self.path, terms) {
            Ok(content) => {
                let path = self.path.clone();
                tokio::task::spawn_blocking(move || document::replace(&path, &content))
                    .await
                    .unwrap_or_else(|err| Err(GlossaryError::io(&self.path, io::Error::other(err))))
            }
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            *terms = before;
            tracing::error!(err.msg = %err, err.detail = ?err, "glossary_persist_error");
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl TermRepository for JsonFileTermStore {
    type Error = GlossaryError;

    async fn list(&self, page: Pagination) -> Result<TermPage, Self::Error> {
        let terms = self.guard().await;
        let limit = page.limit.min(self.max_page_size);
        Ok(TermPage {
            total: terms.len(),
            items: terms.window(page.skip, limit).to_vec(),
        })
    }

    async fn get(&self, id: &TermId) -> Result<Option<Term>, Self::Error> {
        Ok(self.guard().await.get(id.as_str()).cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<Term>, Self::Error> {
        let query = query.to_lowercase();
        Ok(self
            .guard()
            .await
            .iter()
            .filter(|term| term.mentions(&query))
            .cloned()
            .collect())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Term>, Self::Error> {
        Ok(self
            .guard()
            .await
            .iter()
            .filter(|term| term.category.as_deref() == Some(category))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.guard().await.categories())
    }

    async fn create(&self, input: TermInput) -> Result<Term, Self::Error> {
        input.validate()?;
        let id = input.derive_id();
        let mut terms = self.guard().await;
        if let Some(existing) = terms.get(id.as_str()) {
            if self.on_id_collision == CollisionPolicy::Reject {
                return Err(GlossaryError::Conflict {
                    id,
                    existing: existing.term.clone(),
                });
            }
            if existing.term != input.term {
                tracing::warn!(
                    id = %id,
                    existing = %existing.term,
                    incoming = %input.term,
                    "term id collision, overwriting existing record"
                );
            }
        }

        let before = terms.clone();
        let term = input.into_term(id);
        terms.upsert(term.clone());
        self.persist(&mut terms, before).await?;
        Ok(term)
    }

    async fn update(&self, id: &TermId, input: TermInput) -> Result<Option<Term>, Self::Error> {
        input.validate()?;
        let mut terms = self.guard().await;
        if !terms.contains(id.as_str()) {
            return Ok(None);
        }

        let before = terms.clone();
        let term = input.into_term(id.clone());
        terms.upsert(term.clone());
        self.persist(&mut terms, before).await?;
        Ok(Some(term))
    }

    async fn delete(&self, id: &TermId) -> Result<bool, Self::Error> {
        let mut terms = self.guard().await;
        if !terms.contains(id.as_str()) {
            return Ok(false);
        }

        let before = terms.clone();
        terms.remove(id.as_str());
        self.persist(&mut terms, before).await?;
        Ok(true)
    }

    async fn count(&self) -> Result<usize, Self::Error> {
        Ok(self.guard().await.len())
    }

    async fn related(&self, id: &TermId) -> Result<Option<Vec<RelatedTerm>>, Self::Error> {
        let terms = self.guard().await;
        Ok(terms
            .get(id.as_str())
            .map(|term| integrity::resolve_relations(&terms, term)))
    }

    async fn integrity_report(&self) -> Result<IntegrityReport, Self::Error> {
        Ok(integrity::scan(&*self.guard().await))
    }
}
