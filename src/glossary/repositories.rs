use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::entities::{Relation, RelationType, Term, TermInput};
use super::value_objects::TermId;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Largest page size accepted unless configured otherwise.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Insertion ordered window over the collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub skip: usize,
    pub limit: usize,
}

impl Pagination {
    #[must_use]
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One page of terms plus the size of the whole collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TermPage {
    pub total: usize,
    pub items: Vec<Term>,
}

/// A relation of a term resolved to the term it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelatedTerm {
    pub relation: Relation,
    pub term: Term,
}

/// A relation whose target is not stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DanglingRelation {
    pub source: TermId,
    pub target: TermId,
    pub relation_type: RelationType,
}

/// Summary of how well relations resolve across the collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub terms: usize,
    pub relations: usize,
    pub dangling: Vec<DanglingRelation>,
}

impl IntegrityReport {
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.dangling.is_empty()
    }
}

/// Contract describing query and persistence responsibilities for terms.
#[async_trait]
pub trait TermRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Returns a window of terms in insertion order plus the total count.
    ///
    /// A `skip` past the end yields an empty page.
    async fn list(&self, page: Pagination) -> Result<TermPage, Self::Error>;

    /// Retrieves a term by exact identifier.
    ///
    /// Implementors must return `Ok(None)` when the term is missing.
    async fn get(&self, id: &TermId) -> Result<Option<Term>, Self::Error>;

    /// Returns terms whose name or definition contains `query`, ignoring case.
    async fn search(&self, query: &str) -> Result<Vec<Term>, Self::Error>;

    /// Returns terms whose category equals `category` exactly.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Term>, Self::Error>;

    /// Returns the sorted distinct non-empty categories.
    async fn categories(&self) -> Result<Vec<String>, Self::Error>;

    /// Stores a new term under the identifier derived from its name.
    ///
    /// Implementors must persist the collection before returning.
    async fn create(&self, input: TermInput) -> Result<Term, Self::Error>;

    /// Replaces every field of an existing term, keeping its identifier.
    ///
    /// Returns `Ok(None)` without writing when the term is missing.
    async fn update(&self, id: &TermId, input: TermInput) -> Result<Option<Term>, Self::Error>;

    /// Removes a term, returning whether it existed.
    async fn delete(&self, id: &TermId) -> Result<bool, Self::Error>;

    /// Returns the number of stored terms.
    async fn count(&self) -> Result<usize, Self::Error>;

    /// Resolves the relations of a term, skipping targets that are not stored.
    ///
    /// Returns `Ok(None)` when the term itself is missing.
    async fn related(&self, id: &TermId) -> Result<Option<Vec<RelatedTerm>>, Self::Error>;

    /// Lists every relation pointing at a missing term.
    async fn integrity_report(&self) -> Result<IntegrityReport, Self::Error>;
}
