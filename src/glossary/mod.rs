//! Glossary domain: terms, their typed relations and the JSON document store.
//!
//! The model and the repository contract are independent from transport; the
//! controller layer only talks to [`TermRepository`] through
//! [`GlossaryService`].

pub mod document;
pub mod entities;
pub mod integrity;
pub mod repositories;
pub mod service;
pub mod store;
pub mod value_objects;

pub use document::TermCollection;
pub use entities::{Relation, RelationType, Term, TermInput, UnknownRelationType};
pub use repositories::{
    DanglingRelation, IntegrityReport, Pagination, RelatedTerm, TermPage, TermRepository,
};
pub use service::{GlossaryError, GlossaryService, RepositoryHandle};
pub use store::JsonFileTermStore;
pub use value_objects::TermId;
