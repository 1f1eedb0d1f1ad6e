//! Access facade over HTTP.
//!
//! Controllers translate requests into [`crate::glossary::TermRepository`]
//! calls and map results and [`crate::Error`] values into responses. Routes are
//! declared per controller with [`Routes`] and assembled into an axum router
//! by [`AppRoutes`].

mod extractor;
pub mod format;
pub mod monitoring;
mod routes;
pub mod terms;

pub use extractor::{Json, Path, Query};
pub use routes::{AppRoutes, ListRoutes, Routes};
