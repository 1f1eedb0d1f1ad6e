//! A glossary of terms and their typed relations, kept in one JSON document
//! and served over HTTP.

pub use self::errors::Error;

pub mod app;
pub mod boot;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod environment;
pub mod errors;
pub mod glossary;
pub mod logger;
#[cfg(any(test, feature = "testing"))]
pub mod tests_cfg;

#[cfg(feature = "testing")]
pub use axum_test::{TestResponse, TestServer};

/// Application results, defaulting the error to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
