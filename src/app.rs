//! Shared state handed to every controller.

use std::sync::Arc;

use crate::{config::Config, environment::Environment, glossary::GlossaryService};

/// Application context, cloned into each request handler.
#[derive(Clone)]
pub struct AppContext {
    /// The environment the application runs in.
    pub environment: Environment,
    /// Configuration the context was booted with.
    pub config: Config,
    /// Handle on the glossary store.
    pub glossary: Arc<GlossaryService>,
}
