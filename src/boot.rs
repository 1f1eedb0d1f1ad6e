//! Boot sequence: build the context, mount the routes and serve.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::{
    app::AppContext,
    config::Config,
    controller::AppRoutes,
    environment::Environment,
    glossary::GlossaryService,
    Result,
};

/// Loads the glossary document and builds the application context.
///
/// # Errors
///
/// Fails when the glossary document cannot be read, parsed or created.
pub async fn create_context(environment: &Environment, config: Config) -> Result<AppContext> {
    let glossary = GlossaryService::from_config(&config.glossary)?;
    tracing::info!(
        environment = %environment,
        path = %config.glossary.path.display(),
        "glossary ready"
    );
    Ok(AppContext {
        environment: environment.clone(),
        config,
        glossary: Arc::new(glossary),
    })
}

/// Builds the router serving every default route.
///
/// # Errors
///
/// Fails when the CORS settings are invalid.
pub fn create_router(ctx: &AppContext) -> Result<Router> {
    let app_routes = AppRoutes::with_default_routes();
    for route in app_routes.collect() {
        tracing::debug!(uri = %route.uri, "route");
    }
    app_routes.to_router(ctx.clone())
}

/// Serves the application until ctrl-c.
///
/// # Errors
///
/// Fails when the listener cannot bind or the server stops with an error.
pub async fn start(ctx: AppContext, binding: &str, port: u16) -> Result<()> {
    let router = create_router(&ctx)?;
    let listener = TcpListener::bind(format!("{binding}:{port}")).await?;
    tracing::info!(
        environment = %ctx.environment,
        "listening on http://{binding}:{port}"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(err.msg = %err, "failed to listen for shutdown signal");
    }
}
