//! Service description, liveness and readiness routes.

use axum::{extract::State, response::Response, routing::get};
use serde::Serialize;

use super::{format, routes::Routes};
use crate::{app::AppContext, Result};

#[derive(Serialize)]
pub struct About {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct Status {
    pub status: &'static str,
}

/// Represents the health status of the application.
#[derive(Serialize)]
pub struct Health {
    pub ok: bool,
}

/// Names the service and its version.
pub async fn about() -> Result<Response> {
    format::json(About {
        message: "Glossary API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness check in the `{"status": "ok"}` shape.
pub async fn health() -> Result<Response> {
    format::json(Status { status: "ok" })
}

/// Liveness check in the `{"ok": true}` shape.
pub async fn ping() -> Result<Response> {
    format::json(Health { ok: true })
}

/// Checks that the glossary answers queries.
///
/// # Errors
/// All errors are logged, and the readiness status is returned as a JSON response.
pub async fn readiness(State(ctx): State<AppContext>) -> Result<Response> {
    let mut is_ok = true;
    if let Err(error) = ctx.glossary.repository().count().await {
        tracing::error!(err.msg = %error, err.detail = ?error, "readiness_glossary_error");
        is_ok = false;
    }
    format::json(Health { ok: is_ok })
}

/// Defines and returns the monitoring routes.
pub fn routes() -> Routes {
    Routes::new()
        .add("/", get(about))
        .add("/health", get(health))
        .add("/_ping", get(ping))
        .add("/_health", get(ping))
        .add("/_readiness", get(readiness))
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{controller::monitoring, tests_cfg};

    async fn call(uri: &str, router: axum::Router) -> Value {
        let req = axum::http::Request::builder()
            .uri(uri)
            .method("GET")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), 200);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).expect("Valid JSON response")
    }

    #[tokio::test]
    async fn health_works() {
        let router = axum::Router::new().route("/health", get(monitoring::health));
        let res_json = call("/health", router).await;
        assert_eq!(res_json["status"], "ok");
    }

    #[tokio::test]
    async fn about_reports_version() {
        let router = axum::Router::new().route("/", get(monitoring::about));
        let res_json = call("/", router).await;
        assert_eq!(res_json["message"], "Glossary API");
        assert_eq!(res_json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn readiness_reports_store() {
        let app = tests_cfg::app::get_app_context().await;
        let router = axum::Router::new()
            .route("/_readiness", get(monitoring::readiness))
            .with_state(app.ctx.clone());
        let res_json = call("/_readiness", router).await;
        assert_eq!(res_json["ok"], true);
    }
}
