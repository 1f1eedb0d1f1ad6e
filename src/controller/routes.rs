use axum::{
    http::{header, HeaderValue, Method},
    routing::MethodRouter,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{app::AppContext, config, controller, Error, Result};

/// Routes declared by one controller, optionally sharing a prefix.
#[derive(Clone, Default, Debug)]
pub struct Routes {
    pub prefix: Option<String>,
    pub handlers: Vec<Handler>,
}

#[derive(Clone, Debug)]
pub struct Handler {
    pub uri: String,
    pub method: MethodRouter<AppContext>,
}

/// A flattened route as mounted on the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRoutes {
    pub uri: String,
}

impl Routes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a prefix for every handler of this controller.
    #[must_use]
    pub fn prefix(mut self, uri: &str) -> Self {
        self.prefix = Some(uri.to_owned());
        self
    }

    /// Adds a handler at `uri`, relative to the prefix.
    #[must_use]
    pub fn add(mut self, uri: &str, method: MethodRouter<AppContext>) -> Self {
        self.handlers.push(Handler {
            uri: uri.to_owned(),
            method,
        });
        self
    }
}

/// Every controller of the application.
#[derive(Clone, Default, Debug)]
pub struct AppRoutes {
    routes: Vec<Routes>,
}

impl AppRoutes {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Monitoring routes plus the glossary facade.
    #[must_use]
    pub fn with_default_routes() -> Self {
        Self::empty()
            .add_route(controller::monitoring::routes())
            .add_route(controller::terms::routes())
    }

    #[must_use]
    pub fn add_route(mut self, routes: Routes) -> Self {
        self.routes.push(routes);
        self
    }

    /// Lists the mounted uris in declaration order.
    #[must_use]
    pub fn collect(&self) -> Vec<ListRoutes> {
        self.routes
            .iter()
            .flat_map(|routes| {
                routes.handlers.iter().map(|handler| ListRoutes {
                    uri: join_uri(routes.prefix.as_deref(), &handler.uri),
                })
            })
            .collect()
    }

    /// Builds the axum router with tracing and CORS layers applied.
    ///
    /// # Errors
    ///
    /// Fails when a configured CORS origin is not a valid header value.
    pub fn to_router(&self, ctx: AppContext) -> Result<Router> {
        let mut router: Router<AppContext> = Router::new();
        for routes in &self.routes {
            for handler in &routes.handlers {
                let uri = join_uri(routes.prefix.as_deref(), &handler.uri);
                tracing::debug!(uri = %uri, "mounting route");
                router = router.route(&uri, handler.method.clone());
            }
        }

        let mut router = router.layer(TraceLayer::new_for_http());
        if ctx.config.server.cors.enable {
            router = router.layer(cors_layer(&ctx.config.server.cors)?);
        }
        Ok(router.with_state(ctx))
    }
}

fn join_uri(prefix: Option<&str>, uri: &str) -> String {
    let prefix = prefix.unwrap_or_default().trim_end_matches('/');
    let uri = uri.trim_start_matches('/');
    match (prefix.is_empty(), uri.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{uri}"),
        (false, true) => normalize(prefix),
        (false, false) => format!("{}/{uri}", normalize(prefix)),
    }
}

fn normalize(prefix: &str) -> String {
    if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{prefix}")
    }
}

fn cors_layer(cors: &config::Cors) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if cors.allow_origins.iter().any(|origin| origin == "*") {
        return Ok(layer.allow_origin(Any));
    }
    let origins = cors
        .allow_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|err| Error::Message(format!("invalid cors origin `{origin}`: {err}")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{join_uri, AppRoutes};

    #[rstest]
    #[case(None, "/", "/")]
    #[case(None, "/health", "/health")]
    #[case(Some("api/terms"), "/", "/api/terms")]
    #[case(Some("/api/terms/"), "/search", "/api/terms/search")]
    #[case(Some("/api/terms"), "{id}", "/api/terms/{id}")]
    fn joins_prefix_and_uri(#[case] prefix: Option<&str>, #[case] uri: &str, #[case] expected: &str) {
        assert_eq!(join_uri(prefix, uri), expected);
    }

    #[test]
    fn default_routes_cover_facade() {
        let uris: Vec<String> = AppRoutes::with_default_routes()
            .collect()
            .into_iter()
            .map(|route| route.uri)
            .collect();
        for expected in [
            "/",
            "/health",
            "/api/terms",
            "/api/terms/search",
            "/api/terms/categories",
            "/api/terms/category/{category}",
            "/api/terms/{id}",
            "/api/terms/{id}/related",
            "/api/relation-types",
        ] {
            assert!(uris.iter().any(|uri| uri == expected), "missing {expected}");
        }
    }
}
