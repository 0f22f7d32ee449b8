//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, REST classification)
//! - Serve REST resources through the negotiated output visitor
//! - Run the reload loop alongside the server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::RestConfig;
use crate::http::request::{
    propagate_request_id_layer, rest_request_listener, set_request_id_layer, track_metrics, IsRestRequest,
};
use crate::http::{resources, response::negotiate};
use crate::lifecycle::reload::run_reload_loop;
use crate::lifecycle::shutdown::{wait as wait_for_shutdown, Shutdown};
use crate::routing::RestRequestMatcher;
use crate::visitor::AcceptHeaderDispatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<AcceptHeaderDispatcher>,
    /// File to re-read on `POST /admin/reload`.
    pub config_path: Option<PathBuf>,
    pub config: Arc<RestConfig>,
}

/// HTTP server for the REST layer.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: RestConfig, dispatcher: Arc<AcceptHeaderDispatcher>, config_path: Option<PathBuf>) -> Self {
        let state = AppState {
            dispatcher,
            config_path,
            config: Arc::new(config),
        };
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/api/{*path}", get(rest_handler))
            .fallback(not_found);

        if state.config.admin.enabled {
            router = router.merge(setup_admin_router(state.clone()));
        }

        router
            .with_state(state.clone())
            .layer(middleware::from_fn(rest_request_listener))
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(state.config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn dispatcher(&self) -> &Arc<AcceptHeaderDispatcher> {
        &self.state.dispatcher
    }

    /// Serve until `shutdown` triggers, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RestConfig>,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        tokio::spawn(run_reload_loop(
            self.state.dispatcher.clone(),
            config_updates,
            shutdown.subscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown.subscribe()))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serves REST paths: the API root, or a negotiated 404 for anything else.
async fn rest_handler(
    State(state): State<AppState>,
    Extension(IsRestRequest(is_rest)): Extension<IsRestRequest>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path();
    let prefix = match RestRequestMatcher::rest_prefix(path) {
        Some(prefix) if is_rest => prefix,
        _ => return not_found().await.into_response(),
    };

    if path.len() == prefix.len() {
        return negotiate(&state.dispatcher, &headers, StatusCode::OK, &resources::root(prefix));
    }

    tracing::debug!(path = %path, "Unknown REST resource");
    let error = resources::error_message(
        StatusCode::NOT_FOUND.as_u16(),
        "Not Found",
        format!("Could not find resource '{path}'"),
    );
    negotiate(&state.dispatcher, &headers, StatusCode::NOT_FOUND, &error)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
