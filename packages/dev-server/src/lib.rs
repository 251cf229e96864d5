//! Development-only node backend
//!
//! An in-memory implementation of the node backend HTTP contract, so the
//! opcsim client can be exercised locally and in tests without the real
//! backend service.
//!
//! # Architecture
//!
//! - `store`: validated in-memory node list with integer id assignment
//! - `node_endpoints`: list/create/update/delete/batch routes
//! - `http_error`: error responses in the backend envelope shape
//!
//! # Usage
//!
//! ```bash
//! cargo run -p opcsim-dev-server
//! DEV_SERVER_PORT=3002 DEV_SERVER_CSRF_TOKEN=dev cargo run -p opcsim-dev-server
//! ```
//!
//! # Security
//!
//! - CORS restricted to localhost origins
//! - Optional CSRF token check on mutating requests, nothing else
//! - State is lost on restart

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use opcsim_core::client::CSRF_HEADER;

pub mod config;
mod http_error;
mod node_endpoints;
pub mod store;

pub use config::DevServerConfig;
pub use http_error::HttpError;
pub use store::{NodeStore, StoreError};

/// Application state shared across all endpoints
#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<NodeStore>>,
    /// Token mutating requests must present, if any
    pub csrf_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: NodeStore, csrf_token: Option<String>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            csrf_token: csrf_token.map(Arc::from),
        }
    }

    pub fn from_config(config: &DevServerConfig) -> Self {
        Self::new(NodeStore::default(), config.csrf_token.clone())
    }

    /// Whether `headers` satisfy the configured CSRF token
    fn csrf_accepted(&self, headers: &HeaderMap) -> bool {
        match &self.csrf_token {
            None => true,
            Some(expected) => headers
                .get(CSRF_HEADER)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|token| token == expected.as_ref()),
        }
    }
}

/// Reject mutating requests without a matching CSRF token
async fn require_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let safe = matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    if !safe && !state.csrf_accepted(request.headers()) {
        tracing::warn!(
            "Rejected {} {}: CSRF token missing or wrong",
            request.method(),
            request.uri()
        );
        return Err(HttpError::new("CSRF token missing or incorrect", "CSRF_FAILED"));
    }
    Ok(next.run(request).await)
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(node_endpoints::routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, require_csrf))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Create CORS layer for development
///
/// Default origins are the common local frontends. Set CORS_ALLOW_ORIGIN to
/// allow a different one.
fn cors_layer() -> CorsLayer {
    let default_origins = [
        "http://localhost:8000",
        "http://localhost:5173",
        "http://127.0.0.1:8000",
    ];

    let origins: Vec<header::HeaderValue> = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(custom_origin) => custom_origin.parse().into_iter().collect(),
        Err(_) => default_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect(),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_credentials(false)
}

/// Serve the router on an already-bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Start the HTTP dev server
///
/// # Errors
///
/// Returns error if server fails to bind or start.
pub async fn start_server(config: &DevServerConfig) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    tracing::info!("HTTP dev server starting on http://{}", addr);
    if config.csrf_token.is_some() {
        tracing::info!("CSRF token required on mutating requests");
    }
    tracing::info!("Development mode only - state is kept in memory");

    let listener = TcpListener::bind(&addr).await?;
    serve(listener, AppState::from_config(config)).await
}
