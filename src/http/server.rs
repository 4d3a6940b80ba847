//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the axum Router with the catch-all handler
//! - Wire up middleware (timeout, body limit, tracing)
//! - Derive the session handle from the request cookie
//! - Dispatch each request: static asset or executor
//! - Trigger the script scanner before serving front-end scripts
//!
//! # Design Decisions
//! - One handler for GET/POST/PUT/DELETE on `/` and `/{*path}`
//! - Scanner state lives in the app state, per server instance; two
//!   servers in one process stay fully independent

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Request},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::assets::{asset_response, MimeRegistry};
use crate::config::schema::ServerConfig;
use crate::dispatch::{classify, Dispatch};
use crate::executor::Executor;
use crate::http::error::HttpError;
use crate::http::request::normalize;
use crate::http::response::CanonicalResponse;
use crate::scanner::{ScanError, ScriptScanner};
use crate::session::{CookieCodec, MemoryStore, Session, SessionStore};

/// Application state injected into the handler.
#[derive(Clone)]
struct AppState {
    config: Arc<ServerConfig>,
    scanner: Arc<ScriptScanner>,
    mimes: Arc<MimeRegistry>,
    cookies: Arc<CookieCodec>,
    store: Arc<dyn SessionStore>,
    executor: Arc<dyn Executor>,
}

/// HTTP front controller for one configuration and executor.
pub struct FrontServer {
    router: Router,
    config: ServerConfig,
}

impl FrontServer {
    /// Create a server backed by the in-memory session store.
    pub fn new(config: ServerConfig, executor: impl Executor) -> Result<Self, ScanError> {
        Self::with_store(config, Arc::new(executor), Arc::new(MemoryStore::new()))
    }

    /// Create a server with an application-supplied session store.
    pub fn with_store(
        config: ServerConfig,
        executor: Arc<dyn Executor>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ScanError> {
        let scanner = Arc::new(ScriptScanner::new(&config.assets)?);
        let state = AppState {
            config: Arc::new(config.clone()),
            scanner,
            mimes: Arc::new(MimeRegistry::default()),
            cookies: Arc::new(CookieCodec::new(&config.session)),
            store,
            executor,
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let handler = get(http_call)
            .post(http_call)
            .put(http_call)
            .delete(http_call);
        Router::new()
            .route("/{*path}", handler.clone())
            .route("/", handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Main handler: normalize, dispatch, write back.
async fn http_call(
    State(state): State<AppState>,
    params: Option<Path<HashMap<String, String>>>,
    request: Request<Body>,
) -> Response {
    let params = params.map(|Path(params)| params).unwrap_or_default();
    let session = state
        .cookies
        .session_from_headers(request.headers(), state.store.clone());

    let mut response = match handle(&state, params, request, session.clone()).await {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    };
    if session.needs_cookie() {
        response
            .headers_mut()
            .append(header::SET_COOKIE, state.cookies.set_cookie(&session));
    }
    response
}

async fn handle(
    state: &AppState,
    params: HashMap<String, String>,
    request: Request<Body>,
    session: Session,
) -> Result<CanonicalResponse, HttpError> {
    let canonical = normalize(
        request,
        params,
        session,
        state.config.limits.max_body_bytes,
    )
    .await?;

    match classify(
        &canonical.path,
        &state.config.assets,
        &state.scanner,
        &state.mimes,
    ) {
        Dispatch::Asset {
            full_path,
            mime,
            script,
        } => {
            // Serving a front-end script is what discovers its imports;
            // already-scanned paths no-op inside.
            if script {
                state.scanner.ensure_scanned(&full_path).await?;
            }
            let response = asset_response(&full_path, &mime)
                .await
                .map_err(|source| HttpError::Asset {
                    path: full_path.clone(),
                    source,
                })?;
            tracing::debug!(
                method = %canonical.method,
                path = %canonical.path,
                outcome = "asset",
                "request handled"
            );
            Ok(response)
        }
        Dispatch::Execute => {
            tracing::debug!(
                method = %canonical.method,
                path = %canonical.path,
                outcome = "execute",
                "request handled"
            );
            state
                .executor
                .execute(canonical)
                .await
                .map_err(HttpError::Execute)
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
