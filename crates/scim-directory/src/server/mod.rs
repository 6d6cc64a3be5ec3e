//! HTTP boundary for the user directory.
//!
//! | method | path          | success |
//! |--------|---------------|---------|
//! | GET    | `/Users`      | 200 list envelope |
//! | POST   | `/Users`      | 201 record |
//! | GET    | `/Users/{id}` | 200 record |
//! | PUT    | `/Users/{id}` | 200 record |
//! | PATCH  | `/Users/{id}` | 200 record |
//! | DELETE | `/Users/{id}` | 204 empty |
//!
//! Every route sits behind the bearer gate. Failures use the SCIM error
//! envelope.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod persist;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::store::UserStore;

pub use error::ServerError;

/// Shared handler state. The single `RwLock` is the only synchronization
/// around the directory.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<UserStore>>,
    pub token: Arc<str>,
    pub default_filter: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: UserStore, token: impl Into<Arc<str>>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            token: token.into(),
            default_filter: None,
        }
    }

    pub fn with_default_filter(mut self, filter: Option<String>) -> Self {
        self.default_filter = filter.map(Into::into);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/Users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/Users/{id}",
            get(handlers::get_user)
                .put(handlers::replace_user)
                .patch(handlers::patch_user)
                .delete(handlers::delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    tracing::info!(%method, %uri, status = response.status().as_u16(), "request");
    response
}

/// Runs the server until ctrl-c, then writes a final snapshot.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let atomic = config.atomic();
    let store = if config.no_persist {
        tracing::info!("persistence disabled");
        UserStore::new(atomic)
    } else {
        UserStore::open(&config.store_path, atomic)
            .with_context(|| format!("restoring {}", config.store_path.display()))?
    };

    let (token, generated) = config.resolve_token();
    if config.expose_token {
        tracing::info!(%token, "bearer token");
    } else if generated {
        tracing::info!("generated a random bearer token; pass --expose-token to log it");
    }

    let state = AppState::new(store, token).with_default_filter(config.default_filter.clone());
    let snapshots = (!config.no_persist)
        .then(|| persist::spawn_snapshot_loop(state.store.clone(), config.snapshot_interval()));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(handle) = snapshots {
        handle.abort();
        // An in-flight periodic write still finishes on the blocking pool; the
        // writer orders it before the final one.
        let _ = handle.await;
        if let Err(err) = persist::snapshot_once(&state.store).await {
            tracing::error!("final snapshot failed: {err}");
        } else {
            tracing::info!("final snapshot written");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
