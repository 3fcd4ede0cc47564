//! morphseg-devserver library - development annotation backend
//!
//! Serves a corpus loaded from TOML over the annotation backend HTTP API
//! and keeps every annotation in memory.

use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod api;
pub mod config;
pub mod corpus;
pub mod error;
pub mod store;

pub use crate::corpus::Corpus;
pub use crate::error::{ApiError, ApiResult};
pub use crate::store::DevStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<DevStore>>,
}

impl AppState {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            store: Arc::new(RwLock::new(DevStore::new(corpus))),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/user/:email", get(api::login))
        .route("/words/:uid", get(api::words))
        .route("/word/:word", get(api::word).post(api::annotate))
        .route("/log/:handle", post(api::log))
        .route("/sense/:context_id", post(api::sense))
        .route("/skip/:word", post(api::skip))
        .route("/nonword/:word", post(api::nonword))
        .route("/b2seg/:word", post(api::b2seg))
        .route("/annotations/:uid", get(api::annotations))
        .merge(api::health_routes())
        .with_state(state)
}
