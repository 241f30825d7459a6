pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use dashmap::DashMap;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::db::Database;
use crate::pipeline::SubmissionPipeline;

/// Shared server state. The pipeline is one shared instance; per-submission
/// work happens in spawned tasks tracked in `active` for the health surface.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
    pub pipeline: Arc<SubmissionPipeline>,
    pub http: reqwest::Client,
    /// In-flight submission tasks, keyed by a per-submission id.
    pub active: Arc<DashMap<String, Instant>>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig, pipeline: Arc<SubmissionPipeline>) -> Self {
        Self {
            db,
            config,
            pipeline,
            http: reqwest::Client::new(),
            active: Arc::new(DashMap::new()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/sms", axum::routing::post(routes::webhook::receive_sms))
        .route("/api/health", axum::routing::get(routes::status::health_check))
        .route("/api/codes", axum::routing::get(routes::codes::list_codes))
        .route("/api/codes/:id", axum::routing::get(routes::codes::get_code))
        .route("/api/codes/:id/sightings", axum::routing::get(routes::codes::get_sightings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
