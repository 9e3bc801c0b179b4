use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{handlers, merge, probe};
use crate::metrics::metrics_handler;
use crate::state::{AppState, ProbeState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/merge", post(merge::merge))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_probe_router(state: Arc<ProbeState>) -> Router {
    Router::new()
        .route("/", get(probe::root))
        .route("/process", post(probe::process))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
