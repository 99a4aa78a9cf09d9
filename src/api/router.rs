use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::health;
use super::recognize;
use super::reconcile;
use super::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/recognize/{provider_id}", post(recognize::recognize))
        .route("/reconcile", post(reconcile::reconcile))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
