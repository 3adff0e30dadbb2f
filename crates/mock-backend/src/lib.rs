//! Mock Backend
//!
//! In-memory implementation of the farm and claim backend the admin portal
//! talks to. Enforces the same status rules as the real service: farms are
//! verified once, claims are decided once and only while flagged for review.

pub mod handlers;
pub mod models;
pub mod storage;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::AppState;
pub use storage::{Storage, Transition};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    create_router_with_state(Arc::new(state))
}

/// Create the router over state the caller keeps a handle to
pub fn create_router_with_state(shared_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/loginGov", post(handlers::login_handler))
        .route(
            "/farms/by-status/{status}",
            get(handlers::farms_by_status_handler),
        )
        .route("/verifyFarm/{farm_id}", post(handlers::verify_farm_handler))
        .route(
            "/claims/by-status/{status}",
            get(handlers::claims_by_status_handler),
        )
        .route("/approveClaim", post(handlers::approve_claim_handler))
        .route("/rejectClaim", post(handlers::reject_claim_handler))
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
