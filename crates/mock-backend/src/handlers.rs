//! API request handlers for the mock backend

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use krishi_common::{Claim, ClaimDecision, ClaimStatus, Farm, FarmStatus};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    models::{
        ApproveClaimRequest, LoginRequest, LoginResponse, MessageResponse, RejectClaimRequest,
    },
    storage::{Storage, Transition},
};

/// Shared application state
pub struct AppState {
    pub storage: Mutex<Storage>,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

/// Malformed bodies get the same `{"error"}` shape as every other failure
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

fn transition_result(
    outcome: Transition,
    what: &str,
    id: &str,
    done: String,
) -> Result<Json<MessageResponse>, ApiError> {
    match outcome {
        Transition::Applied => Ok(Json(MessageResponse {
            success: true,
            message: done,
        })),
        Transition::NotFound => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("{} not found: {}", what, id),
        )),
        Transition::Conflict(message) => Err(ApiError::new(StatusCode::CONFLICT, message)),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn acting_officer(state: &AppState, headers: &HeaderMap) -> String {
    let storage = state.storage.lock().await;
    let officer = bearer_token(headers)
        .and_then(|token| storage.session_email(token))
        .unwrap_or("anonymous")
        .to_string();
    officer
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mock-backend"
    }))
}

/// Officer sign-in
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    info!("Sign-in attempt for: {}", payload.email);

    let mut storage = state.storage.lock().await;
    match storage.login(&payload.email, &payload.password) {
        Some(officer) => Ok(Json(LoginResponse {
            name: officer.name,
            email: officer.email,
            token: officer.token,
        })),
        None => Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid email or password",
        )),
    }
}

/// List farms by status
pub async fn farms_by_status_handler(
    State(state): State<Arc<AppState>>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Farm>>, ApiError> {
    let status: FarmStatus = status
        .parse()
        .map_err(|e: krishi_common::Error| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let storage = state.storage.lock().await;
    let farms = storage.farms_by_status(status);
    info!("Listing {} farms with status {}", farms.len(), status);

    Ok(Json(farms))
}

/// List claims by status
pub async fn claims_by_status_handler(
    State(state): State<Arc<AppState>>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Claim>>, ApiError> {
    let status: ClaimStatus = status
        .parse()
        .map_err(|e: krishi_common::Error| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let storage = state.storage.lock().await;
    let claims = storage.claims_by_status(status);
    info!("Listing {} claims with status {}", claims.len(), status);

    Ok(Json(claims))
}

/// Verify a pending farm
pub async fn verify_farm_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(farm_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let officer = acting_officer(&state, &headers).await;
    info!("Verifying farm {} (officer: {})", farm_id, officer);

    let mut storage = state.storage.lock().await;
    let outcome = storage.verify_farm(&farm_id);
    transition_result(
        outcome,
        "Farm",
        &farm_id,
        format!("Farm {} verified", farm_id),
    )
}

/// Approve a claim with a payout
pub async fn approve_claim_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ApproveClaimRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;
    let officer = acting_officer(&state, &headers).await;
    info!(
        "Approving claim {} for {} (officer: {})",
        payload.claim_id, payload.payout_amount, officer
    );

    if payload.payout_amount <= 0 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "payoutAmount must be a positive integer",
        ));
    }

    let decision = ClaimDecision::Approve {
        payout_amount: payload.payout_amount as u64,
    };

    let mut storage = state.storage.lock().await;
    let outcome = storage.decide_claim(&payload.claim_id, &decision);
    transition_result(
        outcome,
        "Claim",
        &payload.claim_id,
        format!("Claim {} approved", payload.claim_id),
    )
}

/// Reject a claim with a reason
pub async fn reject_claim_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<RejectClaimRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;
    let officer = acting_officer(&state, &headers).await;
    info!("Rejecting claim {} (officer: {})", payload.claim_id, officer);

    let reason = payload.reason_for_rejection.trim();
    if reason.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "reasonForRejection must not be empty",
        ));
    }

    let decision = ClaimDecision::Reject {
        reason: reason.to_string(),
    };

    let mut storage = state.storage.lock().await;
    let outcome = storage.decide_claim(&payload.claim_id, &decision);
    transition_result(
        outcome,
        "Claim",
        &payload.claim_id,
        format!("Claim {} rejected", payload.claim_id),
    )
}
