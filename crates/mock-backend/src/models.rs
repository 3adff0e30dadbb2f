//! Request and response bodies for the mock backend

use serde::{Deserialize, Serialize};

/// Officer sign-in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful sign-in
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Claim approval
#[derive(Debug, Deserialize)]
pub struct ApproveClaimRequest {
    #[serde(rename = "claimID")]
    pub claim_id: String,

    /// Signed so a non-positive amount gets a 400 instead of a parse failure
    #[serde(rename = "payoutAmount")]
    pub payout_amount: i64,
}

/// Claim rejection
#[derive(Debug, Deserialize)]
pub struct RejectClaimRequest {
    #[serde(rename = "claimID")]
    pub claim_id: String,

    #[serde(rename = "reasonForRejection")]
    pub reason_for_rejection: String,
}

/// Acknowledgement for state-changing requests
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
