//! Request and response bodies for each backend endpoint
//!
//! Every response is parsed into one of these types before it reaches the
//! portal; a shape mismatch becomes `Error::Decode`.

use krishi_common::{ClaimStatus, FarmStatus, Officer};
use serde::{Deserialize, Serialize};

/// Body of `POST /loginGov`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of `POST /loginGov`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub name: String,

    pub token: String,

    /// Not every backend echoes the email back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LoginResponse {
    /// Build the session identity, falling back to the email used to sign in
    pub fn into_officer(self, login_email: &str) -> Officer {
        Officer {
            name: self.name,
            email: self.email.unwrap_or_else(|| login_email.to_string()),
            token: self.token,
            extra: self.extra,
        }
    }
}

/// Body of `POST /approveClaim`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveClaimRequest {
    #[serde(rename = "claimID")]
    pub claim_id: String,

    #[serde(rename = "payoutAmount")]
    pub payout_amount: u64,
}

/// Body of `POST /rejectClaim`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectClaimRequest {
    #[serde(rename = "claimID")]
    pub claim_id: String,

    #[serde(rename = "reasonForRejection")]
    pub reason_for_rejection: String,
}

/// Error body the backend sends with non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Collections that can be listed by status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Farms,
    Claims,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Farms => "farms",
            Resource::Claims => "claims",
        }
    }
}

/// Status filter for a list-by-status request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Farm(FarmStatus),
    Claim(ClaimStatus),
}

impl StatusFilter {
    pub fn resource(&self) -> Resource {
        match self {
            StatusFilter::Farm(_) => Resource::Farms,
            StatusFilter::Claim(_) => Resource::Claims,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Farm(status) => status.as_str(),
            StatusFilter::Claim(status) => status.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_approve_body_matches_backend() {
        let body = ApproveClaimRequest {
            claim_id: "C1".to_string(),
            payout_amount: 5000,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "claimID": "C1", "payoutAmount": 5000 })
        );
    }

    #[test]
    fn test_reject_body_matches_backend() {
        let body = RejectClaimRequest {
            claim_id: "C2".to_string(),
            reason_for_rejection: "NDVI shows healthy crop".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "claimID": "C2", "reasonForRejection": "NDVI shows healthy crop" })
        );
    }

    #[test]
    fn test_login_response_falls_back_to_login_email() {
        let response: LoginResponse = serde_json::from_value(json!({
            "name": "Asha Rao",
            "token": "tok-1",
            "role": "district-officer"
        }))
        .unwrap();

        let officer = response.into_officer("asha@agri.gov.in");
        assert_eq!(officer.email, "asha@agri.gov.in");
        assert_eq!(officer.extra["role"], "district-officer");
    }

    #[test]
    fn test_login_response_requires_token() {
        let result = serde_json::from_value::<LoginResponse>(json!({ "name": "Asha" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_filter_paths() {
        let filter = StatusFilter::Claim(ClaimStatus::FlaggedForReview);
        assert_eq!(filter.resource().as_str(), "claims");
        assert_eq!(filter.as_str(), "FlaggedForReview");
    }
}
