//! Client for the farm and claim backend

use async_trait::async_trait;
use krishi_common::{Claim, ClaimDecision, ClaimStatus, Error, Farm, FarmStatus, Officer, Result};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

use crate::schema::{
    ApproveClaimRequest, ErrorBody, LoginRequest, LoginResponse, RejectClaimRequest, StatusFilter,
};

/// Operations the portal needs from the backend
///
/// The HTTP implementation is [`HttpPortalClient`]; views only see this
/// trait so they can be driven against any backend.
#[async_trait]
pub trait PortalService: Send + Sync {
    /// Exchange officer credentials for a session identity
    async fn login(&self, email: &str, password: &str) -> Result<Officer>;

    /// List farms with the given status
    async fn list_farms(&self, status: FarmStatus) -> Result<Vec<Farm>>;

    /// List claims with the given status
    async fn list_claims(&self, status: ClaimStatus) -> Result<Vec<Claim>>;

    /// Mark a pending farm as verified
    async fn verify_farm(&self, farm_id: &str) -> Result<()>;

    /// Approve or reject a claim that is flagged for review
    async fn decide_claim(&self, claim_id: &str, decision: &ClaimDecision) -> Result<()>;

    /// Credential for subsequent requests; `None` after sign-out
    fn set_token(&self, token: Option<String>);
}

/// reqwest-backed [`PortalService`]
pub struct HttpPortalClient {
    base_url: String,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl HttpPortalClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Backend root, e.g. "http://127.0.0.1:3000"
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            token: RwLock::new(None),
        }
    }

    /// Send the officer's token as a bearer credential on every request
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the backend is reachable and healthy
    pub async fn health_check(&self) -> Result<bool> {
        let url = self.endpoint(&["health"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(response.status().is_success())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Validation(format!("invalid backend URL {}: {}", self.base_url, e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Validation(format!("backend URL {} cannot take a path", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request and return the body of a 2xx response
    async fn execute(&self, request: RequestBuilder, what: &str) -> Result<String> {
        let request = match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            warn!("{} failed to reach backend: {}", what, e);
            Error::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("failed to read {} response: {}", what, e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            warn!("{} rejected by backend: {} {}", what, status, message);
            return Err(Error::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn list_by_status<T: DeserializeOwned>(&self, filter: StatusFilter) -> Result<Vec<T>> {
        let url = self.endpoint(&[filter.resource().as_str(), "by-status", filter.as_str()])?;
        debug!("Listing {} with status {}: {}", filter.resource().as_str(), filter.as_str(), url);

        let body = self
            .execute(self.client.get(url), "list-by-status")
            .await?;

        // The backend sends `null` instead of `[]` when nothing matches
        let items: Option<Vec<T>> = decode(&body, filter.resource().as_str())?;
        Ok(items.unwrap_or_default())
    }
}

fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::Decode(format!("unexpected {} response: {}", what, e)))
}

#[async_trait]
impl PortalService for HttpPortalClient {
    async fn login(&self, email: &str, password: &str) -> Result<Officer> {
        let url = self.endpoint(&["loginGov"])?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        debug!("Signing in {}", email);
        let response = self
            .execute(self.client.post(url).json(&body), "login")
            .await?;

        let login: LoginResponse = decode(&response, "login")?;
        Ok(login.into_officer(email))
    }

    async fn list_farms(&self, status: FarmStatus) -> Result<Vec<Farm>> {
        self.list_by_status(StatusFilter::Farm(status)).await
    }

    async fn list_claims(&self, status: ClaimStatus) -> Result<Vec<Claim>> {
        self.list_by_status(StatusFilter::Claim(status)).await
    }

    async fn verify_farm(&self, farm_id: &str) -> Result<()> {
        let url = self.endpoint(&["verifyFarm", farm_id])?;
        debug!("Verifying farm {}", farm_id);
        self.execute(self.client.post(url), "verify-farm").await?;
        Ok(())
    }

    async fn decide_claim(&self, claim_id: &str, decision: &ClaimDecision) -> Result<()> {
        let request = match decision {
            ClaimDecision::Approve { payout_amount } => {
                let url = self.endpoint(&["approveClaim"])?;
                self.client.post(url).json(&ApproveClaimRequest {
                    claim_id: claim_id.to_string(),
                    payout_amount: *payout_amount,
                })
            }
            ClaimDecision::Reject { reason } => {
                let url = self.endpoint(&["rejectClaim"])?;
                self.client.post(url).json(&RejectClaimRequest {
                    claim_id: claim_id.to_string(),
                    reason_for_rejection: reason.clone(),
                })
            }
        };

        debug!("Submitting {} decision for claim {}", decision.kind(), claim_id);
        self.execute(request, "claim-decision").await?;
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpPortalClient::new("http://localhost:3000/".to_string());
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert!(client.token().is_none());
    }

    #[test]
    fn test_token_can_be_replaced() {
        let client = HttpPortalClient::new("http://localhost:3000".to_string()).with_token("tok-1");
        assert_eq!(client.token().as_deref(), Some("tok-1"));

        client.set_token(Some("tok-2".to_string()));
        assert_eq!(client.token().as_deref(), Some("tok-2"));

        client.set_token(None);
        assert!(client.token().is_none());
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let client = HttpPortalClient::new("http://localhost:3000".to_string());
        let url = client.endpoint(&["verifyFarm", "FARM 1/a"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/verifyFarm/FARM%201%2Fa");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HttpPortalClient::new("http://gateway.local/api/".to_string());
        let url = client
            .endpoint(&["claims", "by-status", "FlaggedForReview"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://gateway.local/api/claims/by-status/FlaggedForReview"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = HttpPortalClient::new("not a url".to_string());
        assert!(matches!(
            client.endpoint(&["health"]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_decode_reports_shape_mismatch() {
        let result: Result<Vec<Farm>> = decode(r#"{"farms": []}"#, "farms");
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
