//! In-process stand-in for the backend, for unit tests

use async_trait::async_trait;
use krishi_common::{
    Claim, ClaimDecision, ClaimStatus, Error, Farm, FarmStatus, Officer, Result,
};
use portal_client::PortalService;
use std::sync::Mutex;

/// A request the fake received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    ListFarms(FarmStatus),
    ListClaims(ClaimStatus),
    VerifyFarm(String),
    DecideClaim(String, ClaimDecision),
}

#[derive(Default)]
struct State {
    farms: Vec<Farm>,
    claims: Vec<Claim>,
    calls: Vec<Call>,
    offline: bool,
    reject_decisions: Option<String>,
    token: Option<String>,
}

/// Records every call and applies the same status rules as the backend
#[derive(Default)]
pub struct FakeService {
    state: Mutex<State>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_farms(self, farms: Vec<Farm>) -> Self {
        self.state.lock().unwrap().farms = farms;
        self
    }

    pub fn with_claims(self, claims: Vec<Claim>) -> Self {
        self.state.lock().unwrap().claims = claims;
        self
    }

    /// Fail every request with a network error
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Fail claim decisions with a server error carrying this message
    pub fn reject_decisions(&self, message: &str) {
        self.state.lock().unwrap().reject_decisions = Some(message.to_string());
    }

    /// Credential the portal last handed over
    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than list reads
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::VerifyFarm(_) | Call::DecideClaim(..)))
            .collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.offline {
            return Err(Error::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PortalService for FakeService {
    async fn login(&self, email: &str, password: &str) -> Result<Officer> {
        self.record(Call::Login(email.to_string()))?;
        if password != "secret" {
            return Err(Error::Server {
                status: 401,
                message: "Invalid email or password".to_string(),
            });
        }
        Ok(Officer::new("Asha Rao", email, "tok-test"))
    }

    async fn list_farms(&self, status: FarmStatus) -> Result<Vec<Farm>> {
        self.record(Call::ListFarms(status))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .farms
            .iter()
            .filter(|f| f.status == status)
            .cloned()
            .collect())
    }

    async fn list_claims(&self, status: ClaimStatus) -> Result<Vec<Claim>> {
        self.record(Call::ListClaims(status))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .claims
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect())
    }

    async fn verify_farm(&self, farm_id: &str) -> Result<()> {
        self.record(Call::VerifyFarm(farm_id.to_string()))?;
        let mut state = self.state.lock().unwrap();
        match state.farms.iter_mut().find(|f| f.farm_id == farm_id) {
            Some(farm) if farm.status == FarmStatus::PendingVerification => {
                farm.status = FarmStatus::Verified;
                Ok(())
            }
            _ => Err(Error::Server {
                status: 409,
                message: format!("Farm {} cannot be verified", farm_id),
            }),
        }
    }

    async fn decide_claim(&self, claim_id: &str, decision: &ClaimDecision) -> Result<()> {
        self.record(Call::DecideClaim(claim_id.to_string(), decision.clone()))?;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.reject_decisions.clone() {
            return Err(Error::Server {
                status: 500,
                message,
            });
        }
        match state.claims.iter_mut().find(|c| c.claim_id == claim_id) {
            Some(claim) if claim.status == ClaimStatus::FlaggedForReview => {
                claim.status = decision.resulting_status();
                Ok(())
            }
            _ => Err(Error::Server {
                status: 409,
                message: format!("Claim {} is not flagged for review", claim_id),
            }),
        }
    }

    fn set_token(&self, token: Option<String>) {
        self.state.lock().unwrap().token = token;
    }
}

pub fn farm(id: &str) -> Farm {
    Farm {
        farm_id: id.to_string(),
        owner_farmer_id: format!("owner-of-{}", id),
        crop_type: "Wheat".to_string(),
        land_record_hash: format!("https://records.example/{}", id),
        status: FarmStatus::PendingVerification,
    }
}

pub fn claim(id: &str) -> Claim {
    Claim {
        claim_id: id.to_string(),
        farmer_id: "FMR-1".to_string(),
        farm_id: "FARM-1".to_string(),
        calamity_type: "Flood".to_string(),
        date_of_calamity: "2025-08-14".to_string(),
        ndvi_value: 0.2,
        damage_percentage: 70.0,
        satellite_data_hash: "sat-hash".to_string(),
        evidence_hash: "https://evidence.example/1".to_string(),
        status: ClaimStatus::FlaggedForReview,
        payout_amount: None,
        reason_for_rejection: None,
    }
}
