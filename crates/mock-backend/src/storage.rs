//! In-memory storage for farms, claims and officer accounts

use krishi_common::{Claim, ClaimDecision, ClaimStatus, Farm, FarmStatus, Officer};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Result of a status transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The record moved to its new status
    Applied,
    /// No record with that id
    NotFound,
    /// The record exists but is not in a state that allows the transition
    Conflict(String),
}

struct Account {
    name: String,
    password: String,
}

/// Storage backend for the mock service
#[derive(Default)]
pub struct Storage {
    farms: BTreeMap<String, Farm>,
    claims: BTreeMap<String, Claim>,
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, String>,
}

impl Storage {
    /// Create an empty storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with a demo officer and a handful of records
    pub fn with_demo_data() -> Self {
        let mut storage = Self::new();
        storage.register_officer("officer@krishi.gov.in", "suraksha123", "Asha Rao");

        for (id, farmer, crop, status) in [
            ("FARM-101", "FMR-11", "Wheat", FarmStatus::PendingVerification),
            ("FARM-102", "FMR-12", "Paddy", FarmStatus::PendingVerification),
            ("FARM-103", "FMR-13", "Cotton", FarmStatus::Verified),
        ] {
            storage.insert_farm(Farm {
                farm_id: id.to_string(),
                owner_farmer_id: farmer.to_string(),
                crop_type: crop.to_string(),
                land_record_hash: format!("https://records.krishi.gov.in/land/{}", id),
                status,
            });
        }

        for (id, farmer, farm, calamity, ndvi, damage) in [
            ("CLM-201", "FMR-11", "FARM-101", "Flood", 0.18, 72.5),
            ("CLM-202", "FMR-12", "FARM-102", "Drought", 0.31, 48.0),
            ("CLM-203", "FMR-13", "FARM-103", "Hailstorm", 0.27, 55.0),
        ] {
            storage.insert_claim(Claim {
                claim_id: id.to_string(),
                farmer_id: farmer.to_string(),
                farm_id: farm.to_string(),
                calamity_type: calamity.to_string(),
                date_of_calamity: "2025-08-14".to_string(),
                ndvi_value: ndvi,
                damage_percentage: damage,
                satellite_data_hash: format!("sentinel2-{}", id.to_lowercase()),
                evidence_hash: format!("https://evidence.krishi.gov.in/{}", id),
                status: ClaimStatus::FlaggedForReview,
                payout_amount: None,
                reason_for_rejection: None,
            });
        }

        info!(
            "Seeded demo data: {} farms, {} claims",
            storage.farms.len(),
            storage.claims.len()
        );
        storage
    }

    /// Add an officer account
    pub fn register_officer(&mut self, email: &str, password: &str, name: &str) {
        self.accounts.insert(
            email.to_string(),
            Account {
                name: name.to_string(),
                password: password.to_string(),
            },
        );
    }

    /// Check credentials and open a session
    ///
    /// An officer holds one session at a time; signing in again retires the
    /// previous token.
    pub fn login(&mut self, email: &str, password: &str) -> Option<Officer> {
        let account = self.accounts.get(email)?;
        if account.password != password {
            debug!("Password mismatch for {}", email);
            return None;
        }

        self.sessions.retain(|_, owner| owner != email);
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), email.to_string());
        Some(Officer::new(account.name.clone(), email, token))
    }

    /// Officer email for a session token
    pub fn session_email(&self, token: &str) -> Option<&str> {
        self.sessions.get(token).map(String::as_str)
    }

    pub fn insert_farm(&mut self, farm: Farm) {
        self.farms.insert(farm.farm_id.clone(), farm);
    }

    pub fn insert_claim(&mut self, claim: Claim) {
        self.claims.insert(claim.claim_id.clone(), claim);
    }

    pub fn farm(&self, farm_id: &str) -> Option<&Farm> {
        self.farms.get(farm_id)
    }

    pub fn claim(&self, claim_id: &str) -> Option<&Claim> {
        self.claims.get(claim_id)
    }

    /// Farms with the given status, ordered by id
    pub fn farms_by_status(&self, status: FarmStatus) -> Vec<Farm> {
        self.farms
            .values()
            .filter(|f| f.status == status)
            .cloned()
            .collect()
    }

    /// Claims with the given status, ordered by id
    pub fn claims_by_status(&self, status: ClaimStatus) -> Vec<Claim> {
        self.claims
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    /// Move a farm from PendingVerification to Verified
    pub fn verify_farm(&mut self, farm_id: &str) -> Transition {
        let Some(farm) = self.farms.get_mut(farm_id) else {
            return Transition::NotFound;
        };

        if farm.status != FarmStatus::PendingVerification {
            return Transition::Conflict(format!("Farm {} is already {}", farm_id, farm.status));
        }

        farm.status = FarmStatus::Verified;
        info!("Verified farm: {}", farm_id);
        Transition::Applied
    }

    /// Apply an officer's decision to a claim that is flagged for review
    pub fn decide_claim(&mut self, claim_id: &str, decision: &ClaimDecision) -> Transition {
        let Some(claim) = self.claims.get_mut(claim_id) else {
            return Transition::NotFound;
        };

        if claim.status != ClaimStatus::FlaggedForReview {
            return Transition::Conflict(format!(
                "Claim {} is {} and cannot be decided again",
                claim_id, claim.status
            ));
        }

        match decision {
            ClaimDecision::Approve { payout_amount } => {
                claim.payout_amount = Some(*payout_amount);
            }
            ClaimDecision::Reject { reason } => {
                claim.reason_for_rejection = Some(reason.clone());
            }
        }
        claim.status = decision.resulting_status();

        info!("Claim {} -> {}", claim_id, claim.status);
        Transition::Applied
    }
}
