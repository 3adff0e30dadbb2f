//! Domain records shared by the portal, its service client and the mock backend
//!
//! Field names on the wire follow the backend's JSON (`farmID`, `claimID`,
//! `NDVIValue`, ...); the Rust side uses snake_case.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The signed-in officer, as returned by `/loginGov`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,

    pub email: String,

    /// Opaque bearer token issued by the backend
    pub token: String,

    /// Any further fields the backend returned; kept so the persisted
    /// session carries the full login payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Officer {
    pub fn new(name: impl Into<String>, email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            token: token.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Farm verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FarmStatus {
    PendingVerification,
    Verified,
}

impl FarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmStatus::PendingVerification => "PendingVerification",
            FarmStatus::Verified => "Verified",
        }
    }
}

impl fmt::Display for FarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FarmStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PendingVerification" => Ok(FarmStatus::PendingVerification),
            "Verified" => Ok(FarmStatus::Verified),
            other => Err(Error::Validation(format!("unknown farm status: {}", other))),
        }
    }
}

/// Claim adjudication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    FlaggedForReview,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::FlaggedForReview => "FlaggedForReview",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }

    /// Approved and Rejected claims cannot change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClaimStatus::FlaggedForReview)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FlaggedForReview" => Ok(ClaimStatus::FlaggedForReview),
            "Approved" => Ok(ClaimStatus::Approved),
            "Rejected" => Ok(ClaimStatus::Rejected),
            other => Err(Error::Validation(format!("unknown claim status: {}", other))),
        }
    }
}

/// A registered farm awaiting (or past) officer verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    #[serde(rename = "farmID")]
    pub farm_id: String,

    #[serde(rename = "ownerFarmerID")]
    pub owner_farmer_id: String,

    #[serde(rename = "cropType")]
    pub crop_type: String,

    /// Link to the land record document
    #[serde(rename = "landRecordHash")]
    pub land_record_hash: String,

    pub status: FarmStatus,
}

/// A farmer's calamity claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "claimID")]
    pub claim_id: String,

    #[serde(rename = "farmerID")]
    pub farmer_id: String,

    #[serde(rename = "farmID")]
    pub farm_id: String,

    #[serde(rename = "calamityType")]
    pub calamity_type: String,

    #[serde(rename = "dateOfCalamity")]
    pub date_of_calamity: String,

    #[serde(rename = "NDVIValue")]
    pub ndvi_value: f64,

    #[serde(rename = "damagePercentage")]
    pub damage_percentage: f64,

    #[serde(rename = "satelliteDataHash")]
    pub satellite_data_hash: String,

    /// Link to the evidence the farmer uploaded
    #[serde(rename = "evidenceHash")]
    pub evidence_hash: String,

    pub status: ClaimStatus,

    #[serde(rename = "payoutAmount", default, skip_serializing_if = "Option::is_none")]
    pub payout_amount: Option<u64>,

    #[serde(
        rename = "reasonForRejection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reason_for_rejection: Option<String>,
}

/// Which adjudication an officer is making
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    Approve,
    Reject,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionKind::Approve => f.write_str("approve"),
            DecisionKind::Reject => f.write_str("reject"),
        }
    }
}

/// A validated decision on a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    Approve { payout_amount: u64 },
    Reject { reason: String },
}

impl ClaimDecision {
    pub fn kind(&self) -> DecisionKind {
        match self {
            ClaimDecision::Approve { .. } => DecisionKind::Approve,
            ClaimDecision::Reject { .. } => DecisionKind::Reject,
        }
    }

    /// The status a claim ends in once this decision is accepted
    pub fn resulting_status(&self) -> ClaimStatus {
        match self {
            ClaimDecision::Approve { .. } => ClaimStatus::Approved,
            ClaimDecision::Reject { .. } => ClaimStatus::Rejected,
        }
    }
}
