//! Audit trail for officer actions

use chrono::{DateTime, Utc};
use krishi_common::ClaimDecision;
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    VerifyFarm,
    ApproveClaim,
    RejectClaim,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::VerifyFarm => f.write_str("verify_farm"),
            AuditAction::ApproveClaim => f.write_str("approve_claim"),
            AuditAction::RejectClaim => f.write_str("reject_claim"),
        }
    }
}

/// One recorded officer action
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,

    pub action: AuditAction,

    /// Farm or claim the action applied to
    pub target_id: String,

    pub details: String,

    pub officer_email: String,

    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(action: AuditAction, target_id: &str, details: String, officer_email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            target_id: target_id.to_string(),
            details,
            officer_email: officer_email.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn farm_verified(farm_id: &str, officer_email: &str) -> Self {
        Self::new(
            AuditAction::VerifyFarm,
            farm_id,
            "Farm verified".to_string(),
            officer_email,
        )
    }

    pub fn claim_decided(claim_id: &str, decision: &ClaimDecision, officer_email: &str) -> Self {
        match decision {
            ClaimDecision::Approve { payout_amount } => Self::new(
                AuditAction::ApproveClaim,
                claim_id,
                format!("Payout amount: {}", payout_amount),
                officer_email,
            ),
            ClaimDecision::Reject { reason } => Self::new(
                AuditAction::RejectClaim,
                claim_id,
                format!("Reason: {}", reason),
                officer_email,
            ),
        }
    }
}

/// Destination for audit entries
///
/// Recording is best effort: callers log a failed record and carry on.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()>;
}

/// Writes entries as structured events on the `audit` tracing target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        info!(
            target: "audit",
            id = %entry.id,
            action = %entry.action,
            target_id = %entry.target_id,
            officer = %entry.officer_email,
            timestamp = %entry.timestamp.to_rfc3339(),
            "{}",
            entry.details
        );
        Ok(())
    }
}

/// Keeps entries in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("audit log lock poisoned"))?
            .push(entry.clone());
        Ok(())
    }
}
