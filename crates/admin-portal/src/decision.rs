//! Claim adjudication workflow
//!
//! ```text
//! Idle --open(Approve)--> ApproveModalOpen --submit(amount)--> Submitting
//! Idle --open(Reject)---> RejectModalOpen  --submit(reason)--> Submitting
//! Submitting --ok--> Idle (navigate to the claims dashboard)
//! Submitting --err-> the modal it came from
//! ApproveModalOpen | RejectModalOpen --cancel--> Idle
//! ```

use krishi_common::{Claim, ClaimDecision, DecisionKind, Error, Result};
use portal_client::PortalService;
use std::fmt;
use tracing::{info, warn};

use crate::guard::Route;

/// Claim carried from the dashboard row the officer opened
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimContext {
    pub claim: Claim,
}

impl ClaimContext {
    pub fn new(claim: Claim) -> Self {
        Self { claim }
    }

    /// Route the claim detail view lives at
    pub fn route(&self) -> Route {
        Route::ClaimDetail(self.claim.claim_id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    ApproveModalOpen,
    RejectModalOpen,
    Submitting(DecisionKind),
}

impl WorkflowState {
    fn modal(kind: DecisionKind) -> Self {
        match kind {
            DecisionKind::Approve => WorkflowState::ApproveModalOpen,
            DecisionKind::Reject => WorkflowState::RejectModalOpen,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::Idle => f.write_str("idle"),
            WorkflowState::ApproveModalOpen => f.write_str("the approve dialog is open"),
            WorkflowState::RejectModalOpen => f.write_str("the reject dialog is open"),
            WorkflowState::Submitting(kind) => write!(f, "submitting a {} decision", kind),
        }
    }
}

/// Accepted decision and where to go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub decision: ClaimDecision,
    pub next: Route,
}

/// Parse a payout amount typed by the officer
///
/// The backend stores amounts as signed 64-bit integers, so anything above
/// `i64::MAX` is refused here rather than sent.
pub fn parse_payout(input: &str) -> Result<u64> {
    match input.trim().parse::<u64>() {
        Ok(amount) if amount > 0 && amount <= i64::MAX as u64 => Ok(amount),
        _ => Err(Error::Validation(
            "Please provide a valid payout amount.".to_string(),
        )),
    }
}

/// Validate a rejection reason typed by the officer
pub fn parse_reason(input: &str) -> Result<String> {
    let reason = input.trim();
    if reason.is_empty() {
        return Err(Error::Validation(
            "Please provide a rejection reason.".to_string(),
        ));
    }
    Ok(reason.to_string())
}

/// Approve/reject state machine for one claim
#[derive(Debug)]
pub struct DecisionWorkflow {
    claim: Claim,
    state: WorkflowState,
    banner: Option<String>,
}

impl DecisionWorkflow {
    /// Enter claim detail with the claim carried forward from the list
    ///
    /// There is no fetch-by-id; without a carried claim the view cannot
    /// render and the officer has to go back to the dashboard.
    pub fn enter(context: Option<ClaimContext>) -> Result<Self> {
        let context = context.ok_or_else(|| {
            Error::MissingContext(
                "No claim data found. Go back to the claims dashboard and open a claim."
                    .to_string(),
            )
        })?;

        Ok(Self {
            claim: context.claim,
            state: WorkflowState::Idle,
            banner: None,
        })
    }

    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Last validation or submission error shown to the officer
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    fn invalid(&self, event: &str) -> Error {
        Error::InvalidTransition {
            state: self.state.to_string(),
            event: event.to_string(),
        }
    }

    /// Open the approve or reject dialog
    pub fn open(&mut self, kind: DecisionKind) -> Result<()> {
        if self.state != WorkflowState::Idle {
            return Err(self.invalid(&format!("open the {} dialog", kind)));
        }
        self.banner = None;
        self.state = WorkflowState::modal(kind);
        Ok(())
    }

    /// Close the open dialog without sending anything
    pub fn cancel(&mut self) -> Result<()> {
        match self.state {
            WorkflowState::ApproveModalOpen | WorkflowState::RejectModalOpen => {
                self.banner = None;
                self.state = WorkflowState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("cancel")),
        }
    }

    /// Turn the dialog input into a decision for the open dialog
    pub fn validate(&self, input: &str) -> Result<ClaimDecision> {
        match self.state {
            WorkflowState::ApproveModalOpen => Ok(ClaimDecision::Approve {
                payout_amount: parse_payout(input)?,
            }),
            WorkflowState::RejectModalOpen => Ok(ClaimDecision::Reject {
                reason: parse_reason(input)?,
            }),
            _ => Err(self.invalid("submit")),
        }
    }

    /// Validate the dialog input and send exactly one decision request
    ///
    /// Invalid input never reaches the service. On failure the dialog stays
    /// open with the error in [`banner`](Self::banner); nothing is retried.
    pub async fn submit(&mut self, service: &dyn PortalService, input: &str) -> Result<Submitted> {
        let decision = match self.validate(input) {
            Ok(decision) => decision,
            Err(e) => {
                if matches!(e, Error::Validation(_)) {
                    self.banner = Some(e.user_message());
                }
                return Err(e);
            }
        };

        let kind = decision.kind();
        self.banner = None;
        self.state = WorkflowState::Submitting(kind);

        match service.decide_claim(&self.claim.claim_id, &decision).await {
            Ok(()) => {
                info!("Claim {}: {} accepted", self.claim.claim_id, kind);
                self.state = WorkflowState::Idle;
                Ok(Submitted {
                    decision,
                    next: Route::ClaimsDashboard,
                })
            }
            Err(e) => {
                warn!("Claim {}: {} failed: {}", self.claim.claim_id, kind, e);
                self.state = WorkflowState::modal(kind);
                self.banner = Some(format!("Failed to {} claim. {}", kind, e.user_message()));
                Err(e)
            }
        }
    }
}
