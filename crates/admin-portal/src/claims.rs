//! Claims dashboard

use krishi_common::{Claim, ClaimStatus, Result};
use portal_client::PortalService;

use crate::decision::ClaimContext;
use crate::list_view::{ListState, ListView};

/// Summary cards above the claims table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub pending_review: usize,
    pub total_flagged: usize,
}

/// Claims flagged for review
///
/// The backend filters by status, so every row here is awaiting a decision.
#[derive(Debug)]
pub struct ClaimsDashboard {
    list: ListView<Claim>,
}

impl Default for ClaimsDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsDashboard {
    pub fn new() -> Self {
        Self {
            list: ListView::new(ClaimStatus::FlaggedForReview),
        }
    }

    pub async fn load(&mut self, service: &dyn PortalService) -> Result<&[Claim]> {
        self.list.load(service).await
    }

    pub fn summary(&self) -> DashboardSummary {
        let claims = self.list.items();
        DashboardSummary {
            pending_review: claims
                .iter()
                .filter(|c| c.status == ClaimStatus::FlaggedForReview)
                .count(),
            total_flagged: claims.len(),
        }
    }

    /// Row click: carry the listed claim into the detail view
    pub fn open_claim(&self, claim_id: &str) -> Option<ClaimContext> {
        self.list.find(claim_id).cloned().map(ClaimContext::new)
    }

    pub fn state(&self) -> ListState<'_, Claim> {
        self.list.state()
    }

    pub fn claims(&self) -> &[Claim] {
        self.list.items()
    }
}
