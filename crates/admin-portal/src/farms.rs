//! Farm verification view

use krishi_common::{Error, Farm, FarmStatus, Result};
use portal_client::PortalService;
use tracing::{info, warn};

use crate::list_view::{ListState, ListView};

/// Pending farms with a per-row verify action
#[derive(Debug)]
pub struct FarmVerification {
    list: ListView<Farm>,
    verifying: Option<String>,
    alert: Option<String>,
}

impl Default for FarmVerification {
    fn default() -> Self {
        Self::new()
    }
}

impl FarmVerification {
    pub fn new() -> Self {
        Self {
            list: ListView::new(FarmStatus::PendingVerification),
            verifying: None,
            alert: None,
        }
    }

    /// Fetch the pending farms
    pub async fn load(&mut self, service: &dyn PortalService) -> Result<&[Farm]> {
        self.list.load(service).await
    }

    /// Verify the farm on one of the listed rows, then refetch the list
    ///
    /// Only rows currently shown can be acted on. A failure is reported as an
    /// alert and leaves the list as it was.
    pub async fn verify(&mut self, service: &dyn PortalService, farm_id: &str) -> Result<()> {
        if self.list.find(farm_id).is_none() {
            // the row may be missing only because the list never loaded
            if let Some(e) = self.list.failure() {
                return Err(e.duplicate());
            }
            return Err(Error::Validation(format!(
                "Farm {} is not in the pending verification list.",
                farm_id
            )));
        }

        self.alert = None;
        self.verifying = Some(farm_id.to_string());
        let result = service.verify_farm(farm_id).await;
        self.verifying = None;

        match result {
            Ok(()) => {
                info!("Farm {} verified", farm_id);
                // a failed refetch is rendered by the list itself
                let _ = self.list.load(service).await;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to verify farm {}: {}", farm_id, e);
                self.alert = Some(format!("Failed to verify Farm {}. {}", farm_id, e.user_message()));
                Err(e)
            }
        }
    }

    /// True while a verify request for this row is in flight
    pub fn is_verifying(&self, farm_id: &str) -> bool {
        self.verifying.as_deref() == Some(farm_id)
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn state(&self) -> ListState<'_, Farm> {
        self.list.state()
    }

    pub fn farms(&self) -> &[Farm] {
        self.list.items()
    }
}
