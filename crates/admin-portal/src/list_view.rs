//! Status-filtered list view controller
//!
//! A list view owns one fetched collection and the loading/error state around
//! it. It never patches rows locally: after a write succeeds the owner calls
//! [`ListView::load`] again and renders whatever the backend now returns.

use async_trait::async_trait;
use krishi_common::{Claim, ClaimStatus, Error, Farm, FarmStatus, Result};
use portal_client::PortalService;
use std::fmt;
use tracing::{debug, warn};

/// Records that can be listed by status
#[async_trait]
pub trait Listing: Clone + fmt::Debug + Send + Sync + 'static {
    type Status: Copy + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Plural name used in messages ("farms", "claims")
    const NOUN: &'static str;

    /// Row identity
    fn key(&self) -> &str;

    async fn fetch(service: &dyn PortalService, status: Self::Status) -> Result<Vec<Self>>;
}

#[async_trait]
impl Listing for Farm {
    type Status = FarmStatus;
    const NOUN: &'static str = "farms";

    fn key(&self) -> &str {
        &self.farm_id
    }

    async fn fetch(service: &dyn PortalService, status: FarmStatus) -> Result<Vec<Self>> {
        service.list_farms(status).await
    }
}

#[async_trait]
impl Listing for Claim {
    type Status = ClaimStatus;
    const NOUN: &'static str = "claims";

    fn key(&self) -> &str {
        &self.claim_id
    }

    async fn fetch(service: &dyn PortalService, status: ClaimStatus) -> Result<Vec<Self>> {
        service.list_claims(status).await
    }
}

/// What the view should show right now
#[derive(Debug, PartialEq)]
pub enum ListState<'a, T> {
    Loading,
    Failed(&'a str),
    Empty,
    Rows(&'a [T]),
}

/// Controller for one status-filtered collection
#[derive(Debug)]
pub struct ListView<T: Listing> {
    status: T::Status,
    items: Vec<T>,
    loading: bool,
    loaded: bool,
    error: Option<String>,
    failure: Option<Error>,
}

impl<T: Listing> ListView<T> {
    pub fn new(status: T::Status) -> Self {
        Self {
            status,
            items: Vec::new(),
            loading: false,
            loaded: false,
            error: None,
            failure: None,
        }
    }

    /// Fetch the collection for this view's status filter
    ///
    /// On failure the previous rows are kept and a user-facing message is
    /// stored for rendering.
    pub async fn load(&mut self, service: &dyn PortalService) -> Result<&[T]> {
        self.loading = true;
        self.error = None;
        self.failure = None;

        let result = T::fetch(service, self.status).await;
        self.loading = false;

        match result {
            Ok(items) => {
                debug!("Loaded {} {} with status {}", items.len(), T::NOUN, self.status);
                self.items = items;
                self.loaded = true;
                Ok(&self.items)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", T::NOUN, e);
                self.error = Some(format!("Failed to load {}. {}", T::NOUN, e.user_message()));
                self.failure = Some(e.duplicate());
                Err(e)
            }
        }
    }

    pub fn state(&self) -> ListState<'_, T> {
        if self.loading || (!self.loaded && self.error.is_none()) {
            ListState::Loading
        } else if let Some(error) = &self.error {
            ListState::Failed(error)
        } else if self.items.is_empty() {
            ListState::Empty
        } else {
            ListState::Rows(&self.items)
        }
    }

    pub fn status(&self) -> T::Status {
        self.status
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Error from the most recent load, if it failed
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
