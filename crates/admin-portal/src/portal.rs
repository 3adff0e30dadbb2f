//! Portal facade
//!
//! Mounts views through the navigation guard, runs the officer's actions and
//! takes care of what follows a successful write: an audit entry and a
//! refetch of the list the action came from.

use krishi_common::{Error, Officer, Result};
use portal_client::PortalService;
use std::sync::Arc;
use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditSink};
use crate::claims::ClaimsDashboard;
use crate::decision::{ClaimContext, DecisionWorkflow, Submitted};
use crate::farms::FarmVerification;
use crate::guard::{authorize, Access, Route};
use crate::session::SessionContext;

pub struct Portal {
    service: Arc<dyn PortalService>,
    session: SessionContext,
    audit: Arc<dyn AuditSink>,
}

impl Portal {
    pub fn new(
        service: Arc<dyn PortalService>,
        session: SessionContext,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        // a session restored from disk keeps authenticating requests
        service.set_token(session.officer().map(|officer| officer.token.clone()));
        Self {
            service,
            session,
            audit,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn authorize(&self, route: &Route) -> Access {
        authorize(self.session.officer(), route)
    }

    /// Officer allowed to enter `route`, or `Unauthenticated` when the guard
    /// redirects to the login page.
    fn require(&self, route: &Route) -> Result<&Officer> {
        match (self.authorize(route), self.session.officer()) {
            (Access::Allow, Some(officer)) => Ok(officer),
            _ => {
                info!("Redirecting {} to {}", route, Route::Login);
                Err(Error::Unauthenticated)
            }
        }
    }

    fn audit(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.record(&entry) {
            warn!("Failed to record audit entry for {}: {:#}", entry.target_id, e);
        }
    }

    /// Sign in; on success the portal lands on farm verification
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Route> {
        let officer = self
            .session
            .login(self.service.as_ref(), email, password)
            .await?;
        self.service.set_token(Some(officer.token.clone()));
        Ok(Route::FarmVerification)
    }

    pub fn logout(&mut self) -> Result<Route> {
        let next = self.session.logout()?;
        self.service.set_token(None);
        Ok(next)
    }

    /// Mount the farm verification view
    ///
    /// A failed load is part of the view's state, not an error here.
    pub async fn farm_verification(&self) -> Result<FarmVerification> {
        self.require(&Route::FarmVerification)?;
        let mut view = FarmVerification::new();
        let _ = view.load(self.service.as_ref()).await;
        Ok(view)
    }

    pub async fn verify_farm(&self, view: &mut FarmVerification, farm_id: &str) -> Result<()> {
        let officer = self.require(&Route::FarmVerification)?;
        view.verify(self.service.as_ref(), farm_id).await?;
        self.audit(AuditEntry::farm_verified(farm_id, &officer.email));
        Ok(())
    }

    /// Mount the claims dashboard
    pub async fn claims_dashboard(&self) -> Result<ClaimsDashboard> {
        self.require(&Route::ClaimsDashboard)?;
        let mut dashboard = ClaimsDashboard::new();
        let _ = dashboard.load(self.service.as_ref()).await;
        Ok(dashboard)
    }

    /// Mount claim detail with the claim carried from the dashboard
    pub fn claim_detail(&self, context: Option<ClaimContext>) -> Result<DecisionWorkflow> {
        let route = context
            .as_ref()
            .map(ClaimContext::route)
            .unwrap_or(Route::ClaimsDashboard);
        self.require(&route)?;
        DecisionWorkflow::enter(context)
    }

    /// Submit the open dialog; on success the dashboard is refetched
    pub async fn submit_decision(
        &self,
        workflow: &mut DecisionWorkflow,
        dashboard: &mut ClaimsDashboard,
        input: &str,
    ) -> Result<Submitted> {
        let officer = self.require(&Route::ClaimDetail(workflow.claim().claim_id.clone()))?;
        let submitted = workflow.submit(self.service.as_ref(), input).await?;

        self.audit(AuditEntry::claim_decided(
            &workflow.claim().claim_id,
            &submitted.decision,
            &officer.email,
        ));

        let _ = dashboard.load(self.service.as_ref()).await;
        Ok(submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, MemoryAuditSink};
    use crate::session::SessionStore;
    use crate::testing::{claim, farm, Call, FakeService};
    use krishi_common::{ClaimStatus, DecisionKind};

    struct Harness {
        portal: Portal,
        service: Arc<FakeService>,
        audit: Arc<MemoryAuditSink>,
        _dir: tempfile::TempDir,
    }

    async fn signed_in(service: FakeService) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(service);
        let audit = Arc::new(MemoryAuditSink::new());
        let session = SessionContext::hydrate(SessionStore::new(dir.path())).unwrap();

        let mut portal = Portal::new(service.clone(), session, audit.clone());
        let landing = portal.login("asha@agri.gov.in", "secret").await.unwrap();
        assert_eq!(landing, Route::FarmVerification);

        Harness {
            portal,
            service,
            audit,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_signed_out_views_render_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(FakeService::new().with_claims(vec![claim("C1")]));
        let session = SessionContext::hydrate(SessionStore::new(dir.path())).unwrap();
        let portal = Portal::new(service.clone(), session, Arc::new(MemoryAuditSink::new()));

        assert!(matches!(
            portal.claims_dashboard().await,
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            portal.farm_verification().await,
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            portal.claim_detail(Some(ClaimContext::new(claim("C1")))),
            Err(Error::Unauthenticated)
        ));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_approve_flow_refetches_and_audits() {
        let h = signed_in(FakeService::new().with_claims(vec![claim("C1"), claim("C2")])).await;

        let mut dashboard = h.portal.claims_dashboard().await.unwrap();
        assert_eq!(dashboard.claims().len(), 2);

        let mut workflow = h.portal.claim_detail(dashboard.open_claim("C1")).unwrap();
        workflow.open(DecisionKind::Approve).unwrap();
        let submitted = h
            .portal
            .submit_decision(&mut workflow, &mut dashboard, "5000")
            .await
            .unwrap();

        assert_eq!(submitted.next, Route::ClaimsDashboard);
        assert!(dashboard.claims().iter().all(|c| c.claim_id != "C1"));
        assert_eq!(
            h.service.calls().last(),
            Some(&Call::ListClaims(ClaimStatus::FlaggedForReview))
        );

        let entries = h.audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::ApproveClaim);
        assert_eq!(entries[0].officer_email, "asha@agri.gov.in");
    }

    #[tokio::test]
    async fn test_failed_decision_is_not_audited() {
        let h = signed_in(FakeService::new().with_claims(vec![claim("C1")])).await;
        h.service.reject_decisions("backend down");

        let mut dashboard = h.portal.claims_dashboard().await.unwrap();
        let mut workflow = h.portal.claim_detail(dashboard.open_claim("C1")).unwrap();
        workflow.open(DecisionKind::Approve).unwrap();

        assert!(h
            .portal
            .submit_decision(&mut workflow, &mut dashboard, "100")
            .await
            .is_err());
        assert!(h.audit.entries().is_empty());
        assert_eq!(dashboard.claims().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_farm_is_audited() {
        let h = signed_in(FakeService::new().with_farms(vec![farm("F1")])).await;

        let mut view = h.portal.farm_verification().await.unwrap();
        h.portal.verify_farm(&mut view, "F1").await.unwrap();

        assert!(view.farms().is_empty());
        assert_eq!(h.audit.entries()[0].action, AuditAction::VerifyFarm);
    }

    #[tokio::test]
    async fn test_missing_claim_context() {
        let h = signed_in(FakeService::new()).await;
        let err = h.portal.claim_detail(None).unwrap_err();
        assert!(matches!(err, Error::MissingContext(_)));
    }

    #[tokio::test]
    async fn test_token_follows_session() {
        let mut h = signed_in(FakeService::new()).await;
        assert_eq!(h.service.token().as_deref(), Some("tok-test"));

        h.portal.logout().unwrap();
        assert!(h.service.token().is_none());
    }

    #[test]
    fn test_restored_session_hands_token_to_service() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store
            .save(&Officer::new("Asha Rao", "asha@agri.gov.in", "tok-saved"))
            .unwrap();

        let service = Arc::new(FakeService::new());
        let _portal = Portal::new(
            service.clone(),
            SessionContext::hydrate(store).unwrap(),
            Arc::new(MemoryAuditSink::new()),
        );
        assert_eq!(service.token().as_deref(), Some("tok-saved"));
    }

    #[tokio::test]
    async fn test_logout_locks_views() {
        let mut h = signed_in(FakeService::new()).await;
        assert_eq!(h.portal.logout().unwrap(), Route::Login);
        assert!(matches!(
            h.portal.claims_dashboard().await,
            Err(Error::Unauthenticated)
        ));
    }
}
