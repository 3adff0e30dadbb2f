//! Officer session: persisted identity plus the in-memory context views read

use krishi_common::{Error, Officer, Result};
use portal_client::PortalService;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::guard::Route;

/// Fixed key the session record is stored under
pub const SESSION_KEY: &str = "user";

/// On-disk home of the single session record
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", SESSION_KEY))
    }

    /// Read the persisted officer, if any
    ///
    /// An unreadable record is treated as signed out.
    pub fn load(&self) -> Result<Option<Officer>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str::<Officer>(&raw) {
            Ok(officer) => Ok(Some(officer)),
            Err(e) => {
                warn!("Ignoring unreadable session at {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    pub fn save(&self, officer: &Officer) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Session(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let json = serde_json::to_string_pretty(officer)?;
        write_file(&self.path(), &json)
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Session(format!(
                "cannot remove {}: {}",
                self.path().display(),
                e
            ))),
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .map_err(|e| Error::Session(format!("cannot write {}: {}", path.display(), e)))
}

/// Current session, injected into whatever needs the signed-in officer
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    officer: Option<Officer>,
}

impl SessionContext {
    /// Restore the session persisted by a previous run
    pub fn hydrate(store: SessionStore) -> Result<Self> {
        let officer = store.load()?;
        match &officer {
            Some(o) => debug!("Restored session for {}", o.email),
            None => debug!("No persisted session"),
        }
        Ok(Self { store, officer })
    }

    pub fn officer(&self) -> Option<&Officer> {
        self.officer.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.officer.is_some()
    }

    /// Sign in and persist the returned identity
    pub async fn login(
        &mut self,
        service: &dyn PortalService,
        email: &str,
        password: &str,
    ) -> Result<&Officer> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        let officer = service.login(email, password).await?;
        self.store.save(&officer)?;
        info!("Signed in as {} <{}>", officer.name, officer.email);

        Ok(&*self.officer.insert(officer))
    }

    /// Drop the session in memory and on disk; the caller navigates to the
    /// returned route.
    pub fn logout(&mut self) -> Result<Route> {
        self.store.clear()?;
        if let Some(officer) = self.officer.take() {
            info!("Signed out {}", officer.email);
        }
        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeService;

    #[test]
    fn test_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.load().unwrap().is_none());

        let officer = Officer::new("Asha Rao", "asha@agri.gov.in", "tok-1");
        store.save(&officer).unwrap();
        assert_eq!(store.path(), dir.path().join("user.json"));
        assert_eq!(store.load().unwrap(), Some(officer));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_record_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(store.path(), "{not json").unwrap();

        let ctx = SessionContext::hydrate(store).unwrap();
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_persists_and_logout_clears() {
        let dir = tempfile::tempdir().unwrap();
        let service = FakeService::new();

        let mut ctx = SessionContext::hydrate(SessionStore::new(dir.path())).unwrap();
        let officer = ctx
            .login(&service, " asha@agri.gov.in ", "secret")
            .await
            .unwrap();
        assert_eq!(officer.email, "asha@agri.gov.in");

        // a later run picks the session back up
        let restored = SessionContext::hydrate(SessionStore::new(dir.path())).unwrap();
        assert_eq!(restored.officer().unwrap().token, "tok-test");

        assert_eq!(ctx.logout().unwrap(), Route::Login);
        assert!(!ctx.is_authenticated());
        let restored = SessionContext::hydrate(SessionStore::new(dir.path())).unwrap();
        assert!(!restored.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let service = FakeService::new();
        let mut ctx = SessionContext::hydrate(SessionStore::new(dir.path())).unwrap();

        let err = ctx
            .login(&service, "asha@agri.gov.in", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(!ctx.is_authenticated());
        assert!(!SessionStore::new(dir.path()).path().exists());
    }

    #[tokio::test]
    async fn test_blank_credentials_skip_the_backend() {
        let dir = tempfile::tempdir().unwrap();
        let service = FakeService::new();
        let mut ctx = SessionContext::hydrate(SessionStore::new(dir.path())).unwrap();

        let err = ctx.login(&service, "  ", "secret").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(service.calls().is_empty());
    }
}
