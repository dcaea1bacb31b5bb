//! Password-gated admin session.
//!
//! # Responsibility
//! - Verify the admin password and persist an "authenticated" marker so the
//!   session survives restarts, mirroring browser-session behavior.
//!
//! # Invariants
//! - Password comparison is constant-time.
//! - With no configured password, every login attempt fails.

use crate::repo::kv_repo::{KvResult, KvStore};
use log::{info, warn};
use subtle::ConstantTimeEq;

/// Storage key for the session marker.
pub const ADMIN_SESSION_KEY: &str = "admin_session";
const AUTHENTICATED: &str = "authenticated";

pub struct AdminSession<S> {
    kv: S,
    password: Option<String>,
}

impl<S: KvStore> AdminSession<S> {
    /// Creates a session guard. Empty passwords count as unconfigured.
    pub fn new(kv: S, password: Option<String>) -> Self {
        let password = password.filter(|value| !value.is_empty());
        Self { kv, password }
    }

    /// Returns `Ok(true)` and persists the marker when `candidate` matches.
    pub fn login(&self, candidate: &str) -> KvResult<bool> {
        let Some(expected) = self.password.as_deref() else {
            warn!("event=admin_login module=session status=rejected reason=no_password_configured");
            return Ok(false);
        };

        if !bool::from(candidate.as_bytes().ct_eq(expected.as_bytes())) {
            warn!("event=admin_login module=session status=rejected reason=mismatch");
            return Ok(false);
        }

        self.kv.set(ADMIN_SESSION_KEY, AUTHENTICATED)?;
        info!("event=admin_login module=session status=ok");
        Ok(true)
    }

    pub fn logout(&self) -> KvResult<()> {
        self.kv.remove(ADMIN_SESSION_KEY)?;
        info!("event=admin_logout module=session status=ok");
        Ok(())
    }

    pub fn is_authenticated(&self) -> KvResult<bool> {
        Ok(self.kv.get(ADMIN_SESSION_KEY)?.as_deref() == Some(AUTHENTICATED))
    }
}

#[cfg(test)]
mod tests {
    use super::AdminSession;
    use crate::db::open_db_in_memory;
    use crate::repo::kv_repo::SqliteKvStore;

    #[test]
    fn login_persists_session_until_logout() {
        let conn = open_db_in_memory().unwrap();
        let session = AdminSession::new(SqliteKvStore::new(&conn), Some("s3cret".to_string()));

        assert!(!session.login("wrong").unwrap());
        assert!(!session.is_authenticated().unwrap());

        assert!(session.login("s3cret").unwrap());
        let reopened = AdminSession::new(SqliteKvStore::new(&conn), Some("s3cret".to_string()));
        assert!(reopened.is_authenticated().unwrap());

        reopened.logout().unwrap();
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn unconfigured_password_rejects_everything() {
        let conn = open_db_in_memory().unwrap();
        let session = AdminSession::new(SqliteKvStore::new(&conn), Some(String::new()));

        assert!(!session.login("").unwrap());
        assert!(!session.is_authenticated().unwrap());
    }
}
