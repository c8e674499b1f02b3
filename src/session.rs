//! Persisted login session and the auth context that owns it

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    error::AppResult,
    models::{AdminRole, TokenClaims},
};

/// Everything kept between two invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSession {
    pub auth_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_role: Option<AdminRole>,
    /// Email verified through the OTP login, used for booking history
    pub user_email: Option<String>,
    pub username: Option<String>,
}

impl AuthSession {
    pub fn is_empty(&self) -> bool {
        *self == AuthSession::default()
    }
}

/// Where the session lives
pub trait SessionStore: Send + Sync {
    fn load(&self) -> AppResult<AuthSession>;
    fn save(&self, session: &AuthSession) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// JSON file store
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AppResult<AuthSession> {
        if !self.path.exists() {
            return Ok(AuthSession::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(AuthSession::default());
        }
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(AuthSession::default())
            }
        }
    }

    fn save(&self, session: &AuthSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// In-process store, for tests and one-shot runs
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<AuthSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: AuthSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AppResult<AuthSession> {
        Ok(self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &AuthSession) -> AppResult<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = session.clone();
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = AuthSession::default();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AuthContext
// ---------------------------------------------------------------------------

/// Single owner of the session: every read and write of auth state goes
/// through here, and every write is persisted immediately.
pub struct AuthContext {
    store: Arc<dyn SessionStore>,
    session: RwLock<AuthSession>,
}

impl AuthContext {
    /// Build the context from whatever the store currently holds
    pub fn load(store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let session = store.load()?;
        Ok(Self {
            store,
            session: RwLock::new(session),
        })
    }

    /// Context with no persisted state
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemorySessionStore::new()),
            session: RwLock::new(AuthSession::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthSession> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthSession> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }

    fn update(&self, apply: impl FnOnce(&mut AuthSession)) -> AppResult<()> {
        let mut session = self.write();
        apply(&mut session);
        self.store.save(&session)
    }

    pub fn snapshot(&self) -> AuthSession {
        self.read().clone()
    }

    /// Bearer token attached to outgoing requests
    pub fn token(&self) -> Option<String> {
        self.read().auth_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn role(&self) -> Option<AdminRole> {
        self.read().user_role
    }

    pub fn user_email(&self) -> Option<String> {
        self.read().user_email.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.read().username.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().auth_token.is_some()
    }

    /// Claims of the current access token, if it decodes
    pub fn claims(&self) -> Option<TokenClaims> {
        let token = self.token()?;
        match TokenClaims::peek(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!("Access token is not a readable JWT: {}", e);
                None
            }
        }
    }

    pub fn set_tokens(&self, access: String, refresh: Option<String>) -> AppResult<()> {
        self.update(|session| {
            session.auth_token = Some(access);
            if refresh.is_some() {
                session.refresh_token = refresh;
            }
        })
    }

    pub fn set_identity(&self, username: String, role: Option<AdminRole>) -> AppResult<()> {
        self.update(|session| {
            session.username = Some(username);
            session.user_role = role;
        })
    }

    pub fn set_user_email(&self, email: String) -> AppResult<()> {
        self.update(|session| session.user_email = Some(email))
    }

    /// Drop everything, in memory and in the store
    pub fn clear(&self) -> AppResult<()> {
        *self.write() = AuthSession::default();
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        assert!(store.load().unwrap().is_empty());

        let session = AuthSession {
            auth_token: Some("abc".into()),
            user_role: Some(AdminRole::Admin),
            ..Default::default()
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), session);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(FileSessionStore::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn test_context_persists_every_write() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = AuthContext::load(store.clone()).unwrap();

        auth.set_tokens("access-1".into(), Some("refresh-1".into())).unwrap();
        auth.set_identity("priya".into(), Some(AdminRole::SuperAdmin)).unwrap();
        auth.set_tokens("access-2".into(), None).unwrap();

        let stored = store.load().unwrap();
        assert_eq!(stored.auth_token.as_deref(), Some("access-2"));
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(stored.user_role, Some(AdminRole::SuperAdmin));

        auth.clear().unwrap();
        assert!(!auth.is_authenticated());
        assert!(store.load().unwrap().is_empty());
    }
}
