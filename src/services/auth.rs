//! Admin authentication and the requester's email session

use chrono::{DateTime, Utc};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::AdminRole,
        user::{AdminUser, LoginRequest, UpdateAdminUser},
    },
    repository::AuthBackend,
    session::AuthContext,
};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// What `whoami` reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub username: Option<String>,
    pub role: Option<AdminRole>,
    pub user_email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
}

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    auth: Arc<AuthContext>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn AuthBackend>, auth: Arc<AuthContext>) -> Self {
        Self { backend, auth }
    }

    /// Obtain a token pair, then look up the account's role
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AdminUser> {
        let credentials = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        credentials.validate()?;

        let tokens = match self.backend.obtain_token(&credentials).await {
            Ok(tokens) => tokens,
            Err(e @ (AppError::Authentication(_) | AppError::BadRequest(_))) => {
                tracing::warn!("Login refused for {}: {}", credentials.username, e);
                return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(e),
        };
        self.auth.set_tokens(tokens.access, Some(tokens.refresh))?;

        let user = match self.backend.get_admin_user(&credentials.username).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Role lookup for {} failed: {}", credentials.username, e);
                self.auth.clear()?;
                return Err(e);
            }
        };
        self.auth.set_identity(credentials.username.clone(), user.role)?;
        tracing::info!("Logged in as {} ({:?})", credentials.username, user.role);
        Ok(user)
    }

    /// Swap the refresh token for a new access token
    pub async fn refresh(&self) -> AppResult<()> {
        let refresh = self
            .auth
            .refresh_token()
            .ok_or_else(|| AppError::Authentication("Not logged in".to_string()))?;
        let token = self.backend.refresh_token(&refresh).await?;
        self.auth.set_tokens(token.access, token.refresh)?;
        tracing::debug!("Access token refreshed");
        Ok(())
    }

    /// Forget everything stored for this client
    pub fn logout(&self) -> AppResult<()> {
        self.auth.clear()?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Remember an OTP-verified address for the history view
    pub fn remember_email(&self, email: &str) -> AppResult<()> {
        self.auth.set_user_email(email.trim().to_string())
    }

    pub fn session_info(&self) -> SessionInfo {
        let session = self.auth.snapshot();
        let claims = self.auth.claims();
        let expires_at = claims.as_ref().and_then(|c| c.expires_at());
        SessionInfo {
            username: session
                .username
                .or_else(|| claims.as_ref().and_then(|c| c.username.clone())),
            role: session.user_role.or_else(|| claims.as_ref().and_then(|c| c.role)),
            user_email: session.user_email,
            expired: expires_at.is_some_and(|at| at <= Utc::now()),
            expires_at,
        }
    }

    /// Fail unless the logged-in account may use the admin screens
    pub fn require_admin(&self) -> AppResult<AdminRole> {
        if !self.auth.is_authenticated() {
            return Err(AppError::Authentication("Please log in first".to_string()));
        }
        match self.auth.role() {
            Some(role) if role.can_administer() => Ok(role),
            Some(role) => Err(AppError::Authorization(format!("Role {} cannot use admin features", role))),
            None => Err(AppError::Authorization("Unknown role".to_string())),
        }
    }

    // ---- Admin users ----

    pub async fn list_admin_users(&self) -> AppResult<Vec<AdminUser>> {
        self.backend.list_admin_users().await
    }

    pub async fn update_admin_user(&self, code: &str, data: &UpdateAdminUser) -> AppResult<AdminUser> {
        data.validate()?;
        self.backend.update_admin_user(code, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{AccessToken, TokenPair};
    use crate::repository::auth::MockAuthBackend;

    fn admin(role: AdminRole) -> AdminUser {
        AdminUser {
            admin_code: "priya".into(),
            username: "priya".into(),
            email: "priya@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
            role: Some(role),
            office: None,
            office_name: None,
            designation: String::new(),
            shift: String::new(),
            mobile_no: String::new(),
            is_active: true,
        }
    }

    fn pair() -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: "access".into(),
            refresh: "refresh".into(),
        })
    }

    #[tokio::test]
    async fn test_login_stores_tokens_and_role() {
        let mut backend = MockAuthBackend::new();
        backend
            .expect_obtain_token()
            .withf(|c| c.username == "priya" && c.password == "secret")
            .returning(|_| pair());
        backend
            .expect_get_admin_user()
            .withf(|code| code == "priya")
            .returning(|_| Ok(admin(AdminRole::SuperAdmin)));

        let auth = Arc::new(AuthContext::in_memory());
        let service = AuthService::new(Arc::new(backend), auth.clone());
        service.login(" priya ", "secret").await.unwrap();

        assert_eq!(auth.token().as_deref(), Some("access"));
        assert_eq!(auth.refresh_token().as_deref(), Some("refresh"));
        assert_eq!(auth.role(), Some(AdminRole::SuperAdmin));
        assert_eq!(service.require_admin().unwrap(), AdminRole::SuperAdmin);
    }

    #[tokio::test]
    async fn test_bad_credentials_message() {
        let mut backend = MockAuthBackend::new();
        backend
            .expect_obtain_token()
            .returning(|_| Err(AppError::Authentication("No active account found".into())));
        backend.expect_get_admin_user().never();

        let auth = Arc::new(AuthContext::in_memory());
        let service = AuthService::new(Arc::new(backend), auth.clone());
        let err = service.login("priya", "wrong").await.unwrap_err();
        assert_eq!(err.user_message(), INVALID_CREDENTIALS);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_role_lookup_clears_session() {
        let mut backend = MockAuthBackend::new();
        backend.expect_obtain_token().returning(|_| pair());
        backend
            .expect_get_admin_user()
            .returning(|_| Err(AppError::NotFound("Not found.".into())));

        let auth = Arc::new(AuthContext::in_memory());
        let service = AuthService::new(Arc::new(backend), auth.clone());
        assert!(service.login("priya", "secret").await.is_err());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_unless_rotated() {
        let mut backend = MockAuthBackend::new();
        backend
            .expect_refresh_token()
            .withf(|r| r == "refresh-1")
            .returning(|_| {
                Ok(AccessToken {
                    access: "access-2".into(),
                    refresh: None,
                })
            });

        let auth = Arc::new(AuthContext::in_memory());
        auth.set_tokens("access-1".into(), Some("refresh-1".into())).unwrap();
        let service = AuthService::new(Arc::new(backend), auth.clone());
        service.refresh().await.unwrap();
        assert_eq!(auth.token().as_deref(), Some("access-2"));
        assert_eq!(auth.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_require_admin_roles() {
        let auth = Arc::new(AuthContext::in_memory());
        let service = AuthService::new(Arc::new(MockAuthBackend::new()), auth.clone());
        assert!(matches!(service.require_admin(), Err(AppError::Authentication(_))));

        auth.set_tokens("t".into(), None).unwrap();
        auth.set_identity("cafe".into(), Some(AdminRole::Cafeteria)).unwrap();
        assert!(matches!(service.require_admin(), Err(AppError::Authorization(_))));

        service.logout().unwrap();
        assert!(service.session_info().username.is_none());
    }
}
