//! Token and admin user endpoints

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::AppResult,
    models::user::{AccessToken, AdminUser, LoginRequest, RefreshRequest, TokenPair, UpdateAdminUser},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn obtain_token(&self, credentials: &LoginRequest) -> AppResult<TokenPair>;
    async fn refresh_token(&self, refresh: &str) -> AppResult<AccessToken>;
    async fn list_admin_users(&self) -> AppResult<Vec<AdminUser>>;
    /// Admin users are keyed by their username
    async fn get_admin_user(&self, code: &str) -> AppResult<AdminUser>;
    async fn update_admin_user(&self, code: &str, data: &UpdateAdminUser) -> AppResult<AdminUser>;
}

#[async_trait]
impl AuthBackend for Repository {
    async fn obtain_token(&self, credentials: &LoginRequest) -> AppResult<TokenPair> {
        self.post("/token/", credentials).await
    }

    async fn refresh_token(&self, refresh: &str) -> AppResult<AccessToken> {
        let body = RefreshRequest {
            refresh: refresh.to_string(),
        };
        self.post("/token/refresh/", &body).await
    }

    async fn list_admin_users(&self) -> AppResult<Vec<AdminUser>> {
        self.get("/admin-users/").await
    }

    async fn get_admin_user(&self, code: &str) -> AppResult<AdminUser> {
        self.get(&format!("/admin-users/{}/", code)).await
    }

    async fn update_admin_user(&self, code: &str, data: &UpdateAdminUser) -> AppResult<AdminUser> {
        self.patch(&format!("/admin-users/{}/", code), data).await
    }
}
