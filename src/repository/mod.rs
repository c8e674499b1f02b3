//! Repository layer: typed access to the booking backend's REST API
//!
//! Each domain is a trait implemented by [`Repository`] in its own module,
//! so services depend on the narrow trait and tests can swap in a mock.

pub mod auth;
pub mod blocked_dates;
pub mod bookings;
pub mod catalog;
pub mod dashboard;
pub mod otp;

pub use auth::AuthBackend;
pub use blocked_dates::BlockedDatesBackend;
pub use bookings::BookingsBackend;
pub use catalog::CatalogBackend;
pub use dashboard::DashboardBackend;
pub use otp::OtpBackend;

use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    session::AuthContext,
};

/// HTTP gateway to the backend, sharing one connection pool and one auth context
#[derive(Clone)]
pub struct Repository {
    client: Client,
    base_url: String,
    auth: Arc<AuthContext>,
}

impl Repository {
    /// Create a repository from configuration
    pub fn new(config: &AppConfig, auth: Arc<AuthContext>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("hallbook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.request(method, url);
        match self.auth.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    /// GET and decode
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(path, response).await
    }

    /// GET with query parameters and decode
    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self.request(Method::GET, path).query(params).send().await?;
        Self::handle_response(path, response).await
    }

    /// POST a JSON body and decode
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(path, response).await
    }

    /// POST without body and decode
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.request(Method::POST, path).send().await?;
        Self::handle_response(path, response).await
    }

    /// PATCH a JSON body and decode
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<T> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::handle_response(path, response).await
    }

    /// DELETE; the body, if any, is ignored
    pub(crate) async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check_status(path, response).await.map(|_| ())
    }

    async fn check_status(path: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = AppError::from_status(status, &body);
        tracing::warn!("{} failed with {}: {}", path, status, err);
        Err(err)
    }

    async fn handle_response<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
        let response = Self::check_status(path, response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!("Unexpected response body from {}: {}", path, e);
            AppError::Decode(e)
        })
    }
}
