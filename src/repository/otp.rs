//! Email OTP endpoints

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::AppResult,
    models::user::{MessageResponse, OtpRequest, VerifyOtpRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpBackend: Send + Sync {
    async fn send_otp(&self, email: &str) -> AppResult<MessageResponse>;
    async fn verify_otp(&self, email: &str, otp: &str) -> AppResult<MessageResponse>;
}

#[async_trait]
impl OtpBackend for Repository {
    async fn send_otp(&self, email: &str) -> AppResult<MessageResponse> {
        let body = OtpRequest {
            email: email.to_string(),
        };
        self.post("/send-otp/", &body).await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> AppResult<MessageResponse> {
        let body = VerifyOtpRequest {
            email: email.to_string(),
            otp: otp.to_string(),
        };
        self.post("/verify-otp/", &body).await
    }
}
