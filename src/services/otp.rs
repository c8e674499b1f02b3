//! Email OTP verification gate

use std::{sync::Arc, time::Duration};
use tokio::time::Instant;

use crate::{
    error::{AppError, AppResult},
    repository::OtpBackend,
};

pub const ENTER_EMAIL_FIRST: &str = "Enter email first";
pub const SEND_FAILED: &str = "Failed to send OTP. Please try again.";
pub const INVALID_OTP: &str = "Invalid OTP. Please try again.";
pub const SEND_OTP_FIRST: &str = "Request an OTP first";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpState {
    Unverified,
    OtpSent { sent_at: Instant },
    Verified,
}

/// Verification state for one email address
#[derive(Debug, Clone)]
pub struct OtpGate {
    email: String,
    state: OtpState,
    resend_after: Duration,
}

impl OtpGate {
    pub fn new(resend_after: Duration) -> Self {
        Self {
            email: String::new(),
            state: OtpState::Unverified,
            resend_after,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn state(&self) -> OtpState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == OtpState::Verified
    }

    /// Change the email; any other address resets verification
    pub fn set_email(&mut self, email: &str) {
        let email = email.trim();
        if email != self.email {
            self.email = email.to_string();
            self.state = OtpState::Unverified;
        }
    }

    /// Time left before another OTP may be requested
    pub fn resend_remaining(&self) -> Duration {
        match self.state {
            OtpState::OtpSent { sent_at } => self.resend_after.saturating_sub(sent_at.elapsed()),
            _ => Duration::ZERO,
        }
    }

    pub fn can_send(&self) -> bool {
        !self.email.is_empty() && !self.is_verified() && self.resend_remaining().is_zero()
    }
}

#[derive(Clone)]
pub struct OtpService {
    backend: Arc<dyn OtpBackend>,
}

impl OtpService {
    pub fn new(backend: Arc<dyn OtpBackend>) -> Self {
        Self { backend }
    }

    /// Ask the backend to mail a code to the gate's address
    pub async fn send(&self, gate: &mut OtpGate) -> AppResult<()> {
        if gate.email.is_empty() {
            return Err(AppError::Validation(ENTER_EMAIL_FIRST.to_string()));
        }
        if gate.is_verified() {
            return Ok(());
        }
        let remaining = gate.resend_remaining();
        if !remaining.is_zero() {
            return Err(AppError::Validation(format!(
                "Please wait {}s before requesting a new OTP",
                remaining.as_secs().max(1)
            )));
        }

        match self.backend.send_otp(&gate.email).await {
            Ok(_) => {
                tracing::info!("OTP sent to {}", gate.email);
                gate.state = OtpState::OtpSent { sent_at: Instant::now() };
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Sending OTP to {} failed: {}", gate.email, e);
                Err(AppError::BadRequest(SEND_FAILED.to_string()))
            }
        }
    }

    /// Check `code`; success opens the gate
    pub async fn verify(&self, gate: &mut OtpGate, code: &str) -> AppResult<()> {
        if gate.is_verified() {
            return Ok(());
        }
        if !matches!(gate.state, OtpState::OtpSent { .. }) {
            return Err(AppError::Validation(SEND_OTP_FIRST.to_string()));
        }
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation(INVALID_OTP.to_string()));
        }

        match self.backend.verify_otp(&gate.email, code).await {
            Ok(_) => {
                tracing::info!("Email {} verified", gate.email);
                gate.state = OtpState::Verified;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("OTP verification for {} failed: {}", gate.email, e);
                Err(AppError::BadRequest(INVALID_OTP.to_string()))
            }
        }
    }
}
