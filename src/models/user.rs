//! Admin user, login and OTP models

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::AdminRole;

// ---------------------------------------------------------------------------
// AdminUser
// ---------------------------------------------------------------------------

/// Back-office account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub admin_code: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Option<AdminRole>,
    pub office: Option<i64>,
    pub office_name: Option<String>,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub mobile_no: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Partial admin user update
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateAdminUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Admin login request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response of `/token/`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body of `/token/refresh/`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response of `/token/refresh/`; rotation may hand back a new refresh token
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Claims carried by the backend's access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<AdminRole>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Read the claims without checking the signature.
    ///
    /// The signing key stays on the backend; the client only needs the
    /// payload to report who is logged in and until when.
    pub fn peek(token: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(token_data.claims)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

// ---------------------------------------------------------------------------
// OTP
// ---------------------------------------------------------------------------

/// Body of `/send-otp/`
#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Body of `/verify-otp/`
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Plain `{"message": ..}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_peek_ignores_signature() {
        let claims = TokenClaims {
            username: Some("priya".into()),
            role: Some(AdminRole::SuperAdmin),
            exp: 1_900_000_000,
            iat: None,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-only")).unwrap();

        let peeked = TokenClaims::peek(&token).unwrap();
        assert_eq!(peeked.username.as_deref(), Some("priya"));
        assert_eq!(peeked.role, Some(AdminRole::SuperAdmin));
        assert!(!peeked.is_expired_at(Utc.timestamp_opt(1_800_000_000, 0).unwrap()));
        assert!(peeked.is_expired_at(Utc.timestamp_opt(1_900_000_000, 0).unwrap()));
    }

    #[test]
    fn test_peek_rejects_garbage() {
        assert!(TokenClaims::peek("not.a.token").is_err());
    }
}
