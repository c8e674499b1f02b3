//! Error types for the Hallbook client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Client error codes, reported by the command line as exit statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    BackendFailure = 3,
    NoSuchData = 4,
    BadValue = 5,
    Duplicate = 6,
    TransportFailure = 7,
    ConfigFailure = 8,
    StorageFailure = 9,
}

/// Main client error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected locally, before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Rejected by the backend with a 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) | AppError::Authorization(_) => ErrorCode::NotAuthorized,
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Conflict(_) => ErrorCode::Duplicate,
            AppError::Backend { .. } => ErrorCode::BackendFailure,
            AppError::Http(_) | AppError::Decode(_) => ErrorCode::TransportFailure,
            AppError::Config(_) => ErrorCode::ConfigFailure,
            AppError::Storage(_) => ErrorCode::StorageFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }

    /// True when the error was raised before any request went out
    pub fn is_local(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Message the backend attached to a rejection, if any.
    ///
    /// Only 400 and 409 bodies are meant for end users; anything else is
    /// replaced by the caller's generic message.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            AppError::BadRequest(msg) | AppError::Conflict(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Text fit for an end user: local and backend rejections are shown as
    /// they are, everything else collapses to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound(msg) | AppError::Authentication(msg) => msg.clone(),
            AppError::Authorization(_) => "You are not allowed to perform this action.".to_string(),
            AppError::Config(msg) => format!("Configuration problem: {}", msg),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Map a non-success response to an error, decoding the body when it is JSON
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message_from_body(body);
        match status {
            StatusCode::UNAUTHORIZED => AppError::Authentication(message),
            StatusCode::FORBIDDEN => AppError::Authorization(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::BadRequest(message),
            StatusCode::CONFLICT => AppError::Conflict(message),
            _ => AppError::Backend {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Extract the most useful message from a backend error body.
///
/// The backend answers with `{"non_field_errors": [..]}`, `{"error": ".."}`,
/// `{"detail": ".."}` or per-field lists such as `{"email": [".."]}`.
pub fn error_message_from_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(first) = value
        .get("non_field_errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(Value::as_str)
    {
        return first.to_string();
    }

    for key in ["error", "detail", "message"] {
        if let Some(msg) = value.get(key).and_then(Value::as_str) {
            return msg.to_string();
        }
    }

    if let Some(map) = value.as_object() {
        for (field, errors) in map {
            if let Some(first) = errors
                .as_array()
                .and_then(|list| list.first())
                .and_then(Value::as_str)
            {
                return format!("{}: {}", field, first);
            }
        }
    }

    body.trim().to_string()
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join(", "))
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
