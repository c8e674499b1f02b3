//! Configuration management for the Hallbook client

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf, time::Duration};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API, including the `/api` prefix
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BookingConfig {
    /// IANA timezone that defines "today" and "now" for the booking calendar
    pub timezone: String,
    /// How many days ahead of today a booking may start
    pub horizon_days: u32,
    /// Countdown before an OTP may be requested again
    pub otp_resend_seconds: u64,
    /// First hour shown on the slot board (0-23)
    pub first_hour: u32,
    /// Last hour shown on the slot board (0-23)
    pub last_hour: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the login session is persisted between invocations
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Directory for a daily rolling log file; console only when unset
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix HALLBOOK__)
            .add_source(
                Environment::with_prefix("HALLBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override backend URL from API_BASE_URL env var if present
            .set_override_option("backend.base_url", env::var("API_BASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Parsed business timezone
    pub fn timezone(&self) -> AppResult<Tz> {
        self.booking
            .timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("Invalid booking.timezone '{}': {}", self.booking.timezone, e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_minutes * 60)
    }

    pub fn otp_resend_delay(&self) -> Duration {
        Duration::from_secs(self.booking.otp_resend_seconds)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Kolkata".to_string(),
            horizon_days: 60,
            otp_resend_seconds: 120,
            first_hour: 0,
            last_hour: 23,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_minutes: 30 }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".hallbook/session.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}
