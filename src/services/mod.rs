//! Business logic services

pub mod approvals;
pub mod auth;
pub mod availability;
pub mod batch;
pub mod blocking;
pub mod calendar;
pub mod catalog;
pub mod dashboard;
pub mod history;
pub mod otp;
pub mod refresh;
pub mod selection;
pub mod slots;
pub mod submission;

use std::sync::Arc;

use crate::{
    clock::BusinessClock,
    config::AppConfig,
    error::AppResult,
    repository::Repository,
    session::AuthContext,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub availability: availability::AvailabilityService,
    pub calendar: calendar::CalendarService,
    pub submission: submission::SubmissionService,
    pub otp: otp::OtpService,
    pub blocking: blocking::BlockingService,
    pub approvals: approvals::ApprovalService,
    pub history: history::HistoryService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services on top of one shared repository
    pub fn new(repository: Arc<Repository>, config: &AppConfig, session: Arc<AuthContext>) -> AppResult<Self> {
        let clock = BusinessClock::new(config.timezone()?);
        let slots = slots::generate_slots_between(config.booking.first_hour, config.booking.last_hour);

        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), session.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            availability: availability::AvailabilityService::new(repository.clone(), clock, slots),
            calendar: calendar::CalendarService::new(repository.clone(), clock, config.booking.horizon_days),
            submission: submission::SubmissionService::new(repository.clone()),
            otp: otp::OtpService::new(repository.clone()),
            blocking: blocking::BlockingService::new(repository.clone(), repository.clone()),
            approvals: approvals::ApprovalService::new(repository.clone()),
            history: history::HistoryService::new(repository.clone(), session),
            dashboard: dashboard::DashboardService::new(repository.clone(), repository.clone(), repository),
        })
    }
}
