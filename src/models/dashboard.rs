//! Admin dashboard models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::{Booking, BookingStats};
use super::enums::HallCategory;

/// Counters from `/dashboard-stats/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_halls: u64,
    pub available_halls: u64,
    pub working_halls: u64,
    pub upcoming_booked_halls: u64,
    /// Next approved bookings, at most five
    pub upcoming_bookings: Vec<Booking>,
    pub pending_bookings: u64,
    pub approved_bookings: u64,
    pub rejected_bookings: u64,
    pub cancelled_bookings: u64,
}

/// Optional filters of `/dashboard-stats/`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub office_id: Option<i64>,
    pub slot_date: Option<NaiveDate>,
    pub category: Option<HallCategory>,
    pub session_id: Option<i64>,
}

impl DashboardFilter {
    /// Query parameters, unset filters omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.office_id {
            params.push(("office_id", id.to_string()));
        }
        if let Some(date) = self.slot_date {
            params.push(("slot_date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(id) = self.session_id {
            params.push(("session_id", id.to_string()));
        }
        params
    }
}

/// A hall in use during the current slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWorkingHall {
    pub hall_id: i64,
    pub hall_name: String,
    pub team_name: String,
    pub slot_time: String,
    pub emp_name: String,
}

/// Everything the dashboard shows, fetched in one concurrent round.
///
/// A section whose request failed is left empty and its error kept in
/// `errors`, so one slow endpoint never blanks the whole view.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub stats: Option<DashboardStats>,
    pub working_halls: Vec<CurrentWorkingHall>,
    pub pending_approvals: Vec<Booking>,
    pub booking_stats: Option<BookingStats>,
    pub errors: Vec<String>,
}

impl DashboardSnapshot {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
