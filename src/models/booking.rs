//! Booking models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::{BookingStatus, HallCategory, Shift};
use super::hall::HallAmenities;
use super::slot::Slot;

// ---------------------------------------------------------------------------
// BookedSlotRecord
// ---------------------------------------------------------------------------

/// Existing booking occupying a slot, from `/halls/{id}/booked_slots/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlotRecord {
    /// Slot label; kept as text so unknown labels never break a board
    pub slot_time: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub emp_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// Support teams a booking may ask for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportRequests {
    pub it_support: bool,
    pub hr_support: bool,
    pub fin_support: bool,
    pub caf_support: bool,
}

/// A booking as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub book_date: Option<NaiveDate>,
    pub slot_date: NaiveDate,
    pub slot_time: String,
    pub office: i64,
    pub office_name: Option<String>,
    pub hall: i64,
    pub hall_name: Option<String>,
    pub hall_category: Option<HallCategory>,
    pub session: Option<i64>,
    pub session_type: Option<String>,
    pub emp_code: String,
    pub emp_name: String,
    pub emp_email_id: String,
    #[serde(default)]
    pub emp_mobile_no: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub shift: Shift,
    pub status: BookingStatus,
    #[serde(default)]
    pub approved: bool,
    pub description: Option<String>,
    #[serde(flatten)]
    pub support: SupportRequests,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create booking request, one per (date, slot)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateBooking {
    pub slot_date: NaiveDate,
    pub slot_time: Slot,
    pub office: i64,
    pub hall: i64,
    pub session: i64,
    pub emp_code: String,
    pub emp_name: String,
    pub emp_email_id: String,
    pub emp_mobile_no: String,
    pub team_name: String,
    pub shift: Shift,
    pub description: String,
    #[serde(flatten)]
    pub support: SupportRequests,
    /// Amenities the requester needs in the hall
    #[serde(flatten)]
    pub amenities: HallAmenities,
}

/// Requester details typed into the booking form
#[derive(Debug, Clone, Default, Validate)]
pub struct BookingDraft {
    #[validate(length(min = 1, message = "Employee code is required"))]
    pub emp_code: String,
    #[validate(length(min = 1, message = "Employee name is required"))]
    pub emp_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub emp_email_id: String,
    #[validate(length(min = 1, message = "Mobile number is required"))]
    pub emp_mobile_no: String,
    #[validate(length(min = 1, message = "Team name is required"))]
    pub team_name: String,
    pub session: Option<i64>,
    pub shift: Shift,
    pub description: String,
    pub support: SupportRequests,
    pub amenities: HallAmenities,
}

/// Admin edit of an existing booking
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBooking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_time: Option<Slot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hall: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateBooking {
    pub fn is_empty(&self) -> bool {
        self.slot_date.is_none()
            && self.slot_time.is_none()
            && self.hall.is_none()
            && self.session.is_none()
            && self.description.is_none()
    }
}

/// Reject request body
#[derive(Debug, Clone, Serialize)]
pub struct RejectBooking {
    pub reason: String,
}

/// Counts from `/booking-stats/`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingStats {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}
