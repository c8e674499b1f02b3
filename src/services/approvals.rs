//! Admin approval queue: filter, approve, reject and edit bookings

use std::{str::FromStr, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, RejectBooking, UpdateBooking},
        enums::{BookingStatus, HallCategory},
    },
    repository::BookingsBackend,
};

pub const REASON_REQUIRED: &str = "Please provide a reason for rejection";
pub const NOTHING_TO_UPDATE: &str = "Nothing to update";

/// Client-side filter over the full booking list.
///
/// `status: None` means "All". The queue opens on pending bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalFilter {
    pub status: Option<BookingStatus>,
    pub office: Option<i64>,
    pub category: Option<HallCategory>,
    pub session: Option<i64>,
}

impl Default for ApprovalFilter {
    fn default() -> Self {
        Self {
            status: Some(BookingStatus::Pending),
            office: None,
            category: None,
            session: None,
        }
    }
}

impl ApprovalFilter {
    pub fn all() -> Self {
        Self {
            status: None,
            ..Self::default()
        }
    }

    /// Parse a status choice, where "All" lifts the status filter
    pub fn parse_status(value: &str) -> AppResult<Option<BookingStatus>> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(None)
        } else {
            BookingStatus::from_str(value.trim()).map(Some)
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.map_or(true, |s| booking.status == s)
            && self.office.map_or(true, |o| booking.office == o)
            && self.category.map_or(true, |c| booking.hall_category == Some(c))
            && self.session.map_or(true, |s| booking.session == Some(s))
    }

    pub fn apply(&self, bookings: Vec<Booking>) -> Vec<Booking> {
        bookings.into_iter().filter(|b| self.matches(b)).collect()
    }
}

#[derive(Clone)]
pub struct ApprovalService {
    bookings: Arc<dyn BookingsBackend>,
}

impl ApprovalService {
    pub fn new(bookings: Arc<dyn BookingsBackend>) -> Self {
        Self { bookings }
    }

    /// Fetch every booking and keep the ones `filter` accepts
    pub async fn list(&self, filter: &ApprovalFilter) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.list_bookings().await?;
        Ok(filter.apply(bookings))
    }

    pub async fn get(&self, id: i64) -> AppResult<Booking> {
        self.bookings.get_booking(id).await
    }

    pub async fn approve(&self, id: i64) -> AppResult<Booking> {
        let booking = self.bookings.approve_booking(id).await?;
        tracing::info!("Booking {} approved", id);
        Ok(booking)
    }

    pub async fn reject(&self, id: i64, reason: &str) -> AppResult<Booking> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(REASON_REQUIRED.to_string()));
        }
        let booking = self
            .bookings
            .reject_booking(
                id,
                &RejectBooking {
                    reason: reason.to_string(),
                },
            )
            .await?;
        tracing::info!("Booking {} rejected", id);
        Ok(booking)
    }

    /// Admin edit of date, time, hall, session or description
    pub async fn edit(&self, id: i64, changes: &UpdateBooking) -> AppResult<Booking> {
        if changes.is_empty() {
            return Err(AppError::Validation(NOTHING_TO_UPDATE.to_string()));
        }
        let booking = self.bookings.update_booking(id, changes).await?;
        tracing::info!("Booking {} updated", id);
        Ok(booking)
    }
}
