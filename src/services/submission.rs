//! Booking submission: one create call per (date, slot)

use chrono::NaiveDate;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDraft, CreateBooking},
        hall::Hall,
        slot::Slot,
    },
    repository::BookingsBackend,
};

use super::{batch::BatchReport, selection::BookingSelection};

pub const HALL_NOT_LOADED: &str = "Hall details could not be loaded. Please try again.";
pub const EMAIL_NOT_VERIFIED: &str = "Verify email before booking";
pub const NO_SLOT_SELECTED: &str = "Please select at least one time slot";
pub const NO_RANGE_SELECTED: &str = "Please select a date range";
pub const NO_SESSION_SELECTED: &str = "Please select a session";
pub const BOOKING_FAILED: &str = "Booking failed. Please try again.";

/// Key of one booking request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingKey {
    pub date: NaiveDate,
    pub slot: Slot,
}

impl std::fmt::Display for BookingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date, self.slot)
    }
}

/// Dates × slots to book, dates outer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingBatch {
    pub dates: Vec<NaiveDate>,
    pub slots: Vec<Slot>,
}

impl BookingBatch {
    pub fn keys(&self) -> Vec<BookingKey> {
        self.dates
            .iter()
            .flat_map(|date| self.slots.iter().map(move |slot| BookingKey { date: *date, slot: *slot }))
            .collect()
    }
}

/// Check the local preconditions, in order, and build the batch
pub fn prepare_batch(
    hall: Option<&Hall>,
    draft: &BookingDraft,
    selection: &BookingSelection,
    email_verified: bool,
) -> AppResult<(BookingBatch, BookingTemplate)> {
    let invalid = |msg: &str| Err(AppError::Validation(msg.to_string()));

    let Some((hall, office)) = hall.and_then(|h| h.office.map(|office| (h, office))) else {
        return invalid(HALL_NOT_LOADED);
    };
    if !email_verified {
        return invalid(EMAIL_NOT_VERIFIED);
    }
    if selection.slot_count() == 0 {
        return invalid(NO_SLOT_SELECTED);
    }
    if !selection.range().is_complete() {
        return invalid(NO_RANGE_SELECTED);
    }
    draft.validate()?;
    let Some(session) = draft.session else {
        return invalid(NO_SESSION_SELECTED);
    };

    let batch = BookingBatch {
        dates: selection.range().days(),
        slots: selection.slots().copied().collect(),
    };
    let template = BookingTemplate {
        office,
        hall: hall.id,
        session,
        draft: draft.clone(),
    };
    Ok((batch, template))
}

/// Everything a create request carries apart from its date and slot
#[derive(Debug, Clone)]
pub struct BookingTemplate {
    pub office: i64,
    pub hall: i64,
    pub session: i64,
    pub draft: BookingDraft,
}

impl BookingTemplate {
    pub fn payload(&self, key: BookingKey) -> CreateBooking {
        let draft = &self.draft;
        CreateBooking {
            slot_date: key.date,
            slot_time: key.slot,
            office: self.office,
            hall: self.hall,
            session: self.session,
            emp_code: draft.emp_code.trim().to_string(),
            emp_name: draft.emp_name.trim().to_string(),
            emp_email_id: draft.emp_email_id.trim().to_string(),
            emp_mobile_no: draft.emp_mobile_no.trim().to_string(),
            team_name: draft.team_name.trim().to_string(),
            shift: draft.shift,
            description: draft.description.clone(),
            support: draft.support,
            amenities: draft.amenities,
        }
    }
}

#[derive(Clone)]
pub struct SubmissionService {
    bookings: Arc<dyn BookingsBackend>,
}

impl SubmissionService {
    pub fn new(bookings: Arc<dyn BookingsBackend>) -> Self {
        Self { bookings }
    }

    /// Create the batch one booking at a time, stopping at the first failure.
    ///
    /// Already-created bookings are kept.
    pub async fn run(&self, batch: &BookingBatch, template: &BookingTemplate) -> BatchReport<BookingKey> {
        let keys = batch.keys();
        let mut report = BatchReport::pending(keys.iter().copied());
        let total = keys.len();

        for (index, key) in keys.into_iter().enumerate() {
            match self.bookings.create_booking(&template.payload(key)).await {
                Ok(booking) => {
                    tracing::info!("Booked {} {} ({}/{}) as #{}", key.date, key.slot, index + 1, total, booking.id);
                    report.mark_applied(index, Some(booking.id));
                }
                Err(e) => {
                    tracing::warn!("Booking {} {} failed after {} created: {}", key.date, key.slot, index, e);
                    let summary = e.backend_message().unwrap_or(BOOKING_FAILED).to_string();
                    report.mark_failed(index, e.to_string(), summary);
                    break;
                }
            }
        }
        report
    }

    /// Validate the form, then submit every (date, slot) pair.
    ///
    /// A fully successful run clears the selection; a failed one keeps it so
    /// the requester can adjust and retry.
    pub async fn submit(
        &self,
        hall: Option<&Hall>,
        draft: &BookingDraft,
        selection: &mut BookingSelection,
        email_verified: bool,
    ) -> AppResult<BatchReport<BookingKey>> {
        let (batch, template) = prepare_batch(hall, draft, selection, email_verified)?;

        selection.begin_submit();
        let report = self.run(&batch, &template).await;
        selection.end_submit();

        if report.is_complete() {
            selection.reset();
        }
        Ok(report)
    }

    /// Booking shown on the confirmation view
    pub async fn confirmation(&self, id: i64) -> AppResult<Booking> {
        self.bookings.get_booking(id).await
    }
}
