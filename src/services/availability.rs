//! Slot availability classification

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

use crate::{
    clock::BusinessClock,
    error::AppResult,
    models::{
        booking::BookedSlotRecord,
        enums::BookingStatus,
        slot::Slot,
    },
    repository::BookingsBackend,
};

/// Shown when a pending booking has no requester name
pub const UNKNOWN_HOLDER: &str = "someone else";

/// What existing bookings say about a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// Requested by someone else and awaiting approval; still selectable
    PendingExisting { holder: String },
    /// Taken
    ApprovedBlocked,
}

/// A classified slot on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotState {
    pub slot: Slot,
    pub availability: Availability,
    /// True when the slot cannot be toggled at all
    pub disabled: bool,
}

impl SlotState {
    pub fn needs_confirmation(&self) -> bool {
        matches!(self.availability, Availability::PendingExisting { .. })
    }

    /// Prompt shown before a pending slot may be added
    pub fn confirmation_prompt(&self) -> Option<String> {
        match &self.availability {
            Availability::PendingExisting { holder } => Some(format!(
                "This slot ({}) has already been requested by {} and is awaiting approval. Do you still want to request it?",
                self.slot, holder
            )),
            _ => None,
        }
    }
}

/// Classify one slot.
///
/// `now` is the local wall-clock time when the board's date is today, and
/// `None` for any other date.
pub fn classify(slot: Slot, records: &[BookedSlotRecord], now: Option<NaiveTime>) -> SlotState {
    let label = slot.label();
    let label = label.as_str();
    let matching = || {
        records
            .iter()
            .filter(move |record| record.slot_time.trim() == label)
    };

    let availability = if matching().any(|r| r.status == BookingStatus::Approved) {
        Availability::ApprovedBlocked
    } else if let Some(pending) = matching().find(|r| r.status == BookingStatus::Pending) {
        let holder = pending
            .emp_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_HOLDER)
            .to_string();
        Availability::PendingExisting { holder }
    } else {
        Availability::Available
    };

    let elapsed = now.is_some_and(|now| slot.start() < now);
    let disabled = availability == Availability::ApprovedBlocked || elapsed;

    SlotState {
        slot,
        availability,
        disabled,
    }
}

/// Classified slots of one hall on one date
#[derive(Debug, Clone)]
pub struct SlotBoard {
    pub hall_id: i64,
    pub date: NaiveDate,
    pub states: Vec<SlotState>,
}

impl SlotBoard {
    /// Classify `slots` against `records`, using `clock` to detect elapsed slots
    pub fn build(
        hall_id: i64,
        date: NaiveDate,
        slots: &[Slot],
        records: &[BookedSlotRecord],
        clock: &BusinessClock,
    ) -> Self {
        let now = clock.is_today(date).then(|| clock.time_of_day());
        let states = slots.iter().map(|slot| classify(*slot, records, now)).collect();
        Self { hall_id, date, states }
    }

    pub fn state(&self, slot: &Slot) -> Option<&SlotState> {
        self.states.iter().find(|state| state.slot == *slot)
    }

    pub fn selectable(&self) -> impl Iterator<Item = &SlotState> {
        self.states.iter().filter(|state| !state.disabled)
    }
}

/// Fetches booked slots and turns them into boards
#[derive(Clone)]
pub struct AvailabilityService {
    bookings: Arc<dyn BookingsBackend>,
    clock: BusinessClock,
    slots: Vec<Slot>,
}

impl AvailabilityService {
    pub fn new(bookings: Arc<dyn BookingsBackend>, clock: BusinessClock, slots: Vec<Slot>) -> Self {
        Self { bookings, clock, slots }
    }

    pub fn clock(&self) -> &BusinessClock {
        &self.clock
    }

    /// Board for `hall_id` on `date`, freshly fetched
    pub async fn board(&self, hall_id: i64, date: NaiveDate) -> AppResult<SlotBoard> {
        let records = self.bookings.booked_slots(hall_id, date).await?;
        tracing::debug!("Hall {} has {} booked slot records on {}", hall_id, records.len(), date);
        Ok(SlotBoard::build(hall_id, date, &self.slots, &records, &self.clock))
    }
}
