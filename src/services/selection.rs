//! Date range and slot selection for the booking form

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::slot::Slot,
};

use super::{
    availability::SlotState,
    calendar::{days_between, BookingCalendar},
};

pub const DATE_NOT_AVAILABLE: &str = "This date is not available for booking.";

// ---------------------------------------------------------------------------
// SelectedRange
// ---------------------------------------------------------------------------

/// A contiguous range of days; `to` is never before `from`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectedRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl SelectedRange {
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Self {
        match to {
            Some(to) if to < from => Self { from: Some(to), to: Some(from) },
            _ => Self { from: Some(from), to },
        }
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    /// Apply a click on `date`:
    /// the lone anchor again clears the range, the current end collapses
    /// back to the anchor, a later day completes the range, anything else
    /// becomes the new anchor.
    pub fn click(&mut self, date: NaiveDate) {
        *self = match (self.from, self.to) {
            (Some(from), None) if from == date => Self::default(),
            (Some(from), Some(to)) if to == date => Self { from: Some(from), to: None },
            (None, _) => Self { from: Some(date), to: None },
            (Some(from), None) if date >= from => Self { from: Some(from), to: Some(date) },
            _ => Self { from: Some(date), to: None },
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => date >= from && date <= to,
            (Some(from), None) => date == from,
            _ => false,
        }
    }

    /// Days covered; a lone anchor counts as a one-day range
    pub fn days(&self) -> Vec<NaiveDate> {
        match (self.from, self.to) {
            (Some(from), to) => days_between(from, to.unwrap_or(from)),
            (None, _) => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// BookingSelection
// ---------------------------------------------------------------------------

/// Where the booking form stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RangeStarted,
    RangeComplete,
    SlotsSelected,
    Submitting,
}

/// Result of toggling a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Someone else already asked for it; call `confirm_pending` or `cancel_pending`
    NeedsConfirmation { prompt: String },
    /// Taken or already elapsed
    Refused,
}

/// Range, slots and the pending-slot confirmation of one booking form
#[derive(Debug, Clone, Default)]
pub struct BookingSelection {
    range: SelectedRange,
    slots: BTreeSet<Slot>,
    awaiting_confirmation: Option<Slot>,
    submitting: bool,
}

impl BookingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(&self) -> &SelectedRange {
        &self.range
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_selected(&self, slot: &Slot) -> bool {
        self.slots.contains(slot)
    }

    pub fn awaiting_confirmation(&self) -> Option<Slot> {
        self.awaiting_confirmation
    }

    pub fn phase(&self) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else if !self.slots.is_empty() && self.range.is_complete() {
            Phase::SlotsSelected
        } else if self.range.is_complete() {
            Phase::RangeComplete
        } else if !self.range.is_empty() {
            Phase::RangeStarted
        } else {
            Phase::Idle
        }
    }

    /// Click a day of the calendar; refused days leave the range untouched
    pub fn click_date(&mut self, date: NaiveDate, calendar: &BookingCalendar) -> AppResult<()> {
        if self.submitting {
            return Err(AppError::Validation("A booking is already being submitted".to_string()));
        }
        if !calendar.is_selectable(date) {
            return Err(AppError::Validation(DATE_NOT_AVAILABLE.to_string()));
        }
        self.range.click(date);
        Ok(())
    }

    /// Select both ends at once; a single day is `from == to`.
    ///
    /// Every day of the range must be selectable.
    pub fn select_range(&mut self, from: NaiveDate, to: NaiveDate, calendar: &BookingCalendar) -> AppResult<()> {
        if self.submitting {
            return Err(AppError::Validation("A booking is already being submitted".to_string()));
        }
        let range = SelectedRange::new(from, Some(to));
        if let Some(day) = range.days().into_iter().find(|day| !calendar.is_selectable(*day)) {
            return Err(AppError::Validation(format!("{} ({})", DATE_NOT_AVAILABLE, day)));
        }
        self.range = range;
        Ok(())
    }

    /// Toggle a classified slot
    pub fn toggle_slot(&mut self, state: &SlotState) -> ToggleOutcome {
        if self.slots.remove(&state.slot) {
            return ToggleOutcome::Removed;
        }
        if state.disabled || self.submitting {
            return ToggleOutcome::Refused;
        }
        match state.confirmation_prompt() {
            Some(prompt) => {
                self.awaiting_confirmation = Some(state.slot);
                ToggleOutcome::NeedsConfirmation { prompt }
            }
            None => {
                self.slots.insert(state.slot);
                ToggleOutcome::Added
            }
        }
    }

    /// Accept the pending-slot prompt; returns the slot that was added
    pub fn confirm_pending(&mut self) -> Option<Slot> {
        let slot = self.awaiting_confirmation.take()?;
        self.slots.insert(slot);
        Some(slot)
    }

    /// Decline the pending-slot prompt
    pub fn cancel_pending(&mut self) {
        self.awaiting_confirmation = None;
    }

    pub fn clear_slots(&mut self) {
        self.slots.clear();
        self.awaiting_confirmation = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn begin_submit(&mut self) {
        self.awaiting_confirmation = None;
        self.submitting = true;
    }

    pub(crate) fn end_submit(&mut self) {
        self.submitting = false;
    }
}
