//! Slot enumeration

use crate::models::slot::{Slot, SLOTS_PER_DAY};

/// All 48 half-hour slots of a day, from `12:00 AM - 12:30 AM` to
/// `11:30 PM - 12:00 AM`
pub fn generate_slots() -> Vec<Slot> {
    generate_slots_between(0, 23)
}

/// Slots whose start hour lies in `start_hour..=end_hour`.
///
/// Hours above 23 are clamped; an inverted range yields nothing.
pub fn generate_slots_between(start_hour: u32, end_hour: u32) -> Vec<Slot> {
    let start_hour = start_hour.min(23);
    let end_hour = end_hour.min(23);
    if start_hour > end_hour {
        return Vec::new();
    }

    let mut slots = Vec::with_capacity(SLOTS_PER_DAY);
    for hour in start_hour..=end_hour {
        for minute in [0, 30] {
            if let Some(slot) = Slot::starting_at(hour, minute) {
                slots.push(slot);
            }
        }
    }
    slots
}
