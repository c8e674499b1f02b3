//! Half-hour booking slot value object

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::AppError;

/// Length of every slot, in minutes
pub const SLOT_MINUTES: u32 = 30;

/// Number of slots in one day
pub const SLOTS_PER_DAY: usize = 48;

/// A fixed half-hour window, identified on the wire by its label
/// (`"9:00 AM - 9:30 AM"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    start: NaiveTime,
    end: NaiveTime,
}

impl Slot {
    /// Slot starting at `hour:minute`; minutes must sit on the half-hour grid
    pub fn starting_at(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || (minute != 0 && minute != SLOT_MINUTES) {
            return None;
        }
        let start = NaiveTime::from_hms_opt(hour, minute, 0)?;
        let end_minutes = (hour * 60 + minute + SLOT_MINUTES) % (24 * 60);
        let end = NaiveTime::from_hms_opt(end_minutes / 60, end_minutes % 60, 0)?;
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Wire label, e.g. `"11:30 PM - 12:00 AM"`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

/// Render a time as `H:MM AM/PM` with no leading zero on the hour
pub fn format_12h(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if is_pm { "PM" } else { "AM" })
}

/// Parse `H:MM AM/PM` (case-insensitive meridiem, surrounding blanks ignored)
pub fn parse_12h(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    let (clock, meridiem) = text.rsplit_once(' ')?;
    let (hour, minute) = clock.trim().split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let hour24 = match meridiem.trim().to_ascii_uppercase().as_str() {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return None,
    };
    NaiveTime::from_hms_opt(hour24, minute, 0)
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_12h(self.start), format_12h(self.end))
    }
}

impl FromStr for Slot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::Validation(format!("Invalid slot label: {}", s));
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = parse_12h(start).ok_or_else(invalid)?;
        let end = parse_12h(end).ok_or_else(invalid)?;
        let slot = Slot::starting_at(start.hour(), start.minute()).ok_or_else(invalid)?;
        if slot.end != end {
            return Err(invalid());
        }
        Ok(slot)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
