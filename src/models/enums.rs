//! Shared domain enums (wire values match the booking backend)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Approval workflow state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Approved,
        BookingStatus::Rejected,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether a booking in this state still occupies its slot
    pub fn holds_slot(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown booking status: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// HallCategory
// ---------------------------------------------------------------------------

/// Kind of bookable space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HallCategory {
    Cabin,
    Room,
    Hall,
    Floor,
    Open,
    #[serde(rename = "CSUITE")]
    CSuite,
}

impl HallCategory {
    pub const ALL: [HallCategory; 6] = [
        HallCategory::Cabin,
        HallCategory::Room,
        HallCategory::Hall,
        HallCategory::Floor,
        HallCategory::Open,
        HallCategory::CSuite,
    ];

    /// Wire value, as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            HallCategory::Cabin => "CABIN",
            HallCategory::Room => "ROOM",
            HallCategory::Hall => "HALL",
            HallCategory::Floor => "FLOOR",
            HallCategory::Open => "OPEN",
            HallCategory::CSuite => "CSUITE",
        }
    }
}

impl Default for HallCategory {
    fn default() -> Self {
        HallCategory::Hall
    }
}

impl std::fmt::Display for HallCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HallCategory::Cabin => "Cabin",
            HallCategory::Room => "Room",
            HallCategory::Hall => "Hall",
            HallCategory::Floor => "Floor",
            HallCategory::Open => "Open",
            HallCategory::CSuite => "CSuite",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for HallCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HallCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown hall category: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Shift
// ---------------------------------------------------------------------------

/// Working shift of the requesting employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shift {
    #[default]
    Day,
    Mid,
    Night,
}

impl FromStr for Shift {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Shift::Day),
            "mid" => Ok(Shift::Mid),
            "night" => Ok(Shift::Night),
            _ => Err(AppError::Validation(format!("Unknown shift: {}", s))),
        }
    }
}

// ---------------------------------------------------------------------------
// AdminRole
// ---------------------------------------------------------------------------

/// Role of an admin user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    Admin,
    Hr,
    Cafeteria,
    ItSupport,
    #[serde(other)]
    Unknown,
}

impl AdminRole {
    /// Roles allowed on the dashboard, approvals and masters
    pub fn can_administer(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin | AdminRole::Admin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AdminRole::SuperAdmin => "Super Admin",
            AdminRole::Admin => "Admin",
            AdminRole::Hr => "Human Resources",
            AdminRole::Cafeteria => "Cafeteria",
            AdminRole::ItSupport => "IT Support",
            AdminRole::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}
