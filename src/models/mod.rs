//! Data models for Hallbook

pub mod blocked_date;
pub mod booking;
pub mod dashboard;
pub mod enums;
pub mod hall;
pub mod slot;
pub mod user;

// Re-export commonly used types
pub use blocked_date::{BlockedDate, BlockedDateQuery, CreateBlockedDate, HallFilter};
pub use booking::{BookedSlotRecord, Booking, BookingDraft, BookingStats, CreateBooking, SupportRequests};
pub use dashboard::{CurrentWorkingHall, DashboardFilter, DashboardSnapshot, DashboardStats};
pub use enums::{AdminRole, BookingStatus, HallCategory, Shift};
pub use hall::{CategoryChoice, Entity, Hall, Office, SessionMaster};
pub use slot::Slot;
pub use user::{AdminUser, TokenClaims};
