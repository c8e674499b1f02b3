//! Booking history for an OTP-verified requester

use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{booking::Booking, enums::BookingStatus},
    repository::BookingsBackend,
    session::AuthContext,
};

pub const VERIFY_EMAIL_FIRST: &str = "Verify your email to see your bookings";

/// Status filter of the history view, `all` or one status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => booking.status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

#[derive(Clone)]
pub struct HistoryService {
    bookings: Arc<dyn BookingsBackend>,
    auth: Arc<AuthContext>,
}

impl HistoryService {
    pub fn new(bookings: Arc<dyn BookingsBackend>, auth: Arc<AuthContext>) -> Self {
        Self { bookings, auth }
    }

    /// Bookings made with the remembered email address
    pub async fn my_bookings(&self) -> AppResult<Vec<Booking>> {
        let email = self
            .auth
            .user_email()
            .ok_or_else(|| AppError::Authentication(VERIFY_EMAIL_FIRST.to_string()))?;
        self.bookings.bookings_by_email(&email).await
    }

    pub fn filter(bookings: &[Booking], filter: StatusFilter) -> Vec<&Booking> {
        bookings.iter().filter(|b| filter.matches(b)).collect()
    }

    /// Cancel on the backend, then mark the local copy as cancelled
    pub async fn cancel(&self, id: i64, bookings: &mut [Booking]) -> AppResult<()> {
        self.bookings.cancel_booking(id).await?;
        if let Some(booking) = bookings.iter_mut().find(|b| b.id == id) {
            booking.status = BookingStatus::Cancelled;
        }
        tracing::info!("Booking {} cancelled", id);
        Ok(())
    }
}
