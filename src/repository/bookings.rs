//! Booking endpoints

use async_trait::async_trait;
use chrono::NaiveDate;

use super::Repository;
use crate::{
    error::AppResult,
    models::booking::{
        BookedSlotRecord, Booking, BookingStats, CreateBooking, RejectBooking, UpdateBooking,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsBackend: Send + Sync {
    /// Every non-deleted booking of a hall on one date, with its status
    async fn booked_slots(&self, hall_id: i64, date: NaiveDate) -> AppResult<Vec<BookedSlotRecord>>;
    async fn list_bookings(&self) -> AppResult<Vec<Booking>>;
    async fn get_booking(&self, id: i64) -> AppResult<Booking>;
    async fn create_booking(&self, data: &CreateBooking) -> AppResult<Booking>;
    async fn update_booking(&self, id: i64, data: &UpdateBooking) -> AppResult<Booking>;
    async fn approve_booking(&self, id: i64) -> AppResult<Booking>;
    async fn reject_booking(&self, id: i64, data: &RejectBooking) -> AppResult<Booking>;
    async fn cancel_booking(&self, id: i64) -> AppResult<Booking>;
    async fn bookings_by_email(&self, email: &str) -> AppResult<Vec<Booking>>;
    async fn booking_stats(&self) -> AppResult<BookingStats>;
    async fn pending_approvals(&self) -> AppResult<Vec<Booking>>;
}

#[async_trait]
impl BookingsBackend for Repository {
    async fn booked_slots(&self, hall_id: i64, date: NaiveDate) -> AppResult<Vec<BookedSlotRecord>> {
        self.get_query(
            &format!("/halls/{}/booked_slots/", hall_id),
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        self.get("/bookings/").await
    }

    async fn get_booking(&self, id: i64) -> AppResult<Booking> {
        self.get(&format!("/bookings/{}/", id)).await
    }

    async fn create_booking(&self, data: &CreateBooking) -> AppResult<Booking> {
        self.post("/bookings/", data).await
    }

    async fn update_booking(&self, id: i64, data: &UpdateBooking) -> AppResult<Booking> {
        self.patch(&format!("/bookings/{}/", id), data).await
    }

    async fn approve_booking(&self, id: i64) -> AppResult<Booking> {
        self.post_empty(&format!("/bookings/{}/approve/", id)).await
    }

    async fn reject_booking(&self, id: i64, data: &RejectBooking) -> AppResult<Booking> {
        self.post(&format!("/bookings/{}/reject/", id), data).await
    }

    async fn cancel_booking(&self, id: i64) -> AppResult<Booking> {
        self.post_empty(&format!("/bookings/{}/cancel/", id)).await
    }

    async fn bookings_by_email(&self, email: &str) -> AppResult<Vec<Booking>> {
        self.get_query("/bookings-by-email/", &[("emp_email", email.to_string())])
            .await
    }

    async fn booking_stats(&self) -> AppResult<BookingStats> {
        self.get("/booking-stats/").await
    }

    async fn pending_approvals(&self) -> AppResult<Vec<Booking>> {
        self.get("/pending-approvals/").await
    }
}
