//! End-to-end tests against an in-process fake of the booking backend

mod auth_flow;
mod blocking_flow;
mod booking_flow;
mod support;
