//! Plain-text rendering of command results

use std::fmt::Write;

use crate::{
    models::{
        blocked_date::BlockedDate,
        booking::Booking,
        dashboard::DashboardSnapshot,
        hall::{Hall, Office, SessionMaster},
    },
    services::{
        auth::SessionInfo,
        availability::{Availability, SlotBoard},
        batch::{BatchReport, ItemOutcome},
        calendar::{BookingCalendar, MonthGrid},
    },
};

pub fn offices(offices: &[Office]) -> String {
    let mut out = String::new();
    for office in offices {
        let _ = writeln!(
            out,
            "{:>4}  {:<10} {:<30} {}",
            office.id, office.office_code, office.office_name, office.office_city
        );
    }
    out
}

pub fn halls(halls: &[Hall]) -> String {
    let mut out = String::new();
    for hall in halls {
        let _ = writeln!(
            out,
            "{:>4}  {:<10} {:<28} {:<10} {:>4} seats  {}{}",
            hall.id,
            hall.hall_code,
            hall.hall_name,
            hall.category.as_str(),
            hall.capacity,
            hall.office_name.as_deref().unwrap_or("-"),
            if hall.is_freeze { "  [frozen]" } else { "" },
        );
    }
    out
}

pub fn hall(hall: &Hall) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", hall.hall_name, hall.hall_code);
    let _ = writeln!(out, "Office:    {}", hall.office_name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Category:  {}", hall.category);
    let _ = writeln!(out, "Capacity:  {}", hall.capacity);
    let amenities = hall.amenities.present();
    if !amenities.is_empty() {
        let _ = writeln!(out, "Amenities: {}", amenities.join(", "));
    }
    if let Some(about) = hall.about.as_deref().filter(|a| !a.is_empty()) {
        let _ = writeln!(out, "{}", about);
    }
    if let Some(image) = &hall.image {
        let _ = writeln!(out, "Image:     {}", image);
    }
    if hall.is_freeze {
        let _ = writeln!(out, "This hall is frozen and cannot be booked.");
    }
    out
}

pub fn board(board: &SlotBoard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hall {} on {}", board.hall_id, board.date);
    for state in &board.states {
        let status = match &state.availability {
            Availability::Available if state.disabled => "past".to_string(),
            Availability::Available => "available".to_string(),
            Availability::PendingExisting { holder } => format!("pending ({})", holder),
            Availability::ApprovedBlocked => "booked".to_string(),
        };
        let _ = writeln!(out, "  {:<22} {}", state.slot.label(), status);
    }
    out
}

/// Month grid with `*` on blocked days and `.` on days outside the bookable window
pub fn month(grid: &MonthGrid, calendar: &BookingCalendar) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^35}", grid.title());
    for weekday in MonthGrid::WEEKDAYS {
        let _ = write!(out, " {:<4}", weekday.to_string());
    }
    out.push('\n');
    for week in grid.weeks() {
        for day in week {
            if !grid.in_month(*day) {
                out.push_str("     ");
                continue;
            }
            let mark = if calendar.is_blocked(*day) {
                '*'
            } else if calendar.is_selectable(*day) {
                ' '
            } else {
                '.'
            };
            let _ = write!(out, " {:>2}{} ", chrono::Datelike::day(day), mark);
        }
        out.push('\n');
    }
    out
}

pub fn bookings(bookings: &[&Booking]) -> String {
    let mut out = String::new();
    for booking in bookings {
        let _ = writeln!(
            out,
            "#{:<5} {} {:<22} {:<24} {:<10} {} <{}>",
            booking.id,
            booking.slot_date,
            booking.slot_time,
            booking.hall_name.as_deref().unwrap_or("-"),
            booking.status,
            booking.emp_name,
            booking.emp_email_id,
        );
    }
    if bookings.is_empty() {
        out.push_str("No bookings found.\n");
    }
    out
}

pub fn booking(booking: &Booking) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Booking #{} ({})", booking.id, booking.status);
    let _ = writeln!(out, "Date:     {}", booking.slot_date);
    let _ = writeln!(out, "Time:     {}", booking.slot_time);
    let _ = writeln!(
        out,
        "Hall:     {} / {}",
        booking.office_name.as_deref().unwrap_or("-"),
        booking.hall_name.as_deref().unwrap_or("-")
    );
    if let Some(session) = &booking.session_type {
        let _ = writeln!(out, "Session:  {}", session);
    }
    let _ = writeln!(out, "Employee: {} ({}) <{}>", booking.emp_name, booking.emp_code, booking.emp_email_id);
    if !booking.team_name.is_empty() {
        let _ = writeln!(out, "Team:     {}", booking.team_name);
    }
    if let Some(description) = booking.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "Notes:    {}", description);
    }
    out
}

pub fn report<K: std::fmt::Display>(report: &BatchReport<K>) -> String {
    let mut out = String::new();
    for item in &report.items {
        let outcome = match &item.outcome {
            ItemOutcome::Applied { id: Some(id) } => format!("ok (#{})", id),
            ItemOutcome::Applied { id: None } => "ok".to_string(),
            ItemOutcome::Failed { message } => format!("FAILED: {}", message),
            ItemOutcome::NotAttempted => "skipped".to_string(),
        };
        let _ = writeln!(out, "  {:<40} {}", item.key.to_string(), outcome);
    }
    let _ = writeln!(out, "{}", report);
    out
}

pub fn blocked(rows: &[BlockedDate]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "#{:<5} {} {:<24} {:<20} {}",
            row.id,
            row.blocked_date,
            row.hall_name.as_deref().unwrap_or("all halls"),
            row.office_name.as_deref().unwrap_or("-"),
            row.reason.as_deref().unwrap_or(""),
        );
    }
    if rows.is_empty() {
        out.push_str("No blocked dates.\n");
    }
    out
}

pub fn sessions(sessions: &[SessionMaster]) -> String {
    let mut out = String::new();
    for session in sessions {
        let preferred: Vec<String> = session
            .preferred_halls()
            .iter()
            .enumerate()
            .map(|(level, hall)| match hall {
                Some(id) => format!("{}:{}", level + 1, id),
                None => format!("{}:-", level + 1),
            })
            .collect();
        let _ = writeln!(
            out,
            "{:>4}  {:<10} {:<24} preferred halls {}",
            session.id,
            session.session_code,
            session.session_type,
            preferred.join(" ")
        );
    }
    out
}

pub fn dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    if let Some(stats) = &snapshot.stats {
        let _ = writeln!(
            out,
            "Halls: {} total, {} available, {} in use, {} with upcoming bookings",
            stats.total_halls, stats.available_halls, stats.working_halls, stats.upcoming_booked_halls
        );
        let _ = writeln!(
            out,
            "Bookings: {} pending, {} approved, {} rejected, {} cancelled",
            stats.pending_bookings, stats.approved_bookings, stats.rejected_bookings, stats.cancelled_bookings
        );
        if !stats.upcoming_bookings.is_empty() {
            let _ = writeln!(out, "Upcoming:");
            out.push_str(&bookings(&stats.upcoming_bookings.iter().collect::<Vec<_>>()));
        }
    }
    if let Some(counts) = &snapshot.booking_stats {
        let _ = writeln!(
            out,
            "Overall: {} pending, {} approved, {} rejected",
            counts.pending, counts.approved, counts.rejected
        );
    }
    let _ = writeln!(out, "In use now:");
    if snapshot.working_halls.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for hall in &snapshot.working_halls {
        let _ = writeln!(
            out,
            "  {:<24} {:<22} {} ({})",
            hall.hall_name, hall.slot_time, hall.team_name, hall.emp_name
        );
    }
    let _ = writeln!(out, "Awaiting approval: {}", snapshot.pending_approvals.len());
    for error in &snapshot.errors {
        let _ = writeln!(out, "! {}", error);
    }
    out
}

pub fn session_info(info: &SessionInfo) -> String {
    let mut out = String::new();
    match &info.username {
        Some(username) => {
            let role = info.role.map(|r| r.to_string()).unwrap_or_else(|| "unknown role".to_string());
            let _ = writeln!(out, "Logged in as {} ({})", username, role);
        }
        None => {
            let _ = writeln!(out, "Not logged in");
        }
    }
    if let Some(expires_at) = info.expires_at {
        let state = if info.expired { "expired" } else { "expires" };
        let _ = writeln!(out, "Access token {} at {}", state, expires_at.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(email) = &info.user_email {
        let _ = writeln!(out, "Verified email: {}", email);
    }
    out
}
