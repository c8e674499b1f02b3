//! Requester commands: browsing, availability, booking and history

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        blocked_date::HallFilter,
        booking::{BookingDraft, SupportRequests},
        enums::HallCategory,
        hall::HallAmenities,
        slot::Slot,
    },
    services::{
        calendar::{BlockedDates, BookingCalendar, MonthGrid},
        catalog::filter_by_category,
        history::{HistoryService, StatusFilter},
        otp::OtpGate,
        selection::{BookingSelection, ToggleOutcome},
        slots::generate_slots_between,
        submission::prepare_batch,
    },
    AppState,
};

use super::{prompt::Prompt, render, BookArgs};

const OTP_ATTEMPTS: usize = 3;

pub fn slots(state: &AppState, from_hour: Option<u32>, to_hour: Option<u32>) -> AppResult<()> {
    let booking = &state.config.booking;
    let slots = generate_slots_between(
        from_hour.unwrap_or(booking.first_hour),
        to_hour.unwrap_or(booking.last_hour),
    );
    for slot in slots {
        println!("{}", slot);
    }
    Ok(())
}

pub async fn offices(state: &AppState) -> AppResult<()> {
    let offices = state.services.catalog.offices().await?;
    print!("{}", render::offices(&offices));
    Ok(())
}

pub async fn halls(state: &AppState, office: Option<i64>, category: Option<HallCategory>) -> AppResult<()> {
    let halls = state.services.catalog.halls(office).await?;
    print!("{}", render::halls(&filter_by_category(halls, category)));
    Ok(())
}

pub async fn hall(state: &AppState, id: i64) -> AppResult<()> {
    let hall = state.services.catalog.hall(id).await?;
    print!("{}", render::hall(&hall));
    Ok(())
}

pub async fn availability(state: &AppState, hall: i64, date: Option<NaiveDate>) -> AppResult<()> {
    let date = date.unwrap_or_else(|| state.services.calendar.today());
    let board = state.services.availability.board(hall, date).await?;
    print!("{}", render::board(&board));
    Ok(())
}

pub async fn calendar(state: &AppState, hall: i64, month: Option<(i32, u32)>) -> AppResult<()> {
    let today = state.services.calendar.today();
    let grid = match month {
        Some((year, month)) => MonthGrid::new(year, month)?,
        None => MonthGrid::containing(today)?,
    };
    let blocked = state
        .services
        .calendar
        .blocked_in_month(HallFilter::One(hall), &grid)
        .await?;
    let calendar = BookingCalendar::new(today, state.config.booking.horizon_days, BlockedDates::new(blocked));
    print!("{}", render::month(&grid, &calendar));
    Ok(())
}

/// Ask the backend for an OTP and read it back from the terminal
async fn verify_email(state: &AppState, prompt: &mut Prompt, email: &str) -> AppResult<OtpGate> {
    let otp = &state.services.otp;
    let mut gate = OtpGate::new(state.config.otp_resend_delay());
    gate.set_email(email);
    otp.send(&mut gate).await?;
    println!("An OTP was sent to {}", gate.email());

    for attempt in 1..=OTP_ATTEMPTS {
        let code = prompt.ask("Enter OTP:").await?;
        match otp.verify(&mut gate, &code).await {
            Ok(()) => {
                state.services.auth.remember_email(gate.email())?;
                return Ok(gate);
            }
            Err(e) if attempt < OTP_ATTEMPTS => eprintln!("{}", e.user_message()),
            Err(e) => return Err(e),
        }
    }
    Ok(gate)
}

pub async fn book(state: &AppState, prompt: &mut Prompt, args: BookArgs) -> AppResult<()> {
    let services = &state.services;
    let hall = services.catalog.hall(args.hall).await?;
    if hall.is_freeze {
        return Err(AppError::Validation(format!("{} is not open for booking", hall.hall_name)));
    }

    let calendar = services.calendar.booking_calendar(hall.id).await?;
    let mut selection = BookingSelection::new();
    selection.select_range(args.from, args.to.unwrap_or(args.from), &calendar)?;

    // slots are classified on the board of the first day
    let board = services.availability.board(hall.id, args.from).await?;
    let wanted: BTreeSet<Slot> = args.slots.iter().copied().collect();
    for slot in wanted {
        let slot_state = board
            .state(&slot)
            .ok_or_else(|| AppError::Validation(format!("{} is outside booking hours", slot)))?;
        match selection.toggle_slot(slot_state) {
            ToggleOutcome::Added | ToggleOutcome::Removed => {}
            ToggleOutcome::NeedsConfirmation { prompt: question } => {
                if args.yes || prompt.confirm(&question).await? {
                    selection.confirm_pending();
                } else {
                    selection.cancel_pending();
                }
            }
            ToggleOutcome::Refused => {
                return Err(AppError::Validation(format!("{} is not available", slot)));
            }
        }
    }

    let amenities = HallAmenities::from_names(args.amenities.iter().map(String::as_str))?;
    let draft = BookingDraft {
        emp_code: args.emp_code,
        emp_name: args.emp_name,
        emp_email_id: args.email,
        emp_mobile_no: args.mobile,
        team_name: args.team,
        session: args.session,
        shift: args.shift,
        description: args.description,
        support: SupportRequests {
            it_support: args.it_support,
            hr_support: args.hr_support,
            fin_support: args.fin_support,
            caf_support: args.caf_support,
        },
        amenities,
    };

    // check the form before spending an OTP on it
    prepare_batch(Some(&hall), &draft, &selection, true)?;
    let gate = verify_email(state, prompt, &draft.emp_email_id).await?;

    let report = services
        .submission
        .submit(Some(&hall), &draft, &mut selection, gate.is_verified())
        .await?;
    print!("{}", render::report(&report));

    if let Some(id) = report.last_applied_id() {
        let booking = services.submission.confirmation(id).await?;
        print!("{}", render::booking(&booking));
    }
    match report.failure {
        Some(failure) => Err(AppError::BadRequest(failure)),
        None => Ok(()),
    }
}

pub async fn show_booking(state: &AppState, id: i64) -> AppResult<()> {
    let booking = state.services.submission.confirmation(id).await?;
    print!("{}", render::booking(&booking));
    Ok(())
}

pub async fn history(state: &AppState, prompt: &mut Prompt, status: &str, email: Option<String>) -> AppResult<()> {
    let filter: StatusFilter = status.parse()?;
    let remembered = state.session.user_email();

    let email = match (email, remembered) {
        (Some(email), Some(known)) if email.trim().eq_ignore_ascii_case(&known) => None,
        (Some(email), _) => Some(email),
        (None, Some(_)) => None,
        (None, None) => Some(prompt.ask("Email:").await?),
    };
    if let Some(email) = email {
        verify_email(state, prompt, &email).await?;
    }

    let bookings = state.services.history.my_bookings().await?;
    print!("{}", render::bookings(&HistoryService::filter(&bookings, filter)));
    Ok(())
}

pub async fn cancel(state: &AppState, id: i64) -> AppResult<()> {
    let history = &state.services.history;
    let mut bookings = history.my_bookings().await?;
    if !bookings.iter().any(|b| b.id == id) {
        return Err(AppError::NotFound(format!("Booking #{} is not in your history", id)));
    }
    history.cancel(id, &mut bookings).await?;
    let cancelled: Vec<_> = bookings.iter().filter(|b| b.id == id).collect();
    print!("{}", render::bookings(&cancelled));
    Ok(())
}
