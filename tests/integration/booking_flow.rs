use chrono::Duration;

use hallbook_client::{
    models::{booking::BookingDraft, hall::HallAmenities, Shift, Slot},
    services::{
        availability::classify,
        batch::ItemOutcome,
        calendar::{BlockedDates, BookingCalendar},
        otp::{OtpGate, OtpState, INVALID_OTP},
        selection::{BookingSelection, ToggleOutcome},
    },
    AppError,
};

use crate::support::{self, DUPLICATE_SLOT};

fn draft() -> BookingDraft {
    BookingDraft {
        emp_code: "E100".into(),
        emp_name: "Asha".into(),
        emp_email_id: "asha@example.com".into(),
        emp_mobile_no: "9999999999".into(),
        team_name: "Platform".into(),
        session: Some(2),
        shift: Shift::Day,
        description: "Sprint review".into(),
        amenities: HallAmenities::from_names(["wifi", "chairs_tables"]).unwrap(),
        ..Default::default()
    }
}

fn slot(hour: u32) -> Slot {
    Slot::starting_at(hour, 0).unwrap()
}

/// Selection of `days` consecutive days from tomorrow, with `slots` picked
fn selection(state: &hallbook_client::AppState, days: i64, slots: &[Slot]) -> BookingSelection {
    let today = state.services.calendar.today();
    let calendar = BookingCalendar::new(today, 60, BlockedDates::default());
    let from = today + Duration::days(1);
    let to = from + Duration::days(days - 1);

    let mut selection = BookingSelection::new();
    selection.select_range(from, to, &calendar).unwrap();
    for slot in slots {
        assert_eq!(selection.toggle_slot(&classify(*slot, &[], None)), ToggleOutcome::Added);
    }
    selection
}

#[tokio::test]
async fn test_three_days_one_slot_creates_three_bookings() {
    let (fake, state) = support::spawn().await;
    let hall = support::hall(1, 10);
    let mut selection = selection(&state, 3, &[slot(9)]);

    let report = state
        .services
        .submission
        .submit(Some(&hall), &draft(), &mut selection, true)
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(fake.count("POST /api/bookings/"), 3);
    let created = fake.with(|b| b.created_bookings.clone());
    let dates: Vec<_> = created.iter().map(|b| b["slot_date"].clone()).collect();
    assert_eq!(dates.len(), 3);
    assert_ne!(dates[0], dates[1]);
    assert!(created.iter().all(|b| b["slot_time"] == "9:00 AM - 9:30 AM"));
    assert!(created.iter().all(|b| b["office"] == 10 && b["session"] == 2));
    assert!(created.iter().all(|b| b["wifi"] == true && b["chairs_tables"] == true && b["tv"] == false));

    // a fully successful run clears the selection
    assert_eq!(selection.slot_count(), 0);
    assert!(selection.range().is_empty());

    let confirmation = state
        .services
        .submission
        .confirmation(report.last_applied_id().unwrap())
        .await
        .unwrap();
    assert_eq!(confirmation.emp_name, "Asha");
}

#[tokio::test]
async fn test_failed_create_stops_the_batch_without_rollback() {
    let (fake, state) = support::spawn().await;
    fake.with(|b| b.fail_create_at = Some(2));
    let hall = support::hall(1, 10);
    let mut selection = selection(&state, 1, &[slot(9), slot(10), slot(11)]);

    let report = state
        .services
        .submission
        .submit(Some(&hall), &draft(), &mut selection, true)
        .await
        .unwrap();

    assert_eq!(fake.count("POST /api/bookings/"), 2);
    assert_eq!(fake.count("DELETE"), 0);
    assert_eq!(report.applied_count(), 1);
    assert_eq!(report.not_attempted_count(), 1);
    assert!(matches!(report.items[1].outcome, ItemOutcome::Failed { .. }));
    assert_eq!(report.failure.as_deref(), Some(DUPLICATE_SLOT));

    // the selection is kept so the requester can retry
    assert_eq!(selection.slot_count(), 3);
}

#[tokio::test]
async fn test_unverified_email_sends_nothing() {
    let (fake, state) = support::spawn().await;
    let hall = support::hall(1, 10);
    let mut selection = selection(&state, 1, &[slot(9)]);

    let err = state
        .services
        .submission
        .submit(Some(&hall), &draft(), &mut selection, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_requests_carry_the_bearer_token() {
    let (fake, state) = support::spawn().await;
    state.session.set_tokens("access-token".into(), None).unwrap();
    let hall = support::hall(2, 10);
    let mut selection = selection(&state, 1, &[slot(14)]);

    state
        .services
        .submission
        .submit(Some(&hall), &draft(), &mut selection, true)
        .await
        .unwrap();

    let authorizations = fake.with(|b| b.authorizations.clone());
    assert_eq!(authorizations, vec![Some("Bearer access-token".to_string())]);
}

#[tokio::test]
async fn test_otp_round_trip() {
    let (fake, state) = support::spawn().await;
    let otp = &state.services.otp;
    let mut gate = OtpGate::new(std::time::Duration::from_secs(120));
    gate.set_email("asha@example.com");

    otp.send(&mut gate).await.unwrap();
    assert!(!gate.can_send());

    let err = otp.verify(&mut gate, "000000").await.unwrap_err();
    assert_eq!(err.user_message(), INVALID_OTP);
    assert!(!gate.is_verified());

    otp.verify(&mut gate, "123456").await.unwrap();
    assert_eq!(gate.state(), OtpState::Verified);
    assert_eq!(fake.count("POST /api/verify-otp/"), 2);
}
