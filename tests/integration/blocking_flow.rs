use chrono::Duration;
use std::sync::Arc;

use hallbook_client::{
    cli::{admin, RangeArgs},
    models::AdminRole,
    services::blocking::{admin_range, range_status, HallScope, PAST_DATE},
    session::{AuthSession, MemorySessionStore},
    AppError,
};

use crate::support;

#[tokio::test]
async fn test_block_then_unblock_an_office() {
    let (fake, state) = support::spawn().await;
    let blocking = &state.services.blocking;
    let today = state.services.calendar.today();
    let from = today + Duration::days(1);
    let to = from + Duration::days(1);
    let range = admin_range(from, Some(to), today).unwrap();

    let halls = blocking.halls_in_scope(&HallScope::parse("Pune")).await.unwrap();
    assert_eq!(halls.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1, 2]);

    let report = blocking.block(halls.clone(), &range).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(fake.count("POST /api/blocked-dates/"), 4);

    let blocked = blocking.blocked_for(&halls, from, to).await.unwrap();
    let status = range_status(&range, &blocked).unwrap();
    assert!(status.has_blocked);
    assert!(!status.has_open);

    // the requester calendar of a blocked hall refuses those days
    let calendar = state.services.calendar.booking_calendar(1).await.unwrap();
    assert!(calendar.is_blocked(from));
    assert!(!calendar.is_selectable(to));

    let report = blocking.unblock(halls, &range).await.unwrap();
    assert_eq!(report.applied_count(), 4);
    assert_eq!(fake.count("DELETE /api/blocked-dates/"), 4);
    assert!(fake.with(|b| b.blocked.is_empty()));
}

#[tokio::test]
async fn test_unblock_with_nothing_blocked_is_empty() {
    let (fake, state) = support::spawn().await;
    let blocking = &state.services.blocking;
    let today = state.services.calendar.today();
    let range = admin_range(today, None, today).unwrap();

    let halls = blocking.halls_in_scope(&HallScope::All).await.unwrap();
    let report = blocking.unblock(halls, &range).await.unwrap();
    assert!(report.is_empty());
    assert_eq!(fake.count("DELETE"), 0);
}

#[tokio::test]
async fn test_unknown_office_has_no_halls() {
    let (fake, state) = support::spawn().await;
    let blocking = &state.services.blocking;
    let today = state.services.calendar.today();
    let range = admin_range(today, None, today).unwrap();

    let halls = blocking.halls_in_scope(&HallScope::parse("Nowhere")).await.unwrap();
    let err = blocking.block(halls, &range).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(fake.count("POST"), 0);
}

#[test]
fn test_past_range_is_refused() {
    let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let err = admin_range(today - Duration::days(1), Some(today), today).unwrap_err();
    assert_eq!(err.user_message(), PAST_DATE);
}

#[tokio::test]
async fn test_blocked_command_fetches_each_resource_once() {
    let store = Arc::new(MemorySessionStore::with_session(AuthSession {
        auth_token: Some("access-token".into()),
        user_role: Some(AdminRole::Admin),
        username: Some("admin".into()),
        ..Default::default()
    }));
    let (fake, state) = support::spawn_with_store(store).await;
    let today = state.services.calendar.today();
    let range = admin_range(today, Some(today + Duration::days(2)), today).unwrap();
    let halls = state.services.blocking.halls_in_scope(&HallScope::All).await.unwrap();
    state.services.blocking.block(halls, &range).await.unwrap();
    let before = fake.requests().len();

    let args = RangeArgs {
        scope: "Pune".into(),
        from: today - Duration::days(3),
        to: Some(today + Duration::days(1)),
    };
    admin::blocked(&state, args).await.unwrap();

    let requests = fake.requests()[before..].to_vec();
    assert_eq!(
        requests,
        vec!["GET /api/halls/".to_string(), "GET /api/blocked-dates/by_date/".to_string()]
    );
}
