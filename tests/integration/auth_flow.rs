use std::sync::Arc;

use hallbook_client::{
    models::AdminRole,
    services::auth::INVALID_CREDENTIALS,
    session::{AuthSession, MemorySessionStore, SessionStore},
    AppError,
};

use crate::support;

#[tokio::test]
async fn test_login_stores_tokens_and_role() {
    let store = Arc::new(MemorySessionStore::new());
    let (fake, state) = support::spawn_with_store(store.clone()).await;

    let user = state.services.auth.login("admin", "secret").await.unwrap();
    assert_eq!(user.role, Some(AdminRole::Admin));
    assert_eq!(
        fake.requests(),
        vec!["POST /api/token/".to_string(), "GET /api/admin-users/admin/".to_string()]
    );

    // the role lookup already carries the new token
    let authorizations = fake.with(|b| b.authorizations.clone());
    assert_eq!(authorizations[0], None);
    assert_eq!(authorizations[1].as_deref(), Some("Bearer access-token"));

    let saved = store.load().unwrap();
    assert_eq!(saved.auth_token.as_deref(), Some("access-token"));
    assert_eq!(saved.refresh_token.as_deref(), Some("refresh-token"));
    assert_eq!(saved.user_role, Some(AdminRole::Admin));
    assert_eq!(state.services.auth.require_admin().unwrap(), AdminRole::Admin);

    state.services.auth.logout().unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_credentials_leave_no_session() {
    let (fake, state) = support::spawn().await;

    let err = state.services.auth.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
    assert_eq!(err.user_message(), INVALID_CREDENTIALS);
    assert_eq!(fake.count("GET /api/admin-users/"), 0);
    assert!(!state.session.is_authenticated());
}

#[tokio::test]
async fn test_admin_features_need_a_login() {
    let (_fake, state) = support::spawn().await;
    let err = state.services.auth.require_admin().unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
}

#[tokio::test]
async fn test_restored_session_is_used() {
    let store = Arc::new(MemorySessionStore::with_session(AuthSession {
        auth_token: Some("stored-token".into()),
        user_role: Some(AdminRole::Admin),
        username: Some("admin".into()),
        ..Default::default()
    }));
    let (fake, state) = support::spawn_with_store(store).await;

    let halls = state.services.catalog.halls(None).await.unwrap();
    assert_eq!(halls.len(), 3);
    let authorizations = fake.with(|b| b.authorizations.clone());
    assert_eq!(authorizations, vec![Some("Bearer stored-token".to_string())]);
}

#[tokio::test]
async fn test_backend_error_bodies_are_decoded() {
    let (_fake, state) = support::spawn().await;

    let err = state.services.catalog.hall(99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Not found."));
}
