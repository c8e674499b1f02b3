//! In-process fake of the booking backend

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use hallbook_client::{
    models::Hall,
    session::{MemorySessionStore, SessionStore},
    AppConfig, AppState,
};

pub const AMENITY_KEYS: [&str; 8] = [
    "wifi",
    "tv",
    "whiteboard",
    "speaker",
    "mic",
    "extension_power_box",
    "stationaries",
    "chairs_tables",
];

pub const DUPLICATE_SLOT: &str = "The fields hall, slot_date, slot_time must make a unique set.";

#[derive(Default)]
pub struct Backend {
    /// "METHOD /path" of every request, in arrival order
    pub requests: Vec<String>,
    /// Authorization header of every request
    pub authorizations: Vec<Option<String>>,
    pub created_bookings: Vec<Value>,
    pub blocked: Vec<Value>,
    /// 1-based index of the create call that answers 400
    pub fail_create_at: Option<usize>,
    pub create_calls: usize,
    pub next_id: i64,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub inner: Arc<Mutex<Backend>>,
}

impl FakeBackend {
    pub fn with<T>(&self, f: impl FnOnce(&mut Backend) -> T) -> T {
        f(&mut self.inner.lock().unwrap())
    }

    pub fn requests(&self) -> Vec<String> {
        self.with(|b| b.requests.clone())
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }
}

pub fn hall_json(id: i64, office: Option<i64>, office_name: &str) -> Value {
    json!({
        "id": id,
        "office": office,
        "office_name": office_name,
        "hall_code": format!("H{}", id),
        "hall_name": format!("Hall {}", id),
        "about": null,
        "image": null,
        "capacity": 12,
        "category": "ROOM",
        "is_freeze": false,
        "wifi": true,
        "tv": false
    })
}

pub fn hall(id: i64, office: i64) -> Hall {
    serde_json::from_value(hall_json(id, Some(office), "Pune")).unwrap()
}

fn halls() -> Vec<Value> {
    vec![
        hall_json(1, Some(10), "Pune"),
        hall_json(2, Some(10), "Pune"),
        hall_json(3, Some(20), "Chennai"),
    ]
}

async fn record(State(fake): State<FakeBackend>, request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<axum::extract::OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let line = format!("{} {}", request.method(), path);
    let auth = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.with(|b| {
        b.requests.push(line);
        b.authorizations.push(auth);
    });
    next.run(request).await
}

async fn create_booking(State(fake): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    if let Some(missing) = AMENITY_KEYS.iter().find(|key| !body[**key].is_boolean()) {
        let mut error = serde_json::Map::new();
        error.insert(missing.to_string(), json!(["This field is required."]));
        return (StatusCode::BAD_REQUEST, Json(Value::Object(error))).into_response();
    }
    fake.with(|b| {
        b.create_calls += 1;
        if b.fail_create_at == Some(b.create_calls) {
            let error = json!({ "non_field_errors": [DUPLICATE_SLOT] });
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
        b.next_id += 1;
        let mut booking = body.clone();
        booking["id"] = json!(100 + b.next_id);
        booking["status"] = json!("Pending");
        booking["book_date"] = Value::Null;
        booking["office_name"] = json!("Pune");
        booking["hall_name"] = json!(format!("Hall {}", body["hall"]));
        booking["hall_category"] = json!("ROOM");
        booking["session_type"] = json!("Training");
        booking["created_at"] = Value::Null;
        b.created_bookings.push(booking.clone());
        (StatusCode::CREATED, Json(booking)).into_response()
    })
}

async fn get_booking(State(fake): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    fake.with(|b| {
        match b.created_bookings.iter().find(|booking| booking["id"] == json!(id)) {
            Some(booking) => Json(booking.clone()).into_response(),
            None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response(),
        }
    })
}

async fn delete_booking(Path(_id): Path<i64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn booked_slots(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!([]))
}

async fn list_halls() -> Json<Value> {
    Json(Value::Array(halls()))
}

async fn get_hall(Path(id): Path<i64>) -> Response {
    match halls().into_iter().find(|hall| hall["id"] == json!(id)) {
        Some(hall) => Json(hall).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response(),
    }
}

async fn blocked_by_date(
    State(fake): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let day = |key: &str| {
        params
            .get(key)
            .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
    };
    let (Some(start), Some(end)) = (day("start_date"), day("end_date")) else {
        return Json(json!([]));
    };
    let rows: Vec<Value> = fake.with(|b| {
        b.blocked
            .iter()
            .filter(|row| {
                let date = row["blocked_date"]
                    .as_str()
                    .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok());
                date.is_some_and(|d| d >= start && d <= end)
            })
            .cloned()
            .collect()
    });
    Json(Value::Array(rows))
}

async fn create_blocked(State(fake): State<FakeBackend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    fake.with(|b| {
        b.next_id += 1;
        let mut row = body.clone();
        row["id"] = json!(500 + b.next_id);
        row["office_name"] = Value::Null;
        row["hall_name"] = Value::Null;
        row["created_by_name"] = json!("admin");
        b.blocked.push(row.clone());
        (StatusCode::CREATED, Json(row))
    })
}

async fn delete_blocked(State(fake): State<FakeBackend>, Path(id): Path<i64>) -> StatusCode {
    fake.with(|b| {
        let before = b.blocked.len();
        b.blocked.retain(|row| row["id"] != json!(id));
        if b.blocked.len() < before {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::NOT_FOUND
        }
    })
}

async fn obtain_token(Json(body): Json<Value>) -> Response {
    if body["username"] == "admin" && body["password"] == "secret" {
        Json(json!({ "access": "access-token", "refresh": "refresh-token" })).into_response()
    } else {
        let error = json!({ "detail": "No active account found with the given credentials" });
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

async fn admin_user(Path(code): Path<String>) -> Json<Value> {
    Json(json!({
        "admin_code": code,
        "username": code,
        "email": "admin@example.com",
        "role": "ADMIN",
        "office": 10,
        "office_name": "Pune",
        "is_active": true
    }))
}

async fn send_otp(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some(email) if email.contains('@') => Json(json!({ "message": "OTP sent" })).into_response(),
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "email": ["Enter a valid email address."] }))).into_response(),
    }
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    if body["otp"] == "123456" {
        Json(json!({ "message": "OTP verified" })).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid OTP" }))).into_response()
    }
}

pub fn router(fake: FakeBackend) -> Router {
    let api = Router::new()
        .route("/bookings/", post(create_booking))
        .route("/bookings/:id/", get(get_booking).delete(delete_booking))
        .route("/halls/", get(list_halls))
        .route("/halls/:id/", get(get_hall))
        .route("/halls/:id/booked_slots/", get(booked_slots))
        .route("/blocked-dates/", post(create_blocked))
        .route("/blocked-dates/by_date/", get(blocked_by_date))
        .route("/blocked-dates/:id/", delete(delete_blocked))
        .route("/token/", post(obtain_token))
        .route("/admin-users/:code/", get(admin_user))
        .route("/send-otp/", post(send_otp))
        .route("/verify-otp/", post(verify_otp))
        .layer(middleware::from_fn_with_state(fake.clone(), record))
        .with_state(fake);
    Router::new().nest("/api", api)
}

/// Fake backend on an ephemeral port plus client state pointed at it
pub async fn spawn() -> (FakeBackend, AppState) {
    spawn_with_store(Arc::new(MemorySessionStore::new())).await
}

pub async fn spawn_with_store(store: Arc<dyn SessionStore>) -> (FakeBackend, AppState) {
    let fake = FakeBackend::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(fake.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = AppConfig::default();
    config.backend.base_url = format!("http://{}/api", addr);
    config.backend.timeout_secs = 5;
    let state = AppState::with_store(config, store).unwrap();
    (fake, state)
}
