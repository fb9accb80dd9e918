#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Extension, Json, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use tonga::engine::{DistanceResolver, DynBackend, DynProvider, Engine};
use tonga::external::{DistanceMatrixClient, HttpBookingBackend};

/// Fake tours backend and distance provider in one process.
pub struct Mock {
    pub catalog_status: u16,
    pub catalog: Value,
    pub booking_status: u16,
    pub booking_body: Value,
    pub booking_bodies: Mutex<Vec<Value>>,
    pub csrf_headers: Mutex<Vec<Option<String>>>,
    pub provider_meters: f64,
    pub provider_delay: Duration,
    pub provider_calls: AtomicUsize,
}

impl Default for Mock {
    fn default() -> Self {
        Self {
            catalog_status: 200,
            catalog: json!({
                "success": true,
                "timestamp": "2024-01-01T00:00:00Z",
                "car_types": [
                    { "id": 1, "name": "hatchback", "display_name": "Hatchback",
                      "rate_per_km": "12.00", "min_rate_per_km": "10.00", "max_rate_per_km": "14.00",
                      "minimum_distance_cap": "0.00", "is_active": true },
                    { "id": 2, "name": "sedan", "display_name": "Sedan",
                      "rate_per_km": "15.00", "min_rate_per_km": "13.00", "max_rate_per_km": "17.00",
                      "minimum_distance_cap": "0.00", "is_active": true },
                    { "id": 3, "name": "tempo", "display_name": "Tempo Traveller",
                      "rate_per_km": "22.00", "is_active": false }
                ]
            }),
            booking_status: 201,
            booking_body: json!({
                "success": true,
                "message": "Booking created successfully",
                "booking_id": "JTT17040000004321",
                "data": { "booking_id": "JTT17040000004321", "status": "pending" }
            }),
            booking_bodies: Mutex::new(Vec::new()),
            csrf_headers: Mutex::new(Vec::new()),
            provider_meters: 150000.0,
            provider_delay: Duration::ZERO,
            provider_calls: AtomicUsize::new(0),
        }
    }
}

impl Mock {
    pub fn booking_calls(&self) -> usize {
        self.booking_bodies.lock().unwrap().len()
    }

    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::SeqCst)
    }
}

async fn car_types(Extension(mock): Extension<Arc<Mock>>) -> impl IntoResponse {
    let status = StatusCode::from_u16(mock.catalog_status).unwrap();
    (status, Json(mock.catalog.clone()))
}

async fn available_cars() -> impl IntoResponse {
    Json(json!({ "success": true, "data": { "sedan": ["Dzire", "Etios"] } }))
}

async fn create_booking(
    Extension(mock): Extension<Arc<Mock>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let csrf = headers
        .get("X-CSRFToken")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    mock.csrf_headers.lock().unwrap().push(csrf);
    mock.booking_bodies.lock().unwrap().push(body);

    let status = StatusCode::from_u16(mock.booking_status).unwrap();
    (status, Json(mock.booking_body.clone()))
}

async fn booking_by_id(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("booking_id").map(String::as_str) {
        Some("JTT17040000004321") => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "id": 1,
                    "booking_id": "JTT17040000004321",
                    "origin": "Mumbai",
                    "destination": "Pune",
                    "trip_type": "one-way",
                    "distance_km": "150.00",
                    "price": "1800.00",
                    "status": "pending",
                    "status_display": "Pending"
                }
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "Booking not found" })),
        ),
    }
}

async fn distance_matrix(
    Extension(mock): Extension<Arc<Mock>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    mock.provider_calls.fetch_add(1, Ordering::SeqCst);

    if !mock.provider_delay.is_zero() {
        tokio::time::sleep(mock.provider_delay).await;
    }

    if params.get("mode").map(String::as_str) != Some("driving") {
        return Json(json!({ "status": "INVALID_REQUEST" }));
    }

    Json(json!({
        "status": "OK",
        "rows": [{ "elements": [{
            "status": "OK",
            "distance": { "value": mock.provider_meters },
            "duration": { "value": 10800 }
        }]}]
    }))
}

/// Serves `app` on an ephemeral port and returns its base URL.
pub fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });

    format!("http://{}", addr)
}

pub fn spawn_mock(mock: Arc<Mock>) -> String {
    let app = Router::new()
        .route("/api/car-types/", get(car_types))
        .route("/api/available-cars-by-type/", get(available_cars))
        .route("/api/inquiry/create-booking/", post(create_booking))
        .route("/api/inquiry/by-booking-id/", get(booking_by_id))
        .route("/maps/api/distancematrix/json", get(distance_matrix))
        .layer(Extension(mock));

    spawn(app)
}

/// Engine wired to the mock over real HTTP clients.
pub fn engine(mock: Arc<Mock>, provider_timeout: Duration) -> Engine {
    let base = spawn_mock(mock);

    engine_with_booking_base(&base, &base, provider_timeout)
}

/// An address nothing listens on.
pub fn closed_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{}", addr)
}

pub fn engine_with_booking_base(
    provider_base: &str,
    booking_base: &str,
    provider_timeout: Duration,
) -> Engine {
    let provider = DistanceMatrixClient::new(provider_base, "test-key", provider_timeout).unwrap();
    let backend = HttpBookingBackend::new(booking_base, Some("csrf-test-token".into()));

    Engine::with_parts(
        DistanceResolver::new(Some(Arc::new(provider) as DynProvider)),
        Arc::new(backend) as DynBackend,
    )
}
