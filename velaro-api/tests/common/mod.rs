#![allow(dead_code)] // not every test binary uses every helper

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use uuid::Uuid;

use velaro_api::state::{AppState, AuthConfig};
use velaro_booking::{Booking, BookingStatus};
use velaro_catalog::{Station, StationFilter, Trip, TripDetail, TripFilter};
use velaro_core::identity::User;
use velaro_core::repository::{
    BookingRepository, PaymentRepository, StationRepository, TripRepository, UserRepository,
};
use velaro_payment::{
    Payment, PaymentProcessor, PaymentSource, PaymentStatus, ProcessorError, SimulatedProcessor,
};
use velaro_shared::pagination::Page;

pub const TEST_SECRET: &str = "test-secret";
pub const PUBLIC_URL: &str = "http://localhost:8080";

// ============================================================================
// In-memory store implementing the repository traits
// ============================================================================

#[derive(Default)]
pub struct InMemoryStore {
    pub stations: Mutex<Vec<Station>>,
    pub trips: Mutex<Vec<Trip>>,
    pub bookings: Mutex<HashMap<Uuid, Booking>>,
    pub payments: Mutex<HashMap<Uuid, Payment>>,
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryStore {
    pub fn insert_booking(&self, booking: Booking) {
        self.bookings.lock().unwrap().insert(booking.id, booking);
    }

    pub fn booking(&self, id: Uuid) -> Option<Booking> {
        self.bookings.lock().unwrap().get(&id).cloned()
    }

    pub fn payment_for_booking(&self, booking_id: Uuid) -> Option<Payment> {
        self.payments
            .lock()
            .unwrap()
            .values()
            .find(|p| p.booking_id == booking_id)
            .cloned()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.lock().unwrap().len()
    }
}

#[async_trait]
impl StationRepository for InMemoryStore {
    async fn list_stations(
        &self,
        filter: &StationFilter,
        page: &Page,
    ) -> Result<(Vec<Station>, i64), Box<dyn std::error::Error + Send + Sync>> {
        let mut stations: Vec<Station> = self
            .stations
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                filter
                    .country
                    .as_ref()
                    .map_or(true, |c| &s.country_code == c)
            })
            .filter(|s| {
                filter.search.as_ref().map_or(true, |q| {
                    let q = q.to_lowercase();
                    s.name.to_lowercase().contains(&q) || s.address.to_lowercase().contains(&q)
                })
            })
            .cloned()
            .collect();
        stations.sort_by(|a, b| a.name.cmp(&b.name));

        let total = stations.len() as i64;
        let page_rows = stations
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_rows, total))
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn search_trips(
        &self,
        filter: &TripFilter,
        page: &Page,
    ) -> Result<(Vec<Trip>, i64), Box<dyn std::error::Error + Send + Sync>> {
        let mut trips: Vec<Trip> = self
            .trips
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.origin == filter.origin && t.destination == filter.destination)
            .filter(|t| {
                t.departure_time >= filter.window_start && t.departure_time <= filter.window_end
            })
            .filter(|t| !filter.bicycles || t.bicycles_allowed)
            .filter(|t| !filter.dogs || t.dogs_allowed)
            .cloned()
            .collect();
        trips.sort_by_key(|t| t.departure_time);

        let total = trips.len() as i64;
        let page_rows = trips
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_rows, total))
    }

    async fn get_trip(
        &self,
        id: Uuid,
    ) -> Result<Option<Trip>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.trips.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn get_trip_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<TripDetail>, Box<dyn std::error::Error + Send + Sync>> {
        let trip = match self.get_trip(id).await? {
            Some(trip) => trip,
            None => return Ok(None),
        };
        let stations = self.stations.lock().unwrap();
        let origin = stations.iter().find(|s| s.id == trip.origin).cloned();
        let destination = stations.iter().find(|s| s.id == trip.destination).cloned();
        match (origin, destination) {
            (Some(origin), Some(destination)) => {
                Ok(Some(TripDetail { trip, origin, destination }))
            }
            _ => Err("trip references a missing station".into()),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create_booking(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.insert_booking(booking.clone());
        Ok(())
    }

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.booking(id))
    }

    async fn list_bookings(
        &self,
        user_id: Uuid,
        page: &Page,
    ) -> Result<(Vec<Booking>, i64), Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = bookings.len() as i64;
        let page_rows = bookings
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_rows, total))
    }

    async fn delete_booking(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.bookings.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn create_payment(
        &self,
        payment: &Payment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.payments.lock().unwrap().insert(payment.id, payment.clone());
        Ok(())
    }

    async fn booking_has_succeeded_payment(
        &self,
        booking_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .values()
            .any(|p| p.booking_id == booking_id && p.status == PaymentStatus::Succeeded))
    }

    async fn settle_payment(
        &self,
        payment_id: Uuid,
        booking_id: Uuid,
        succeeded: bool,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>> {
        // Mirrors the transactional settle: re-check the hold before
        // confirming, then flip both records together.
        let mut bookings = self.bookings.lock().unwrap();
        let mut payments = self.payments.lock().unwrap();

        let payable = bookings
            .get(&booking_id)
            .map(|b| b.status == BookingStatus::Pending && b.expires_at > Utc::now())
            .unwrap_or(false);

        let final_status = if succeeded && payable {
            PaymentStatus::Succeeded
        } else {
            PaymentStatus::Failed
        };

        if let Some(payment) = payments.get_mut(&payment_id) {
            payment.status = final_status;
        }
        if final_status == PaymentStatus::Succeeded {
            if let Some(booking) = bookings.get_mut(&booking_id) {
                booking.status = BookingStatus::Confirmed;
            }
        }

        Ok(final_status)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(
        &self,
        user: &User,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }
}

// ============================================================================
// Processors with fixed outcomes
// ============================================================================

/// Always approves or always declines, so settle outcomes are deterministic.
pub struct FixedProcessor(pub bool);

#[async_trait]
impl PaymentProcessor for FixedProcessor {
    async fn charge(
        &self,
        _source: &PaymentSource,
        _amount: Decimal,
        _currency: &str,
    ) -> Result<bool, ProcessorError> {
        Ok(self.0)
    }
}

/// Models a gateway outage, as opposed to a decline.
pub struct FailingProcessor;

#[async_trait]
impl PaymentProcessor for FailingProcessor {
    async fn charge(
        &self,
        _source: &PaymentSource,
        _amount: Decimal,
        _currency: &str,
    ) -> Result<bool, ProcessorError> {
        Err(ProcessorError::Unavailable("connection refused".to_string()))
    }
}

// ============================================================================
// Fixtures and app assembly
// ============================================================================

pub fn berlin_id() -> Uuid {
    Uuid::parse_str("efdbb9d1-02c2-4bc3-afb7-6788d8782b1e").unwrap()
}

pub fn paris_id() -> Uuid {
    Uuid::parse_str("b2e783e1-c824-4d63-b37a-d8d698862f1d").unwrap()
}

pub fn berlin() -> Station {
    Station {
        id: berlin_id(),
        name: "Berlin Hauptbahnhof".to_string(),
        address: "Invalidenstraße 10557 Berlin, Germany".to_string(),
        country_code: "DE".to_string(),
        timezone: "Europe/Berlin".to_string(),
    }
}

pub fn paris() -> Station {
    Station {
        id: paris_id(),
        name: "Paris Gare du Nord".to_string(),
        address: "18 Rue de Dunkerque 75010 Paris, France".to_string(),
        country_code: "FR".to_string(),
        timezone: "Europe/Paris".to_string(),
    }
}

pub fn make_trip(
    departure: DateTime<Utc>,
    price: Decimal,
    bicycles_allowed: bool,
    dogs_allowed: bool,
) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        origin: berlin_id(),
        destination: paris_id(),
        departure_time: departure,
        arrival_time: departure + chrono::Duration::hours(6),
        operator: "Deutsche Bahn".to_string(),
        price,
        bicycles_allowed,
        dogs_allowed,
    }
}

pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
}

pub fn test_app_with(processor: Arc<dyn PaymentProcessor>) -> TestApp {
    let store = Arc::new(InMemoryStore::default());
    store.stations.lock().unwrap().extend([berlin(), paris()]);

    let state = AppState {
        stations: store.clone(),
        trips: store.clone(),
        bookings: store.clone(),
        payments: store.clone(),
        users: store.clone(),
        processor,
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        },
        booking_hold_seconds: 3600,
        public_url: PUBLIC_URL.to_string(),
    };

    TestApp {
        app: velaro_api::app(state),
        store,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(Arc::new(SimulatedProcessor::new(1.0)))
}

// ============================================================================
// Request helpers
// ============================================================================

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn guest_token(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/guest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Create a booking over the API and return its id.
pub async fn create_booking(app: &Router, token: &str, trip_id: Uuid) -> Uuid {
    let response = post_json(
        app,
        "/api/bookings",
        Some(token),
        &serde_json::json!({
            "trip_id": trip_id,
            "passenger_name": "Ada Lovelace",
            "has_bicycle": false,
            "has_dog": false
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

pub fn card_payment_body(amount: f64) -> Value {
    serde_json::json!({
        "amount": amount,
        "currency": "eur",
        "source": {
            "object": "card",
            "name": "Ada Lovelace",
            "number": "4242424242424242",
            "cvc": "123",
            "exp_month": 12,
            "exp_year": 2030,
            "address_country": "DE",
            "address_post_code": "10557"
        }
    })
}
