use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use velaro_catalog::{Trip, TripQuery};
use velaro_shared::pagination::PageLinks;

#[derive(Debug, Serialize)]
struct TripResponse {
    id: Uuid,
    origin: Uuid,
    destination: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    operator: String,
    price: Decimal,
    bicycles_allowed: bool,
    dogs_allowed: bool,
    links: TripLinks,
}

#[derive(Debug, Serialize)]
struct TripLinks {
    #[serde(rename = "self")]
    self_link: String,
    origin: String,
    destination: String,
}

impl TripResponse {
    fn from_trip(trip: Trip, public_url: &str) -> Self {
        Self {
            links: TripLinks {
                self_link: format!("{}/api/trips/{}", public_url, trip.id),
                origin: format!("{}/api/stations/{}", public_url, trip.origin),
                destination: format!("{}/api/stations/{}", public_url, trip.destination),
            },
            id: trip.id,
            origin: trip.origin,
            destination: trip.destination,
            departure_time: trip.departure_time,
            arrival_time: trip.arrival_time,
            operator: trip.operator,
            price: trip.price,
            bicycles_allowed: trip.bicycles_allowed,
            dogs_allowed: trip.dogs_allowed,
        }
    }
}

#[derive(Debug, Serialize)]
struct TripListResponse {
    data: Vec<TripResponse>,
    links: PageLinks,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/trips", get(list_trips))
}

/// GET /api/trips
/// Search trips between two stations on a given UTC calendar day.
async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<TripQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, page) = query.validate()?;

    let (trips, total) = state.trips.search_trips(&filter, &page).await?;

    let data = trips
        .into_iter()
        .map(|trip| TripResponse::from_trip(trip, &state.public_url))
        .collect();

    // The search terms ride along on the pagination links so next/prev stay
    // valid requests.
    let base_url = format!("{}/api/trips", state.public_url);
    let search_terms = format!(
        "origin={}&destination={}&date={}",
        filter.origin,
        filter.destination,
        query.date.as_deref().unwrap_or_default()
    );
    let links = PageLinks::build(&base_url, &page, total).with_query(&search_terms);

    Ok((
        [(header::CACHE_CONTROL, "public, max-age=300")],
        Json(TripListResponse { data, links }),
    ))
}
