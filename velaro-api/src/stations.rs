use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use velaro_catalog::{Station, StationQuery};
use velaro_shared::pagination::PageLinks;

#[derive(Debug, Serialize)]
struct StationListResponse {
    data: Vec<Station>,
    links: PageLinks,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/stations", get(list_stations))
}

/// GET /api/stations
/// List stations, optionally filtered by free text and country.
async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, page) = query.validate()?;

    let (stations, total) = state.stations.list_stations(&filter, &page).await?;

    // Reference data changes rarely; let clients cache it for an hour.
    let base_url = format!("{}/api/stations", state.public_url);
    let links = PageLinks::build(&base_url, &page, total);

    Ok((
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(StationListResponse { data: stations, links }),
    ))
}
