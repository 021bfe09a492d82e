use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use velaro_shared::pagination::{Page, PageQuery};

/// Catalog query validation failures. Every rule is enumerated here; the API
/// layer maps all of them to 400.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("origin must be a UUID, got '{0}'")]
    InvalidOrigin(String),

    #[error("destination must be a UUID, got '{0}'")]
    InvalidDestination(String),

    #[error("origin is required")]
    MissingOrigin,

    #[error("destination is required")]
    MissingDestination,

    #[error("date is required")]
    MissingDate,

    #[error("date must be an ISO 8601 date or datetime, got '{0}'")]
    InvalidDate(String),

    #[error("country must be a 2-letter code, got '{0}'")]
    InvalidCountry(String),

    #[error("coordinates must be 'lat,lng', got '{0}'")]
    InvalidCoordinates(String),

    #[error("{name} must be 'true' or 'false', got '{value}'")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{0}")]
    InvalidPagination(#[from] velaro_shared::pagination::PageError),
}

// ============================================================================
// Stations
// ============================================================================

/// Raw query string for GET /api/stations. Pagination fields are inlined
/// because serde_urlencoded cannot flatten nested structs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<String>,
}

/// Validated station listing filter.
#[derive(Debug, Clone)]
pub struct StationFilter {
    pub search: Option<String>,
    pub country: Option<String>,
    /// Accepted and validated but not used for ordering; distance sort is a
    /// pass-through filter in this reference behavior.
    pub coordinates: Option<(f64, f64)>,
}

impl StationQuery {
    pub fn validate(&self) -> Result<(StationFilter, Page), CatalogError> {
        let page = PageQuery { page: self.page.clone(), limit: self.limit.clone() }.validate()?;

        let country = match &self.country {
            None => None,
            Some(raw) if raw.chars().count() == 2 => Some(raw.clone()),
            Some(raw) => return Err(CatalogError::InvalidCountry(raw.clone())),
        };

        let coordinates = match &self.coordinates {
            None => None,
            Some(raw) => Some(parse_coordinates(raw)?),
        };

        let search = self.search.as_ref().filter(|s| !s.is_empty()).cloned();

        Ok((StationFilter { search, country, coordinates }, page))
    }
}

fn parse_coordinates(raw: &str) -> Result<(f64, f64), CatalogError> {
    let invalid = || CatalogError::InvalidCoordinates(raw.to_string());

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let lng = lng.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok((lat, lng))
}

// ============================================================================
// Trips
// ============================================================================

/// Raw query string for GET /api/trips.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub bicycles: Option<String>,
    pub dogs: Option<String>,
}

/// Validated trip search filter. The departure window covers the whole UTC
/// calendar day of the requested date.
#[derive(Debug, Clone)]
pub struct TripFilter {
    pub origin: Uuid,
    pub destination: Uuid,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// True means "must allow bicycles"; absent/false means no filter.
    pub bicycles: bool,
    pub dogs: bool,
}

impl TripQuery {
    pub fn validate(&self) -> Result<(TripFilter, Page), CatalogError> {
        let page = PageQuery { page: self.page.clone(), limit: self.limit.clone() }.validate()?;

        let origin_raw = self.origin.as_deref().ok_or(CatalogError::MissingOrigin)?;
        let origin = Uuid::parse_str(origin_raw)
            .map_err(|_| CatalogError::InvalidOrigin(origin_raw.to_string()))?;

        let destination_raw = self
            .destination
            .as_deref()
            .ok_or(CatalogError::MissingDestination)?;
        let destination = Uuid::parse_str(destination_raw)
            .map_err(|_| CatalogError::InvalidDestination(destination_raw.to_string()))?;

        let date_raw = self.date.as_deref().ok_or(CatalogError::MissingDate)?;
        let (window_start, window_end) = departure_window(date_raw)?;

        let bicycles = parse_flag("bicycles", self.bicycles.as_deref())?;
        let dogs = parse_flag("dogs", self.dogs.as_deref())?;

        Ok((
            TripFilter {
                origin,
                destination,
                window_start,
                window_end,
                bicycles,
                dogs,
            },
            page,
        ))
    }
}

/// Only an explicit "true" turns the filter on; "false" and absent both mean
/// "no filter", never "must be false".
fn parse_flag(name: &'static str, raw: Option<&str>) -> Result<bool, CatalogError> {
    match raw {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(value) => Err(CatalogError::InvalidFlag { name, value: value.to_string() }),
    }
}

/// Bounds of the UTC calendar day containing `date`:
/// [00:00:00.000, 23:59:59.999] inclusive.
pub fn departure_window(date: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), CatalogError> {
    let day = if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        dt.with_timezone(&Utc).date_naive()
    } else if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        d
    } else {
        return Err(CatalogError::InvalidDate(date.to_string()));
    };

    let start = day.and_hms_milli_opt(0, 0, 0, 0).unwrap().and_utc();
    let end = day.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
    Ok((start, end))
}
