use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use velaro_booking::BookingError;
use velaro_catalog::CatalogError;
use velaro_payment::{PaymentError, ProcessorError};
use velaro_shared::pagination::PageError;
use velaro_shared::problem::{Problem, PROBLEM_CONTENT_TYPE};

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Authentication(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title, detail) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            ApiError::Authentication(msg) => (StatusCode::UNAUTHORIZED, "Unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "Forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg),
            ApiError::Internal(err) => {
                // Full detail stays server-side.
                tracing::error!("Internal Server Error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let problem = Problem::new(status.as_u16(), title, detail);

        (
            status,
            [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            Json(problem),
        )
            .into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::AlreadyPaid => ApiError::Conflict(err.to_string()),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<ProcessorError> for ApiError {
    fn from(err: ProcessorError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        ApiError::Internal(anyhow::anyhow!(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}
