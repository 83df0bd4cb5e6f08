//! Error types for the order service
//!
//! One thiserror enum per layer. Only `ApiError` reaches HTTP clients, and it
//! carries generic messages; store detail stays in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error ==
/// Failures of the durable order store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No order with this identifier
    #[error("order not found: {0}")]
    NotFound(String),

    /// An order with this identifier is already stored
    #[error("order already exists: {0}")]
    AlreadyExists(String),

    /// Could not reach the database or obtain a connection
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Statement or row decoding failed
    #[error("query failed: {0}")]
    Query(String),
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return StoreError::Unavailable(err.to_string());
        }
        StoreError::Query(err.to_string())
    }
}

// == Ingest Error ==
/// Why a single stream message was skipped.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Payload is not a JSON order
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Order violates the field rules
    #[error("validation failed for {order_uid}: {}", .errors.join("; "))]
    Validation {
        order_uid: String,
        errors: Vec<String>,
    },

    /// Store rejected or failed the write
    #[error("save failed: {0}")]
    Save(#[from] StoreError),
}

// == Config Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CACHE_CAPACITY must be greater than zero")]
    ZeroCapacity,

    #[error("unknown STORE_BACKEND '{0}', expected 'postgres' or 'memory'")]
    UnknownBackend(String),

    #[error("invalid SERVER_ADDR '{0}'")]
    InvalidAddr(String),
}

// == API Error ==
/// Outcome classes of the lookup API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Order absent from cache and store
    #[error("order not found")]
    NotFound,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Store failure; the detail is logged, not returned
    #[error("internal server error")]
    Internal,
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        let response = ApiError::Internal.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "internal server error");
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = IngestError::Validation {
            order_uid: "uid-1".to_string(),
            errors: vec!["entry: must be provided".to_string(), "sm_id: x".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "validation failed for uid-1: entry: must be provided; sm_id: x"
        );
    }
}
