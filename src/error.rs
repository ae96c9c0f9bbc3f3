use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    dto::common::{ErrorResponse, MessageResponse},
    services::filter::FilterError,
};

/// Message returned with every 404 on id-addressed routes.
pub const GAME_NOT_FOUND: &str = "Game not found";

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend failed while serving the request.
    #[error("{0}")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidInput(format!("validation failed: {err}"))
    }
}

impl From<FilterError> for ServiceError {
    fn from(err: FilterError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected input, or any failure while creating or updating a game.
    #[error("{0}")]
    BadRequest(String),
    /// No game behind the requested identifier.
    #[error("{0}")]
    NotFound(String),
    /// Any other failure.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Mapping used by create and update: everything but "not found" is the client's 400.
    pub fn rejected_write(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => AppError::NotFound(message),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            other @ (ServiceError::Unavailable(_) | ServiceError::Degraded) => {
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(MessageResponse { message })).into_response()
            }
            AppError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            AppError::Internal(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error })).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_failure() -> ServiceError {
        ServiceError::Unavailable(StorageError::unavailable(
            "failed to list games".into(),
            std::io::Error::other("connection reset"),
        ))
    }

    #[test]
    fn reads_map_storage_failures_to_500() {
        let response = AppError::from(storage_failure()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::from(ServiceError::Degraded).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn writes_map_storage_failures_to_400() {
        let response = AppError::rejected_write(storage_failure()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_survives_both_mappings() {
        let read = AppError::from(ServiceError::NotFound(GAME_NOT_FOUND.into()));
        let write = AppError::rejected_write(ServiceError::NotFound(GAME_NOT_FOUND.into()));
        assert_eq!(read.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(write.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_input_is_a_bad_request() {
        let err = AppError::from(ServiceError::InvalidInput("minRate must be an integer".into()));
        assert_eq!(err.to_string(), "minRate must be an integer");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
