//! API error type mapping domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// JSON error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Wrapper giving `DomainError` an HTTP rendering.
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(DomainError::new(ErrorCode::Unauthorized, message))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::invalid_request(message))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::TenantNotFound
            | ErrorCode::AppointmentNotFound
            | ErrorCode::ServiceNotFound
            | ErrorCode::ProfessionalNotFound
            | ErrorCode::SubscriptionNotFound
            | ErrorCode::PaymentNotFound
            | ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::SchedulingConflict | ErrorCode::InvalidStateTransition => {
                StatusCode::CONFLICT
            }
            ErrorCode::ValidationFailed | ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::ExternalServiceError => StatusCode::BAD_GATEWAY,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(code = %self.0.code, message = %self.0.message, "Request failed");
        }

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message.clone());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(code: ErrorCode) -> StatusCode {
        ApiError(DomainError::new(code, "x"))
            .into_response()
            .status()
    }

    #[test]
    fn error_codes_map_to_expected_statuses() {
        assert_eq!(status_of(ErrorCode::AppointmentNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ErrorCode::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ErrorCode::SchedulingConflict), StatusCode::CONFLICT);
        assert_eq!(
            status_of(ErrorCode::InvalidStateTransition),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ErrorCode::InvalidRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ErrorCode::ExternalServiceError),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ErrorCode::DatabaseError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
