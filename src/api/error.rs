//! DomainError -> HTTP response mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::DomainError;

/// Error returned by every handler; renders `{"error": code, "message": text}`
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
            DomainError::Validation(msg) => {
                json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
            }
            DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
            DomainError::Unauthorized => {
                json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid credentials")
            }
            DomainError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
            DomainError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
            DomainError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (DomainError::NotFound, StatusCode::NOT_FOUND),
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (
                DomainError::Database("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).into_response().status(), status);
        }
    }
}
