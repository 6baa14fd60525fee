//! API error responses.
//!
//! Every handler error becomes an `AppError`, rendered as
//! `{"error": {"code": ..., "message": ...}}` with the variant's status.
//! Server-side details are logged and replaced with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rewards_shared::AppError;
use serde::Serialize;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Wraps a validation message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Wraps an authentication failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if err.is_server_error() {
            tracing::error!(error = %err, "Request failed");
            "An internal error occurred. Please try again later."
        } else {
            err.message()
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: err.error_code(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

macro_rules! into_api_error {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self(AppError::from(err))
                }
            }
        )*
    };
}

into_api_error!(
    rewards_core::auth::PermissionDenied,
    rewards_core::auth::PasswordError,
    rewards_core::ledger::LedgerError,
    rewards_core::directory::DirectoryError,
    rewards_core::directory::ValidationErrors,
    rewards_db::CustomerError,
    rewards_db::AdminError,
    rewards_db::LedgerStoreError,
    rewards_db::VisitError,
);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<rewards_shared::JwtError> for ApiError {
    fn from(err: rewards_shared::JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
