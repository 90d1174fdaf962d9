use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use oria_types::api::ErrorResponse;
use oria_types::schema::{FieldError, ValidationError};

/// Every failure a handler can answer with. Storage detail is logged where it
/// happens and never reaches the client.
#[derive(Debug)]
pub enum ApiError {
    /// The body was not usable JSON (syntax, content type, size). Always a 400.
    Rejected(JsonRejection),
    Validation(ValidationError),
    Unauthorized,
    /// Admin access requested while no admin token is configured.
    AdminDisabled,
    NotFound,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Rejected(rejection) => {
                let errors = vec![FieldError {
                    field: String::new(),
                    message: rejection.body_text(),
                }];
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::with_errors("Invalid form data", errors)),
                )
                    .into_response()
            }
            Self::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_errors("Invalid form data", err.errors)),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Unauthorized")),
            )
                .into_response(),
            Self::AdminDisabled => (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new("Admin access is not configured")),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Not found")),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection)
    }
}
