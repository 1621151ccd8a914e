pub mod auth;
pub mod health;
pub mod loading;
pub mod seo;
pub mod theme;

use crate::errors;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body of every non-form error response.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self {
            code: status.as_u16().to_string(),
            message: errors::status_message(status.as_u16()).to_string(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

pub(crate) fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

// fallback for unmatched routes
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorBody::status(StatusCode::NOT_FOUND),
    )
}
