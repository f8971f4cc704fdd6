//! HTTP-facing error type.
//!
//! Every handler returns `Result<_, ApiError>`; the `ResponseError` impl
//! renders all variants as `{"error": "<message>"}` with the matching status.

use crate::db::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not JSON.
    #[error("Invalid JSON")]
    InvalidJson,

    /// A missing field, a bad upload, or an embedded document that failed to
    /// parse.
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid schema structure")]
    InvalidSchema,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::BadRequest("Missing required fields".to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::Parse(_) => ApiError::BadRequest(err.to_string()),
            StoreError::Schema(violation) => {
                warn!("Rejected document: {}", violation);
                ApiError::InvalidSchema
            }
            StoreError::Sqlite(_) | StoreError::Poisoned => {
                error!("Store failure: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::BadRequest(_) | ApiError::InvalidSchema => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_common::schema::validate_card_schema;

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found: ApiError = StoreError::NotFound("Template").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Template not found");

        let violation = validate_card_schema(&serde_json::json!({})).unwrap_err();
        let schema: ApiError = StoreError::Schema(violation).into();
        assert_eq!(schema.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(schema.to_string(), "Invalid schema structure");

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let parse: ApiError = StoreError::Parse(parse_err).into();
        assert_eq!(parse.status_code(), StatusCode::BAD_REQUEST);
        assert!(parse.to_string().starts_with("Invalid JSON: "));

        let internal: ApiError = StoreError::Poisoned.into();
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
