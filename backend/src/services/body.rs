use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parses a request body. Text that is not JSON is `ApiError::InvalidJson`;
/// JSON of the wrong shape is a generic bad request.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value = parse_document(body)?;
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(format!("Invalid request: {}", e)))
}

/// Parses a body that is itself a document (a component forest or form
/// schema).
pub fn parse_document(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)
}
