//! Request payloads accepted by the JSON endpoints.
//!
//! Every field is optional at the deserialization level so that a missing
//! value can be reported as "Missing required fields" instead of a parse
//! error; the handlers decide what is actually required.

use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /cardgen/create/` and `POST /api/create-form/`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub organisation_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /cardgen/import/` and `POST /api/import-form/`.
///
/// `json_data` is the document as raw text; it is parsed and validated by the
/// server.
#[derive(Debug, Default, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub organisation_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub json_data: Option<String>,
}

/// Body of `POST /cardgen/generate/{template_id}/`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateCardRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /api/organisations/create/`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrganisationRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /cardgen/assistant/`.
#[derive(Debug, Default, Deserialize)]
pub struct AssistantRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub template_data: Option<Value>,
    #[serde(default)]
    pub global_vars: Option<Value>,
    #[serde(default)]
    pub selected_component: Option<Value>,
    /// Conversation handle returned by a previous call.
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Returns the trimmed value when present and non-blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
