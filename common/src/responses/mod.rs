//! Response payloads of the JSON endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCreated {
    pub success: bool,
    pub template_id: i64,
    pub redirect_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormCreated {
    pub success: bool,
    pub form_id: i64,
    pub redirect_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationCreated {
    pub success: bool,
    pub organisation_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Saved {
    pub success: bool,
}

/// Answer to a template or form delete; `org_id` lets the client return to
/// the owning organisation's listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deleted {
    pub success: bool,
    pub message: String,
    pub org_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationDeleted {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardGenerated {
    pub success: bool,
    pub card_id: i64,
    pub message: String,
}

/// Text produced by the assistant together with the conversation handle to
/// send back on the next turn. `thread_id` is `None` when no conversation
/// could be established.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub response: String,
    pub thread_id: Option<String>,
}
