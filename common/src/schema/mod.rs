//! # Schema Validation
//!
//! Structural checks run on every card template and form document before it
//! is persisted. Both validators walk an already parsed `serde_json::Value`
//! depth-first and stop at the first violation; nothing is aggregated.
//!
//! A failure carries the location of the offending value as a JSONPath-like
//! string (`$[0].children[2].type`) so callers can log it, while the HTTP
//! layer still answers with a generic "Invalid schema structure".

mod card;
mod form;
mod tag;

pub use card::{is_valid_card_schema, is_valid_component, validate_card_schema, validate_component};
pub use form::{is_valid_form_schema, validate_form_schema};
pub use tag::{InteractionMode, Tag};

use thiserror::Error;

/// Why a document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationReason {
    #[error("expected an array")]
    NotAnArray,
    #[error("expected an object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("tag {0} is not allowed")]
    UnknownTag(String),
    #[error("interactive component type must be \"Editable\" or \"display\", got {0}")]
    InvalidInteractionMode(String),
    #[error("sub-form type must be \"form\", got {0}")]
    NotAForm(String),
}

/// First structural violation found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct SchemaViolation {
    pub path: String,
    pub reason: ViolationReason,
}

impl SchemaViolation {
    pub(crate) fn at(path: &str, reason: ViolationReason) -> Self {
        SchemaViolation {
            path: path.to_string(),
            reason,
        }
    }
}

/// Root of every violation path.
pub(crate) const ROOT: &str = "$";
