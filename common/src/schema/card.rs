use super::tag::{InteractionMode, Tag};
use super::{SchemaViolation, ViolationReason, ROOT};
use serde_json::Value;

/// Validates a card template document: an array of components, each of which
/// must pass [`validate_component`].
pub fn validate_card_schema(doc: &Value) -> Result<(), SchemaViolation> {
    let components = doc
        .as_array()
        .ok_or_else(|| SchemaViolation::at(ROOT, ViolationReason::NotAnArray))?;

    for (idx, component) in components.iter().enumerate() {
        check_component(component, &format!("{}[{}]", ROOT, idx))?;
    }
    Ok(())
}

/// Validates a single component and, recursively, all of its children.
///
/// Keys other than `tag`, `type` and `children` are not inspected.
pub fn validate_component(node: &Value) -> Result<(), SchemaViolation> {
    check_component(node, ROOT)
}

pub fn is_valid_card_schema(doc: &Value) -> bool {
    validate_card_schema(doc).is_ok()
}

pub fn is_valid_component(node: &Value) -> bool {
    validate_component(node).is_ok()
}

fn check_component(node: &Value, path: &str) -> Result<(), SchemaViolation> {
    let fields = node
        .as_object()
        .ok_or_else(|| SchemaViolation::at(path, ViolationReason::NotAnObject))?;

    let raw_tag = fields
        .get("tag")
        .ok_or_else(|| SchemaViolation::at(path, ViolationReason::MissingField("tag")))?;
    let tag = raw_tag.as_str().and_then(Tag::parse).ok_or_else(|| {
        SchemaViolation::at(
            &format!("{}.tag", path),
            ViolationReason::UnknownTag(raw_tag.to_string()),
        )
    })?;

    if tag.is_interactive() {
        let mode = fields
            .get("type")
            .ok_or_else(|| SchemaViolation::at(path, ViolationReason::MissingField("type")))?;
        if mode.as_str().and_then(InteractionMode::parse).is_none() {
            return Err(SchemaViolation::at(
                &format!("{}.type", path),
                ViolationReason::InvalidInteractionMode(mode.to_string()),
            ));
        }
    }

    if let Some(children) = fields.get("children") {
        let children_path = format!("{}.children", path);
        let children = children
            .as_array()
            .ok_or_else(|| SchemaViolation::at(&children_path, ViolationReason::NotAnArray))?;
        for (idx, child) in children.iter().enumerate() {
            check_component(child, &format!("{}[{}]", children_path, idx))?;
        }
    }

    Ok(())
}
