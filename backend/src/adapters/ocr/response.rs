use log::error;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const NOT_JSON_MESSAGE: &str = "Response was not in valid JSON format, showing raw content";

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[^\n]*\n(.*?)\n?```\s*\z").expect("fence pattern is valid")
});

/// Removes a surrounding Markdown code fence (```` ```json ... ``` ````).
///
/// A fence that is never closed is handled by dropping every fence line.
pub fn strip_code_fence(content: &str) -> String {
    let content = content.trim();
    if !content.starts_with("```") {
        return content.to_string();
    }
    match FENCED_BLOCK.captures(content) {
        Some(caps) => caps[1].trim().to_string(),
        None => content
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Turns the model's answer into extracted fields.
///
/// Anything that is not a JSON object is returned as
/// `{"OCR": <text>, "error": ...}` so the caller still gets the transcription.
pub fn parse_extraction(content: &str) -> Map<String, Value> {
    let text = strip_code_fence(content);
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            error!("Extraction response is JSON but not an object: {}", other);
            raw_fields(text)
        }
        Err(e) => {
            error!("Failed to parse extraction response as JSON: {}", e);
            raw_fields(text)
        }
    }
}

fn raw_fields(text: String) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("OCR".to_string(), Value::String(text));
    fields.insert("error".to_string(), Value::String(NOT_JSON_MESSAGE.to_string()));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn fenced_json_is_unwrapped() {
        let content = "```json\n{\"OCR\": \"Invoice 42\", \"Amount\": \"$150.00\"}\n```";
        assert_eq!(
            Value::Object(parse_extraction(content)),
            json!({"OCR": "Invoice 42", "Amount": "$150.00"})
        );
    }

    #[test]
    fn bare_fence_without_language_is_unwrapped() {
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    }

    #[test]
    fn unclosed_fence_drops_fence_lines() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn plain_json_passes_through() {
        assert_eq!(
            Value::Object(parse_extraction("  {\"OCR\": \"x\"}  ")),
            json!({"OCR": "x"})
        );
    }

    #[test]
    fn prose_is_returned_as_raw_ocr() {
        let fields = parse_extraction("I could not read this document.");
        assert_eq!(
            Value::Object(fields),
            json!({"OCR": "I could not read this document.", "error": NOT_JSON_MESSAGE})
        );
    }

    #[test]
    fn non_object_json_is_returned_as_raw_ocr() {
        let fields = parse_extraction("[1, 2]");
        assert_eq!(fields["OCR"], "[1, 2]");
        assert!(fields.contains_key("error"));
    }
}
