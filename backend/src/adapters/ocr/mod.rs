//! # OCR Extraction
//!
//! Sends an uploaded image or PDF to a vision-capable chat completion model
//! and returns the text and fields it found.
//!
//! ## Workflow
//!
//! 1.  **Checks**: empty and oversized uploads are refused, then the real
//!     type is sniffed from the first bytes (see [`sniff`]). Unknown content
//!     is refused before anything leaves the process.
//! 2.  **Encoding**: the bytes are base64-encoded into a `data:` URL.
//! 3.  **Request**: the fixed extraction prompt and the file are sent as one
//!     user message; images as an `image_url` part, PDFs as a `file` part.
//! 4.  **Parsing**: the answer is unwrapped from any Markdown fence and parsed
//!     as a JSON object (see [`response`]).
//!
//! The upload is only borrowed for the duration of the call. Nothing is
//! written to disk and nothing is kept between calls.

pub mod response;
pub mod sniff;

use crate::adapters::openai::{OpenAiClient, OpenAiError};
use crate::config::OpenAiConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::info;
use serde_json::{json, Map, Value};
use sniff::{FileKind, ALLOWED_TYPES};
use thiserror::Error;
use uuid::Uuid;

pub use response::NOT_JSON_MESSAGE;

/// Fields extracted from a document; always contains `OCR` on success.
pub type ExtractedFields = Map<String, Value>;

const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f64 = 0.2;

const EXTRACTION_PROMPT: &str = r#"Analyze this document/image and extract all visible text and data from it.

Please provide the output as a JSON object with the following structure:
- "OCR": A complete transcription of ALL text visible in the image, preserving formatting and structure as much as possible
- For any other identifiable fields (like names, dates, amounts, addresses, etc.), create additional key-value pairs where the key is a descriptive field name and the value is the extracted data

Be thorough and accurate with the OCR. Include every piece of text you can see.

Example format:
{
    "OCR": "Complete text transcription here...",
    "Name": "John Doe",
    "Date": "2025-01-15",
    "Amount": "$150.00"
}

Return ONLY the JSON object, no additional text."#;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Uploaded file is empty")]
    Empty,

    #[error("File too large. Maximum size is {}", size_label(.limit))]
    TooLarge { limit: usize },

    #[error("Invalid file type. Allowed types: {}", ALLOWED_TYPES)]
    UnsupportedType,

    #[error("AI assistant is currently unavailable. Please check your OpenAI API key configuration.")]
    Unavailable,

    #[error("Failed to process file: {0}")]
    Remote(#[from] OpenAiError),
}

/// Whole mebibytes as `NMB`, anything else as an exact byte count.
fn size_label(bytes: &usize) -> String {
    const MIB: usize = 1024 * 1024;
    let bytes = *bytes;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl OcrError {
    /// True when the upload itself is at fault rather than the remote
    /// service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            OcrError::NoFile
                | OcrError::InvalidUpload(_)
                | OcrError::Empty
                | OcrError::TooLarge { .. }
                | OcrError::UnsupportedType
        )
    }
}

pub struct OcrExtractor {
    api: OpenAiClient,
    model: String,
    max_upload_bytes: usize,
}

impl OcrExtractor {
    pub fn new(api: OpenAiClient, config: &OpenAiConfig, max_upload_bytes: usize) -> Self {
        OcrExtractor {
            api,
            model: config.ocr_model.clone(),
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Fails fast on uploads that may not be sent to the remote service.
    pub fn check_upload(&self, bytes: &[u8]) -> Result<FileKind, OcrError> {
        if bytes.is_empty() {
            return Err(OcrError::Empty);
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(OcrError::TooLarge {
                limit: self.max_upload_bytes,
            });
        }
        FileKind::sniff(bytes).ok_or(OcrError::UnsupportedType)
    }

    /// Extracts text and fields from `bytes`. `declared_mime` is what the
    /// client claimed; it is only logged.
    pub async fn extract(
        &self,
        bytes: &[u8],
        declared_mime: Option<&str>,
    ) -> Result<ExtractedFields, OcrError> {
        let kind = self.check_upload(bytes)?;
        if !self.api.is_configured() {
            return Err(OcrError::Unavailable);
        }

        let extraction_id = Uuid::new_v4();
        let mut digest = md5::Context::new();
        digest.consume(bytes);
        info!(
            "[{}] Extracting {} upload: {} bytes, declared {}, md5 {:x}",
            extraction_id,
            kind.label(),
            bytes.len(),
            declared_mime.unwrap_or("nothing"),
            digest.finalize()
        );

        let data_url = format!("data:{};base64,{}", kind.mime_type(), STANDARD.encode(bytes));
        let request = completion_request(&self.model, kind, data_url);
        let response = self.api.post_json("/chat/completions", &request).await?;

        let content = response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| OpenAiError::UnexpectedResponse("no message content".to_string()))?;

        let fields = response::parse_extraction(content);
        info!("[{}] Extracted {} field(s)", extraction_id, fields.len());
        Ok(fields)
    }
}

fn completion_request(model: &str, kind: FileKind, data_url: String) -> Value {
    let file_part = match kind {
        FileKind::Pdf => json!({
            "type": "file",
            "file": { "filename": "upload.pdf", "file_data": data_url }
        }),
        FileKind::Image(_) => json!({
            "type": "image_url",
            "image_url": { "url": data_url }
        }),
    };

    json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": EXTRACTION_PROMPT },
                file_part
            ]
        }],
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn extractor(server: &MockServer) -> OcrExtractor {
        let config = OpenAiConfig {
            api_key: Some("sk-test".into()),
            base_url: server.uri(),
            ..OpenAiConfig::default()
        };
        OcrExtractor::new(OpenAiClient::new(&config).unwrap(), &config, 1024)
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
    }

    #[tokio::test]
    async fn pdf_is_sent_as_pdf_whatever_was_declared() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("data:application/pdf;base64,JVBERi0xLjQ"))
            .and(body_string_contains("\"type\":\"file\""))
            .respond_with(completion("{\"OCR\": \"Hello\", \"Name\": \"Ada\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let fields = extractor(&server)
            .extract(b"%PDF-1.4 minimal", Some("image/png"))
            .await
            .unwrap();
        assert_eq!(Value::Object(fields), json!({"OCR": "Hello", "Name": "Ada"}));
    }

    #[tokio::test]
    async fn image_is_sent_as_image_url_and_fence_is_stripped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("data:image/png;base64,"))
            .and(body_string_contains("\"model\":\"gpt-4o\""))
            .respond_with(completion("```json\n{\"OCR\": \"Total: 12\"}\n```"))
            .expect(1)
            .mount(&server)
            .await;

        let fields = extractor(&server).extract(PNG_HEADER, None).await.unwrap();
        assert_eq!(fields["OCR"], "Total: 12");
    }

    #[tokio::test]
    async fn prose_answer_keeps_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("Sorry, the image is blank."))
            .mount(&server)
            .await;

        let fields = extractor(&server).extract(PNG_HEADER, None).await.unwrap();
        assert_eq!(fields["OCR"], "Sorry, the image is blank.");
        assert_eq!(fields["error"], NOT_JSON_MESSAGE);
    }

    #[tokio::test]
    async fn unrecognised_bytes_never_reach_the_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("{}"))
            .expect(0)
            .mount(&server)
            .await;

        let err = extractor(&server)
            .extract(b"#!/bin/sh\necho hi", Some("application/pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedType));
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn empty_and_oversized_uploads_are_refused() {
        let server = MockServer::start().await;
        let extractor = extractor(&server);

        assert!(matches!(extractor.extract(b"", None).await, Err(OcrError::Empty)));

        let mut big = b"%PDF".to_vec();
        big.resize(2048, b' ');
        assert!(matches!(
            extractor.extract(&big, None).await,
            Err(OcrError::TooLarge { limit: 1024 })
        ));
    }

    #[tokio::test]
    async fn remote_failure_is_not_an_input_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = extractor(&server).extract(PNG_HEADER, None).await.unwrap_err();
        assert!(!err.is_input_error());
        assert!(err.to_string().starts_with("Failed to process file: "));
    }

    #[test]
    fn too_large_message_names_the_limit() {
        let err = OcrError::TooLarge { limit: 20 * 1024 * 1024 };
        assert_eq!(err.to_string(), "File too large. Maximum size is 20MB");
        let err = OcrError::TooLarge { limit: 1_000_000 };
        assert_eq!(err.to_string(), "File too large. Maximum size is 1000000 bytes");
    }
}
