use crate::adapters::ocr::{ExtractedFields, OcrError};
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::{error, warn};
use serde_json::json;

/// An uploaded file held in memory for the lifetime of one request.
struct Upload {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Actix web handler for `POST /ocr/extract`.
pub async fn process(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let outcome = match read_upload(payload, state.ocr.max_upload_bytes()).await {
        Ok(upload) => {
            state
                .ocr
                .extract(&upload.bytes, upload.content_type.as_deref())
                .await
        }
        Err(e) => Err(e),
    };
    respond(outcome)
}

/// Maps an extraction outcome to the response. A result consisting of a
/// single `error` key counts as a failure.
fn respond(outcome: Result<ExtractedFields, OcrError>) -> HttpResponse {
    match outcome {
        Ok(fields) if fields.len() == 1 && fields.contains_key("error") => {
            error!("Extraction produced only an error: {:?}", fields.get("error"));
            HttpResponse::InternalServerError().json(fields)
        }
        Ok(fields) => HttpResponse::Ok().json(fields),
        Err(e) if e.is_input_error() => {
            warn!("Rejected OCR upload: {}", e);
            HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))
        }
        Err(e) => {
            error!("OCR extraction failed: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// Reads the `file` field into memory, giving up as soon as it grows past
/// `limit`. Other fields are drained and ignored.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, OcrError> {
    let mut upload: Option<Upload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| OcrError::InvalidUpload(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") || upload.is_some() {
            while let Some(chunk) = field.next().await {
                if chunk.is_err() {
                    break;
                }
            }
            continue;
        }

        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| OcrError::InvalidUpload(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(OcrError::TooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        upload = Some(Upload { bytes, content_type });
    }

    upload.ok_or(OcrError::NoFile)
}
