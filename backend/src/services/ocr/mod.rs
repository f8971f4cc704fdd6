//! OCR upload endpoint under `/ocr`.
//!
//! - `POST /ocr/extract`: multipart/form-data with a `file` field holding an
//!   image (JPEG, PNG, GIF, WebP) or a PDF. Answers with the extracted fields,
//!   or `{"error": ...}` with `400` for a bad upload and `500` when the remote
//!   extraction failed.

mod extract;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/ocr";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/extract", post().to(extract::process))
}
