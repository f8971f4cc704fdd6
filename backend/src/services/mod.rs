//! HTTP endpoints, one sub-module per area. Each area exposes a
//! `configure_routes()` returning its Actix scope.

pub mod body;
pub mod cardgen;
pub mod forms;
pub mod ocr;
pub mod organisations;

use actix_web::web;

/// Request bodies above this size are refused before parsing.
pub const MAX_JSON_BODY: usize = 10 * 1024 * 1024;

/// Registers every scope plus the payload limit. Used by `main` and by the
/// integration tests.
///
/// `/api/organisations` must be registered before the broader `/api` forms
/// scope, which would otherwise swallow it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_JSON_BODY))
        .service(organisations::configure_routes())
        .service(cardgen::configure_routes())
        .service(forms::configure_routes())
        .service(ocr::configure_routes());
}
