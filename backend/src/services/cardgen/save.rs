use crate::error::ApiError;
use crate::services::body::parse_document;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::responses::Saved;
use log::info;

/// Actix web handler for `POST /cardgen/save/{template_id}/`.
///
/// The body is the complete component forest. It replaces the stored one
/// only if it passes validation; otherwise the template is left as it was
/// and the client gets `400 Invalid schema structure`.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let template_id = template_id.into_inner();
    let template_data = parse_document(&body)?;
    state.store.save_template_data(template_id, &template_data)?;
    info!("Saved card template {}", template_id);
    Ok(HttpResponse::Ok().json(Saved { success: true }))
}
