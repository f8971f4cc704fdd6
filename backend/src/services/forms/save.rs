use crate::error::ApiError;
use crate::services::body::parse_document;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::responses::Saved;
use log::info;

/// Actix web handler for `POST /api/save-form/{form_id}/`.
pub async fn process(
    state: web::Data<AppState>,
    form_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let form_id = form_id.into_inner();
    let data = parse_document(&body)?;
    state.store.save_form_data(form_id, &data)?;
    info!("Saved form {}", form_id);
    Ok(HttpResponse::Ok().json(Saved { success: true }))
}
