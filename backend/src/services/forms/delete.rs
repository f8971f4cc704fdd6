use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::responses::Deleted;
use log::info;

/// Actix web handler for `POST /api/delete-form/{form_id}/`.
pub async fn process(state: web::Data<AppState>, form_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let form_id = form_id.into_inner();
    let org_id = state.store.delete_form(form_id)?;
    info!("Deleted form {} of organisation {}", form_id, org_id);

    Ok(HttpResponse::Ok().json(Deleted {
        success: true,
        message: "Form deleted successfully".to_string(),
        org_id,
    }))
}
