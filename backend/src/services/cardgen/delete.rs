use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::responses::Deleted;
use log::info;

/// Actix web handler for `POST /cardgen/delete/{template_id}/`. Cards
/// generated from the template are removed with it.
pub async fn process(state: web::Data<AppState>, template_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let template_id = template_id.into_inner();
    let org_id = state.store.delete_template(template_id)?;
    info!("Deleted card template {} of organisation {}", template_id, org_id);

    Ok(HttpResponse::Ok().json(Deleted {
        success: true,
        message: "Card template deleted successfully".to_string(),
        org_id,
    }))
}
