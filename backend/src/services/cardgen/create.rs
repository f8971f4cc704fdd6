use crate::db::Store;
use crate::error::ApiError;
use crate::services::body::parse_json;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::model::template::{default_template_data, editor_url};
use formgen_common::requests::{non_blank, CreateRequest};
use formgen_common::responses::TemplateCreated;
use log::info;
use serde_json::json;

/// Actix web handler for `POST /cardgen/create/`.
pub async fn process(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let created = create_template(&state.store, &body)?;
    Ok(HttpResponse::Ok().json(created))
}

/// Creates a template holding the default skeleton and no global variables.
pub fn create_template(store: &Store, body: &[u8]) -> Result<TemplateCreated, ApiError> {
    let request: CreateRequest = parse_json(body)?;
    let (organisation_id, name) = match (request.organisation_id, non_blank(&request.name)) {
        (Some(org), Some(name)) => (org, name),
        _ => return Err(ApiError::missing_fields()),
    };

    let template = store.create_template(organisation_id, name, &default_template_data(), &json!({}))?;
    info!(
        "Created card template {} '{}' in organisation {}",
        template.id, template.name, organisation_id
    );

    Ok(TemplateCreated {
        success: true,
        template_id: template.id,
        redirect_url: editor_url(template.id),
    })
}
