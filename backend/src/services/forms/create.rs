use crate::error::ApiError;
use crate::services::body::parse_json;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::model::form::{default_form_data, editor_url};
use formgen_common::requests::{non_blank, CreateRequest};
use formgen_common::responses::FormCreated;
use log::info;

/// Actix web handler for `POST /api/create-form/`. The new form starts with
/// no sub-forms and is titled after its name.
pub async fn process(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let request: CreateRequest = parse_json(&body)?;
    let (organisation_id, name) = match (request.organisation_id, non_blank(&request.name)) {
        (Some(org), Some(name)) => (org, name),
        _ => return Err(ApiError::missing_fields()),
    };

    let form = state.store.create_form(organisation_id, name, &default_form_data(name))?;
    info!("Created form {} '{}' in organisation {}", form.id, form.name, organisation_id);

    Ok(HttpResponse::Ok().json(FormCreated {
        success: true,
        form_id: form.id,
        redirect_url: editor_url(form.id),
    }))
}
