use crate::error::ApiError;
use crate::services::body::parse_json;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::model::form::editor_url;
use formgen_common::requests::{non_blank, ImportRequest};
use formgen_common::responses::FormCreated;
use log::info;

/// Actix web handler for `POST /api/import-form/`.
pub async fn process(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let request: ImportRequest = parse_json(&body)?;
    let (organisation_id, name, json_data) = match (
        request.organisation_id,
        non_blank(&request.name),
        non_blank(&request.json_data),
    ) {
        (Some(org), Some(name), Some(data)) => (org, name, data),
        _ => return Err(ApiError::missing_fields()),
    };

    let form = state.store.import_form(organisation_id, name, json_data)?;
    info!("Imported form {} '{}' into organisation {}", form.id, form.name, organisation_id);

    Ok(HttpResponse::Ok().json(FormCreated {
        success: true,
        form_id: form.id,
        redirect_url: editor_url(form.id),
    }))
}
