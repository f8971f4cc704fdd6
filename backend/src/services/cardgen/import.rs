use crate::error::ApiError;
use crate::services::body::parse_json;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::model::template::editor_url;
use formgen_common::requests::{non_blank, ImportRequest};
use formgen_common::responses::TemplateCreated;
use log::info;

/// Actix web handler for `POST /cardgen/import/`.
///
/// `json_data` carries the forest as text. Text that does not parse answers
/// `400 Invalid JSON: <detail>`, a forest that does not validate answers
/// `400 Invalid schema structure`.
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

    let template = state.store.import_template(organisation_id, name, json_data)?;
    info!(
        "Imported card template {} '{}' into organisation {}",
        template.id, template.name, organisation_id
    );

    Ok(HttpResponse::Ok().json(TemplateCreated {
        success: true,
        template_id: template.id,
        redirect_url: editor_url(template.id),
    }))
}
