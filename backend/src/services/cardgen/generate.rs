use crate::error::ApiError;
use crate::services::body::parse_json;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::requests::{non_blank, GenerateCardRequest};
use formgen_common::responses::CardGenerated;
use log::info;

/// Actix web handler for `POST /cardgen/generate/{template_id}/`.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let template_id = template_id.into_inner();
    let request: GenerateCardRequest = parse_json(&body)?;
    let name = non_blank(&request.name).ok_or_else(|| ApiError::BadRequest("Missing card name".to_string()))?;

    let card = state.store.generate_card(template_id, name)?;
    info!("Generated card {} from template {}", card.id, template_id);

    Ok(HttpResponse::Ok().json(CardGenerated {
        success: true,
        card_id: card.id,
        message: "Card generated successfully".to_string(),
    }))
}
