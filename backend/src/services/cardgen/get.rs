use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// `GET /cardgen/org/{org_id}/`
pub async fn templates_for_org(state: web::Data<AppState>, org_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let templates = state.store.templates_for(org_id.into_inner())?;
    Ok(HttpResponse::Ok().json(templates))
}

/// `GET /cardgen/editor/{template_id}/`
pub async fn template(state: web::Data<AppState>, template_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let template = state.store.template(template_id.into_inner())?;
    Ok(HttpResponse::Ok().json(template))
}

/// `GET /cardgen/templates/{template_id}/cards/`
pub async fn cards_for_template(
    state: web::Data<AppState>,
    template_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let cards = state.store.cards_for(template_id.into_inner())?;
    Ok(HttpResponse::Ok().json(cards))
}

/// `GET /cardgen/cards/{card_id}/`
pub async fn card(state: web::Data<AppState>, card_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let card = state.store.card(card_id.into_inner())?;
    Ok(HttpResponse::Ok().json(card))
}
