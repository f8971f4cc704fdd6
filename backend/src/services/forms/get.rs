use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn forms_for_org(state: web::Data<AppState>, org_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.forms_for(org_id.into_inner())?))
}

pub async fn form(state: web::Data<AppState>, form_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.form(form_id.into_inner())?))
}
