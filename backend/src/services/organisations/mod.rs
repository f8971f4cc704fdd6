//! Organisation management under `/api/organisations`.

use crate::error::ApiError;
use crate::services::body::parse_json;
use crate::state::AppState;
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use formgen_common::requests::{non_blank, CreateOrganisationRequest};
use formgen_common::responses::{OrganisationCreated, OrganisationDeleted};
use log::info;

const API_PATH: &str = "/api/organisations";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/", get().to(list))
        .route("/create/", post().to(create))
        .route("/delete/{org_id}/", post().to(delete))
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.organisations()?))
}

async fn create(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let request: CreateOrganisationRequest = parse_json(&body)?;
    let name = non_blank(&request.name).ok_or_else(ApiError::missing_fields)?;

    let organisation = state.store.create_organisation(name)?;
    info!("Created organisation {} '{}'", organisation.id, organisation.name);

    Ok(HttpResponse::Ok().json(OrganisationCreated {
        success: true,
        organisation_id: organisation.id,
    }))
}

/// Removes the organisation and, through the foreign keys, every template,
/// generated card and form it owns.
async fn delete(state: web::Data<AppState>, org_id: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let org_id = org_id.into_inner();
    state.store.delete_organisation(org_id)?;
    info!("Deleted organisation {} and everything it owned", org_id);

    Ok(HttpResponse::Ok().json(OrganisationDeleted {
        success: true,
        message: "Organisation deleted successfully".to_string(),
    }))
}
