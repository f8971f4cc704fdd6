//! Form schema endpoints under `/api`. They mirror the card template
//! endpoints, validating with the form schema rules instead.

mod create;
mod delete;
mod get;
mod import;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api";

/// # Registered Routes:
///
/// *   **`POST /create-form/`**: `{organisation_id, name}` → `{success, form_id, redirect_url}`
/// *   **`POST /import-form/`**: `{organisation_id, name, json_data}`
/// *   **`POST /save-form/{form_id}/`**: body is the full form schema
/// *   **`POST /delete-form/{form_id}/`** → `{success, message, org_id}`
/// *   **`GET /org/{org_id}/forms/`** and **`GET /form/{form_id}/`**: reads
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/create-form/", post().to(create::process))
        .route("/import-form/", post().to(import::process))
        .route("/save-form/{form_id}/", post().to(save::process))
        .route("/delete-form/{form_id}/", post().to(delete::process))
        .route("/org/{org_id}/forms/", get().to(get::forms_for_org))
        .route("/form/{form_id}/", get().to(get::form))
}
