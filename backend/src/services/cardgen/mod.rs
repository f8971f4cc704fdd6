//! # Card Template Service
//!
//! Endpoints for building card templates, generating cards from them and
//! asking the template assistant, all under `/cardgen`.
//!
//! ## Sub-modules:
//! - `create`: new template with the default skeleton.
//! - `save`: replace a template's component forest after validation.
//! - `import`: new template from user-supplied JSON text.
//! - `delete`: remove a template and its generated cards.
//! - `generate`: snapshot a template into a generated card.
//! - `assistant`: forward a question plus template context to the assistant.
//! - `get`: read-only views used by the editor.

mod assistant;
mod create;
mod delete;
mod generate;
mod get;
mod import;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/cardgen";

/// Configures and returns the Actix `Scope` for the card template routes.
///
/// # Registered Routes:
///
/// *   **`POST /create/`**: `{organisation_id, name}` → `{success, template_id, redirect_url}`
/// *   **`POST /save/{template_id}/`**: body is the full component forest → `{success}`
/// *   **`POST /import/`**: `{organisation_id, name, json_data}` → as `create`
/// *   **`POST /delete/{template_id}/`** → `{success, message, org_id}`
/// *   **`POST /generate/{template_id}/`**: `{name}` → `{success, card_id, message}`
/// *   **`POST /assistant/`**: question and editor context → `{response, thread_id}`
/// *   **`GET /org/{org_id}/`**: templates of an organisation
/// *   **`GET /editor/{template_id}/`**: one template
/// *   **`GET /templates/{template_id}/cards/`**: cards generated from a template
/// *   **`GET /cards/{card_id}/`**: one generated card
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/create/", post().to(create::process))
        .route("/save/{template_id}/", post().to(save::process))
        .route("/import/", post().to(import::process))
        .route("/delete/{template_id}/", post().to(delete::process))
        .route("/generate/{template_id}/", post().to(generate::process))
        .route("/assistant/", post().to(assistant::process))
        .route("/org/{org_id}/", get().to(get::templates_for_org))
        .route("/editor/{template_id}/", get().to(get::template))
        .route("/templates/{template_id}/cards/", get().to(get::cards_for_template))
        .route("/cards/{card_id}/", get().to(get::card))
}
