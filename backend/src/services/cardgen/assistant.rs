use crate::adapters::assistant::AssistantQuery;
use crate::error::ApiError;
use crate::services::body::parse_json;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use formgen_common::requests::{non_blank, AssistantRequest};

/// Actix web handler for `POST /cardgen/assistant/`.
///
/// Always answers `200` once the request is well formed: remote failures are
/// turned into a fallback text by the assistant client. The poll is tied to
/// the server's shutdown token, and stops as soon as the client disconnects
/// because Actix drops the handler future.
pub async fn process(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let request: AssistantRequest = parse_json(&body)?;
    let message = non_blank(&request.message)
        .ok_or_else(|| ApiError::BadRequest("Missing message".to_string()))?
        .to_string();

    let query = AssistantQuery::from_request(&message, request);
    let cancel = state.shutdown.child_token();
    let reply = state.assistant.ask(&query, &cancel).await;
    Ok(HttpResponse::Ok().json(reply))
}
