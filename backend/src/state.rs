//! Shared application state handed to every handler as `web::Data<AppState>`.

use crate::adapters::assistant::AssistantClient;
use crate::adapters::ocr::OcrExtractor;
use crate::adapters::openai::{OpenAiClient, OpenAiError};
use crate::config::AppConfig;
use crate::db::Store;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a request may need. Cloned into each worker; the members are
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub assistant: Arc<AssistantClient>,
    pub ocr: Arc<OcrExtractor>,
    /// Cancelled when the server begins shutting down, so that long-running
    /// assistant polls stop early.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(store: Store, config: &AppConfig) -> Result<Self, OpenAiError> {
        let api = OpenAiClient::new(&config.openai)?;
        Ok(AppState {
            store: Arc::new(store),
            assistant: Arc::new(AssistantClient::new(api.clone(), &config.openai)),
            ocr: Arc::new(OcrExtractor::new(
                api,
                &config.openai,
                config.ocr_max_upload_bytes,
            )),
            shutdown: CancellationToken::new(),
        })
    }
}
