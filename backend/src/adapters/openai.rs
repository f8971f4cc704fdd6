//! Thin JSON-over-HTTPS client for the OpenAI REST API.

use crate::config::OpenAiConfig;
use log::debug;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("formgen/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("OpenAI API key is not configured")]
    MissingApiKey,

    #[error("network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Shared HTTP client. Cloning is cheap; all clones reuse one connection
/// pool.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self, OpenAiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OpenAiError::Network(e.to_string()))?;

        Ok(OpenAiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, OpenAiError> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, OpenAiError> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, OpenAiError> {
        let api_key = self.api_key.as_deref().ok_or(OpenAiError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, path);
        debug!("OpenAI {} {}", method, url);

        let mut builder = self.http.request(method, url).bearer_auth(api_key);
        if path.starts_with("/threads") {
            builder = builder.header("OpenAI-Beta", "assistants=v2");
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, OpenAiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| OpenAiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| OpenAiError::UnexpectedResponse(e.to_string()))
    }
}

/// Reads a string field from a response object.
pub fn str_field(value: &Value, field: &str) -> Result<String, OpenAiError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OpenAiError::UnexpectedResponse(format!("missing `{}`", field)))
}
