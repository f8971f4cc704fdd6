//! # Template Assistant
//!
//! Answers questions about the card template being edited by forwarding
//! them to a remote assistant together with the template as context.
//!
//! ## Conversation flow
//!
//! 1.  A supplied thread id is resumed; if the remote side does not know it,
//!     a new thread is started and its id is handed back to the caller.
//! 2.  The composed prompt is appended to the thread and a run is started
//!     for the configured assistant.
//! 3.  The run is polled with exponential backoff until it reaches a terminal
//!     state, the configured timeout elapses, or the caller cancels.
//! 4.  The newest assistant message on the thread is returned.
//!
//! Failures never reach the caller: they are logged and replaced by a fixed
//! apology text.

use crate::adapters::openai::{str_field, OpenAiClient, OpenAiError};
use crate::config::{OpenAiConfig, DEFAULT_ASSISTANT_TIMEOUT};
use formgen_common::requests::AssistantRequest;
use formgen_common::responses::AssistantReply;
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const UNAVAILABLE_MESSAGE: &str =
    "AI assistant is currently unavailable. Please check your OpenAI API key configuration.";
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I'm having trouble connecting to the AI assistant. Please try again later.";

const INITIAL_POLL_DELAY: Duration = Duration::from_millis(500);
const MAX_POLL_DELAY: Duration = Duration::from_secs(8);

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant is not configured")]
    Unavailable,

    #[error(transparent)]
    Remote(#[from] OpenAiError),

    #[error("run ended with status `{0}`")]
    RunFailed(String),

    #[error("run did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("cancelled by caller")]
    Cancelled,

    #[error("thread has no assistant reply")]
    NoReply,
}

/// One user turn: the question plus whatever editor state should be shown to
/// the assistant.
#[derive(Debug, Clone, Default)]
pub struct AssistantQuery {
    pub message: String,
    pub template_data: Option<Value>,
    pub global_vars: Option<Value>,
    pub selected_component: Option<Value>,
    pub thread_id: Option<String>,
}

impl AssistantQuery {
    pub fn from_request(message: &str, request: AssistantRequest) -> Self {
        AssistantQuery {
            message: message.to_string(),
            template_data: request.template_data,
            global_vars: request.global_vars,
            selected_component: request.selected_component,
            thread_id: request.thread_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

/// Builds the single text message sent to the assistant.
pub fn compose_prompt(query: &AssistantQuery) -> String {
    let mut context = String::new();

    if let Some(template) = query.template_data.as_ref().filter(|v| has_content(v)) {
        let roots = match template {
            Value::Array(items) => Some(items.len()),
            Value::Object(fields) => Some(fields.len()),
            _ => None,
        };
        if let Some(roots) = roots {
            context.push_str(&format!("\nCurrent template has {} root components.\n", roots));
        }
        context.push_str(&format!("Template structure: {}\n", pretty(template)));
    }
    if let Some(vars) = query.global_vars.as_ref().filter(|v| has_content(v)) {
        context.push_str(&format!("Global variables: {}\n", pretty(vars)));
    }
    if let Some(selected) = query.selected_component.as_ref().filter(|v| has_content(v)) {
        context.push_str(&format!("Currently selected component: {}\n", pretty(selected)));
    }

    format!("{}\n\nContext:\n{}", query.message, context)
}

/// Nulls, `false`, zero and empty strings or collections add nothing to
/// the context.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

enum RunState {
    Pending,
    Completed,
    Failed(String),
}

fn run_state(run: &Value) -> Result<RunState, OpenAiError> {
    let status = str_field(run, "status")?;
    Ok(match status.as_str() {
        "queued" | "in_progress" | "cancelling" => RunState::Pending,
        "completed" => RunState::Completed,
        _ => RunState::Failed(status),
    })
}

pub struct AssistantClient {
    api: OpenAiClient,
    assistant_id: Option<String>,
    timeout: Duration,
    initial_poll_delay: Duration,
    max_poll_delay: Duration,
}

impl AssistantClient {
    pub fn new(api: OpenAiClient, config: &OpenAiConfig) -> Self {
        AssistantClient {
            api,
            assistant_id: config.assistant_id.clone(),
            timeout: config.assistant_timeout,
            initial_poll_delay: INITIAL_POLL_DELAY,
            max_poll_delay: MAX_POLL_DELAY,
        }
    }

    /// Overrides the backoff bounds used while waiting for a run.
    pub fn with_poll_delays(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_poll_delay = initial;
        self.max_poll_delay = max.max(initial);
        self
    }

    pub fn is_available(&self) -> bool {
        self.api.is_configured() && self.assistant_id.is_some()
    }

    /// Asks the assistant and returns its answer, or a fallback text on any
    /// failure. `thread_id` in the reply is the conversation to continue on
    /// the next turn.
    pub async fn ask(&self, query: &AssistantQuery, cancel: &CancellationToken) -> AssistantReply {
        let mut thread_id = None;
        match self.converse(query, &mut thread_id, cancel).await {
            Ok(response) => AssistantReply {
                response,
                thread_id,
            },
            Err(AssistantError::Unavailable) => {
                warn!("Assistant requested but OPENAI_API_KEY or OPENAI_ASSISTANT_ID is not set");
                AssistantReply {
                    response: UNAVAILABLE_MESSAGE.to_string(),
                    thread_id: query.thread_id.clone(),
                }
            }
            Err(e) => {
                error!("Assistant request failed: {}", e);
                AssistantReply {
                    response: FALLBACK_MESSAGE.to_string(),
                    thread_id,
                }
            }
        }
    }

    async fn converse(
        &self,
        query: &AssistantQuery,
        thread_id: &mut Option<String>,
        cancel: &CancellationToken,
    ) -> Result<String, AssistantError> {
        let assistant_id = match (&self.assistant_id, self.api.is_configured()) {
            (Some(id), true) => id,
            _ => return Err(AssistantError::Unavailable),
        };

        let thread = self.resume_or_create_thread(query.thread_id.as_deref()).await?;
        *thread_id = Some(thread.clone());

        self.api
            .post_json(
                &format!("/threads/{}/messages", thread),
                &json!({ "role": "user", "content": compose_prompt(query) }),
            )
            .await?;
        let run = self
            .api
            .post_json(
                &format!("/threads/{}/runs", thread),
                &json!({ "assistant_id": assistant_id }),
            )
            .await?;
        let run_id = str_field(&run, "id")?;
        info!("Started assistant run {} on thread {}", run_id, thread);

        self.wait_for_run(&thread, &run_id, cancel).await?;
        self.latest_reply(&thread).await
    }

    async fn resume_or_create_thread(&self, existing: Option<&str>) -> Result<String, AssistantError> {
        if let Some(id) = existing {
            match self.api.get_json(&format!("/threads/{}", id)).await {
                Ok(_) => return Ok(id.to_string()),
                Err(e) => warn!("Could not resume thread {} ({}), starting a new one", id, e),
            }
        }
        let thread = self.api.post_json("/threads", &json!({})).await?;
        Ok(str_field(&thread, "id")?)
    }

    async fn wait_for_run(
        &self,
        thread: &str,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), AssistantError> {
        let started = Instant::now();
        let deadline = started.checked_add(self.timeout).unwrap_or_else(|| {
            warn!(
                "Assistant timeout {:?} is out of range, using {:?}",
                self.timeout, DEFAULT_ASSISTANT_TIMEOUT
            );
            started + DEFAULT_ASSISTANT_TIMEOUT
        });
        let mut delay = self.initial_poll_delay;
        let path = format!("/threads/{}/runs/{}", thread, run_id);

        loop {
            if cancel.is_cancelled() {
                self.cancel_run(&path).await;
                return Err(AssistantError::Cancelled);
            }

            let run = self.api.get_json(&path).await?;
            match run_state(&run)? {
                RunState::Completed => return Ok(()),
                RunState::Failed(status) => return Err(AssistantError::RunFailed(status)),
                RunState::Pending => {}
            }

            let now = Instant::now();
            if now >= deadline {
                self.cancel_run(&path).await;
                return Err(AssistantError::TimedOut(self.timeout));
            }

            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay.min(deadline - now)) => {}
            }
            delay = (delay * 2).min(self.max_poll_delay);
        }
    }

    /// Best effort; the run is abandoned either way.
    async fn cancel_run(&self, run_path: &str) {
        if let Err(e) = self
            .api
            .post_json(&format!("{}/cancel", run_path), &json!({}))
            .await
        {
            debug!("Could not cancel run {}: {}", run_path, e);
        }
    }

    async fn latest_reply(&self, thread: &str) -> Result<String, AssistantError> {
        let messages = self
            .api
            .get_json(&format!("/threads/{}/messages?order=desc&limit=20", thread))
            .await?;

        messages
            .get("data")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|message| message.get("role").and_then(Value::as_str) == Some("assistant"))
            .map(message_text)
            .filter(|text| !text.is_empty())
            .ok_or(AssistantError::NoReply)
    }
}

/// Joins the text parts of a thread message.
fn message_text(message: &Value) -> String {
    message
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|part| part.pointer("/text/value").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer, timeout: Duration) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test".into()),
            base_url: server.uri(),
            assistant_id: Some("asst_1".into()),
            assistant_timeout: timeout,
            ..OpenAiConfig::default()
        }
    }

    fn client(config: &OpenAiConfig) -> AssistantClient {
        AssistantClient::new(OpenAiClient::new(config).unwrap(), config)
            .with_poll_delays(Duration::from_millis(5), Duration::from_millis(20))
    }

    fn query(thread_id: Option<&str>) -> AssistantQuery {
        AssistantQuery {
            message: "How do I add a text field?".into(),
            template_data: Some(json!([{"tag": "div"}])),
            thread_id: thread_id.map(str::to_string),
            ..AssistantQuery::default()
        }
    }

    async fn mount_run(server: &MockServer, thread: &str, status: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/threads/{}/messages", thread)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_user"})))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/threads/{}/runs", thread)))
            .and(body_partial_json(json!({"assistant_id": "asst_1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "run_1", "status": "queued"})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/threads/{}/runs/run_1", thread)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "run_1", "status": status})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/threads/{}/messages", thread)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"role": "assistant", "content": [
                    {"type": "text", "text": {"value": "Use an Itext component."}}
                ]},
                {"role": "user", "content": [{"type": "text", "text": {"value": "question"}}]}
            ]})))
            .mount(server)
            .await;
    }

    #[test]
    fn prompt_lists_the_supplied_context() {
        let query = AssistantQuery {
            message: "Help".into(),
            template_data: Some(json!([{"tag": "div"}, {"tag": "p"}])),
            global_vars: Some(json!({"name": "Ada"})),
            selected_component: Some(json!({"tag": "p"})),
            thread_id: None,
        };
        let prompt = compose_prompt(&query);

        assert!(prompt.starts_with("Help\n\nContext:\n"));
        assert!(prompt.contains("Current template has 2 root components.\n"));
        assert!(prompt.contains("Template structure: [\n  {\n    \"tag\": \"div\"\n  },"));
        assert!(prompt.contains("Global variables: {\n  \"name\": \"Ada\"\n}\n"));
        assert!(prompt.contains("Currently selected component: {\n  \"tag\": \"p\"\n}\n"));
    }

    #[test]
    fn falsy_context_is_skipped_and_object_templates_are_counted() {
        let query = AssistantQuery {
            message: "Hi".into(),
            template_data: Some(json!({"header": {"tag": "h1"}, "body": {"tag": "p"}})),
            global_vars: Some(json!(false)),
            selected_component: Some(json!(0)),
            thread_id: None,
        };
        let prompt = compose_prompt(&query);

        assert!(prompt.contains("Current template has 2 root components.\n"));
        assert!(!prompt.contains("Global variables"));
        assert!(!prompt.contains("Currently selected component"));
    }

    #[test]
    fn prompt_skips_empty_context() {
        let query = AssistantQuery {
            message: "Hi".into(),
            template_data: Some(json!([])),
            global_vars: Some(json!({})),
            ..AssistantQuery::default()
        };
        assert_eq!(compose_prompt(&query), "Hi\n\nContext:\n");
    }

    #[tokio::test]
    async fn new_conversation_returns_reply_and_thread() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_new"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_run(&server, "thread_new", "completed").await;

        let config = config(&server, Duration::from_secs(5));
        let reply = client(&config).ask(&query(None), &CancellationToken::new()).await;

        assert_eq!(
            reply,
            AssistantReply {
                response: "Use an Itext component.".into(),
                thread_id: Some("thread_new".into()),
            }
        );
    }

    #[tokio::test]
    async fn out_of_range_timeout_still_answers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_new"})))
            .mount(&server)
            .await;
        mount_run(&server, "thread_new", "completed").await;

        let config = config(&server, Duration::from_secs(u64::MAX));
        let reply = client(&config).ask(&query(None), &CancellationToken::new()).await;
        assert_eq!(reply.response, "Use an Itext component.");
    }

    #[tokio::test]
    async fn known_thread_is_resumed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads/thread_old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_old"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "unused"})))
            .expect(0)
            .mount(&server)
            .await;
        mount_run(&server, "thread_old", "completed").await;

        let config = config(&server, Duration::from_secs(5));
        let reply = client(&config)
            .ask(&query(Some("thread_old")), &CancellationToken::new())
            .await;
        assert_eq!(reply.thread_id.as_deref(), Some("thread_old"));
    }

    #[tokio::test]
    async fn unknown_thread_silently_starts_a_new_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads/thread_gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_new"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_run(&server, "thread_new", "completed").await;

        let config = config(&server, Duration::from_secs(5));
        let reply = client(&config)
            .ask(&query(Some("thread_gone")), &CancellationToken::new())
            .await;
        assert_eq!(reply.response, "Use an Itext component.");
        assert_eq!(reply.thread_id.as_deref(), Some("thread_new"));
    }

    #[tokio::test]
    async fn failed_run_yields_fallback_with_thread() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_new"})))
            .mount(&server)
            .await;
        mount_run(&server, "thread_new", "failed").await;

        let config = config(&server, Duration::from_secs(5));
        let reply = client(&config).ask(&query(None), &CancellationToken::new()).await;
        assert_eq!(reply.response, FALLBACK_MESSAGE);
        assert_eq!(reply.thread_id.as_deref(), Some("thread_new"));
    }

    #[tokio::test]
    async fn stuck_run_is_abandoned_at_the_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_new"})))
            .mount(&server)
            .await;
        mount_run(&server, "thread_new", "in_progress").await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_new/runs/run_1/cancel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "cancelling"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = config(&server, Duration::from_millis(150));
        let started = std::time::Instant::now();
        let reply = client(&config).ask(&query(None), &CancellationToken::new()).await;

        assert_eq!(reply.response, FALLBACK_MESSAGE);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn cancelled_token_stops_polling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_new"})))
            .mount(&server)
            .await;
        mount_run(&server, "thread_new", "in_progress").await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let config = config(&server, Duration::from_secs(60));
        let reply = client(&config).ask(&query(None), &cancel).await;
        assert_eq!(reply.response, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn missing_credentials_yield_unavailable_message() {
        let config = OpenAiConfig::default();
        let client = AssistantClient::new(OpenAiClient::new(&config).unwrap(), &config);
        assert!(!client.is_available());

        let reply = client
            .ask(&query(Some("thread_keep")), &CancellationToken::new())
            .await;
        assert_eq!(reply.response, UNAVAILABLE_MESSAGE);
        assert_eq!(reply.thread_id.as_deref(), Some("thread_keep"));
    }
}
