//! `OpenAI` Assistants (v2) implementation

use super::config::Credentials;
use super::types::{MessageList, NewMessage, NewRun, Role, Run, Thread, ThreadMessage};
use super::{AssistantApi, AssistantError, AssistantErrorKind};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Per-call HTTP timeout; polling has its own bound
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// API-version marker required by the assistants endpoints
const BETA_HEADER_VALUE: &str = "assistants=v2";

/// Assistants API client bound to one assistant
pub struct OpenAIAssistant {
    client: Client,
    api_key: String,
    assistant_id: String,
    base_url: Url,
}

impl OpenAIAssistant {
    pub fn new(credentials: Credentials, base_url: &str) -> Result<Self, AssistantError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AssistantError::unknown(format!("Invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AssistantError::unknown(format!(
                "Base URL cannot carry a path: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AssistantError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: credentials.api_key,
            assistant_id: credentials.assistant_id,
            base_url,
        })
    }

    /// Append `segments` to the base URL, each percent-encoded as exactly one
    /// path segment.
    ///
    /// Ids come from callers, so empty, `.` and `..` segments are refused
    /// rather than letting them change the target endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AssistantError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(AssistantError::new(
                AssistantErrorKind::InvalidRequest,
                format!("Invalid path segment {bad:?}"),
            ));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AssistantError::unknown("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("OpenAI-Beta", BETA_HEADER_VALUE)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AssistantError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AssistantError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                AssistantError::network(format!("Connection failed: {e}"))
            } else {
                AssistantError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(AssistantError::from_status(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AssistantError::decode(format!("Failed to parse response: {e} - body: {body}"))
        })
    }
}

#[async_trait]
impl AssistantApi for OpenAIAssistant {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let url = self.endpoint(&["threads"])?;
        let request = self
            .request(Method::POST, url)
            .json(&serde_json::json!({}));
        Self::send(request).await
    }

    async fn add_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        let url = self.endpoint(&["threads", thread_id, "messages"])?;
        let request = self.request(Method::POST, url).json(&NewMessage {
            role: Role::User,
            content: text,
        });
        Self::send(request).await
    }

    async fn create_run(&self, thread_id: &str) -> Result<Run, AssistantError> {
        let url = self.endpoint(&["threads", thread_id, "runs"])?;
        let request = self.request(Method::POST, url).json(&NewRun {
            assistant_id: &self.assistant_id,
        });
        Self::send(request).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let url = self.endpoint(&["threads", thread_id, "runs", run_id])?;
        Self::send(self.request(Method::GET, url)).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        let mut url = self.endpoint(&["threads", thread_id, "messages"])?;
        url.set_query(Some("order=desc"));
        let list: MessageList = Self::send(self.request(Method::GET, url)).await?;
        Ok(list.data)
    }

    fn assistant_id(&self) -> &str {
        &self.assistant_id
    }
}
