//! Backend Chat Gateway
//!
//! The single place where chat requests leave the process. `ChatGateway` is
//! the trait seam between session orchestration and transport, so sessions
//! can be driven against a mock in tests. `HttpGateway` is the production
//! implementation speaking the backend's JSON contract over `reqwest`.
//!
//! The gateway makes exactly one attempt per call: no retries, no queuing.
//! Failures are classified into a small taxonomy (`network`, `http_status`,
//! `decode`) that the orchestrators turn into in-band fallback messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// One of the two independently specialized assistants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Professor,
    Coach,
}

impl AgentKind {
    /// The path segment identifying this agent's chat endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            AgentKind::Professor => "professor",
            AgentKind::Coach => "coach",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Request body for all chat endpoints.
///
/// `viewed_courses_context` is only attached to single-agent sends; the
/// collaborative endpoint does not accept it, so it is skipped when `None`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub course_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewed_courses_context: Option<Vec<String>>,
}

/// Response body of the professor and coach endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentReply {
    pub response: String,
}

/// Response body of the collaborative endpoint: one answer from each agent
/// for the same turn.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CollaborateReply {
    pub professor_response: String,
    pub coach_response: String,
}

/// Classified failure of a single gateway attempt.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned HTTP status {0}")]
    Status(u16),
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// The contract for issuing one chat request and parsing its response.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Sends one message to a single agent and returns its reply.
    async fn send_agent(
        &self,
        agent: AgentKind,
        request: ChatRequest,
    ) -> Result<AgentReply, GatewayError>;

    /// Sends one message to the collaborative endpoint, which answers with a
    /// professor/coach reply pair.
    async fn send_collaborate(&self, request: ChatRequest)
    -> Result<CollaborateReply, GatewayError>;
}

/// Production gateway speaking JSON over HTTP to the backend service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway for the given backend base URL. A trailing slash on
    /// the base URL is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn post_chat<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &ChatRequest,
    ) -> Result<T, GatewayError> {
        let url = format!("{}/api/chat/{}", self.base_url, endpoint);
        debug!(%url, "Issuing chat request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                GatewayError::Decode(e.to_string())
            } else {
                GatewayError::Network(e.to_string())
            }
        })
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn send_agent(
        &self,
        agent: AgentKind,
        request: ChatRequest,
    ) -> Result<AgentReply, GatewayError> {
        self.post_chat(agent.endpoint(), &request).await
    }

    async fn send_collaborate(
        &self,
        request: ChatRequest,
    ) -> Result<CollaborateReply, GatewayError> {
        self.post_chat("collaborate", &request).await
    }
}
