//! Client for OpenAI-compatible chat-completion gateways.
//!
//! Talks to any endpoint speaking the `/chat/completions` wire format
//! (OpenAI itself, OpenRouter, hosted AI gateways). The main entry point is
//! forced function calling: the caller supplies one tool, the model must
//! answer by invoking it, and the arguments are parsed into a typed struct.
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_client::{AiClient, Message, ToolDefinition};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Summary {
//!     headline: String,
//! }
//!
//! let client = AiClient::from_env()?;
//! let tool = ToolDefinition::for_args::<Summary>("summarize", "Summarize the page");
//! let summary: Summary = client
//!     .call_tool(
//!         "google/gemini-2.5-flash",
//!         vec![Message::system("You summarize pages"), Message::user(page)],
//!         &tool,
//!     )
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod tool;
pub mod types;

pub use error::{AiError, Result};
pub use schema::parameters_schema;
pub use tool::{ToolCall, ToolDefinition};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat-completions gateway client.
#[derive(Clone)]
pub struct AiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl AiClient {
    /// Create a client for the OpenAI API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from `AI_GATEWAY_API_KEY`, honouring `AI_GATEWAY_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("AI_GATEWAY_API_KEY")
            .map_err(|_| AiError::Config("AI_GATEWAY_API_KEY not set".into()))?;

        let client = Self::new(api_key);
        Ok(match std::env::var("AI_GATEWAY_BASE_URL") {
            Ok(url) => client.with_base_url(url),
            Err(_) => client,
        })
    }

    /// Point the client at a different gateway.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Function calling (tool use).
    ///
    /// Returns whatever the model produced; an absent tool call is not an
    /// error at this level.
    pub async fn function_calling(&self, request: FunctionRequest) -> Result<FunctionResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gateway request failed");
                AiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "Gateway returned an error");
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: types::CompletionRaw = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        let parsed = FunctionResponse::from(raw);

        debug!(
            model = %request.model,
            tool_calls = parsed.tool_calls.len(),
            duration_ms = start.elapsed().as_millis(),
            "Gateway function call"
        );

        Ok(parsed)
    }

    /// Force a call to `tool` and parse its arguments as `T`.
    pub async fn call_tool<T: DeserializeOwned>(
        &self,
        model: &str,
        messages: Vec<Message>,
        tool: &ToolDefinition,
    ) -> Result<T> {
        let mut request = FunctionRequest::new(model).force_tool(tool);
        request.messages = messages;

        let response = self.function_calling(request).await?;

        response
            .tool_call(&tool.name)
            .ok_or_else(|| AiError::NoToolCall(tool.name.clone()))?
            .parse_args()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = AiClient::new("sk-test").with_base_url("https://gateway.example.com/v1/");

        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url(), "https://gateway.example.com/v1");
    }

    #[test]
    fn test_default_base_url() {
        let client = AiClient::new("sk-test");
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_network_error() {
        let client = AiClient::new("sk-test").with_base_url("http://127.0.0.1:9");
        let tool = ToolDefinition {
            name: "noop".into(),
            description: "does nothing".into(),
            parameters: serde_json::json!({ "type": "object" }),
        };

        let err = client
            .call_tool::<serde_json::Value>("test-model", vec![Message::user("hi")], &tool)
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Network(_)));
    }
}
