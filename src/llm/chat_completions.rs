//! OpenAI-compatible chat-completions client
//!
//! Works against any service exposing `POST {base_url}/chat/completions`
//! (Groq by default).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::config::LlmConfig;
use crate::llm::client::{LlmClient, LlmError};
use crate::llm::types::{CompletionRequest, CompletionResponse, ToolCall, Usage};

/// Chat-completions API client
pub struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    config: LlmConfig,
    usage: Arc<Mutex<Usage>>,
}

impl ChatCompletionsClient {
    /// Create a new client, reading the API key from the configured env var
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: LlmConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the request body for the chat-completions API
    fn build_request(&self, request: &CompletionRequest<'_>) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": request.messages,
        });

        if !request.tools.is_empty() {
            let tools: Vec<Value> = request.tools.iter().map(|t| t.to_openai_schema()).collect();
            body["tools"] = json!(tools);
        }

        if let Some(max_tokens) = request.max_tokens.or(self.config.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse, LlmError> {
        let usage = body
            .get("usage")
            .map(|u| {
                Usage::new(
                    u["prompt_tokens"].as_u64().unwrap_or(0),
                    u["completion_tokens"].as_u64().unwrap_or(0),
                )
            })
            .unwrap_or_default();

        if let Ok(mut total) = self.usage.lock() {
            total.add(&usage);
        }

        let choice = body["choices"].get(0).ok_or(LlmError::EmptyResponse)?;
        let message = choice.get("message").filter(|m| m.is_object()).ok_or(LlmError::EmptyResponse)?;

        let content = message["content"].as_str().map(str::to_string);

        let tool_calls = match message.get("tool_calls") {
            None | Some(Value::Null) => Vec::new(),
            Some(calls) => serde_json::from_value::<Vec<ToolCall>>(calls.clone())
                .map_err(|e| LlmError::InvalidResponse(format!("malformed tool_calls: {}", e)))?,
        };

        Ok(CompletionResponse {
            content,
            tool_calls,
            finish_reason: choice["finish_reason"].as_str().map(str::to_string),
            usage,
        })
    }

    /// Send a request to the API
    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().map(|u| *u).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(&request);
        log::debug!(
            "Sending {} messages to {} ({})",
            request.messages.len(),
            self.endpoint(),
            self.config.model
        );
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{Message, ToolDefinition};

    fn client() -> ChatCompletionsClient {
        ChatCompletionsClient::with_api_key("test-key".to_string(), LlmConfig::default()).unwrap()
    }

    #[test]
    fn test_client_missing_api_key() {
        let config = LlmConfig {
            api_key_env: "RED_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let result = ChatCompletionsClient::new(config);
        assert!(matches!(result, Err(LlmError::MissingApiKey { .. })));
    }

    #[test]
    fn test_client_with_api_key() {
        let client = client();
        assert_eq!(client.model(), "openai/gpt-oss-120b");
        assert_eq!(client.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = LlmConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            ..Default::default()
        };
        let client = ChatCompletionsClient::with_api_key("k".to_string(), config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_build_request_basic() {
        let client = client();
        let messages = vec![Message::system("You are helpful"), Message::user("Hello")];
        let request = CompletionRequest {
            messages: &messages,
            tools: &[],
            max_tokens: None,
        };

        let body = client.build_request(&request);

        assert_eq!(body["model"], "openai/gpt-oss-120b");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert!(body.get("tools").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_build_request_with_tools() {
        let client = client();
        let tools = vec![ToolDefinition::new(
            "listDirectory",
            "List a directory",
            json!({"type": "object", "properties": {}}),
        )];
        let request = CompletionRequest {
            messages: &[],
            tools: &tools,
            max_tokens: Some(512),
        };

        let body = client.build_request(&request);

        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "listDirectory");
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn test_parse_response_text() {
        let client = client();
        let body = json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "All done."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        });

        let response = client.parse_response(body).unwrap();

        assert_eq!(response.content.as_deref(), Some("All done."));
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.total(), 15);
        assert_eq!(client.total_usage().total(), 15);
    }

    #[test]
    fn test_parse_response_tool_calls() {
        let client = client();
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "runCommand", "arguments": "{\"command\":\"ls\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response = client.parse_response(body).unwrap();

        assert!(response.content.is_none());
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].id, "call_abc");
        assert_eq!(response.tool_calls[0].name(), "runCommand");
        assert_eq!(response.tool_calls[0].arguments(), "{\"command\":\"ls\"}");
    }

    #[test]
    fn test_parse_response_without_choices_is_empty() {
        let client = client();
        let result = client.parse_response(json!({"choices": []}));
        assert!(matches!(result, Err(LlmError::EmptyResponse)));

        let result = client.parse_response(json!({"choices": [{"finish_reason": "stop"}]}));
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_parse_response_malformed_tool_calls() {
        let client = client();
        let body = json!({
            "choices": [{"message": {"role": "assistant", "tool_calls": [{"id": 7}]}}]
        });
        let result = client.parse_response(body);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }
}
