//! Direct messages-API provider

use super::wire::{self, MessagesRequest};
use super::*;
use reqwest::Client;

/// Talks to the completion endpoint with the configured API key.
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

impl AnthropicProvider {
    /// Fails with `ConfigInvalid` when no API key is configured.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        match config.api_key.as_deref() {
            Some(key) if !key.is_empty() => {}
            _ => {
                return Err(Error::config_invalid("no API key configured")
                    .with_operation("anthropic::new"))
            }
        }
        let client = config.http_client()?;
        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        self.config.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request.model.as_deref().unwrap_or(self.default_model());
        let body = MessagesRequest {
            model,
            max_tokens: request
                .max_tokens
                .or(self.config.max_tokens)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            messages: &request.messages,
        };

        // Checked in new()
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let mut req = self
            .client
            .post(format!("{}/messages", self.base_url()))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        tracing::info!(model, max_tokens = body.max_tokens, "sending completion request");
        wire::send(req, "anthropic::complete").await
    }
}

#[cfg(test)]
mod tests {
    use crate::provider::stub::serve_once;
    use super::*;
    use trailure_error::ErrorKind;

    fn reply(text: &str) -> String {
        serde_json::json!({
            "id": "msg_test",
            "model": DEFAULT_MODEL,
            "content": [{"type": "text", "text": text}],
            "stop_reason": "end_turn"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_complete_sends_headers_and_body() {
        let (url, server) = serve_once(200, &reply("```json\n{\"ok\": true}\n```")).await;
        let provider =
            AnthropicProvider::new(ProviderConfig::anthropic("sk-ant-test").with_base_url(url))
                .unwrap();

        let text = provider.prompt("Find me Iceland").await.unwrap();
        assert_eq!(text, "```json\n{\"ok\": true}\n```");

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /messages "));
        assert!(lower.contains("x-api-key: sk-ant-test"));
        assert!(lower.contains("anthropic-version: 2023-06-01"));
        assert!(lower.contains("content-type: application/json"));

        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Find me Iceland");
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let (url, server) = serve_once(500, r#"{"error":"overloaded"}"#).await;
        let provider =
            AnthropicProvider::new(ProviderConfig::anthropic("k").with_base_url(url)).unwrap();

        let err = provider.prompt("Japan").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.message(), "HTTP 500");
        assert_eq!(err.operation(), "anthropic::complete");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = AnthropicProvider::new(
            ProviderConfig::anthropic("k").with_base_url(format!("http://{}", addr)),
        )
        .unwrap();
        let err = provider.prompt("Japan").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_request_overrides_model_and_max_tokens() {
        let (url, server) = serve_once(200, &reply("{}")).await;
        let provider =
            AnthropicProvider::new(ProviderConfig::anthropic("k").with_base_url(format!("{}/", url)))
                .unwrap();

        let request = CompletionRequest::user("hi")
            .with_model("claude-3-5-haiku-20241022")
            .with_max_tokens(64);
        provider.complete(request).await.unwrap();

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /messages "));
        let body: serde_json::Value =
            serde_json::from_str(&raw[raw.find("\r\n\r\n").unwrap() + 4..]).unwrap();
        assert_eq!(body["model"], "claude-3-5-haiku-20241022");
        assert_eq!(body["max_tokens"], 64);
    }
}
