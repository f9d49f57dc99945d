//! Relay provider - forwards through a trusted backend
//!
//! The relay holds the API credential and exposes the messages endpoint
//! unauthenticated to this process. Requests carry no key.
//!
//! Endpoint: `{base_url}/v1/messages`, health probe: `{base_url}/health`

use super::wire::{self, MessagesRequest};
use super::*;
use reqwest::Client;

pub struct RelayProvider {
    client: Client,
    config: ProviderConfig,
}

impl RelayProvider {
    /// Fails with `ConfigInvalid` when no relay URL is configured.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.base_url.as_deref().map_or(true, str::is_empty) {
            return Err(Error::config_invalid("no relay URL configured").with_operation("relay::new"));
        }
        let client = config.http_client()?;
        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }

    /// Check if the relay is up
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url()))
            .send()
            .await
            .map_err(|e| {
                Error::transport(e.to_string())
                    .with_operation("relay::health_check")
                    .set_source(e)
            })?;

        Ok(response.status().is_success())
    }
}

impl CompletionProvider for RelayProvider {
    fn name(&self) -> &str {
        "relay"
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

        let mut req = self
            .client
            .post(format!("{}/v1/messages", self.base_url()))
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        tracing::info!(model, relay = self.base_url(), "sending completion request via relay");
        wire::send(req, "relay::complete").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::stub::serve_once;
    use trailure_error::ErrorKind;

    #[tokio::test]
    async fn test_relay_sends_no_credential() {
        let body = r#"{"content":[{"type":"text","text":"{\"results\":[]}"}]}"#;
        let (url, server) = serve_once(200, body).await;
        let config = ProviderConfig::relay(url).with_header("X-Relay-Token", "t0k3n");
        let provider = RelayProvider::new(config).unwrap();

        let text = provider.prompt("refine").await.unwrap();
        assert_eq!(text, r#"{"results":[]}"#);

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("post /v1/messages "));
        assert!(!request.contains("x-api-key"));
        assert!(request.contains("anthropic-version: 2023-06-01"));
        assert!(request.contains("x-relay-token: t0k3n"));
    }

    #[tokio::test]
    async fn test_relay_error_status() {
        let (url, server) = serve_once(502, "").await;
        let provider = RelayProvider::new(ProviderConfig::relay(url)).unwrap();

        let err = provider.prompt("x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.message(), "HTTP 502");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_health_check() {
        let (url, server) = serve_once(200, "{}").await;
        let provider = RelayProvider::new(ProviderConfig::relay(url)).unwrap();
        assert!(provider.health_check().await.unwrap());
        assert!(server.await.unwrap().starts_with("GET /health "));
    }

    #[test]
    fn test_relay_requires_url() {
        let err = match RelayProvider::new(ProviderConfig::relay("")) {
            Ok(_) => panic!("expected a config error"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
