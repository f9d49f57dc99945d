//! # Completion Provider Interface
//!
//! A trait-based abstraction over the hosted completion endpoint.
//!
//! ## Design
//! - `CompletionProvider` defines the one call the gateway needs
//! - `AnthropicProvider` talks to the endpoint directly with a credential
//! - `RelayProvider` talks to a trusted relay that holds the credential
//! - Both speak the same messages wire format (see `wire`)

pub mod anthropic;
pub mod relay;
mod wire;
#[cfg(test)]
mod stub;

pub use anthropic::AnthropicProvider;
pub use relay::RelayProvider;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trailure_error::{Error, Result};

/// Protocol version marker sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: usize = 1000;

// ============================================================================
// Core Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A message in the conversation; serializes as the wire message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request parameters for a completion
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    pub max_tokens: Option<usize>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Single user turn
    pub fn user(prompt: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(prompt)])
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    /// The `text` of the first content block
    pub text: String,
    pub stop_reason: Option<String>,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Transport to a completion endpoint.
///
/// Implementations report non-2xx answers and connection failures as
/// `ErrorKind::Transport`, and undecodable bodies as `ErrorKind::Format`.
#[allow(async_fn_in_trait)]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g. "anthropic", "relay")
    fn name(&self) -> &str;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Prompt -> reply text helper
    async fn prompt(&self, prompt: &str) -> Result<String> {
        let response = self.complete(CompletionRequest::user(prompt)).await?;
        Ok(response.text)
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Anthropic,
    Relay,
}

/// Configuration for creating providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<usize>,
    /// Extra request headers, e.g. a relay's own auth token
    pub headers: HashMap<String, String>,
    /// No timeout unless set
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self {
            provider_type: ProviderType::Anthropic,
            api_key: Some(api_key.into()),
            base_url: Some(DEFAULT_BASE_URL.into()),
            model: Some(DEFAULT_MODEL.into()),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            headers: HashMap::new(),
            timeout_secs: None,
        }
    }

    /// Forward through a trusted relay; no credential leaves this process.
    pub fn relay(base_url: impl Into<String>) -> Self {
        Self {
            provider_type: ProviderType::Relay,
            api_key: None,
            base_url: Some(base_url.into()),
            model: Some(DEFAULT_MODEL.into()),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            headers: HashMap::new(),
            timeout_secs: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        builder.build().map_err(|e| {
            Error::config_invalid(format!("failed to create HTTP client: {}", e))
                .with_operation("provider::http_client")
                .set_source(e)
        })
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Either provider, chosen at runtime from configuration.
pub enum Provider {
    Anthropic(AnthropicProvider),
    Relay(RelayProvider),
}

impl Provider {
    pub fn from_config(config: ProviderConfig) -> Result<Self> {
        match config.provider_type {
            ProviderType::Anthropic => Ok(Provider::Anthropic(AnthropicProvider::new(config)?)),
            ProviderType::Relay => Ok(Provider::Relay(RelayProvider::new(config)?)),
        }
    }
}

impl CompletionProvider for Provider {
    fn name(&self) -> &str {
        match self {
            Provider::Anthropic(p) => p.name(),
            Provider::Relay(p) => p.name(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Provider::Anthropic(p) => p.default_model(),
            Provider::Relay(p) => p.default_model(),
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        match self {
            Provider::Anthropic(p) => p.complete(request).await,
            Provider::Relay(p) => p.complete(request).await,
        }
    }
}
