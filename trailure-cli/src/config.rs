//! CLI configuration: TOML file, then environment, then flags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use trailure_error::{Error, Result};
use trailure_gateway::ProviderConfig;

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const RELAY_URL_ENV: &str = "TRAILURE_RELAY_URL";

/// Top-level configuration, `~/.trailure/config.toml` by default.
///
/// ```toml
/// [provider]
/// relay_url = "http://127.0.0.1:8787"
/// model = "claude-sonnet-4-20250514"
/// max_tokens = 1000
///
/// [provider.headers]
/// x-relay-token = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailureConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    /// Messages endpoint base when talking to the API directly
    pub base_url: Option<String>,
    /// Trusted relay; takes precedence over `api_key`
    pub relay_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<usize>,
    pub timeout_secs: Option<u64>,
    /// Sent with every completion request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub relay_url: Option<String>,
}

impl TrailureConfig {
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".trailure").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_context("path", path.display().to_string()))?;
        let config: TrailureConfig = toml::from_str(&content).map_err(|e| {
            Error::config_invalid(format!("invalid config {}: {}", path.display(), e))
                .with_operation("config::load")
                .set_source(e)
        })?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Apply `ANTHROPIC_API_KEY` and `TRAILURE_RELAY_URL`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup(RELAY_URL_ENV).filter(|u| !u.is_empty()) {
            self.provider.relay_url = Some(url);
        }
        self
    }

    /// Build the provider configuration. A relay wins over a direct key;
    /// with neither, this is a `ConfigInvalid` error.
    pub fn provider_config(&self, overrides: &Overrides) -> Result<ProviderConfig> {
        let settings = &self.provider;
        let relay = overrides.relay_url.as_ref().or(settings.relay_url.as_ref());

        let mut config = match (relay, settings.api_key.as_ref()) {
            (Some(url), _) => ProviderConfig::relay(url.clone()),
            (None, Some(key)) => {
                let mut config = ProviderConfig::anthropic(key.clone());
                if let Some(base_url) = &settings.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                config
            }
            (None, None) => {
                return Err(Error::config_invalid(format!(
                    "no credential configured: set {} or point {} at a relay",
                    API_KEY_ENV, RELAY_URL_ENV
                ))
                .with_operation("config::provider_config"))
            }
        };

        if let Some(model) = overrides.model.as_ref().or(settings.model.as_ref()) {
            config = config.with_model(model.clone());
        }
        if let Some(max_tokens) = settings.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        if let Some(secs) = settings.timeout_secs {
            config = config.with_timeout(secs);
        }
        for (key, value) in &settings.headers {
            config = config.with_header(key.clone(), value.clone());
        }
        Ok(config)
    }
}
