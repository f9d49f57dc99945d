//! # Trailure Gateway
//!
//! The prompt/response gateway between trailure and a hosted language model.
//!
//! ## Core Concepts
//! - **Prompts**: instruction text for a destination search or a refine request
//! - **Provider**: trait-based transport to the completion endpoint (direct or via relay)
//! - **Fences**: replies may wrap their JSON in markdown code fences; those are stripped
//! - **Model**: typed experiences, tailor options and refined options

pub mod fence;
pub mod gateway;
pub mod model;
pub mod prompt;
pub mod provider;

pub use fence::{parse_reply, strip_fences};
pub use gateway::Gateway;
pub use model::{Experience, ExperienceId, RefinedOption, SearchResult, TailorOption};
pub use prompt::{refine_prompt, search_prompt};
pub use provider::{
    AnthropicProvider, ChatMessage, CompletionProvider, CompletionRequest, CompletionResponse,
    Provider, ProviderConfig, ProviderType, RelayProvider, Role,
};
pub use trailure_error::{Error, ErrorKind, Result};
