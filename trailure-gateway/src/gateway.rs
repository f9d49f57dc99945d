//! The prompt/response gateway: prompt in, parsed JSON out.

use crate::fence::parse_reply;
use crate::model::{Experience, RefinedOption, SearchResult};
use crate::prompt::{refine_prompt, search_prompt};
use crate::provider::CompletionProvider;
use trailure_error::Result;

/// Sends prompts through a provider and parses the fenced JSON replies.
///
/// No retry, no rate limiting: one prompt is one request.
pub struct Gateway<P> {
    provider: P,
}

impl<P: CompletionProvider> Gateway<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Send `prompt` and parse the reply as JSON after stripping fences.
    ///
    /// Fails with `Transport` when the call does not succeed and with
    /// `Format` when the reply is not JSON.
    pub async fn query(&self, prompt: &str) -> Result<serde_json::Value> {
        let reply = self
            .provider
            .prompt(prompt)
            .await
            .map_err(|e| e.with_operation("gateway::query"))?;
        tracing::debug!(provider = self.provider.name(), len = reply.len(), "reply received");
        parse_reply(&reply).map_err(|e| e.with_operation("gateway::query"))
    }

    /// Ask for experiences at `destination`.
    pub async fn search(&self, destination: &str) -> Result<SearchResult> {
        let value = self.query(&search_prompt(destination)).await?;
        let result = SearchResult::from_value(value, destination)?;
        tracing::info!(
            destination = %result.destination_display_name,
            experiences = result.experiences.len(),
            categories = result.categories.len(),
            "search reply parsed"
        );
        Ok(result)
    }

    /// Ask for options tailored to `profile` for one experience.
    pub async fn refine(&self, experience: &Experience, profile: &str) -> Result<Vec<RefinedOption>> {
        let value = self.query(&refine_prompt(experience, profile)).await?;
        let options = RefinedOption::list_from_value(value)?;
        tracing::info!(title = %experience.title, profile, options = options.len(), "refine reply parsed");
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CompletionRequest, CompletionResponse};
    use std::sync::Mutex;
    use trailure_error::{Error, ErrorKind};

    /// Replies with canned text and records prompts.
    struct CannedProvider {
        reply: std::result::Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn text(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn default_model(&self) -> &str {
            "canned-model"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            self.prompts
                .lock()
                .unwrap()
                .push(request.messages[0].content.clone());
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    id: None,
                    model: None,
                    text: text.clone(),
                    stop_reason: None,
                }),
                Err(status) => Err(Error::http_status(*status)),
            }
        }
    }

    #[tokio::test]
    async fn test_query_parses_fenced_reply() {
        let gateway = Gateway::new(CannedProvider::text("```json\n{\"destination\": \"Japan\"}\n```"));
        let value = gateway.query("anything").await.unwrap();
        assert_eq!(value["destination"], "Japan");
    }

    #[tokio::test]
    async fn test_query_transport_error() {
        let gateway = Gateway::new(CannedProvider::status(500));
        let err = gateway.query("anything").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.message(), "HTTP 500");
        assert_eq!(err.operation(), "gateway::query");
    }

    #[tokio::test]
    async fn test_query_format_error() {
        let gateway = Gateway::new(CannedProvider::text("I'd love to help! Here are some ideas..."));
        let err = gateway.query("anything").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_search_uses_search_prompt() {
        let gateway = Gateway::new(CannedProvider::text(
            r#"{"destination":"Amalfi Coast","categories":["Food"],"experiences":[{"title":"Limoncello tasting","category":"Food"}]}"#,
        ));
        let result = tokio_test::block_on(gateway.search("Amalfi Coast")).unwrap();

        assert_eq!(result.destination_display_name, "Amalfi Coast");
        assert_eq!(result.experiences[0].title, "Limoncello tasting");
        let prompts = gateway.provider().prompts.lock().unwrap();
        assert_eq!(prompts.as_slice(), [search_prompt("Amalfi Coast")]);
    }

    #[test]
    fn test_refine_uses_refine_prompt() {
        let gateway = Gateway::new(CannedProvider::text(
            "```\n{\"results\":[{\"title\":\"Private boat\",\"price\":\"$400\",\"duration\":\"6 hours\",\"highlight\":\"Grotta Azzurra\"}]}\n```",
        ));
        let exp: Experience =
            serde_json::from_value(serde_json::json!({"title": "Capri by sea", "location": "Capri"}))
                .unwrap();

        let options = tokio_test::block_on(gateway.refine(&exp, "Couple Retreat")).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].highlight, "Grotta Azzurra");
        let prompts = gateway.provider().prompts.lock().unwrap();
        assert_eq!(prompts.as_slice(), [refine_prompt(&exp, "Couple Retreat")]);
    }
}
