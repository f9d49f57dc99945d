//! Messages API wire types, shared by the direct and relay providers.

use super::{ChatMessage, CompletionResponse};
use serde::{Deserialize, Serialize};
use trailure_error::{Error, Result};

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: usize,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Longest error body kept in error context
const MAX_ERROR_BODY: usize = 512;

/// Send a prepared request and decode the reply.
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    operation: &'static str,
) -> Result<CompletionResponse> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(operation, error = %e, "completion request failed to send");
        Error::transport(e.to_string())
            .with_operation(operation)
            .set_source(e)
    })?;

    let status = response.status();
    tracing::debug!(operation, status = status.as_u16(), "completion response received");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(operation, status = status.as_u16(), "completion endpoint returned an error");
        return Err(Error::http_status(status.as_u16())
            .with_operation(operation)
            .with_context("body", truncate(&body, MAX_ERROR_BODY)));
    }

    let body = response.text().await.map_err(|e| {
        Error::transport(e.to_string())
            .with_operation(operation)
            .set_source(e)
    })?;

    decode(&body).map_err(|e| e.with_operation(operation))
}

/// Decode a messages response body into the first text block.
pub(crate) fn decode(body: &str) -> Result<CompletionResponse> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| Error::format(e.to_string()).set_source(e))?;

    let text = parsed
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| Error::format("reply has no text content"))?;

    Ok(CompletionResponse {
        id: parsed.id,
        model: parsed.model,
        text,
        stop_reason: parsed.stop_reason,
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
