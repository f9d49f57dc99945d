//! Markdown fence stripping for model replies.
//!
//! Models are asked for bare JSON but regularly answer with
//! ```` ```json ... ``` ```` around it. Every fence marker is removed, together
//! with the language tag that may follow an opening marker.

use trailure_error::{Error, Result};

const FENCE: &str = "```";
const JSON_LITERALS: [&str; 3] = ["null", "true", "false"];

/// Remove all code fence markers (and opening language tags) and trim.
pub fn strip_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, segment) in text.split(FENCE).enumerate() {
        // Odd segments start right after an opening marker.
        if i % 2 == 1 {
            out.push_str(strip_language_tag(segment));
        } else {
            out.push_str(segment);
        }
    }
    out.trim().to_string()
}

fn strip_language_tag(segment: &str) -> &str {
    let tag_len = segment
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
        .unwrap_or(segment.len());
    let tag = &segment[..tag_len];
    // A tag starts with a letter and is never a bare JSON literal.
    if !tag.starts_with(|c: char| c.is_ascii_alphabetic()) || JSON_LITERALS.contains(&tag) {
        return segment;
    }
    let rest = &segment[tag_len..];
    if tag.eq_ignore_ascii_case("json") {
        return rest;
    }
    // Any other tag must be followed by whitespace, otherwise it is payload.
    match rest.chars().next() {
        Some(c) if c.is_whitespace() => rest,
        _ => segment,
    }
}

/// Strip fences from a reply and parse what remains as JSON.
pub fn parse_reply(text: &str) -> Result<serde_json::Value> {
    let clean = strip_fences(text);
    serde_json::from_str(&clean).map_err(|e| {
        tracing::debug!(error = %e, len = clean.len(), "reply is not valid JSON");
        Error::format(e.to_string())
            .with_operation("fence::parse_reply")
            .set_source(e)
    })
}
