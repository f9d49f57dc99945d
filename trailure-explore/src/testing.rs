//! Fixtures and a scripted provider for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use trailure_gateway::{
    CompletionProvider, CompletionRequest, CompletionResponse, Error, Experience, Result,
    SearchResult,
};

pub(crate) const PROFILES: [&str; 4] =
    ["Solo Explorer", "Couple Retreat", "Family Adventure", "Group Trip"];

pub(crate) fn experience_json(id: usize, category: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "emoji": "🧭",
        "title": format!("Experience {}", id),
        "location": "Somewhere specific",
        "category": category,
        "type": "Outdoor",
        "description": "Two vivid sentences. Really.",
        "tags": ["local", "small-group"],
        "rating": 4.7,
        "price": "$90",
        "priceNote": "per person",
        "tailorOptions": PROFILES
            .iter()
            .map(|label| serde_json::json!({"label": label, "desc": format!("{} variant", label)}))
            .collect::<Vec<_>>()
    })
}

pub(crate) fn experience(id: usize, category: &str) -> Experience {
    serde_json::from_value(experience_json(id, category)).unwrap()
}

/// `count` experiences, categories assigned round-robin from `categories`
pub(crate) fn search_reply_json(destination: &str, count: usize, categories: &[&str]) -> serde_json::Value {
    let experiences: Vec<_> = (1..=count)
        .map(|id| {
            let category = if categories.is_empty() {
                "General"
            } else {
                categories[(id - 1) % categories.len()]
            };
            experience_json(id, category)
        })
        .collect();
    serde_json::json!({
        "destination": destination,
        "categories": categories,
        "experiences": experiences
    })
}

pub(crate) fn search_result(count: usize, categories: &[&str]) -> SearchResult {
    SearchResult::from_value(search_reply_json("Japan", count, categories), "Japan").unwrap()
}

/// Scripted reply: reply text or an HTTP status
pub(crate) enum Reply {
    Text(String),
    Status(u16),
}

/// Pops one scripted reply per call and records the prompts it saw.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.prompts
            .lock()
            .unwrap()
            .push(request.messages[0].content.clone());

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(CompletionResponse {
                id: None,
                model: None,
                text,
                stop_reason: None,
            }),
            Some(Reply::Status(status)) => Err(Error::http_status(status)),
            None => Err(Error::unexpected("no scripted reply left")),
        }
    }
}
