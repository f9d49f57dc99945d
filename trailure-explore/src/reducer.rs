//! Reducer: the only place `ExploreState` changes.
//!
//! `reduce` applies one action and returns the gateway calls it wants made.
//! The driver runs those effects and feeds their outcome back as
//! `SearchCompleted` / `RefineCompleted`.

use crate::state::{
    filter_by_category, refine_error_option, Detail, ExploreState, Phase, RefinePhase,
    RequestToken, ALL_CATEGORY,
};
use trailure_gateway::{Experience, RefinedOption, SearchResult};

/// Fallback when a failed search carries no message
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Search a destination; blank text is ignored
    Search(String),
    SearchCompleted {
        token: RequestToken,
        result: Result<SearchResult, String>,
    },
    FilterByCategory(String),
    SelectCard(Experience),
    CloseDetail,
    /// Pick a traveler profile in the open detail
    ChooseTailor(String),
    Refine,
    RefineCompleted {
        token: RequestToken,
        result: Result<Vec<RefinedOption>, String>,
    },
    /// "Try Again": repeat the last search
    Retry,
}

/// A gateway call requested by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Search {
        token: RequestToken,
        destination: String,
    },
    Refine {
        token: RequestToken,
        experience: Experience,
        profile: String,
    },
}

pub fn reduce(state: &mut ExploreState, action: Action) -> Vec<Effect> {
    match action {
        Action::Search(text) => start_search(state, text),
        Action::SearchCompleted { token, result } => {
            finish_search(state, token, result);
            Vec::new()
        }
        Action::FilterByCategory(category) => {
            state.filtered = filter_by_category(&state.experiences, &category);
            state.active_category = category;
            Vec::new()
        }
        Action::SelectCard(experience) => {
            if state.phase == Phase::Results {
                state.detail = Some(Detail::new(experience));
            }
            Vec::new()
        }
        Action::CloseDetail => {
            state.detail = None;
            Vec::new()
        }
        Action::ChooseTailor(label) => {
            if let Some(detail) = state.detail.as_mut() {
                if detail.experience.tailor_option(&label).is_some() {
                    detail.chosen = Some(label);
                } else {
                    tracing::debug!(label = %label, "ignoring unknown tailor option");
                }
            }
            Vec::new()
        }
        Action::Refine => start_refine(state),
        Action::RefineCompleted { token, result } => {
            finish_refine(state, token, result);
            Vec::new()
        }
        Action::Retry => match state.breadcrumb.first().cloned() {
            Some(last) => start_search(state, last),
            None => Vec::new(),
        },
    }
}

fn start_search(state: &mut ExploreState, text: String) -> Vec<Effect> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let token = state.issue_token();
    state.phase = Phase::Searching;
    state.error = None;
    state.destination.clear();
    state.categories.clear();
    state.experiences.clear();
    state.filtered.clear();
    state.active_category = ALL_CATEGORY.to_string();
    state.breadcrumb = vec![text.clone()];
    state.detail = None;
    state.query = text.clone();
    state.pending_search = Some(token);

    tracing::info!(destination = %text, token = token.0, "search started");
    vec![Effect::Search {
        token,
        destination: text,
    }]
}

fn finish_search(
    state: &mut ExploreState,
    token: RequestToken,
    result: Result<SearchResult, String>,
) {
    if state.pending_search != Some(token) {
        tracing::debug!(token = token.0, "discarding stale search response");
        return;
    }
    state.pending_search = None;

    match result {
        Ok(result) => {
            let mut categories = Vec::with_capacity(result.categories.len() + 1);
            categories.push(ALL_CATEGORY.to_string());
            categories.extend(result.categories);

            state.destination = result.destination_display_name;
            state.categories = categories;
            state.active_category = ALL_CATEGORY.to_string();
            state.filtered = result.experiences.clone();
            state.experiences = result.experiences;
            state.phase = Phase::Results;
            tracing::info!(
                destination = %state.destination,
                experiences = state.experiences.len(),
                "search finished"
            );
        }
        Err(message) => {
            let message = if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            };
            tracing::warn!(error = %message, "search failed");
            state.error = Some(message);
            state.phase = Phase::Failed;
        }
    }
}

fn start_refine(state: &mut ExploreState) -> Vec<Effect> {
    let ready = matches!(
        state.detail.as_ref(),
        Some(detail) if detail.chosen.is_some() && !detail.is_refining()
    );
    if !ready {
        return Vec::new();
    }

    let token = state.issue_token();
    let Some(detail) = state.detail.as_mut() else {
        return Vec::new();
    };
    let Some(profile) = detail.chosen.clone() else {
        return Vec::new();
    };
    detail.phase = RefinePhase::Refining;
    detail.options.clear();
    detail.pending = Some(token);

    tracing::info!(title = %detail.experience.title, profile = %profile, token = token.0, "refine started");
    vec![Effect::Refine {
        token,
        experience: detail.experience.clone(),
        profile,
    }]
}

fn finish_refine(
    state: &mut ExploreState,
    token: RequestToken,
    result: Result<Vec<RefinedOption>, String>,
) {
    let Some(detail) = state.detail.as_mut().filter(|d| d.pending == Some(token)) else {
        tracing::debug!(token = token.0, "discarding stale refine response");
        return;
    };
    detail.pending = None;

    match result {
        Ok(options) => {
            detail.options = options;
            detail.phase = RefinePhase::Refined;
        }
        Err(message) => {
            // Shown to the user as a fixed placeholder; the cause only reaches the log.
            tracing::warn!(error = %message, "refine failed");
            detail.options = vec![refine_error_option()];
            detail.phase = RefinePhase::Failed;
        }
    }
}
