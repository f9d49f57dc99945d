//! Explorer: drives the reducer and runs its gateway effects.

use crate::reducer::{reduce, Action, Effect};
use crate::state::{ExploreState, QUICK_DESTINATIONS};
use trailure_error::{Error, Result};
use trailure_gateway::{CompletionProvider, Gateway};

/// Owns the exploration state and the gateway it calls.
pub struct Explorer<P> {
    gateway: Gateway<P>,
    state: ExploreState,
}

impl<P: CompletionProvider> Explorer<P> {
    pub fn new(gateway: Gateway<P>) -> Self {
        Self::with_state(gateway, ExploreState::new())
    }

    /// Resume from a saved state
    pub fn with_state(gateway: Gateway<P>, state: ExploreState) -> Self {
        Self { gateway, state }
    }

    pub fn state(&self) -> &ExploreState {
        &self.state
    }

    pub fn gateway(&self) -> &Gateway<P> {
        &self.gateway
    }

    /// Apply an action without running the effects it produces.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        reduce(&mut self.state, action)
    }

    /// Run one effect against the gateway and return the completion action.
    ///
    /// Takes `&self`: several effects may be in flight, and their completions
    /// can be dispatched in any order.
    pub async fn execute(&self, effect: Effect) -> Action {
        match effect {
            Effect::Search { token, destination } => {
                let result = self
                    .gateway
                    .search(&destination)
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "search request failed");
                        e.message().to_string()
                    });
                Action::SearchCompleted { token, result }
            }
            Effect::Refine {
                token,
                experience,
                profile,
            } => {
                let result = self
                    .gateway
                    .refine(&experience, &profile)
                    .await
                    .map_err(|e| e.to_string());
                Action::RefineCompleted { token, result }
            }
        }
    }

    /// Apply an action and run its effects to completion.
    pub async fn apply(&mut self, action: Action) {
        for effect in self.dispatch(action) {
            let completed = self.execute(effect).await;
            self.dispatch(completed);
        }
    }

    pub async fn search(&mut self, text: &str) {
        self.apply(Action::Search(text.to_string())).await
    }

    /// Search quick destination `index` (0-based)
    pub async fn search_quick(&mut self, index: usize) -> Result<()> {
        let quick = QUICK_DESTINATIONS.get(index).ok_or_else(|| {
            Error::invalid_argument(format!(
                "no quick destination {} (there are {})",
                index + 1,
                QUICK_DESTINATIONS.len()
            ))
            .with_operation("explorer::search_quick")
        })?;
        self.search(quick.value).await;
        Ok(())
    }

    /// Repeat the last search
    pub async fn retry(&mut self) {
        self.apply(Action::Retry).await
    }

    pub fn filter_by_category(&mut self, category: &str) {
        self.dispatch(Action::FilterByCategory(category.to_string()));
    }

    /// Open the detail for card `index` of the filtered list
    pub fn select_card(&mut self, index: usize) -> Result<()> {
        let experience = self.state.filtered.get(index).cloned().ok_or_else(|| {
            Error::invalid_argument(format!(
                "no card {} (showing {})",
                index + 1,
                self.state.filtered.len()
            ))
            .with_operation("explorer::select_card")
        })?;
        self.dispatch(Action::SelectCard(experience));
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.dispatch(Action::CloseDetail);
    }

    /// Choose a traveler profile in the open detail. Labels match
    /// case-insensitively.
    pub fn choose_tailor(&mut self, label: &str) -> Result<()> {
        let detail = self.state.detail.as_ref().ok_or_else(|| {
            Error::invalid_argument("no experience is open").with_operation("explorer::choose_tailor")
        })?;
        let option = detail
            .experience
            .tailor_options
            .iter()
            .find(|o| o.label.eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| {
                let labels: Vec<&str> = detail
                    .experience
                    .tailor_options
                    .iter()
                    .map(|o| o.label.as_str())
                    .collect();
                Error::invalid_argument(format!(
                    "unknown traveler profile '{}' (choose from: {})",
                    label,
                    labels.join(", ")
                ))
                .with_operation("explorer::choose_tailor")
            })?;
        let label = option.label.clone();
        self.dispatch(Action::ChooseTailor(label));
        Ok(())
    }

    pub async fn refine(&mut self) {
        self.apply(Action::Refine).await
    }
}
