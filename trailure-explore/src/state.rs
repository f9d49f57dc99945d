//! Exploration view state

use serde::{Deserialize, Serialize};
use trailure_gateway::{Experience, RefinedOption};

/// Sentinel category that shows every experience
pub const ALL_CATEGORY: &str = "All";

/// Fixed entry shown when a refine request fails
pub const REFINE_ERROR_TITLE: &str = "Error";
pub const REFINE_ERROR_DESCRIPTION: &str = "Couldn't load options. Please try again.";

/// A one-click destination shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickDestination {
    pub emoji: &'static str,
    pub label: &'static str,
    /// Text searched when picked
    pub value: &'static str,
}

pub const QUICK_DESTINATIONS: [QuickDestination; 6] = [
    QuickDestination { emoji: "🌍", label: "Africa", value: "Africa" },
    QuickDestination { emoji: "🗾", label: "Japan", value: "Japan" },
    QuickDestination { emoji: "🏔️", label: "Patagonia", value: "Patagonia" },
    QuickDestination { emoji: "🌊", label: "Amalfi Coast", value: "Amalfi Coast" },
    QuickDestination { emoji: "🏝️", label: "SE Asia", value: "Southeast Asia" },
    QuickDestination { emoji: "❄️", label: "Iceland", value: "Iceland" },
];

/// Sequence number tagging each gateway call. Only the latest issued token
/// of a flow may complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

/// Outer search state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Results,
    Failed,
}

/// Refine state within an open detail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinePhase {
    #[default]
    Idle,
    Refining,
    Refined,
    Failed,
}

/// The open detail panel for one experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub experience: Experience,
    /// Chosen tailor option label
    pub chosen: Option<String>,
    pub phase: RefinePhase,
    pub options: Vec<RefinedOption>,
    pub(crate) pending: Option<RequestToken>,
}

impl Detail {
    pub fn new(experience: Experience) -> Self {
        Self {
            experience,
            chosen: None,
            phase: RefinePhase::Idle,
            options: Vec::new(),
            pending: None,
        }
    }

    pub fn is_refining(&self) -> bool {
        self.phase == RefinePhase::Refining
    }
}

/// Everything the exploration view shows.
///
/// Updated only through [`crate::reduce`]. Experiences are never edited in
/// place; a search replaces the lists wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreState {
    pub query: String,
    pub phase: Phase,
    pub error: Option<String>,
    /// Display name of the searched destination
    pub destination: String,
    /// Category tabs, "All" first once results arrive
    pub categories: Vec<String>,
    pub active_category: String,
    pub experiences: Vec<Experience>,
    pub filtered: Vec<Experience>,
    pub breadcrumb: Vec<String>,
    pub detail: Option<Detail>,
    pub(crate) pending_search: Option<RequestToken>,
    pub(crate) last_token: u64,
}

impl Default for ExploreState {
    fn default() -> Self {
        Self {
            query: String::new(),
            phase: Phase::Idle,
            error: None,
            destination: String::new(),
            categories: Vec::new(),
            active_category: ALL_CATEGORY.to_string(),
            experiences: Vec::new(),
            filtered: Vec::new(),
            breadcrumb: Vec::new(),
            detail: None,
            pending_search: None,
            last_token: 0,
        }
    }
}

impl ExploreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Searching
    }

    /// Whether anything beyond the welcome screen is showing
    pub fn has_results(&self) -> bool {
        !self.filtered.is_empty() || self.is_loading() || self.error.is_some()
    }

    /// Each category tab with the number of experiences it shows
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.categories
            .iter()
            .map(|cat| (cat.as_str(), filter_by_category(&self.experiences, cat).len()))
            .collect()
    }

    pub(crate) fn issue_token(&mut self) -> RequestToken {
        self.last_token += 1;
        RequestToken(self.last_token)
    }
}

/// Experiences shown under `category`, in their original order.
pub fn filter_by_category(experiences: &[Experience], category: &str) -> Vec<Experience> {
    if category == ALL_CATEGORY {
        return experiences.to_vec();
    }
    experiences
        .iter()
        .filter(|exp| exp.category == category)
        .cloned()
        .collect()
}

/// The single option shown when a refine fails
pub fn refine_error_option() -> RefinedOption {
    RefinedOption {
        title: REFINE_ERROR_TITLE.to_string(),
        description: REFINE_ERROR_DESCRIPTION.to_string(),
        price: String::new(),
        duration: String::new(),
        highlight: String::new(),
    }
}
