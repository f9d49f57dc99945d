//! # Trailure Explore
//!
//! The exploration state machine:
//! 1. A destination search fills the experience list (or fails with a message)
//! 2. A category filter narrows the list without any network call
//! 3. Opening a card shows its detail and traveler profiles
//! 4. Refining asks for options tailored to the chosen profile
//!
//! State changes only through [`reduce`]; [`Explorer`] runs the gateway
//! calls the reducer asks for and feeds the answers back.

mod explorer;
mod reducer;
mod state;

#[cfg(test)]
mod testing;

pub use explorer::Explorer;
pub use reducer::{reduce, Action, Effect, UNKNOWN_ERROR};
pub use state::{
    filter_by_category, refine_error_option, Detail, ExploreState, Phase, QuickDestination,
    RefinePhase, RequestToken, ALL_CATEGORY, QUICK_DESTINATIONS, REFINE_ERROR_DESCRIPTION,
    REFINE_ERROR_TITLE,
};
