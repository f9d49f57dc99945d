//! Plain-text rendering of the exploration view.

use std::fmt::Write;
use trailure_explore::{Detail, ExploreState, Phase, RefinePhase, QUICK_DESTINATIONS};
use trailure_gateway::{Experience, RefinedOption};

pub fn quick_destinations() -> String {
    let mut out = String::from("Quick destinations:\n");
    for (i, quick) in QUICK_DESTINATIONS.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} {}", i + 1, quick.emoji, quick.label);
    }
    out
}

/// The main view: breadcrumb, category tabs, results or status panel.
pub fn view(state: &ExploreState) -> String {
    let mut out = String::new();

    if !state.breadcrumb.is_empty() {
        let _ = writeln!(out, "{}", state.breadcrumb.join(" › "));
    }

    match state.phase {
        Phase::Idle => {
            out.push_str("✈️  Your journey begins with a destination.\n");
            out.push_str("Search for one, or pick a quick suggestion.\n\n");
            out.push_str(&quick_destinations());
        }
        Phase::Searching => {
            let _ = writeln!(out, "Exploring {}...", state.query);
        }
        Phase::Failed => {
            out.push_str("😕 Couldn't load experiences\n");
            if let Some(error) = &state.error {
                let _ = writeln!(out, "   {}", error);
            }
            out.push_str("   Try Again: run `retry`\n");
        }
        Phase::Results => {
            out.push_str(&category_tabs(state));
            let _ = writeln!(
                out,
                "\nExploring {} · {} experiences\n",
                state.destination,
                state.filtered.len()
            );
            for (i, exp) in state.filtered.iter().enumerate() {
                out.push_str(&card(i, exp));
                out.push('\n');
            }
        }
    }
    out
}

pub fn category_tabs(state: &ExploreState) -> String {
    let tabs: Vec<String> = state
        .category_counts()
        .into_iter()
        .map(|(cat, count)| {
            if cat == state.active_category {
                format!("[{} ({})]", cat, count)
            } else {
                format!("{} ({})", cat, count)
            }
        })
        .collect();
    format!("{}\n", tabs.join("  "))
}

/// One experience card; `index` is 0-based, shown 1-based.
pub fn card(index: usize, exp: &Experience) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>2}. {} {}  ⭐ {}  [{}]",
        index + 1,
        exp.display_emoji(),
        exp.title,
        exp.display_rating(),
        exp.badge()
    );
    let _ = writeln!(out, "    📍 {}", exp.location);
    if !exp.description.is_empty() {
        let _ = writeln!(out, "    {}", exp.description);
    }
    if !exp.tags.is_empty() {
        let tags: Vec<String> = exp.tags.iter().map(|t| format!("#{}", t)).collect();
        let _ = writeln!(out, "    {}", tags.join(" "));
    }
    let _ = writeln!(out, "    {} / {}", exp.price, exp.display_price_note());
    out
}

pub fn detail(detail: &Detail) -> String {
    let exp = &detail.experience;
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", exp.display_emoji(), exp.title);
    let _ = writeln!(out, "📍 {} · {}", exp.location, exp.category);
    if !exp.description.is_empty() {
        let _ = writeln!(out, "\n{}", exp.description);
    }

    out.push_str("\nTailor your experience:\n");
    for option in &exp.tailor_options {
        let marker = if detail.chosen.as_deref() == Some(option.label.as_str()) {
            "(•)"
        } else {
            "( )"
        };
        let _ = writeln!(out, "  {} {} - {}", marker, option.label, option.desc);
    }

    match (&detail.chosen, detail.phase) {
        (_, RefinePhase::Refining) => out.push_str("\nFinding perfect options...\n"),
        (Some(label), _) => {
            let _ = writeln!(out, "\nFind Options for {}: run `refine`", label);
        }
        (None, _) => out.push_str("\nSelect your travel style: run `tailor <label>`\n"),
    }

    if !detail.options.is_empty() {
        out.push_str("\nYour Tailored Options:\n");
        for option in &detail.options {
            out.push_str(&refined_option(option));
        }
    }
    out
}

pub fn refined_option(option: &RefinedOption) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  • {}", option.title);
    if !option.description.is_empty() {
        let _ = writeln!(out, "    {}", option.description);
    }
    if !option.highlight.is_empty() {
        let _ = writeln!(out, "    ✨ {}", option.highlight);
    }
    if !option.price.is_empty() || !option.duration.is_empty() {
        let _ = writeln!(out, "    {}  ⏱ {}", option.price, option.duration);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailure_explore::{reduce, Action, Effect};
    use trailure_gateway::SearchResult;

    fn results_state() -> ExploreState {
        let reply = serde_json::json!({
            "destination": "Iceland",
            "categories": ["Nature", "Wellness"],
            "experiences": [
                {"id": 1, "title": "Glacier hike", "location": "Vatnajökull", "category": "Nature",
                 "price": "$150", "tags": ["ice"], "tailorOptions": [{"label": "Solo Explorer", "desc": "Alone"}]},
                {"id": 2, "title": "Lagoon soak", "location": "Reykjanes", "category": "Wellness",
                 "type": "Spa", "rating": 4.5, "price": "$80", "priceNote": "per entry"}
            ]
        });
        let mut state = ExploreState::new();
        let effects = reduce(&mut state, Action::Search("Iceland".into()));
        let Effect::Search { token, .. } = effects[0].clone() else { unreachable!() };
        let result = SearchResult::from_value(reply, "Iceland").unwrap();
        reduce(&mut state, Action::SearchCompleted { token, result: Ok(result) });
        state
    }

    #[test]
    fn test_welcome_lists_quick_destinations() {
        let text = view(&ExploreState::new());
        assert!(text.contains("journey begins"));
        assert!(text.contains("5. 🏝️ SE Asia"));
    }

    #[test]
    fn test_results_view() {
        let text = view(&results_state());
        assert!(text.starts_with("Iceland\n"));
        assert!(text.contains("[All (2)]  Nature (1)  Wellness (1)"));
        assert!(text.contains("Exploring Iceland · 2 experiences"));
        assert!(text.contains(" 1. 🌍 Glacier hike  ⭐ 4.8  [Nature]"));
        assert!(text.contains("$150 / person"));
        assert!(text.contains(" 2. 🌍 Lagoon soak  ⭐ 4.5  [Spa]"));
        assert!(text.contains("$80 / per entry"));
    }

    #[test]
    fn test_error_panel() {
        let mut state = ExploreState::new();
        let effects = reduce(&mut state, Action::Search("Japan".into()));
        let Effect::Search { token, .. } = effects[0].clone() else { unreachable!() };
        reduce(&mut state, Action::SearchCompleted { token, result: Err("HTTP 500".into()) });

        let text = view(&state);
        assert!(text.contains("Couldn't load experiences"));
        assert!(text.contains("HTTP 500"));
        assert!(text.contains("retry"));
    }

    #[test]
    fn test_detail_view() {
        let mut state = results_state();
        let exp = state.filtered[0].clone();
        reduce(&mut state, Action::SelectCard(exp));
        let text = detail(state.detail.as_ref().unwrap());
        assert!(text.contains("( ) Solo Explorer - Alone"));
        assert!(text.contains("run `tailor <label>`"));

        reduce(&mut state, Action::ChooseTailor("Solo Explorer".into()));
        let text = detail(state.detail.as_ref().unwrap());
        assert!(text.contains("(•) Solo Explorer"));
        assert!(text.contains("Find Options for Solo Explorer"));
    }

    #[test]
    fn test_refined_option_skips_empty_fields() {
        let text = refined_option(&trailure_explore::refine_error_option());
        assert!(text.contains("• Error"));
        assert!(!text.contains("⏱"));
    }
}
