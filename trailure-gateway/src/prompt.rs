//! Instruction text for the two requests trailure makes.

use crate::model::Experience;

/// Number of experiences a search asks for
pub const SEARCH_EXPERIENCE_COUNT: usize = 9;

/// Number of tailored options a refine asks for
pub const REFINE_OPTION_COUNT: usize = 4;

/// Build the destination search prompt.
///
/// Asks for exactly nine experiences, each with four tailor options, plus a
/// top-level category list, as a bare JSON object.
pub fn search_prompt(destination: &str) -> String {
    format!(
        r#"You are Trailure's travel curator. Create {count} vivid, varied travel experiences for the destination "{dest}".

Reply with ONLY a JSON object of exactly this shape. No markdown, no commentary:
{{
  "destination": "Display name for {dest}",
  "categories": ["Adventure", "Culture", "Food & Drink", "Nature", "Wellness", "Hidden Gems"],
  "experiences": [
    {{
      "id": 1,
      "emoji": "🏔️",
      "title": "Name of the experience",
      "location": "Specific place within {dest}",
      "category": "Adventure",
      "type": "Outdoor",
      "description": "2-3 sentences on why this is unmissable.",
      "tags": ["tag1", "tag2", "tag3"],
      "rating": 4.8,
      "price": "$120",
      "priceNote": "per person",
      "tailorOptions": [
        {{"label": "Solo Explorer", "desc": "Best for solo travelers"}},
        {{"label": "Couple Retreat", "desc": "Perfect for two"}},
        {{"label": "Family Adventure", "desc": "Great with kids"}},
        {{"label": "Group Trip", "desc": "Ideal for groups of 4+"}}
      ]
    }}
  ]
}}

Rules:
- Return exactly {count} experiences, each with every field above and exactly 4 tailorOptions.
- Every experience's category must be one of the listed categories.
- Mix adventure, hidden gems, local food, cultural sites, nature and wellness.
- Vary prices between $30 and $500.
- Make the tailorOptions fit each experience."#,
        count = SEARCH_EXPERIENCE_COUNT,
        dest = destination,
    )
}

/// Build the prompt that refines one experience for a traveler profile.
pub fn refine_prompt(experience: &Experience, profile: &str) -> String {
    format!(
        r#"You are Trailure's travel curator. A traveler picked "{title}" in "{location}" and wants options for "{profile}".

Reply with ONLY a JSON object of exactly this shape. No markdown, no commentary:
{{
  "results": [
    {{
      "title": "Specific option name",
      "description": "2 sentences tailored to {profile} travelers.",
      "price": "$XX",
      "duration": "X hours",
      "highlight": "The one unmissable thing about this option"
    }}
  ]
}}

Return exactly {count} distinct options for "{profile}" travelers, varying budget, duration and style."#,
        title = experience.title,
        location = experience.location,
        profile = profile,
        count = REFINE_OPTION_COUNT,
    )
}
