//! Typed payloads produced by the model.
//!
//! Decoding is lenient: the model is asked for a fixed shape but fields go
//! missing, come back as `null`, or arrive as numbers where strings were
//! requested. Everything except an experience's `title` falls back to a
//! default instead of failing the whole reply.

use serde::{Deserialize, Serialize};
use std::fmt;
use trailure_error::{Error, Result};

/// Identifier of an experience. The model usually numbers them; anything
/// that is not a whole number is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceId {
    Number(i64),
    Text(String),
}

impl Default for ExperienceId {
    fn default() -> Self {
        ExperienceId::Number(0)
    }
}

impl fmt::Display for ExperienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceId::Number(n) => write!(f, "{}", n),
            ExperienceId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A traveler-profile variant offered for an experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailorOption {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub desc: String,
}

/// One travel-activity recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default, deserialize_with = "de::lenient_id")]
    pub id: ExperienceId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub emoji: String,
    #[serde(deserialize_with = "de::lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub category: String,
    #[serde(rename = "type", default, deserialize_with = "de::lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "de::lenient_strings")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "de::lenient_rating")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub price_note: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub tailor_options: Vec<TailorOption>,
}

impl Experience {
    pub fn display_emoji(&self) -> &str {
        if self.emoji.is_empty() {
            "🌍"
        } else {
            &self.emoji
        }
    }

    /// Badge text: the experience type, or its category when untyped
    pub fn badge(&self) -> &str {
        if self.kind.is_empty() {
            &self.category
        } else {
            &self.kind
        }
    }

    pub fn display_rating(&self) -> String {
        match self.rating {
            Some(r) if r != 0.0 => format!("{}", r),
            _ => "4.8".to_string(),
        }
    }

    pub fn display_price_note(&self) -> &str {
        if self.price_note.is_empty() {
            "person"
        } else {
            &self.price_note
        }
    }

    pub fn tailor_option(&self, label: &str) -> Option<&TailorOption> {
        self.tailor_options.iter().find(|o| o.label == label)
    }
}

/// A concrete, priced variant of an experience for one traveler profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedOption {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub highlight: String,
}

/// The envelope returned by a destination search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub destination_display_name: String,
    pub categories: Vec<String>,
    pub experiences: Vec<Experience>,
}

#[derive(Deserialize)]
struct SearchReply {
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    experiences: Option<Vec<Experience>>,
}

#[derive(Deserialize)]
struct RefineReply {
    #[serde(default)]
    results: Option<Vec<RefinedOption>>,
}

impl SearchResult {
    /// Decode a parsed search reply. A missing or empty display name falls
    /// back to the destination as typed.
    pub fn from_value(value: serde_json::Value, query: &str) -> Result<Self> {
        let reply: SearchReply = decode(value, "model::search_result")?;
        let destination_display_name = reply
            .destination
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| query.to_string());

        Ok(Self {
            destination_display_name,
            categories: reply.categories.unwrap_or_default(),
            experiences: reply.experiences.unwrap_or_default(),
        })
    }
}

impl RefinedOption {
    /// Decode a parsed refine reply; a missing `results` list is empty.
    pub fn list_from_value(value: serde_json::Value) -> Result<Vec<Self>> {
        let reply: RefineReply = decode(value, "model::refined_options")?;
        Ok(reply.results.unwrap_or_default())
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    operation: &'static str,
) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        Error::format(e.to_string())
            .with_operation(operation)
            .set_source(e)
    })
}

mod de {
    use super::ExperienceId;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Strings, numbers and booleans become a string; `null` becomes empty.
    pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            other => scalar_to_string(other.clone()).ok_or_else(|| {
                serde::de::Error::custom(format!("expected a string, found {}", other))
            }),
        }
    }

    /// A list of scalars, each made a string. Non-scalar entries are skipped
    /// and anything that is not a list is empty.
    pub fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items.into_iter().filter_map(scalar_to_string).collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn lenient_id<'de, D>(deserializer: D) -> Result<ExperienceId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if let Some(n) = value.as_i64() {
            return Ok(ExperienceId::Number(n));
        }
        Ok(scalar_to_string(value)
            .map(ExperienceId::Text)
            .unwrap_or_default())
    }

    /// Accepts `4.8`, `"4.8"` or `null`. Unparsable strings are dropped.
    pub fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => Ok(s.trim().parse().ok()),
            _ => Ok(None),
        }
    }
}
