//! Hit document shapes as the index stores them.
//!
//! Every field is optional on the wire: a document missing fields still
//! decodes, so the normalizer sees every hit the index returned. A field
//! that is null or carries the wrong JSON type decodes as absent instead of
//! failing the whole page.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ItemDocument {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub media_type: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub genres: Vec<String>,
    /// Epoch seconds.
    #[serde(deserialize_with = "lenient_i64")]
    pub date_added: Option<i64>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub rating: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub director: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub publisher: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub release_year: Option<i64>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub runtime_minutes: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub season_count: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CollectionDocument {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub thumbnail: Option<String>,
    /// Epoch seconds.
    #[serde(deserialize_with = "lenient_i64")]
    pub date_created: Option<i64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub media_item_count: Option<u64>,
    #[serde(deserialize_with = "lenient_strings")]
    pub media_item_titles: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub genres: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Raw hits of one round trip, tagged by the domain that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum RawHits {
    Items(Vec<ItemDocument>),
    Collections(Vec<CollectionDocument>),
}

impl RawHits {
    pub fn len(&self) -> usize {
        match self {
            Self::Items(hits) => hits.len(),
            Self::Collections(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strings and numbers as text; anything else as the empty string.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub(crate) fn lenient_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// A list keeps its scalar entries; a lone scalar becomes a one-entry list.
pub(crate) fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

/// Integers, floats (truncated) and numeric strings such as `"1995"`.
pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
