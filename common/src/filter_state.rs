//! The filter state a search page is currently showing.
//!
//! A [`FilterState`] is a value: every user interaction produces a new one
//! through the `with_*` / `toggle_*` helpers below, it is never edited in place
//! by the coordinator.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search_const::ALL_SENTINEL;

/// Which searchable domain is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Individual media items.
    #[default]
    Items,
    /// Curated collections (mixlists).
    Collections,
}

/// Requested ordering of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Defer to the index ranking.
    #[default]
    Relevance,
    DateAdded,
    Rating,
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind}: {value:?}")]
pub struct ParseFilterValueError {
    pub kind: &'static str,
    pub value: String,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Collections => "collections",
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = ParseFilterValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "items" | "media" => Ok(Self::Items),
            "collections" | "mixlists" => Ok(Self::Collections),
            _ => Err(ParseFilterValueError { kind: "search mode", value: s.to_string() }),
        }
    }
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::DateAdded => "dateAdded",
            Self::Rating => "rating",
            Self::Title => "title",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseFilterValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "dateadded" | "date_added" | "date-added" => Ok(Self::DateAdded),
            "rating" => Ok(Self::Rating),
            "title" => Ok(Self::Title),
            _ => Err(ParseFilterValueError { kind: "sort key", value: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub free_text: String,
    pub mode: SearchMode,
    /// `{"all"}` or empty means no type restriction.
    pub item_types: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    pub genres: BTreeSet<String>,
    /// Single status or `"all"`. Items mode only.
    pub status: String,
    /// Items mode only.
    pub ratings: BTreeSet<String>,
    pub sort_key: SortKey,
    /// One-based.
    pub page: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            free_text: String::new(),
            mode: SearchMode::Items,
            item_types: BTreeSet::from([ALL_SENTINEL.to_string()]),
            topics: BTreeSet::new(),
            genres: BTreeSet::new(),
            status: ALL_SENTINEL.to_string(),
            ratings: BTreeSet::new(),
            sort_key: SortKey::Relevance,
            page: 1,
        }
    }
}

impl FilterState {
    /// Concrete item types to filter on, with the `"all"` sentinel removed.
    /// Empty when the selection does not restrict types.
    pub fn restricted_item_types(&self) -> Vec<&str> {
        if self.item_types.contains(ALL_SENTINEL) {
            return Vec::new();
        }
        self.item_types.iter().map(String::as_str).filter(|t| !t.trim().is_empty()).collect()
    }

    /// The status filter, or `None` when it is `"all"` or blank.
    pub fn status_filter(&self) -> Option<&str> {
        let status = self.status.trim();
        if status.is_empty() || status.eq_ignore_ascii_case(ALL_SENTINEL) {
            None
        } else {
            Some(status)
        }
    }

    /// True when `other` differs from `self` in nothing but the page.
    pub fn same_filters_as(&self, other: &FilterState) -> bool {
        let mut other = other.clone();
        other.page = self.page;
        *self == other
    }

    pub fn with_free_text(&self, text: impl Into<String>) -> Self {
        Self { free_text: text.into(), ..self.clone() }
    }

    /// Switching to a different mode always lands on page 1.
    pub fn with_mode(&self, mode: SearchMode) -> Self {
        let page = if mode == self.mode { self.page } else { 1 };
        Self { mode, page, ..self.clone() }
    }

    pub fn with_status(&self, status: impl Into<String>) -> Self {
        let status = status.into();
        let status = if status.trim().is_empty() { ALL_SENTINEL.to_string() } else { status };
        Self { status, ..self.clone() }
    }

    pub fn with_sort_key(&self, sort_key: SortKey) -> Self {
        Self { sort_key, ..self.clone() }
    }

    pub fn with_page(&self, page: u64) -> Self {
        Self { page: page.max(1), ..self.clone() }
    }

    pub fn toggle_item_type(&self, item_type: &str) -> Self {
        let mut item_types = self.item_types.clone();
        if item_type == ALL_SENTINEL {
            item_types = BTreeSet::from([ALL_SENTINEL.to_string()]);
        } else if item_types.contains(ALL_SENTINEL) {
            item_types = BTreeSet::from([item_type.to_string()]);
        } else if !item_types.remove(item_type) {
            item_types.insert(item_type.to_string());
        }
        if item_types.is_empty() {
            item_types.insert(ALL_SENTINEL.to_string());
        }
        Self { item_types, ..self.clone() }
    }

    pub fn toggle_topic(&self, topic: &str) -> Self {
        Self { topics: toggled(&self.topics, topic), ..self.clone() }
    }

    pub fn toggle_genre(&self, genre: &str) -> Self {
        Self { genres: toggled(&self.genres, genre), ..self.clone() }
    }

    pub fn toggle_rating(&self, rating: &str) -> Self {
        Self { ratings: toggled(&self.ratings, rating), ..self.clone() }
    }

    /// Drops every filter selection. Mode and sort order survive.
    pub fn cleared(&self) -> Self {
        Self { mode: self.mode, sort_key: self.sort_key, ..Self::default() }
    }
}

fn toggled(set: &BTreeSet<String>, value: &str) -> BTreeSet<String> {
    let mut set = set.clone();
    if !set.remove(value) {
        set.insert(value.to_string());
    }
    set
}
