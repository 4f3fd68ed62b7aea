use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filter_state::SearchMode;

/// One search hit, in the same shape whichever mode produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    pub id: String,
    pub title: String,
    /// Item type tag, or `"Collection"` for collection hits.
    pub result_type: String,
    pub topics: Vec<String>,
    pub genres: Vec<String>,
    pub date_added: Option<NaiveDate>,
    pub summary: String,
    pub thumbnail_url: Option<String>,
    pub is_collection: bool,
    /// Mode-specific extras (author, runtime, rating, item counts, ...), unvalidated.
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl SearchResultRecord {
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str()).filter(|s| !s.trim().is_empty())
    }

    pub fn attribute_u64(&self, key: &str) -> Option<u64> {
        self.attributes.get(key).and_then(|v| v.as_u64())
    }

    /// Who made it, or how big a collection is.
    pub fn byline(&self) -> Option<String> {
        if self.is_collection {
            return self.attribute_u64("media_item_count").map(|n| format!("{n} items"));
        }
        ["author", "director", "creator", "publisher"]
            .iter()
            .find_map(|key| self.attribute_str(key))
            .map(str::to_string)
    }

    pub fn duration_label(&self) -> Option<String> {
        if self.is_collection {
            return None;
        }
        if let Some(minutes) = self.attribute_u64("runtime_minutes") {
            return Some(format!("{minutes} min"));
        }
        if let Some(year) = self.attribute_u64("release_year") {
            return Some(year.to_string());
        }
        self.attribute_u64("season_count").map(|n| format!("{n} seasons"))
    }
}

/// What the rendering layer sees. Published as a whole, never field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSnapshot {
    pub records: Vec<SearchResultRecord>,
    pub total_found: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub mode: SearchMode,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total_found: 0,
            total_pages: 0,
            current_page: 1,
            mode: SearchMode::Items,
            loading: false,
            error: None,
        }
    }
}

impl SearchSnapshot {
    pub fn result_count(&self) -> usize {
        self.records.len()
    }

    /// A finished, successful search that matched nothing. Distinct from an error.
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.error.is_none() && self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(is_collection: bool, attributes: serde_json::Value) -> SearchResultRecord {
        SearchResultRecord {
            id: "1".to_string(),
            title: "t".to_string(),
            result_type: if is_collection { "Collection".to_string() } else { "Movie".to_string() },
            topics: vec![],
            genres: vec![],
            date_added: None,
            summary: String::new(),
            thumbnail_url: None,
            is_collection,
            attributes: serde_json::from_value(attributes).unwrap(),
        }
    }

    #[test]
    fn byline_prefers_author_then_director() {
        let r = record(false, json!({"director": "Villeneuve", "author": ""}));
        assert_eq!(r.byline().as_deref(), Some("Villeneuve"));
        let r = record(false, json!({"author": "Herbert", "director": "Lynch"}));
        assert_eq!(r.byline().as_deref(), Some("Herbert"));
        let r = record(true, json!({"media_item_count": 12}));
        assert_eq!(r.byline().as_deref(), Some("12 items"));
    }

    #[test]
    fn duration_label_falls_back_through_fields() {
        assert_eq!(record(false, json!({"runtime_minutes": 155})).duration_label().as_deref(), Some("155 min"));
        assert_eq!(record(false, json!({"release_year": 1965})).duration_label().as_deref(), Some("1965"));
        assert_eq!(record(false, json!({"season_count": 3})).duration_label().as_deref(), Some("3 seasons"));
        assert_eq!(record(false, json!({})).duration_label(), None);
        assert_eq!(record(true, json!({"runtime_minutes": 5})).duration_label(), None);
    }

    #[test]
    fn empty_result_is_not_an_error_state() {
        let snapshot = SearchSnapshot::default();
        assert!(snapshot.is_empty_result());
        let failed = SearchSnapshot { error: Some("boom".to_string()), ..SearchSnapshot::default() };
        assert!(!failed.is_empty_result());
        let loading = SearchSnapshot { loading: true, ..SearchSnapshot::default() };
        assert!(!loading.is_empty_result());
    }
}
