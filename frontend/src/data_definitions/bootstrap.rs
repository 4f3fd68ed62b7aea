//! Deep-link parameters -> the initial filter state of a search page view.
//!
//! Parameters are read once, all together, and never written back.

use std::collections::BTreeSet;

use common::{
    facet_options::{FacetOption, MEDIA_TYPE_OPTIONS, STATUS_OPTIONS},
    filter_state::FilterState,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const QUERY_KEY: &str = "q";
pub const MEDIA_TYPE_KEY: &str = "mediaType";
pub const TOPICS_KEY: &str = "topics";
pub const GENRES_KEY: &str = "genres";
pub const STATUS_KEY: &str = "status";

/// The recognized deep-link parameters. Anything else in the link is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapParams {
    pub query: Option<String>,
    pub media_type: Option<String>,
    pub topics: Vec<String>,
    pub genres: Vec<String>,
    pub status: Option<String>,
}

impl BootstrapParams {
    /// Parse `a=b&c=d`, with or without a leading `?`.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    pub fn from_url(url: &url::Url) -> Self {
        Self::from_pairs(url.query_pairs())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                QUERY_KEY => params.query = Some(value.to_string()),
                MEDIA_TYPE_KEY => params.media_type = Some(value.to_string()),
                TOPICS_KEY => params.topics.extend(split_list(value)),
                GENRES_KEY => params.genres.extend(split_list(value)),
                STATUS_KEY => params.status = Some(value.to_string()),
                other => debug!(key = other, "ignoring unrecognized bootstrap parameter"),
            }
        }
        params
    }

    /// Overlay the recognized parameters on the default filter state, field by field.
    pub fn to_filter_state(&self) -> FilterState {
        let mut state = FilterState::default();
        if let Some(query) = &self.query {
            state.free_text = query.clone();
        }
        if let Some(media_type) = self.media_type.as_deref().and_then(|v| known_value(MEDIA_TYPE_KEY, MEDIA_TYPE_OPTIONS, v)) {
            state.item_types = BTreeSet::from([media_type.to_string()]);
        }
        state.topics = self.topics.iter().cloned().collect();
        state.genres = self.genres.iter().cloned().collect();
        if let Some(status) = self.status.as_deref().and_then(|v| known_value(STATUS_KEY, STATUS_OPTIONS, v)) {
            state.status = status.to_string();
        }
        state
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Canonical spelling of `value` from `options`; unknown values are dropped.
fn known_value(key: &str, options: &[FacetOption], value: &str) -> Option<&'static str> {
    let found = options.iter().find(|option| option.value.eq_ignore_ascii_case(value)).map(|option| option.value);
    if found.is_none() {
        debug!(key, value, "ignoring unrecognized bootstrap value");
    }
    found
}

/// Fired exactly once, after every recognized parameter has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapComplete {
    pub filter_state: FilterState,
}

/// Single-use: `load` consumes the loader, so a page view bootstraps once.
#[derive(Debug, Clone, Default)]
pub struct BootstrapLoader {
    params: BootstrapParams,
}

impl BootstrapLoader {
    pub fn new(params: BootstrapParams) -> Self {
        Self { params }
    }

    pub fn from_query_string(query: &str) -> Self {
        Self::new(BootstrapParams::from_query_string(query))
    }

    pub fn params(&self) -> &BootstrapParams {
        &self.params
    }

    pub fn load(self) -> BootstrapComplete {
        let filter_state = self.params.to_filter_state();
        debug!(?filter_state, "bootstrap complete");
        BootstrapComplete { filter_state }
    }
}
