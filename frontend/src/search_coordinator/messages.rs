//! Everything the search coordinator reacts to, and what it reports back.

use backend::api::search::SearchOutcome;
use common::filter_state::{FilterState, SearchMode, SortKey};

use crate::data_definitions::bootstrap::BootstrapComplete;

#[derive(Clone, Debug)]
pub enum Message {
    // User actions
    SetFreeText(String),
    SetMode(SearchMode),
    ToggleItemType(String),
    ToggleTopic(String),
    ToggleGenre(String),
    /// Blank resets to `"all"`.
    SetStatus(String),
    ToggleRating(String),
    SetSortKey(SortKey),
    GoToPage(u64),
    ClearFilters,
    /// Swap in a whole new filter state at once.
    ReplaceFilters(FilterState),
    /// Re-run the current filter state, e.g. after a failure.
    Retry,

    // Lifecycle
    BeginBootstrap,
    BootstrapComplete(BootstrapComplete),

    // Internal events
    SearchCompleted(SearchCompletion),
}

impl Message {
    /// Convert to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetFreeText(_) => "SetFreeText",
            Self::SetMode(_) => "SetMode",
            Self::ToggleItemType(_) => "ToggleItemType",
            Self::ToggleTopic(_) => "ToggleTopic",
            Self::ToggleGenre(_) => "ToggleGenre",
            Self::SetStatus(_) => "SetStatus",
            Self::ToggleRating(_) => "ToggleRating",
            Self::SetSortKey(_) => "SetSortKey",
            Self::GoToPage(_) => "GoToPage",
            Self::ClearFilters => "ClearFilters",
            Self::ReplaceFilters(_) => "ReplaceFilters",
            Self::Retry => "Retry",
            Self::BeginBootstrap => "BeginBootstrap",
            Self::BootstrapComplete(_) => "BootstrapComplete",
            Self::SearchCompleted(_) => "SearchCompleted",
        }
    }

    /// Produces a new filter state from the current one, if this is a filter edit.
    pub(crate) fn next_filter_state(&self, current: &FilterState) -> Option<FilterState> {
        let next = match self {
            Self::SetFreeText(text) => current.with_free_text(text.clone()),
            Self::SetMode(mode) => current.with_mode(*mode),
            Self::ToggleItemType(item_type) => current.toggle_item_type(item_type),
            Self::ToggleTopic(topic) => current.toggle_topic(topic),
            Self::ToggleGenre(genre) => current.toggle_genre(genre),
            Self::SetStatus(status) => current.with_status(status.clone()),
            Self::ToggleRating(rating) => current.toggle_rating(rating),
            Self::SetSortKey(sort_key) => current.with_sort_key(*sort_key),
            Self::GoToPage(page) => current.with_page(*page),
            Self::ClearFilters => current.cleared(),
            Self::ReplaceFilters(state) => state.clone(),
            Self::Retry | Self::BeginBootstrap | Self::BootstrapComplete(_) | Self::SearchCompleted(_) => return None,
        };
        Some(next)
    }
}

/// A finished round trip, tagged with the request it answers.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchCompletion {
    pub request_id: u64,
    pub outcome: SearchOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordinatorPhase {
    Idle,
    Bootstrapping,
    Ready,
}

impl CoordinatorPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Bootstrapping => "Bootstrapping",
            Self::Ready => "Ready",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateResult {
    /// A search went out under this id.
    Dispatched { request_id: u64 },
    /// No change, or not accepting this message in the current phase.
    Ignored,
    /// Lifecycle transition with no search attached.
    PhaseChanged(CoordinatorPhase),
    /// A completion was published.
    Applied,
    /// A completion arrived for a request that is no longer the latest.
    Superseded,
    /// The latest request failed; the error was published, records kept.
    Failed,
    /// The requested page no longer exists; re-issued for this page instead.
    Requeried { page: u64 },
}
