//! Fixed selectable values for the facet dimensions that are not loaded from the catalog.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> FacetOption {
    FacetOption { value, label }
}

pub const MEDIA_TYPE_OPTIONS: &[FacetOption] = &[
    opt("all", "All Media Types"),
    opt("Article", "Articles"),
    opt("Book", "Books"),
    opt("Channel", "Channels"),
    opt("Document", "Documents"),
    opt("Movie", "Movies"),
    opt("Music", "Music"),
    opt("Other", "Other"),
    opt("Playlist", "Playlists"),
    opt("Podcast", "Podcasts"),
    opt("TVShow", "TV Shows"),
    opt("Video", "Videos"),
    opt("VideoGame", "Video Games"),
    opt("Website", "Websites"),
];

pub const STATUS_OPTIONS: &[FacetOption] = &[
    opt("all", "All Statuses"),
    opt("Uncharted", "Uncharted"),
    opt("ActivelyExploring", "Actively Exploring"),
    opt("Completed", "Completed"),
    opt("Abandoned", "Abandoned"),
];

pub const RATING_OPTIONS: &[FacetOption] = &[
    opt("SuperLike", "Super Like"),
    opt("Like", "Like"),
    opt("Neutral", "Neutral"),
    opt("Dislike", "Dislike"),
];

pub const SORT_OPTIONS: &[FacetOption] = &[
    opt("relevance", "Most Relevant"),
    opt("dateAdded", "Recently Added"),
    opt("rating", "Highest Rated"),
    opt("title", "Title (A-Z)"),
];

pub const SEARCH_MODE_OPTIONS: &[FacetOption] = &[
    opt("media", "Media"),
    opt("mixlists", "Mixlists"),
];

/// Display label for `value`, falling back to the value itself.
pub fn label_for<'a>(options: &[FacetOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|option| option.value.eq_ignore_ascii_case(value))
        .map(|option| option.label)
        .unwrap_or(value)
}
