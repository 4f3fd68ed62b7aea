//! Mode-specific query descriptors handed to the search executor.

use serde::{Deserialize, Serialize};

use crate::filter_state::SearchMode;

/// A facet dimension that can appear in a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FacetField {
    ItemType,
    Topics,
    Genres,
    Status,
    Rating,
}

impl FacetField {
    /// Whether the dimension exists for the given mode.
    pub fn applies_to(&self, mode: SearchMode) -> bool {
        match self {
            Self::Topics | Self::Genres => true,
            Self::ItemType | Self::Status | Self::Rating => mode == SearchMode::Items,
        }
    }
}

/// Documents must match at least one of `values` on `field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: FacetField,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    DateAdded,
    Rating,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortClause {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Everything the index needs to answer one page of one search.
///
/// Clauses are AND-ed together; values inside a clause are OR-ed.
/// `sort == None` means index relevance ranking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub mode: SearchMode,
    pub query_text: String,
    pub filter_clauses: Vec<FilterClause>,
    pub sort: Option<SortClause>,
    /// One-based, as the index expects.
    pub page: u64,
    pub per_page: u64,
}

impl QueryDescriptor {
    /// Zero-based index of the first hit on this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }

    pub fn clause(&self, field: FacetField) -> Option<&FilterClause> {
        self.filter_clauses.iter().find(|clause| clause.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        let descriptor = QueryDescriptor {
            mode: SearchMode::Items,
            query_text: "*".to_string(),
            filter_clauses: vec![],
            sort: None,
            page: 3,
            per_page: 20,
        };
        assert_eq!(descriptor.offset(), 40);
        assert_eq!(QueryDescriptor { page: 1, ..descriptor }.offset(), 0);
    }

    #[test]
    fn collection_mode_only_has_topic_and_genre_dimensions() {
        let applicable: Vec<_> = [FacetField::ItemType, FacetField::Topics, FacetField::Genres, FacetField::Status, FacetField::Rating]
            .into_iter()
            .filter(|field| field.applies_to(SearchMode::Collections))
            .collect();
        assert_eq!(applicable, vec![FacetField::Topics, FacetField::Genres]);
    }
}
