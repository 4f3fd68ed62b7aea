//! Query composition: filter state -> query descriptor -> index request parameters.
//!
//! Everything here is pure; the executor is the only place that performs I/O.

use common::{
    filter_state::{FilterState, SearchMode, SortKey},
    search_const::{MATCH_ALL_QUERY, PAGE_SIZE},
    search_query::{FacetField, FilterClause, QueryDescriptor, SortClause, SortDirection, SortField},
};

/// Build the descriptor for one page of `state`. Same state in, same descriptor out.
pub fn build_query_descriptor(state: &FilterState) -> QueryDescriptor {
    let query_text = if state.free_text.trim().is_empty() {
        MATCH_ALL_QUERY.to_string()
    } else {
        state.free_text.clone()
    };

    let mut filter_clauses = Vec::new();
    let mut push_clause = |field: FacetField, values: Vec<String>| {
        if field.applies_to(state.mode) && !values.is_empty() {
            filter_clauses.push(FilterClause { field, values });
        }
    };
    push_clause(
        FacetField::ItemType,
        state.restricted_item_types().into_iter().map(str::to_string).collect(),
    );
    push_clause(FacetField::Topics, non_blank(&state.topics));
    push_clause(FacetField::Genres, non_blank(&state.genres));
    push_clause(FacetField::Status, state.status_filter().map(str::to_string).into_iter().collect());
    push_clause(FacetField::Rating, non_blank(&state.ratings));

    QueryDescriptor {
        mode: state.mode,
        query_text,
        filter_clauses,
        sort: sort_clause(state.sort_key, state.mode),
        page: state.page.max(1),
        per_page: PAGE_SIZE,
    }
}

fn non_blank<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).cloned().collect()
}

/// `None` means index relevance ranking. Rating has no meaning for collections.
pub fn sort_clause(sort_key: SortKey, mode: SearchMode) -> Option<SortClause> {
    let (field, direction) = match (sort_key, mode) {
        (SortKey::Relevance, _) => return None,
        (SortKey::Rating, SearchMode::Collections) => return None,
        (SortKey::Rating, SearchMode::Items) => (SortField::Rating, SortDirection::Descending),
        (SortKey::DateAdded, _) => (SortField::DateAdded, SortDirection::Descending),
        (SortKey::Title, _) => (SortField::Title, SortDirection::Ascending),
    };
    Some(SortClause { field, direction })
}

fn index_field_name(field: FacetField) -> &'static str {
    match field {
        FacetField::ItemType => "media_type",
        FacetField::Topics => "topics",
        FacetField::Genres => "genres",
        FacetField::Status => "status",
        FacetField::Rating => "rating",
    }
}

/// Free-form names get backtick quoting; enumerated tokens go in bare.
fn quote_value(field: FacetField, value: &str) -> String {
    match field {
        FacetField::Topics | FacetField::Genres => format!("`{}`", value.replace('`', "")),
        FacetField::ItemType | FacetField::Status | FacetField::Rating => value.to_string(),
    }
}

/// Render clauses as a `filter_by` expression, e.g.
/// ``(media_type:=Book || media_type:=Movie) && (topics:=`history`)``.
pub fn build_filter_expression(clauses: &[FilterClause]) -> Option<String> {
    let rendered = clauses
        .iter()
        .filter(|clause| !clause.values.is_empty())
        .map(|clause| {
            let name = index_field_name(clause.field);
            let alternatives = clause
                .values
                .iter()
                .map(|value| format!("{name}:={}", quote_value(clause.field, value)))
                .collect::<Vec<_>>()
                .join(" || ");
            format!("({alternatives})")
        })
        .collect::<Vec<_>>();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join(" && "))
    }
}

/// Numeric score the search proxy exposes for ordering by rating.
///
/// Not the `rating` facet: that one holds enumerated tokens (`SuperLike`,
/// `Like`, ...) and is only usable in `filter_by`. The proxy owns the mapping
/// from tokens to a sortable score, so the name here follows its contract
/// rather than the index schema.
pub const RATING_SORT_FIELD: &str = "rating_score";

/// `sort_by` value for the descriptor's sort, or `None` to keep index ranking.
pub fn build_sort_expression(mode: SearchMode, sort: Option<SortClause>) -> Option<String> {
    let sort = sort?;
    let field = match (sort.field, mode) {
        (SortField::DateAdded, SearchMode::Items) => "date_added",
        (SortField::DateAdded, SearchMode::Collections) => "date_created",
        (SortField::Rating, SearchMode::Items) => RATING_SORT_FIELD,
        (SortField::Rating, SearchMode::Collections) => return None,
        (SortField::Title, SearchMode::Items) => "title",
        (SortField::Title, SearchMode::Collections) => "name",
    };
    let direction = match sort.direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };
    Some(format!("{field}:{direction}"))
}

/// Query string parameters for the search proxy.
pub fn build_request_params(descriptor: &QueryDescriptor) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", descriptor.query_text.clone()),
        ("page", descriptor.page.to_string()),
        ("per_page", descriptor.per_page.to_string()),
    ];
    if let Some(filter) = build_filter_expression(&descriptor.filter_clauses) {
        params.push(("filter", filter));
    }
    if let Some(sort_by) = build_sort_expression(descriptor.mode, descriptor.sort) {
        params.push(("sort_by", sort_by));
    }
    params
}
