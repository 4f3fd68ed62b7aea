//! Constants shared by the query builder, executor and coordinator.

/// Fixed number of results per page. Not user-configurable.
pub const PAGE_SIZE: u64 = 20;

/// Token the index treats as "match every document".
pub const MATCH_ALL_QUERY: &str = "*";

/// Sentinel meaning "no restriction" for item type and status filters.
pub const ALL_SENTINEL: &str = "all";

/// `result_type` given to every record produced from a collection hit.
pub const COLLECTION_RESULT_TYPE: &str = "Collection";
