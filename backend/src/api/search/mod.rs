//! Search against the remote index: query building, execution and normalization.

pub mod search_documents;
pub use search_documents::{CollectionDocument, ItemDocument, RawHits};

pub mod search_filter;
pub use search_filter::{build_filter_expression, build_query_descriptor, build_request_params, build_sort_expression};

mod search_executor;
pub use search_executor::{COLLECTIONS_SEARCH_PATH, HttpSearchExecutor, ITEMS_SEARCH_PATH, SearchExecutor, SearchOutcome};

mod search_normalize;
pub use search_normalize::{epoch_seconds_to_date, normalize_hits};
