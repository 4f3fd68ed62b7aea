//! Common library exports shared between the index client and the search coordinator.

pub mod facet_options;
pub mod filter_state;
pub mod pagination;
pub mod search_const;
pub mod search_query;
pub mod search_result;
