//! Remote index access for the catalog search page.

pub mod api;
pub mod config;
pub mod error;
pub mod index_utils;

pub use config::IndexConfig;
pub use error::{CatalogError, SearchError};
