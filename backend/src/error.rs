use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request could not be sent: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("search API answered {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
    #[error("search API returned a malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
#[error("failed to load {facet} catalog: {source}")]
pub struct CatalogError {
    pub facet: &'static str,
    #[source]
    pub source: SearchError,
}
