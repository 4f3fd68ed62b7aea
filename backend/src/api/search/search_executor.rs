//! One round trip to the remote index per call.

use async_trait::async_trait;
use common::{filter_state::SearchMode, search_query::QueryDescriptor};
use tracing::{debug, warn};

use crate::{
    api::search::{
        search_documents::{CollectionDocument, ItemDocument, RawHits},
        search_filter::build_request_params,
    },
    config::IndexConfig,
    error::SearchError,
    index_utils::typesense_utils::{RawSearchResult, typesense_get},
};

pub const ITEMS_SEARCH_PATH: &str = "search";
pub const COLLECTIONS_SEARCH_PATH: &str = "search/mixlists";

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success { hits: RawHits, total_found: u64 },
    Failure { reason: String },
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Result<(RawHits, u64), SearchError>> for SearchOutcome {
    fn from(result: Result<(RawHits, u64), SearchError>) -> Self {
        match result {
            Ok((hits, total_found)) => Self::Success { hits, total_found },
            Err(e) => Self::Failure { reason: e.to_string() },
        }
    }
}

/// Runs a descriptor against whichever endpoint its mode selects.
///
/// Implementations hold no per-call state and never retry.
#[async_trait]
pub trait SearchExecutor: Send + Sync {
    async fn execute(&self, descriptor: &QueryDescriptor) -> SearchOutcome;
}

pub struct HttpSearchExecutor {
    client: reqwest::Client,
    config: IndexConfig,
}

impl HttpSearchExecutor {
    pub fn new(config: IndexConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    async fn round_trip(&self, descriptor: &QueryDescriptor) -> Result<(RawHits, u64), SearchError> {
        let params = build_request_params(descriptor);
        match descriptor.mode {
            SearchMode::Items => {
                let response: RawSearchResult<ItemDocument> =
                    typesense_get(&self.client, &self.config, ITEMS_SEARCH_PATH, &params).await?;
                let docs = response.hits.into_iter().map(|hit| hit.document).collect();
                Ok((RawHits::Items(docs), response.found))
            }
            SearchMode::Collections => {
                let response: RawSearchResult<CollectionDocument> =
                    typesense_get(&self.client, &self.config, COLLECTIONS_SEARCH_PATH, &params).await?;
                let docs = response.hits.into_iter().map(|hit| hit.document).collect();
                Ok((RawHits::Collections(docs), response.found))
            }
        }
    }
}

#[async_trait]
impl SearchExecutor for HttpSearchExecutor {
    async fn execute(&self, descriptor: &QueryDescriptor) -> SearchOutcome {
        let result = self.round_trip(descriptor).await;
        match &result {
            Ok((hits, total_found)) => {
                debug!(mode = %descriptor.mode, page = descriptor.page, hits = hits.len(), total_found, "search succeeded")
            }
            Err(e) => warn!(mode = %descriptor.mode, page = descriptor.page, "search failed: {e}"),
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{Router, extract::Query, http::StatusCode, response::IntoResponse, routing::get};
    use common::filter_state::FilterState;
    use serde_json::json;

    use super::*;
    use crate::api::search::search_filter::build_query_descriptor;

    async fn serve(router: Router) -> IndexConfig {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        IndexConfig::new(format!("http://{addr}/api")).with_timeout(Duration::from_millis(500))
    }

    fn executor(config: IndexConfig) -> HttpSearchExecutor {
        HttpSearchExecutor::new(config).unwrap()
    }

    #[tokio::test]
    async fn items_search_hits_the_items_endpoint() {
        let router = Router::new().route(
            "/api/search",
            get(|Query(params): Query<std::collections::HashMap<String, String>>| async move {
                assert_eq!(params.get("q").map(String::as_str), Some("*"));
                assert_eq!(params.get("per_page").map(String::as_str), Some("20"));
                assert_eq!(params.get("filter").map(String::as_str), Some("(media_type:=Book)"));
                axum::Json(json!({
                    "found": 41,
                    "page": 1,
                    "hits": [
                        {"document": {"id": "1", "title": "Dune", "media_type": "Book"}, "text_match": 99},
                        {"document": {"id": "2", "title": "Emma", "media_type": "Book"}}
                    ]
                }))
            }),
        );
        let config = serve(router).await;
        let descriptor = build_query_descriptor(&FilterState::default().toggle_item_type("Book"));
        match executor(config).execute(&descriptor).await {
            SearchOutcome::Success { hits: RawHits::Items(docs), total_found } => {
                assert_eq!(total_found, 41);
                assert_eq!(docs.len(), 2);
                assert_eq!(docs[0].title, "Dune");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn collections_search_hits_the_mixlists_endpoint() {
        let router = Router::new()
            .route("/api/search", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/api/search/mixlists",
                get(|| async { axum::Json(json!({"found": 1, "hits": [{"document": {"id": "m", "name": "Chill"}}]})) }),
            );
        let config = serve(router).await;
        let state = FilterState::default().with_mode(SearchMode::Collections);
        let outcome = executor(config).execute(&build_query_descriptor(&state)).await;
        match outcome {
            SearchOutcome::Success { hits: RawHits::Collections(docs), total_found: 1 } => assert_eq!(docs[0].name, "Chill"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_hits_and_found_mean_empty() {
        let router = Router::new().route("/api/search", get(|| async { axum::Json(json!({})) }));
        let config = serve(router).await;
        let outcome = executor(config).execute(&build_query_descriptor(&FilterState::default())).await;
        assert_eq!(outcome, SearchOutcome::Success { hits: RawHits::Items(vec![]), total_found: 0 });
    }

    #[tokio::test]
    async fn server_error_is_a_failure() {
        let router = Router::new().route(
            "/api/search",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "index offline").into_response() }),
        );
        let config = serve(router).await;
        let outcome = executor(config).execute(&build_query_descriptor(&FilterState::default())).await;
        match outcome {
            SearchOutcome::Failure { reason } => {
                assert!(reason.contains("500"), "{reason}");
                assert!(reason.contains("index offline"), "{reason}");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn one_mistyped_hit_does_not_fail_the_page() {
        let router = Router::new().route(
            "/api/search",
            get(|| async {
                axum::Json(json!({
                    "found": 3,
                    "hits": [
                        {"document": {"id": "1", "title": "Heat", "media_type": "Movie", "release_year": 1995}},
                        {"document": {"id": "2", "title": null, "media_type": "Movie", "topics": null, "release_year": "1995"}},
                        {"document": null}
                    ]
                }))
            }),
        );
        let config = serve(router).await;
        match executor(config).execute(&build_query_descriptor(&FilterState::default())).await {
            SearchOutcome::Success { hits: RawHits::Items(docs), total_found } => {
                assert_eq!(total_found, 3);
                assert_eq!(docs.len(), 3);
                assert_eq!(docs[0].title, "Heat");
                assert_eq!(docs[1].title, "");
                assert_eq!(docs[1].release_year, Some(1995));
                assert_eq!(docs[2], ItemDocument::default());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn unfollowed_redirect_is_a_status_failure() {
        let router = Router::new().route(
            "/api/search",
            get(|| async { (StatusCode::MULTIPLE_CHOICES, "pick one").into_response() }),
        );
        let config = serve(router).await;
        let outcome = executor(config).execute(&build_query_descriptor(&FilterState::default())).await;
        match outcome {
            SearchOutcome::Failure { reason } => {
                assert!(reason.contains("300"), "{reason}");
                assert!(!reason.contains("malformed"), "{reason}");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_failure() {
        let router = Router::new().route("/api/search", get(|| async { "<html>oops</html>" }));
        let config = serve(router).await;
        let outcome = executor(config).execute(&build_query_descriptor(&FilterState::default())).await;
        match outcome {
            SearchOutcome::Failure { reason } => assert!(reason.contains("malformed"), "{reason}"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_index_times_out() {
        let router = Router::new().route(
            "/api/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                axum::Json(json!({"found": 0, "hits": []}))
            }),
        );
        let config = serve(router).await.with_timeout(Duration::from_millis(100));
        let outcome = executor(config).execute(&build_query_descriptor(&FilterState::default())).await;
        match outcome {
            SearchOutcome::Failure { reason } => assert!(reason.contains("timed out"), "{reason}"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_index_is_a_failure() {
        let config = IndexConfig::new("http://127.0.0.1:9/api").with_timeout(Duration::from_millis(500));
        let outcome = executor(config).execute(&build_query_descriptor(&FilterState::default())).await;
        assert!(!outcome.is_success());
    }
}
