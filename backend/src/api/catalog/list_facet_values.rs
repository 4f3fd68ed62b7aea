use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    api::search::search_documents::lenient_string, config::IndexConfig, error::CatalogError,
    index_utils::typesense_utils::typesense_get,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FacetValue {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FacetCatalog {
    pub topics: Vec<FacetValue>,
    pub genres: Vec<FacetValue>,
}

async fn list_facet_values(
    client: &reqwest::Client,
    config: &IndexConfig,
    facet: &'static str,
) -> Result<Vec<FacetValue>, CatalogError> {
    let mut values: Vec<FacetValue> = typesense_get(client, config, facet, &[])
        .await
        .map_err(|source| CatalogError { facet, source })?;
    values.retain(|v| !v.name.trim().is_empty());
    values.sort_by_key(|v| v.name.to_lowercase());
    Ok(values)
}

pub async fn list_topics(client: &reqwest::Client, config: &IndexConfig) -> Result<Vec<FacetValue>, CatalogError> {
    list_facet_values(client, config, "topics").await
}

pub async fn list_genres(client: &reqwest::Client, config: &IndexConfig) -> Result<Vec<FacetValue>, CatalogError> {
    list_facet_values(client, config, "genres").await
}

/// Topics and genres, fetched concurrently. Either failing fails the whole catalog.
pub async fn list_facet_catalog(client: &reqwest::Client, config: &IndexConfig) -> Result<FacetCatalog, CatalogError> {
    let (topics, genres) = futures::try_join!(list_topics(client, config), list_genres(client, config))?;
    info!(topics = topics.len(), genres = genres.len(), "loaded facet catalog");
    Ok(FacetCatalog { topics, genres })
}
