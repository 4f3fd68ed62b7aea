use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::debug;

use crate::{config::IndexConfig, error::SearchError};

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct RawSearchResult<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub found: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hits: Vec<RawSearchResultHit<T>>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub search_time_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct RawSearchResultHit<T> {
    #[serde(default, deserialize_with = "lenient_document")]
    pub document: T,
    #[serde(default)]
    pub text_match: Option<u64>,
}

fn null_as_default<'de, D, V>(deserializer: D) -> Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    Ok(Option::<V>::deserialize(deserializer)?.unwrap_or_default())
}

/// A hit whose document is not an object still counts as a hit.
fn lenient_document<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        debug!("unreadable hit document, keeping an empty one: {e}");
        T::default()
    }))
}

/// One GET against the catalog API, bounded by `config.timeout`, decoded as `T`.
pub async fn typesense_get<T: DeserializeOwned>(
    client: &reqwest::Client,
    config: &IndexConfig,
    path: &str,
    params: &[(&'static str, String)],
) -> Result<T, SearchError> {
    let url = config.endpoint(path);
    let t0 = std::time::Instant::now();

    let round_trip = async {
        let response = client.get(&url).query(params).send().await.map_err(|e| map_transport(e, config))?;
        let status = response.status();
        let response_txt = response.text().await.map_err(|e| map_transport(e, config))?;
        Ok::<_, SearchError>((status, response_txt))
    };
    let (status, response_txt) = tokio::time::timeout(config.timeout, round_trip)
        .await
        .map_err(|_| SearchError::Timeout(config.timeout))??;

    let dt_ms = t0.elapsed().as_millis() as u64;
    if !status.is_success() {
        return Err(SearchError::Status { status, body: response_txt });
    }
    debug!(%url, len = response_txt.len(), dt_ms, "search API response");

    let response: T = serde_json::from_str(&response_txt)?;
    Ok(response)
}

fn map_transport(error: reqwest::Error, config: &IndexConfig) -> SearchError {
    if error.is_timeout() {
        SearchError::Timeout(config.timeout)
    } else {
        SearchError::Transport(error)
    }
}
