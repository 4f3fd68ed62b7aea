//! Raw index hits -> mode-agnostic result records.
//!
//! Total: one record per hit, in hit order, whatever fields are missing.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use common::{search_const::COLLECTION_RESULT_TYPE, search_result::SearchResultRecord};
use serde_json::Value;

use crate::api::search::search_documents::{CollectionDocument, ItemDocument, RawHits};

pub fn normalize_hits(hits: RawHits) -> Vec<SearchResultRecord> {
    match hits {
        RawHits::Items(docs) => docs.into_iter().map(normalize_item).collect(),
        RawHits::Collections(docs) => docs.into_iter().map(normalize_collection).collect(),
    }
}

fn normalize_item(doc: ItemDocument) -> SearchResultRecord {
    let mut attributes = doc.extra;
    put_str(&mut attributes, "status", doc.status);
    put_str(&mut attributes, "rating", doc.rating);
    put_str(&mut attributes, "author", doc.author);
    put_str(&mut attributes, "director", doc.director);
    put_str(&mut attributes, "creator", doc.creator);
    put_str(&mut attributes, "publisher", doc.publisher);
    put_str(&mut attributes, "platform", doc.platform);
    put_int(&mut attributes, "release_year", doc.release_year);
    put_int(&mut attributes, "runtime_minutes", doc.runtime_minutes);
    put_int(&mut attributes, "season_count", doc.season_count);

    SearchResultRecord {
        id: doc.id,
        title: doc.title,
        result_type: doc.media_type,
        topics: doc.topics,
        genres: doc.genres,
        date_added: doc.date_added.and_then(epoch_seconds_to_date),
        summary: doc.description.unwrap_or_default(),
        thumbnail_url: non_empty(doc.thumbnail),
        is_collection: false,
        attributes,
    }
}

fn normalize_collection(doc: CollectionDocument) -> SearchResultRecord {
    let mut attributes = doc.extra;
    if let Some(count) = doc.media_item_count {
        attributes.insert("media_item_count".to_string(), Value::from(count));
    }
    if !doc.media_item_titles.is_empty() {
        attributes.insert("media_item_titles".to_string(), Value::from(doc.media_item_titles));
    }

    SearchResultRecord {
        id: doc.id,
        title: doc.name,
        result_type: COLLECTION_RESULT_TYPE.to_string(),
        topics: doc.topics,
        genres: doc.genres,
        date_added: doc.date_created.and_then(epoch_seconds_to_date),
        summary: doc.description.unwrap_or_default(),
        thumbnail_url: non_empty(doc.thumbnail),
        is_collection: true,
        attributes,
    }
}

fn put_str(attributes: &mut BTreeMap<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        attributes.insert(key.to_string(), Value::from(value));
    }
}

fn put_int(attributes: &mut BTreeMap<String, Value>, key: &str, value: Option<i64>) {
    if let Some(value) = value {
        attributes.insert(key.to_string(), Value::from(value));
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// UTC calendar date of an epoch-seconds timestamp; `None` when out of range.
pub fn epoch_seconds_to_date(seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
}
