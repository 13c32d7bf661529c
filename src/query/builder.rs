//! Structured query construction
//!
//! Zero filters produce a plain collection list; one filter a single
//! field filter; two or more an AND composite preserving input order.
//! The query endpoint streams result envelopes, and envelopes carrying
//! no document are skip markers that get dropped here.

use serde_json::{json, Value};

use crate::document::Document;
use crate::value;

use super::filter::Filter;

/// A read request against a collection, ready for the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    /// `GET {documents}/{collection}`, optionally page-size bounded.
    List {
        collection: String,
        page_size: Option<u32>,
    },

    /// `POST {documents}:runQuery` with a structured query body.
    RunQuery { collection: String, body: Value },
}

/// Build a plain list request for a collection.
pub fn build_list_request(collection: &str, page_size: Option<u32>) -> StoreRequest {
    StoreRequest::List {
        collection: collection.to_string(),
        page_size,
    }
}

/// Build the request for a filtered read.
///
/// Falls back to a plain list when no filters are given; the limit
/// then travels as the list page size.
pub fn build_query_request(collection: &str, filters: &[Filter], limit: Option<u32>) -> StoreRequest {
    if filters.is_empty() {
        return build_list_request(collection, limit);
    }

    let mut query = json!({
        "from": [{ "collectionId": collection }],
        "where": where_clause(filters),
    });
    if let Some(limit) = limit {
        query["limit"] = json!(limit);
    }

    StoreRequest::RunQuery {
        collection: collection.to_string(),
        body: json!({ "structuredQuery": query }),
    }
}

fn where_clause(filters: &[Filter]) -> Value {
    if filters.len() == 1 {
        return field_filter(&filters[0]);
    }

    let clauses: Vec<Value> = filters.iter().map(field_filter).collect();
    json!({
        "compositeFilter": {
            "op": "AND",
            "filters": clauses,
        }
    })
}

fn field_filter(filter: &Filter) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": filter.field },
            "op": filter.operator.as_wire(),
            "value": value::encode(&filter.value),
        }
    })
}

/// Unwrap a `:runQuery` response into documents.
///
/// Envelopes without a `document` key are skip markers emitted by the
/// streaming endpoint; they are dropped and the relative order of the
/// rest is preserved.
pub fn collect_query_documents(body: &Value) -> Vec<Document> {
    body.as_array()
        .map(|envelopes| {
            envelopes
                .iter()
                .filter_map(|envelope| envelope.get("document"))
                .filter_map(Document::from_json)
                .collect()
        })
        .unwrap_or_default()
}

/// Unwrap a list response (`{"documents": [...]}`).
///
/// An empty collection comes back with no `documents` key at all.
pub fn collect_listed_documents(body: &Value) -> Vec<Document> {
    body.get("documents")
        .and_then(Value::as_array)
        .map(|docs| docs.iter().filter_map(Document::from_json).collect())
        .unwrap_or_default()
}
