//! Document mapping
//!
//! A wire document is a resource name plus a map of tagged field
//! values. Records are the flat native form the rest of the crate
//! consumes: every field decoded, plus an `id` derived from the
//! resource name. There is no schema; fields vary per document and
//! consumers treat every field as optional.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::value::{self, WireValue};

/// A document as the store represents it on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Full resource name, e.g.
    /// `projects/p/databases/d/documents/propiedades/abc123`.
    pub name: String,

    /// Tagged field values keyed by field name.
    pub fields: BTreeMap<String, WireValue>,
}

impl Document {
    /// Parse a document from a wire response body.
    ///
    /// Returns `None` when the body carries no resource name, which is
    /// also how callers skip query envelopes that hold no document.
    pub fn from_json(raw: &Value) -> Option<Self> {
        let name = raw.get("name")?.as_str()?.to_string();
        let fields = raw
            .get("fields")
            .and_then(Value::as_object)
            .map(|fs| {
                fs.iter()
                    .map(|(k, v)| (k.clone(), WireValue::from_json(v)))
                    .collect()
            })
            .unwrap_or_default();
        Some(Document { name, fields })
    }

    /// The logical document id: the last segment of the resource name.
    pub fn doc_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Flatten into a record: decoded fields plus the derived `id`.
    ///
    /// The derived id always wins over a stored field named `id`.
    pub fn into_record(self) -> Value {
        let mut record = Map::new();
        for (key, field) in &self.fields {
            record.insert(key.clone(), value::decode(field));
        }
        record.insert("id".to_string(), Value::String(self.doc_id().to_string()));
        Value::Object(record)
    }
}

/// Encode a payload into wire fields, carrying exactly the keys present.
///
/// Field omission here is what makes partial updates partial: a field
/// the caller leaves out is never transmitted and never masked.
pub fn wire_fields(payload: &Map<String, Value>) -> BTreeMap<String, WireValue> {
    payload
        .iter()
        .map(|(k, v)| (k.clone(), value::encode(v)))
        .collect()
}

/// Render wire fields as a `{"fields": {...}}` request body.
pub fn fields_body(fields: &BTreeMap<String, WireValue>) -> Value {
    let rendered: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();
    json!({ "fields": rendered })
}
