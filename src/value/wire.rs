//! Wire value representation
//!
//! The store's REST surface represents every field value as a tagged
//! union with exactly one populated tag, e.g. `{"stringValue": "casa"}`
//! or `{"integerValue": "42"}`. Integers travel as decimal strings so
//! full 64-bit values survive JSON number precision.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// A single field value in wire form.
///
/// Exactly one tag is populated per value. Parsing is lenient; see
/// [`WireValue::from_json`].
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// `{"nullValue": null}`
    Null,
    /// `{"booleanValue": bool}`
    Boolean(bool),
    /// `{"integerValue": "<decimal string>"}`
    Integer(i64),
    /// `{"doubleValue": number}`
    Double(f64),
    /// `{"timestampValue": "<ISO-8601>"}`
    Timestamp(String),
    /// `{"stringValue": string}`
    String(String),
    /// `{"arrayValue": {"values": [...]}}`
    Array(Vec<WireValue>),
    /// `{"mapValue": {"fields": {...}}}`
    Map(BTreeMap<String, WireValue>),
}

impl WireValue {
    /// Build a timestamp tag from a native datetime.
    pub fn timestamp(ts: DateTime<Utc>) -> Self {
        WireValue::Timestamp(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Render the wire JSON shape for this value.
    pub fn to_json(&self) -> Value {
        match self {
            WireValue::Null => json!({ "nullValue": null }),
            WireValue::Boolean(b) => json!({ "booleanValue": b }),
            WireValue::Integer(i) => json!({ "integerValue": i.to_string() }),
            WireValue::Double(d) => json!({ "doubleValue": d }),
            WireValue::Timestamp(ts) => json!({ "timestampValue": ts }),
            WireValue::String(s) => json!({ "stringValue": s }),
            WireValue::Array(values) => {
                let values: Vec<Value> = values.iter().map(WireValue::to_json).collect();
                json!({ "arrayValue": { "values": values } })
            }
            WireValue::Map(fields) => {
                let fields: Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                json!({ "mapValue": { "fields": fields } })
            }
        }
    }

    /// Parse a wire value from raw JSON.
    ///
    /// Tags are inspected in a fixed priority order: null, boolean,
    /// integer, double, timestamp, string, array, map. Input carrying no
    /// recognizable tag parses as [`WireValue::Null`] rather than
    /// failing; `integerValue` accepts both the decimal-string form and
    /// a bare number.
    pub fn from_json(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return WireValue::Null;
        };

        if obj.contains_key("nullValue") {
            return WireValue::Null;
        }
        if let Some(b) = obj.get("booleanValue").and_then(Value::as_bool) {
            return WireValue::Boolean(b);
        }
        if let Some(raw_int) = obj.get("integerValue") {
            return match parse_wire_integer(raw_int) {
                Some(i) => WireValue::Integer(i),
                None => WireValue::Null,
            };
        }
        if let Some(d) = obj.get("doubleValue").and_then(Value::as_f64) {
            return WireValue::Double(d);
        }
        if let Some(ts) = obj.get("timestampValue").and_then(Value::as_str) {
            return WireValue::Timestamp(ts.to_string());
        }
        if let Some(s) = obj.get("stringValue").and_then(Value::as_str) {
            return WireValue::String(s.to_string());
        }
        if let Some(arr) = obj.get("arrayValue") {
            let values = arr
                .get("values")
                .and_then(Value::as_array)
                .map(|vs| vs.iter().map(WireValue::from_json).collect())
                .unwrap_or_default();
            return WireValue::Array(values);
        }
        if let Some(map) = obj.get("mapValue") {
            let fields = map
                .get("fields")
                .and_then(Value::as_object)
                .map(|fs| {
                    fs.iter()
                        .map(|(k, v)| (k.clone(), WireValue::from_json(v)))
                        .collect()
                })
                .unwrap_or_default();
            return WireValue::Map(fields);
        }

        WireValue::Null
    }
}

fn parse_wire_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scalar_tags() {
        assert_eq!(WireValue::Null.to_json(), json!({ "nullValue": null }));
        assert_eq!(
            WireValue::Boolean(true).to_json(),
            json!({ "booleanValue": true })
        );
        assert_eq!(
            WireValue::Integer(42).to_json(),
            json!({ "integerValue": "42" })
        );
        assert_eq!(
            WireValue::Double(1.5).to_json(),
            json!({ "doubleValue": 1.5 })
        );
        assert_eq!(
            WireValue::String("casa".into()).to_json(),
            json!({ "stringValue": "casa" })
        );
    }

    #[test]
    fn test_integer_travels_as_string() {
        let wire = WireValue::Integer(i64::MAX).to_json();
        assert_eq!(wire["integerValue"], json!("9223372036854775807"));
    }

    #[test]
    fn test_timestamp_from_datetime() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap();
        let wire = WireValue::timestamp(ts);
        assert_eq!(
            wire,
            WireValue::Timestamp("2024-03-15T12:30:00.000Z".into())
        );
    }

    #[test]
    fn test_from_json_accepts_string_and_number_integers() {
        assert_eq!(
            WireValue::from_json(&json!({ "integerValue": "17" })),
            WireValue::Integer(17)
        );
        assert_eq!(
            WireValue::from_json(&json!({ "integerValue": 17 })),
            WireValue::Integer(17)
        );
    }

    #[test]
    fn test_from_json_unknown_tag_degrades_to_null() {
        assert_eq!(
            WireValue::from_json(&json!({ "geoPointValue": { "latitude": 0.0 } })),
            WireValue::Null
        );
        assert_eq!(WireValue::from_json(&json!({})), WireValue::Null);
        assert_eq!(WireValue::from_json(&json!("not an object")), WireValue::Null);
    }

    #[test]
    fn test_from_json_nested() {
        let raw = json!({
            "mapValue": {
                "fields": {
                    "titulo": { "stringValue": "Casa en la playa" },
                    "fotos": { "arrayValue": { "values": [
                        { "stringValue": "a.jpg" },
                        { "stringValue": "b.jpg" }
                    ] } }
                }
            }
        });

        let parsed = WireValue::from_json(&raw);
        let WireValue::Map(fields) = parsed else {
            panic!("expected map tag");
        };
        assert_eq!(
            fields["titulo"],
            WireValue::String("Casa en la playa".into())
        );
        assert_eq!(
            fields["fotos"],
            WireValue::Array(vec![
                WireValue::String("a.jpg".into()),
                WireValue::String("b.jpg".into()),
            ])
        );
    }

    #[test]
    fn test_empty_array_and_map_round_trip() {
        let empty_array = WireValue::Array(vec![]);
        assert_eq!(WireValue::from_json(&empty_array.to_json()), empty_array);

        let empty_map = WireValue::Map(BTreeMap::new());
        assert_eq!(WireValue::from_json(&empty_map.to_json()), empty_map);
    }
}
