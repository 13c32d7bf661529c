//! Native/wire conversion
//!
//! Encoding never fails: native types the wire format cannot hold
//! degrade to string coercion instead of raising. Decoding collapses
//! the integer/double distinction into plain numbers and returns
//! timestamps as their ISO-8601 strings.

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

use super::wire::WireValue;

/// Encode a native value into wire form.
///
/// Integral numbers take the integer tag, fractional numbers the double
/// tag. Arrays and objects recurse.
pub fn encode(native: &Value) -> WireValue {
    match native {
        Value::Null => WireValue::Null,
        Value::Bool(b) => WireValue::Boolean(*b),
        Value::Number(n) => encode_number(n),
        Value::String(s) => WireValue::String(s.clone()),
        Value::Array(items) => WireValue::Array(items.iter().map(encode).collect()),
        Value::Object(fields) => {
            WireValue::Map(fields.iter().map(|(k, v)| (k.clone(), encode(v))).collect())
        }
    }
}

/// Encode a native datetime as a timestamp tag.
///
/// The one entry point that produces `timestampValue`; plain strings
/// always stay strings even when they happen to look like dates.
pub fn encode_timestamp(ts: DateTime<Utc>) -> WireValue {
    WireValue::timestamp(ts)
}

fn encode_number(n: &Number) -> WireValue {
    if let Some(i) = n.as_i64() {
        return WireValue::Integer(i);
    }
    if n.is_u64() {
        // Fallback encoder: the integer tag is 64-bit signed, so a u64
        // above i64::MAX coerces to a string rather than failing.
        return WireValue::String(n.to_string());
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            WireValue::Integer(f as i64)
        }
        Some(f) => WireValue::Double(f),
        None => WireValue::String(n.to_string()),
    }
}

/// Decode a wire value back to its native form.
///
/// Integer and double tags both come back as plain numbers; timestamps
/// decode to their ISO-8601 string (the native datetime type is not
/// resurrected).
pub fn decode(wire: &WireValue) -> Value {
    match wire {
        WireValue::Null => Value::Null,
        WireValue::Boolean(b) => Value::Bool(*b),
        WireValue::Integer(i) => Value::Number((*i).into()),
        WireValue::Double(d) => Number::from_f64(*d).map(Value::Number).unwrap_or(Value::Null),
        WireValue::Timestamp(ts) => Value::String(ts.clone()),
        WireValue::String(s) => Value::String(s.clone()),
        WireValue::Array(values) => Value::Array(values.iter().map(decode).collect()),
        WireValue::Map(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), decode(v)))
                .collect::<Map<String, Value>>(),
        ),
    }
}
