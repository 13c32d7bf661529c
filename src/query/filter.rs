//! Filter predicates
//!
//! The four comparison operators the store's structured queries accept,
//! plus client-side evaluation for the public scan path. Both read
//! tiers must agree on semantics: missing fields never match, no type
//! coercion, ordering applies to number/number and string/string pairs
//! only.

use std::cmp::Ordering;

use serde_json::Value;

/// Comparison operators supported by structured queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Equal,

    /// Not equals
    NotEqual,

    /// Greater than
    GreaterThan,

    /// Less than
    LessThan,
}

impl FilterOperator {
    /// Wire spelling used in structured query payloads.
    pub fn as_wire(&self) -> &'static str {
        match self {
            FilterOperator::Equal => "EQUAL",
            FilterOperator::NotEqual => "NOT_EQUAL",
            FilterOperator::GreaterThan => "GREATER_THAN",
            FilterOperator::LessThan => "LESS_THAN",
        }
    }
}

/// A single field predicate. Multiple filters combine with implicit AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Native value to compare against
    pub value: Value,
}

impl Filter {
    /// Create a new filter.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter.
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Equal, value)
    }

    /// Create a not-equals filter.
    pub fn neq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::NotEqual, value)
    }

    /// Create a greater-than filter.
    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value)
    }

    /// Create a less-than filter.
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::LessThan, value)
    }

    /// Check whether a record matches this filter.
    ///
    /// This is the client-side half of the two-tier read strategy, so
    /// it must agree exactly with the store's server-side evaluation:
    /// a missing field matches nothing, `NOT_EQUAL` does not match
    /// null, and ordering comparisons are number/number and
    /// string/string only.
    pub fn matches(&self, record: &Value) -> bool {
        let field_value = match record.get(&self.field) {
            Some(v) => v,
            None => return false,
        };

        match self.operator {
            FilterOperator::Equal => values_equal(field_value, &self.value),
            FilterOperator::NotEqual => {
                !field_value.is_null() && !values_equal(field_value, &self.value)
            }
            FilterOperator::GreaterThan => compare(field_value, &self.value) == Some(Ordering::Greater),
            FilterOperator::LessThan => compare(field_value, &self.value) == Some(Ordering::Less),
        }
    }
}

/// Check whether a record matches every filter (AND semantics).
pub fn matches_all(filters: &[Filter], record: &Value) -> bool {
    filters.iter().all(|f| f.matches(record))
}

/// Equality with integer/double unification; everything else is exact.
fn values_equal(a: &Value, b: &Value) -> bool {
    if let (Value::Number(x), Value::Number(y)) = (a, b) {
        if let (Some(xf), Some(yf)) = (x.as_f64(), y.as_f64()) {
            return xf == yf;
        }
    }
    a == b
}

/// Ordering for number/number and string/string pairs; anything else
/// does not compare.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
