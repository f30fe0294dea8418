//! Coercion and comparison of untyped grid cell values.
//!
//! Cells arrive as `serde_json::Value`. Column mutators use the `expect_*`
//! helpers to turn a sanitized value into a typed field, failing with
//! [`CoreError::Validation`] when the value has the wrong shape. The
//! `*_equals` functions are the custom comparators registered on columns
//! whose natural equality differs from JSON equality.

use chrono::DateTime;
use serde_json::Value;

use crate::duration::{parse_iso_duration, validate_iso_duration};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// A text cell. Must be a JSON string.
pub fn expect_text(field: &str, value: Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(CoreError::Validation(format!(
            "{field}: expected text, got {}",
            type_name(&other)
        ))),
    }
}

/// A nullable, non-negative integer count.
pub fn expect_count(field: &str, value: Value) -> Result<Option<i32>, CoreError> {
    if value.is_null() {
        return Ok(None);
    }
    let invalid = || CoreError::Validation(format!("{field}: expected a non-negative integer"));
    let number = as_number(&value).ok_or_else(invalid)?;
    if number.fract() != 0.0 || number < 0.0 || number > f64::from(i32::MAX) {
        return Err(invalid());
    }
    Ok(Some(number as i32))
}

/// A nullable foreign key. Numeric strings are accepted because dropdown
/// widgets commonly hand back their option value as text.
pub fn expect_id(field: &str, value: Value) -> Result<Option<DbId>, CoreError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .filter(|id| *id > 0)
            .map(Some)
            .ok_or_else(|| {
                CoreError::Validation(format!("{field}: expected a positive integer id"))
            }),
        Value::String(s) => s
            .trim()
            .parse::<DbId>()
            .ok()
            .filter(|id| *id > 0)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("{field}: '{s}' is not a valid id"))),
        other => Err(CoreError::Validation(format!(
            "{field}: expected an id, got {}",
            type_name(&other)
        ))),
    }
}

/// A required ISO-8601 duration string.
pub fn expect_duration(field: &str, value: Value) -> Result<String, CoreError> {
    let text = match value {
        Value::String(s) => s,
        Value::Null => {
            return Err(CoreError::Validation(format!(
                "{field}: an ISO-8601 duration is required"
            )))
        }
        other => {
            return Err(CoreError::Validation(format!(
                "{field}: expected an ISO-8601 duration, got {}",
                type_name(&other)
            )))
        }
    };
    validate_iso_duration(field, &text)?;
    Ok(text)
}

/// A nullable RFC 3339 instant, normalized to UTC.
pub fn expect_instant(field: &str, value: Value) -> Result<Option<Timestamp>, CoreError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => parse_instant(&s).map(Some).ok_or_else(|| {
            CoreError::Validation(format!("{field}: '{s}' is not an RFC 3339 date-time"))
        }),
        other => Err(CoreError::Validation(format!(
            "{field}: expected a date-time, got {}",
            type_name(&other)
        ))),
    }
}

/// Render a stored instant the way it travels to and from the grid.
pub fn instant_value(instant: Option<Timestamp>) -> Value {
    instant.map_or(Value::Null, |t| Value::String(t.to_rfc3339()))
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

/// JSON equality. The default comparator.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    a == b
}

/// Compare numerically when both sides look like numbers, so `3`, `3.0` and
/// `"3"` agree.
pub fn numeric_equals(a: &Value, b: &Value) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Compare durations by length, so `PT60M` equals `PT1H`.
pub fn duration_equals(a: &Value, b: &Value) -> bool {
    match (a.as_str(), b.as_str()) {
        (Some(x), Some(y)) => match (parse_iso_duration(x), parse_iso_duration(y)) {
            (Ok(dx), Ok(dy)) => dx == dy,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Compare date-times as instants regardless of offset notation.
pub fn instant_equals(a: &Value, b: &Value) -> bool {
    match (a.as_str(), b.as_str()) {
        (Some(x), Some(y)) => match (parse_instant(x), parse_instant(y)) {
            (Some(tx), Some(ty)) => tx == ty,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn parse_instant(text: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|t| t.with_timezone(&chrono::Utc))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
