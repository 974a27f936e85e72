//! Helpers for reading typed parameters out of a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing key or
//! a value of the wrong JSON type yields the default, except for
//! [`param_count`]: integer sizes are rejected when present but malformed.
//! Other range checks belong to each engine's `validate()`.

use serde_json::Value;

use crate::error::SceneError;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a non-negative integer of at least `min` from `params[name]`.
///
/// A missing key yields `default`. A key that is present must hold an integer
/// `>= min` that fits `usize`; negatives, fractions, out-of-range values and
/// other JSON types are rejected rather than replaced by the default.
pub fn param_count(
    params: &Value,
    name: &str,
    default: usize,
    min: usize,
) -> Result<usize, SceneError> {
    let Some(value) = params.get(name) else {
        return Ok(default);
    };
    value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .filter(|&v| v >= min)
        .ok_or_else(|| {
            SceneError::invalid(format!(
                "{name} must be an integer of at least {min}, got {value}"
            ))
        })
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts an array of `f64` from `params[name]`.
///
/// Returns `default` if the key is missing, is not an array, or contains a
/// non-numeric element.
pub fn param_f64_list(params: &Value, name: &str, default: &[f64]) -> Vec<f64> {
    params
        .get(name)
        .and_then(Value::as_array)
        .and_then(|items| items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>())
        .unwrap_or_else(|| default.to_vec())
}

/// Extracts an array of strings from `params[name]`, or `None` if absent or malformed.
pub fn param_string_list(params: &Value, name: &str) -> Option<Vec<String>> {
    params.get(name).and_then(Value::as_array).and_then(|items| {
        items
            .iter()
            .map(|v| v.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
    })
}
