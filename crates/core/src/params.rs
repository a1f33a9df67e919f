//! Lenient lookups of evaluator settings in a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key and a default. A missing key or a
//! value of the wrong JSON type yields the default; range checks are left to
//! the caller.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}
