//! Parameter maps and lenient typed access.
//!
//! Requests and static stage configuration both arrive as JSON objects.
//! Stages read them through these helpers, which treat a value of the
//! wrong type exactly like a missing key.

use serde_json::Value;

/// Stage parameters as received on the wire
pub type Params = serde_json::Map<String, Value>;

/// Merge static stage config with request params; request keys win.
pub fn merge(config: &Params, request: &Params) -> Params {
    let mut effective = config.clone();
    for (key, value) in request {
        effective.insert(key.clone(), value.clone());
    }
    effective
}

/// Boolean option, `default` when absent or not a JSON boolean
pub fn bool_or(params: &Params, key: &str, default: bool) -> bool {
    params.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// A flag is set only by an explicit JSON `true`
pub fn flag(params: &Params, key: &str) -> bool {
    bool_or(params, key, false)
}

/// Integer option. Floats are truncated; other types yield `None`.
pub fn integer(params: &Params, key: &str) -> Option<i64> {
    let value = params.get(key)?;
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if value.is_u64() {
        return Some(i64::MAX);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// Integer option clamped into `min..=max`, `default` when unusable
pub fn clamped(params: &Params, key: &str, default: i64, min: i64, max: i64) -> usize {
    integer(params, key).unwrap_or(default).clamp(min, max) as usize
}
