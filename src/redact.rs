//! Sensitive-field redaction for JSON bodies and headers
//!
//! Replaces the values of configured field names with a fixed mask token
//! before they reach any log record. Matching is case-insensitive on object
//! keys at every nesting depth; arrays and scalars pass through unchanged.

use serde_json::Value;

use crate::config::Config;

/// Token written in place of a sensitive value
pub const MASK: &str = "*****";

/// Recursively mask sensitive fields in a JSON value
///
/// Any object key whose lowercase form matches a configured sensitive field
/// has its value replaced with [`MASK`], whatever its type. Other object
/// values are recursed into. Arrays and scalars are returned as-is; array
/// elements are never field-matched since only object keys carry names.
///
/// The operation is idempotent: masking an already-masked value is a no-op.
pub fn mask_sensitive_fields(config: &Config, value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let masked = map
                .into_iter()
                .map(|(k, v)| {
                    if config.is_sensitive_field(&k) {
                        (k, Value::String(MASK.to_string()))
                    } else {
                        (k, mask_sensitive_fields(config, v))
                    }
                })
                .collect();
            Value::Object(masked)
        }
        other => other,
    }
}

/// Mask the value of an `authorization` header, pass all others through
pub fn mask_header_value(name: &str, value: &str) -> String {
    if name.eq_ignore_ascii_case("authorization") {
        MASK.to_string()
    } else {
        value.to_string()
    }
}
