//! Deserialization helpers for the venue's loose numeric encoding.
//!
//! Most numeric fields arrive either as a JSON number or as a numeric string
//! depending on the channel (and sometimes on the individual message). These
//! helpers accept both representations and normalize to one internal type, so
//! the payload schemas never branch on the wire representation themselves.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an `f64` from a JSON number or a numeric string.
pub fn f64_flexible<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("number not representable as f64")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid numeric string: {}", e))),
        other => Err(D::Error::custom(format!(
            "expected number or numeric string, got {}",
            other
        ))),
    }
}

/// Deserialize an `i64` from a JSON integer or a numeric string.
pub fn i64_flexible<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom("number not representable as i64")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| D::Error::custom(format!("invalid integer string: {}", e))),
        other => Err(D::Error::custom(format!(
            "expected integer or integer string, got {}",
            other
        ))),
    }
}

/// Deserialize a `bool` from a JSON bool or the strings `"true"`/`"false"`.
pub fn bool_flexible<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean string: {}", other))),
        },
        other => Err(D::Error::custom(format!(
            "expected bool or boolean string, got {}",
            other
        ))),
    }
}
