//! Input normalization shared by every entity.
//!
//! Optional input fields deserialize through [`blank_as_none`]: a missing field,
//! an explicit `null` and a blank string all become `None`, the absent marker.
//! Typed columns (dates, numbers, ids) therefore never receive an empty string.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional field, mapping blank strings to `None`.
///
/// Non-string values are accepted as-is; string values are handed to `T`'s own
/// deserializer, so `"2024-03-01"` becomes a date and `"7.5"` a decimal.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => {
            // Numbers posted from form fields arrive as strings
            match serde_json::from_value::<T>(Value::String(s.clone())) {
                Ok(v) => Ok(Some(v)),
                Err(first) => match s.trim().parse::<serde_json::Number>() {
                    Ok(n) => serde_json::from_value(Value::Number(n))
                        .map(Some)
                        .map_err(|_| D::Error::custom(first)),
                    Err(_) => Err(D::Error::custom(first)),
                },
            }
        }
        Some(other) => serde_json::from_value(other).map(Some).map_err(D::Error::custom),
    }
}
