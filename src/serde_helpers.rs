//! Response deserialization.
//!
//! With the `tracing` feature, fields the response types do not capture are logged as
//! warnings with their values, so API additions show up in the logs. Deserialization
//! failures are logged with the JSON path of the offending value.

use serde::de::DeserializeOwned;
#[cfg(feature = "tracing")]
use serde_json::Value;

/// Deserializes a response body straight from its text, without an intermediate
/// [`Value`](serde_json::Value), so raw dataframe rows see the numerals as sent.
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(body: &str) -> crate::Result<T> {
    use std::any::type_name;

    let target = type_name::<T>();
    tracing::trace!(type_name = %target, "deserializing response");

    let mut unknown = Vec::new();
    let mut de = serde_json::Deserializer::from_str(body);
    let result = serde_ignored::deserialize(&mut de, |path| unknown.push(path.to_string()))
        .and_then(|parsed| de.end().map(|()| parsed));

    let parsed: T = match result {
        Ok(parsed) => parsed,
        Err(err) => {
            let mut de = serde_json::Deserializer::from_str(body);
            if let Err(located) = serde_path_to_error::deserialize::<_, T>(&mut de) {
                let path = located.path().to_string();
                let value = serde_json::from_str::<Value>(body).ok();
                tracing::error!(
                    type_name = %target,
                    path = %path,
                    value = %describe(value.as_ref().and_then(|v| find(v, &path))),
                    error = %located.inner(),
                    "response deserialization failed"
                );
            }
            return Err(err.into());
        }
    };

    if !unknown.is_empty() {
        let value = serde_json::from_str::<Value>(body).ok();
        for path in unknown {
            tracing::warn!(
                type_name = %target,
                field = %path,
                value = %describe(value.as_ref().and_then(|v| find(v, &path))),
                "unknown field in API response"
            );
        }
    }

    Ok(parsed)
}

#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(body: &str) -> crate::Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// Resolves a `serde_ignored` or `serde_path_to_error` path (`a.b[2].c`, `a.?.b`).
#[cfg(feature = "tracing")]
fn find<'value>(root: &'value Value, path: &str) -> Option<&'value Value> {
    path.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty() && *segment != "?")
        .try_fold(root, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

#[cfg(feature = "tracing")]
fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "<unable to retrieve>".to_owned(), Value::to_string)
}
