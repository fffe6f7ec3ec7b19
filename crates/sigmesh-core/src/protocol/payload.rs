//! Flat key/value payloads with lazily structured nested fields.
//!
//! Handlers read only the fields they need and must tolerate absence: every
//! accessor returns an `Option` instead of failing.

use serde_json::{Map, Value};

use crate::error::{Result, SigmeshError};

/// Decoded message body: field name to scalar string or nested object.
///
/// A payload is immutable once handed to a handler; handlers build new
/// payloads for outbound notifications instead of editing in place.
pub type Payload = Map<String, Value>;

/// Decode a raw body into a [`Payload`]. Anything but a JSON object is a
/// decode error.
pub fn decode(body: &[u8]) -> Result<Payload> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SigmeshError::Decode("body is not an object".into())),
        Err(e) => Err(SigmeshError::Decode(e.to_string())),
    }
}

/// Read a string field. Absent, empty, and non-string values all read as
/// missing.
pub fn text<'a>(payload: &'a Payload, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Build a payload from string fields, the protocol's common case.
pub fn from_pairs<'a, I>(pairs: I) -> Payload
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

/// Parse a serialized nested field into its structured form, in place.
///
/// Absent, empty, and already-structured values are left untouched, so
/// running the normalizer twice equals running it once. Malformed nested
/// content surfaces as a decode error; whether to drop the envelope is the
/// caller's call.
pub fn normalize(payload: &mut Payload, key: &str) -> Result<()> {
    let Some(Value::String(raw)) = payload.get(key) else {
        return Ok(());
    };
    if raw.is_empty() {
        return Ok(());
    }
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| SigmeshError::Decode(format!("field {key}: {e}")))?;
    if !parsed.is_object() {
        return Err(SigmeshError::Decode(format!(
            "field {key} is not a nested object"
        )));
    }
    payload.insert(key.to_string(), parsed);
    Ok(())
}
