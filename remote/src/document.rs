//! Typed-field document encoding.
//!
//! The document store wraps every field value in a type tag:
//! `{"fields": {"voted": {"booleanValue": true}, "timestamp": {"integerValue": "1700000000000"}}}`.
//! Integers travel as decimal strings. Only the tags the two collections
//! use are handled here.

use serde_json::{json, Map, Value};

use votegate_types::{BiometricDescriptor, BoundingBox, Identity, Timestamp, VoteRecord};

use crate::RemoteError;

pub const VOTED_FIELD: &str = "voted";
pub const TIMESTAMP_FIELD: &str = "timestamp";
pub const BOUNDING_BOX_FIELD: &str = "boundingBox";
pub const LEFT_EYE_FIELD: &str = "leftEyeOpenProbability";
pub const RIGHT_EYE_FIELD: &str = "rightEyeOpenProbability";

fn probability(p: Option<f32>) -> Value {
    match p {
        Some(p) => json!({ "doubleValue": f64::from(p) }),
        None => json!({ "nullValue": null }),
    }
}

/// Body for creating a `votes/{identity}` document.
pub fn encode_vote(record: &VoteRecord) -> Value {
    json!({
        "fields": {
            VOTED_FIELD: { "booleanValue": record.cast },
            TIMESTAMP_FIELD: { "integerValue": record.timestamp.as_millis().to_string() },
        }
    })
}

/// Body for writing a `users/{identity}` document.
pub fn encode_descriptor(descriptor: &BiometricDescriptor) -> Value {
    json!({
        "fields": {
            BOUNDING_BOX_FIELD: { "stringValue": descriptor.bounds.flatten() },
            LEFT_EYE_FIELD: probability(descriptor.left_eye_open),
            RIGHT_EYE_FIELD: probability(descriptor.right_eye_open),
        }
    })
}

fn fields(doc: &Value) -> Result<&Map<String, Value>, RemoteError> {
    doc.get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| RemoteError::Decode("document has no fields".into()))
}

fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value, RemoteError> {
    fields
        .get(name)
        .ok_or_else(|| RemoteError::Decode(format!("missing field '{name}'")))
}

fn decode_probability(fields: &Map<String, Value>, name: &str) -> Result<Option<f32>, RemoteError> {
    let Some(value) = fields.get(name) else {
        return Ok(None);
    };
    if value.get("nullValue").is_some() {
        return Ok(None);
    }
    // Whole numbers may come back integer-tagged.
    let number = value
        .get("doubleValue")
        .and_then(Value::as_f64)
        .or_else(|| {
            value
                .get("integerValue")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<f64>().ok())
        })
        .ok_or_else(|| RemoteError::Decode(format!("field '{name}' is not a number")))?;
    Ok(Some(number as f32))
}

/// Read a `votes/{identity}` document back into a record.
pub fn decode_vote(identity: &Identity, doc: &Value) -> Result<VoteRecord, RemoteError> {
    let fields = fields(doc)?;
    let cast = field(fields, VOTED_FIELD)?
        .get("booleanValue")
        .and_then(Value::as_bool)
        .ok_or_else(|| RemoteError::Decode(format!("field '{VOTED_FIELD}' is not a boolean")))?;
    let millis = field(fields, TIMESTAMP_FIELD)?
        .get("integerValue")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| RemoteError::Decode(format!("field '{TIMESTAMP_FIELD}' is not an integer")))?;
    Ok(VoteRecord {
        identity: identity.clone(),
        cast,
        timestamp: Timestamp::from_millis(millis),
    })
}

/// Read a `users/{identity}` document back into a descriptor.
pub fn decode_descriptor(doc: &Value) -> Result<BiometricDescriptor, RemoteError> {
    let fields = fields(doc)?;
    let bounds: BoundingBox = field(fields, BOUNDING_BOX_FIELD)?
        .get("stringValue")
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::Decode(format!("field '{BOUNDING_BOX_FIELD}' is not a string")))?
        .parse()
        .map_err(|e| RemoteError::Decode(format!("{e}")))?;
    Ok(BiometricDescriptor::new(bounds).with_eyes(
        decode_probability(fields, LEFT_EYE_FIELD)?,
        decode_probability(fields, RIGHT_EYE_FIELD)?,
    ))
}
