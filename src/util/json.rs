use bson::{Bson, Document};
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Fields that never leave the server
const HIDDEN_FIELDS: &[&str] = &["password", "resetPasswordToken", "resetPasswordExpire"];

/// Converts a stored document into the JSON shape clients see: ObjectIds
/// become hex strings, dates become RFC 3339 strings, secrets are dropped.
pub fn document_to_json(doc: Document) -> Value {
    let mut map = Map::with_capacity(doc.len());
    for (key, value) in doc {
        if HIDDEN_FIELDS.contains(&key.as_str()) {
            continue;
        }
        map.insert(key, bson_to_json(value));
    }
    Value::Object(map)
}

/// Serializes a model through BSON so ids and dates get the client shape
pub fn to_json<T: Serialize>(value: &T) -> Result<Value, bson::ser::Error> {
    Ok(document_to_json(bson::to_document(value)?))
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::Number(dt.timestamp_millis().into()),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::Number(i.into()),
        Bson::Int64(i) => Value::Number(i.into()),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.into_relaxed_extjson(),
    }
}
