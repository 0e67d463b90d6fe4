use crate::core::{document::Document, error::ModelError, value::Value};
use serde_json::Value as JsonValue;

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Value::Int32(small),
                        Err(_) => Value::Int64(i),
                    }
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Document(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<JsonValue> for Document {
    type Error = ModelError;

    fn try_from(json: JsonValue) -> Result<Self, Self::Error> {
        match Value::from(json) {
            Value::Document(doc) => Ok(doc),
            other => Err(ModelError::NotADocument(other.to_string())),
        }
    }
}
