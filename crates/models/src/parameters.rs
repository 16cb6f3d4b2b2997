use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Free-form request parameters. Values are the JSON tagged variant, whose
/// equality is structural and ignores object key order.
pub type Parameters = Map<String, Value>;

/// Look up `key` and require it to be a string when present.
pub fn string_param<'a>(params: &'a Parameters, key: &str) -> Result<Option<&'a str>, ModelError> {
    match params.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ModelError::Validation(format!(
            "parameter {key:?} must be a string, got {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
