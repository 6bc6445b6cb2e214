//! Format adapters.
//!
//! Each adapter turns text into a plain `serde_json::Value` tree, which the
//! constructors in [`crate::api`] wrap into a container.

pub mod ini;
pub mod json;
pub mod query;
pub mod yaml;

use crate::error::{Format, ParseError};
use serde_json::Value;

/// Accepts mappings and sequences as document roots, rejecting scalars.
pub(crate) fn expect_root(value: Value, format: Format) -> Result<Value, ParseError> {
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        other => Err(ParseError::UnexpectedRoot {
            format,
            found: describe(&other).to_string(),
        }),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_roots_are_rejected() {
        let err = expect_root(json!("x"), Format::Yaml).unwrap_err();
        assert_eq!(err.sub_code(), 102);
        assert!(err.to_string().contains("found a string"));

        assert!(expect_root(json!([1]), Format::Json).is_ok());
        assert!(expect_root(json!({}), Format::Json).is_ok());
    }
}
