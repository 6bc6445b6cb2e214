use crate::error::{Format, ParseError};
use miette::NamedSource;
use serde_json::{Map, Number, Value};

/// Parses a YAML document into a plain tree.
///
/// Merge keys (`<<: *anchor`) are expanded. Mapping keys that are not
/// strings (numbers, booleans) are converted to their text form, and tags
/// are dropped in favor of the tagged value.
///
/// # Errors
/// Returns [`ParseError::Yaml`] if the document is malformed, or
/// [`ParseError::UnexpectedRoot`] if it holds a scalar or nothing.
pub fn parse(source: &str) -> Result<Value, ParseError> {
    let mut document: serde_yaml::Value =
        serde_yaml::from_str(source).map_err(|err| error(source, &err))?;
    document.apply_merge().map_err(|err| error(source, &err))?;

    crate::format::expect_root(to_plain(document), Format::Yaml)
}

fn error(source: &str, err: &serde_yaml::Error) -> ParseError {
    let offset = err.location().map_or(0, |location| location.index());
    ParseError::Yaml {
        message: err.to_string(),
        src: NamedSource::new("input.yaml", source.to_string()),
        span: (offset, usize::from(offset < source.len())).into(),
    }
}

fn to_plain(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(items.into_iter().map(to_plain).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_string(key), to_plain(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => to_plain(tagged.value),
    }
}

fn number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn key_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => if b { "1" } else { "" }.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => key_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
