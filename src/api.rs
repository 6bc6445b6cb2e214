use crate::error::{Format, MagicError};
use crate::format::ini::{self, IniOptions};
use crate::format::json::{self, JsonOptions};
use crate::format::{query, yaml};
use crate::magic::Magic;
use log::{debug, warn};
use std::fs;
use std::path::Path;
use std::str::FromStr;

impl Magic {
    /// Builds a container from a plain tree.
    ///
    /// A mapping becomes the entries, a sequence is keyed by index
    /// (`"0"`, `"1"`, ...) and `null` gives an empty container. Any other
    /// scalar is stored under `"0"`. Nested mappings become nested containers.
    pub fn from_plain(value: serde_json::Value) -> Magic {
        match value {
            serde_json::Value::Object(map) => Magic::from(map),
            serde_json::Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            serde_json::Value::Null => Magic::new(),
            scalar => std::iter::once(("0", scalar)).collect(),
        }
    }

    /// Builds a container from a JSON document.
    ///
    /// To load a JSON file use [`Magic::from_json_file`].
    ///
    /// # Errors
    /// Returns [`MagicError::Parse`] (code 100) if the document is not valid JSON
    /// or its top level is a scalar.
    pub fn from_json(source: &str) -> Result<Magic, MagicError> {
        Self::from_json_with(source, &JsonOptions::default())
    }

    /// Like [`Magic::from_json`], with an explicit nesting depth limit.
    ///
    /// # Errors
    /// Returns [`MagicError::Parse`] (code 100) on invalid or too deeply nested JSON.
    pub fn from_json_with(source: &str, options: &JsonOptions) -> Result<Magic, MagicError> {
        let value = json::parse(source, options)
            .inspect_err(|err| warn!("failed to parse JSON: {err}"))?;
        Ok(Self::parsed(value, Format::Json))
    }

    /// Builds a container from JSON text that may contain `//` line comments.
    ///
    /// # Errors
    /// Same as [`Magic::from_json`], after the comments are removed.
    pub fn from_json_with_comments(source: &str) -> Result<Magic, MagicError> {
        Self::from_json(&json::strip_comments(source))
    }

    /// Builds a container from a JSON file.
    ///
    /// # Errors
    /// Returns [`MagicError::SourceNotFound`] (code 101) if `path` is not a file,
    /// [`MagicError::Io`] if it cannot be read, and the errors of [`Magic::from_json`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Magic, MagicError> {
        let source = read_source(path.as_ref())?;
        Self::from_json(&source)
    }

    /// Builds a container from a JSON file with `//` line comments.
    ///
    /// # Errors
    /// Same as [`Magic::from_json_file`].
    pub fn from_json_file_with_comments(path: impl AsRef<Path>) -> Result<Magic, MagicError> {
        let source = read_source(path.as_ref())?;
        Self::from_json_with_comments(&source)
    }

    /// Builds a container from a YAML document.
    ///
    /// # Errors
    /// Returns [`MagicError::Parse`] (code 102) if the YAML is not valid or
    /// does not hold a mapping or sequence.
    pub fn from_yaml(source: &str) -> Result<Magic, MagicError> {
        let value = yaml::parse(source).inspect_err(|err| warn!("failed to parse YAML: {err}"))?;
        Ok(Self::parsed(value, Format::Yaml))
    }

    /// Builds a container from a raw form body or query string, e.g. `x=1&y=2`.
    pub fn from_query_string(source: &str) -> Magic {
        let magic = Self::from_plain(query::parse(source));
        debug!("parsed {} entries from query string", magic.count());
        magic
    }

    /// Builds a container from an INI document, sections flattened.
    ///
    /// # Errors
    /// Returns [`MagicError::Parse`] (code 103) if the INI is not valid.
    pub fn from_ini(source: &str) -> Result<Magic, MagicError> {
        Self::from_ini_with(source, &IniOptions::default())
    }

    /// Builds a container from an INI document with explicit section and scanner options.
    ///
    /// # Errors
    /// Returns [`MagicError::Parse`] (code 103) if the INI is not valid.
    pub fn from_ini_with(source: &str, options: &IniOptions) -> Result<Magic, MagicError> {
        let value =
            ini::parse(source, options).inspect_err(|err| warn!("failed to parse INI: {err}"))?;
        Ok(Self::parsed(value, Format::Ini))
    }

    fn parsed(value: serde_json::Value, format: Format) -> Magic {
        let magic = Self::from_plain(value);
        debug!("parsed {} entries from {format}", magic.count());
        magic
    }
}

/// Parses JSON, the same as [`Magic::from_json`].
impl FromStr for Magic {
    type Err = MagicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Magic::from_json(s)
    }
}

fn read_source(path: &Path) -> Result<String, MagicError> {
    if !path.is_file() {
        warn!("source file {} does not exist", path.display());
        return Err(MagicError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_plain_sequence_is_indexed() {
        let mut magic = Magic::from_plain(json!(["a", {"k": "v"}]));
        assert!(magic.has(["0", "1"]));
        assert_eq!(magic.get("0"), "a");
        assert!(magic.get("1").as_container().is_some());
    }

    #[test]
    fn test_from_plain_scalars() {
        assert_eq!(Magic::from_plain(json!(null)).count(), 0);
        assert_eq!(Magic::from_plain(json!("x")).get("0"), "x");
    }

    #[test]
    fn test_from_str_parses_json() {
        let mut magic: Magic = r#"{"k":"v"}"#.parse().unwrap();
        assert_eq!(magic.get("k"), "v");
    }

    #[test]
    fn test_json_file_missing() {
        let err = Magic::from_json_file("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.sub_code(), Some(101));
    }
}
