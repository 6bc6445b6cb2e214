use crate::error::MagicError;
use crate::magic::Magic;
use crate::value::Value;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// First line of every snapshot file.
pub const SNAPSHOT_MARKER: &str = "Magic.serialized";

impl Magic {
    /// Saves the raw entries to `path`, to be reloaded with [`Magic::from_file`].
    ///
    /// The file holds [`SNAPSHOT_MARKER`], a newline and the entries as JSON.
    /// Protected values are not saved.
    ///
    /// # Errors
    /// Returns [`MagicError::NotSerializable`] if an unevaluated lazy value is
    /// stored anywhere in the tree (nothing is written then), or
    /// [`MagicError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize, MagicError> {
        let path = path.as_ref();
        ensure_serializable(self, "")?;

        let body = serde_json::to_string(self).map_err(std::io::Error::from)?;
        let content = format!("{SNAPSHOT_MARKER}\n{body}");
        fs::write(path, &content)?;

        debug!("saved {} entries to {}", self.count(), path.display());
        Ok(content.len())
    }

    /// Loads a container from a file created with [`Magic::save`].
    ///
    /// # Errors
    /// Returns [`MagicError::SnapshotNotFound`] if the file does not exist and
    /// [`MagicError::InvalidSnapshot`] if it is not UTF-8 text, does not start
    /// with the marker or its body is not a saved mapping.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Magic, MagicError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("snapshot {} does not exist", path.display());
            return Err(MagicError::SnapshotNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path)?;
        let magic = String::from_utf8(bytes)
            .map_err(|err| format!("not valid UTF-8: {err}"))
            .and_then(|content| decode(&content))
            .map_err(|reason| {
                warn!("invalid snapshot {}: {reason}", path.display());
                MagicError::InvalidSnapshot {
                    path: path.to_path_buf(),
                    reason,
                }
            })?;

        debug!("loaded {} entries from {}", magic.count(), path.display());
        Ok(magic)
    }
}

fn decode(content: &str) -> Result<Magic, String> {
    let body = content
        .strip_prefix(SNAPSHOT_MARKER)
        .ok_or_else(|| format!("missing `{SNAPSHOT_MARKER}` marker"))?;

    match crate::format::json::from_str(body.trim()) {
        Ok(serde_json::Value::Object(map)) => Ok(Magic::from(map)),
        Ok(_) => Err("the saved entries are not a mapping".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

fn ensure_serializable(magic: &Magic, prefix: &str) -> Result<(), MagicError> {
    for (key, value) in magic {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        ensure_value_serializable(value, &path)?;
    }
    Ok(())
}

fn ensure_value_serializable(value: &Value, path: &str) -> Result<(), MagicError> {
    match value {
        Value::Lazy(_) => Err(MagicError::NotSerializable {
            key: path.to_string(),
        }),
        Value::Container(nested) => ensure_serializable(nested, path),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| ensure_value_serializable(item, &format!("{path}.{i}"))),
        _ => Ok(()),
    }
}
