use crate::magic::Magic;
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::{self, Display};

/// Raw serialization: entries in insertion order, lazy values unevaluated
/// (rendered as `null`), protected values left out.
impl Serialize for Magic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.count()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Renders the raw entries as compact JSON.
impl Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Magic {
    /// The raw entries as a `serde_json` tree, without evaluating anything.
    #[must_use]
    pub fn to_raw_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_raw_json()))
                .collect(),
        )
    }

    /// Converts the container and every nested container into a plain
    /// `serde_json` tree, evaluating lazy values on the way.
    ///
    /// With `sort_keys` every mapping level is ordered by ascending key;
    /// otherwise insertion order is kept.
    ///
    /// Rebuild a sorted container with `Magic::from_plain(magic.to_plain(true))`.
    pub fn to_plain(&mut self, sort_keys: bool) -> serde_json::Value {
        let keys: Vec<String> = self.keys().cloned().collect();
        let mut map = serde_json::Map::with_capacity(keys.len());
        for key in keys {
            let value = match self.get_mut(&key) {
                Some(value) => plain_value(value),
                None => serde_json::Value::Null,
            };
            map.insert(key, value);
        }

        let mut plain = serde_json::Value::Object(map);
        if sort_keys {
            sort_recursive(&mut plain);
        }
        plain
    }

    /// Same as [`Magic::to_plain`] without sorting; the `JsonSerializable` view.
    pub fn to_array(&mut self) -> serde_json::Value {
        self.to_plain(false)
    }

    /// Serializes the raw entries into a compact JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the raw entries into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the raw entries into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn plain_value(value: &mut Value) -> serde_json::Value {
    match value {
        Value::Container(magic) => magic.to_plain(false),
        Value::Sequence(items) => serde_json::Value::Array(items.iter_mut().map(plain_value).collect()),
        other => other.to_raw_json(),
    }
}

/// Orders every mapping level of `value` by key. Sorting a sorted tree is a no-op.
pub fn sort_recursive(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(String, serde_json::Value)> =
                std::mem::take(map).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (key, mut child) in entries {
                sort_recursive(&mut child);
                map.insert(key, child);
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(sort_recursive),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_is_recursive() {
        let mut value = json!({"z": 1, "a": {"y": 1, "b": [{"d": 1, "c": 2}]}});
        sort_recursive(&mut value);

        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"a":{"b":[{"c":2,"d":1}],"y":1},"z":1}"#
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut value = json!({"b": {"d": 1, "c": 2}, "a": 1});
        sort_recursive(&mut value);
        let once = serde_json::to_string(&value).unwrap();
        sort_recursive(&mut value);
        assert_eq!(serde_json::to_string(&value).unwrap(), once);
    }

    #[test]
    fn test_lazy_values_resolve_in_plain_projection() {
        let mut magic = Magic::new();
        magic.set("nested", json!({"k": "v"}));
        magic
            .container_mut("nested")
            .unwrap()
            .set("lazy", Value::lazy(|_| Value::from("resolved")));

        assert_eq!(magic.to_string(), r#"{"nested":{"k":"v","lazy":null}}"#);
        assert_eq!(
            magic.to_plain(false),
            json!({"nested": {"k": "v", "lazy": "resolved"}})
        );
    }

    #[test]
    fn test_to_yaml() {
        let magic = Magic::from(json!({"k": "v", "n": 1}).as_object().cloned().unwrap());
        assert_eq!(magic.to_yaml().unwrap(), "k: v\nn: 1\n");
    }
}
