use crate::error::MagicError;
use crate::value::{Lazy, Value};
use indexmap::IndexMap;
use log::trace;
use std::fmt;

/// A recursively nestable key/value container.
///
/// Ordinary values live in `entries`, kept in insertion order. Values
/// registered through [`Magic::protect`] live in a separate namespace that
/// wins on every read and is never cached or persisted.
///
/// The container is single-threaded: lazy values are shared through `Rc`,
/// so a `Magic` is neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct Magic {
    entries: IndexMap<String, Value>,
    protected: IndexMap<String, Lazy>,
    lazy_evaluation: bool,
}

impl Default for Magic {
    fn default() -> Self {
        Magic {
            entries: IndexMap::new(),
            protected: IndexMap::new(),
            lazy_evaluation: true,
        }
    }
}

impl Magic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether lazy values in `entries` are evaluated when read.
    pub fn lazy_evaluation(&self) -> bool {
        self.lazy_evaluation
    }

    /// Switches evaluation of lazy values on or off. While off, `get`
    /// returns stored [`Value::Lazy`] handles unchanged.
    pub fn set_lazy_evaluation(&mut self, enabled: bool) -> &mut Self {
        self.lazy_evaluation = enabled;
        self
    }

    /// Reads `key`, returning [`Value::Null`] when it is absent.
    pub fn get(&mut self, key: &str) -> Value {
        self.get_or(key, Value::Null)
    }

    /// Reads `key`, returning `default` when it is absent.
    ///
    /// Protected values are consulted first and evaluated on every call.
    /// A lazy value in `entries` is evaluated once, with this container as
    /// its argument, and replaced by its result.
    pub fn get_or(&mut self, key: &str, default: impl Into<Value>) -> Value {
        if let Some(producer) = self.protected.get(key).cloned() {
            trace!("evaluating protected value {key:?}");
            return producer.evaluate(self);
        }

        match self.resolve(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Mutable access to the stored value of `key`, evaluating a lazy value
    /// first. Protected values are not reachable this way.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.resolve(key)
    }

    /// Mutable access to a nested container, for in-place edits of deep trees.
    pub fn container_mut(&mut self, key: &str) -> Option<&mut Magic> {
        self.resolve(key).and_then(Value::as_container_mut)
    }

    /// The stored value of `key` exactly as it is, without any evaluation.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn resolve(&mut self, key: &str) -> Option<&mut Value> {
        if self.lazy_evaluation {
            if let Some(Value::Lazy(lazy)) = self.entries.get(key) {
                let lazy = lazy.clone();
                trace!("evaluating lazy value {key:?}");
                let value = lazy.evaluate(self);
                self.entries.insert(key.to_string(), value);
            }
        }
        self.entries.get_mut(key)
    }

    /// Stores `value` at `key`, replacing whatever `entries` held there.
    ///
    /// Mappings converted from `serde_json` become nested containers on the
    /// way in; lazy values are stored unevaluated.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Like [`Magic::set`], but only when `key` is absent, null or an empty string.
    pub fn set_if_empty(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        match self.entries.get(&key) {
            Some(current) if !current.is_empty_string() => self,
            _ => self.set(key, value),
        }
    }

    /// Registers a producer that is evaluated on every read of `key`.
    pub fn protect<F>(&mut self, key: impl Into<String>, producer: F) -> &mut Self
    where
        F: Fn(&Magic) -> Value + 'static,
    {
        self.protected.insert(key.into(), Lazy::new(producer));
        self
    }

    /// Writes every pair of `values` into the container or sequence at `key`,
    /// creating an empty container first when `key` is absent.
    ///
    /// For a sequence target, a key naming an existing index replaces that
    /// element and any other key appends.
    ///
    /// # Errors
    /// Returns [`MagicError::NotIterable`] if the value at `key` is neither a
    /// container nor a sequence. The container is left untouched in that case.
    pub fn merge<I, K, V>(&mut self, key: impl Into<String>, values: I) -> Result<&mut Self, MagicError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.entries.insert(key.clone(), Value::Container(Magic::new()));
        }

        match self.resolve(&key) {
            Some(Value::Container(target)) => {
                for (k, v) in values {
                    target.set(k, v);
                }
            }
            Some(Value::Sequence(items)) => {
                for (k, v) in values {
                    let v = v.into();
                    match k.into().parse::<usize>() {
                        Ok(index) if index < items.len() => items[index] = v,
                        _ => items.push(v),
                    }
                }
            }
            _ => return Err(MagicError::NotIterable { key }),
        }
        Ok(self)
    }

    /// Removes each key from both the entries and the protected values.
    /// Absent keys are ignored.
    pub fn delete<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            self.entries.shift_remove(key);
            self.protected.shift_remove(key);
        }
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self.protected.clear();
        self
    }

    /// True if every key is present in the entries. Protected values do not count.
    pub fn has<I, K>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .all(|key| self.entries.contains_key(key.as_ref()))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries, protected values excluded.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the stored entries in insertion order. Lazy values are
    /// yielded as they are stored, without evaluation.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.entries.keys()
    }
}

impl<'a> IntoIterator for &'a Magic {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Magic {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut magic = Magic::new();
        for (key, value) in iter {
            magic.set(key, value);
        }
        magic
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Magic {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl PartialEq for Magic {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
