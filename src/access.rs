//! Property-style access and convention-based accessors.
//!
//! Reading, writing, deleting and testing a key by name all go through the
//! [`Access`] trait. Names shaped like `getSomeKey` / `setSomeKey` are
//! handled by [`Magic::call`], which maps them onto the key `some_key`.

use crate::error::MagicError;
use crate::magic::Magic;
use crate::value::Value;
use log::trace;

/// Keyed access to a container, the way map indexing or object properties work.
pub trait Access {
    fn get_value(&mut self, key: &str) -> Value;
    fn set_value(&mut self, key: &str, value: Value);
    fn has_value(&self, key: &str) -> bool;
    fn delete_value(&mut self, key: &str);
}

impl Access for Magic {
    fn get_value(&mut self, key: &str) -> Value {
        self.get(key)
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.set(key, value);
    }

    fn has_value(&self, key: &str) -> bool {
        self.exists(key)
    }

    fn delete_value(&mut self, key: &str) {
        self.delete([key]);
    }
}

/// A convention-based operation parsed from a name like `getCompoundKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Get(String),
    Set(String),
}

impl Operation {
    /// Parses `name` into a verb and a key.
    ///
    /// Every capital letter in the part after `get`/`set` starts a new word,
    /// so `getCompoundKey` reads `compound_key` and `getURL` reads `u_r_l`.
    ///
    /// # Errors
    /// Returns [`MagicError::UnknownOperation`] if `name` does not start with
    /// `get` or `set` followed by at least one character.
    pub fn parse(name: &str) -> Result<Self, MagicError> {
        let (verb, rest) = name.split_at_checked(3).unwrap_or((name, ""));
        if rest.is_empty() || !matches!(verb, "get" | "set") {
            return Err(MagicError::UnknownOperation {
                name: name.to_string(),
            });
        }

        let key = to_snake_case(rest);
        Ok(if verb == "get" {
            Operation::Get(key)
        } else {
            Operation::Set(key)
        })
    }
}

fn to_snake_case(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            key.push('_');
        }
        key.push(c);
    }
    key.trim_matches('_').to_lowercase()
}

impl Magic {
    /// Dispatches a convention-based accessor.
    ///
    /// `getXxx(default)` returns `Some` value of key `xxx` (or the argument
    /// when the key is absent), `setXxx(value)` stores the argument at `xxx`
    /// and returns `None`. A missing argument counts as `Null`.
    ///
    /// # Errors
    /// Returns [`MagicError::UnknownOperation`] for any other name.
    pub fn call(&mut self, name: &str, argument: Option<Value>) -> Result<Option<Value>, MagicError> {
        let operation = Operation::parse(name)?;
        trace!("dispatching {name} as {operation:?}");

        let argument = argument.unwrap_or_default();
        match operation {
            Operation::Get(key) => Ok(Some(self.get_or(&key, argument))),
            Operation::Set(key) => {
                self.set(key, argument);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operations() {
        assert_eq!(
            Operation::parse("getCompoundKey").unwrap(),
            Operation::Get("compound_key".to_string())
        );
        assert_eq!(
            Operation::parse("setX").unwrap(),
            Operation::Set("x".to_string())
        );
        assert_eq!(
            Operation::parse("get_already_snake").unwrap(),
            Operation::Get("already_snake".to_string())
        );
        assert_eq!(
            Operation::parse("getURL").unwrap(),
            Operation::Get("u_r_l".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        for name in ["invalidMethod", "get", "set", "", "fetchKey", "gé"] {
            assert!(
                matches!(
                    Operation::parse(name),
                    Err(MagicError::UnknownOperation { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_access_trait_routes_to_container() {
        let mut magic = Magic::new();
        let access: &mut dyn Access = &mut magic;

        access.set_value("k", Value::from("v"));
        assert!(access.has_value("k"));
        assert_eq!(access.get_value("k"), "v");
        access.delete_value("k");
        assert!(!access.has_value("k"));
        assert!(access.get_value("k").is_null());
    }
}
