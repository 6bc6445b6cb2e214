use crate::magic::Magic;
use serde::ser::{Serialize, Serializer};
use serde_json::Number;
use std::fmt;
use std::rc::Rc;

/// A value stored in a [`Magic`] container.
///
/// Plain mappings never appear here: converting a `serde_json::Value::Object`
/// always builds a fresh nested [`Magic`], so every mapping level in a tree of
/// values is a container of its own.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Container(Magic),
    Lazy(Lazy),
}

/// A deferred value, produced on demand from the container that holds it.
///
/// Stored in the entries of a container it is evaluated on first read and
/// replaced by its result. Registered with [`Magic::protect`] it is evaluated
/// on every read instead.
#[derive(Clone)]
pub struct Lazy(Rc<dyn Fn(&Magic) -> Value>);

impl Lazy {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn(&Magic) -> Value + 'static,
    {
        Lazy(Rc::new(producer))
    }

    pub fn evaluate(&self, owner: &Magic) -> Value {
        (self.0)(owner)
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lazy(..)")
    }
}

impl Value {
    /// Wraps a producer into a lazily evaluated value.
    pub fn lazy<F>(producer: F) -> Self
    where
        F: Fn(&Magic) -> Value + 'static,
    {
        Value::Lazy(Lazy::new(producer))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Value::Lazy(_))
    }

    /// Containers and sequences are the values `merge` can write into.
    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::Container(_) | Value::Sequence(_))
    }

    /// `Null` and the empty string, the values PHP-style loose comparison treats as `''`.
    pub fn is_empty_string(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Magic> {
        match self {
            Value::Container(magic) => Some(magic),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Magic> {
        match self {
            Value::Container(magic) => Some(magic),
            _ => None,
        }
    }

    pub fn into_container(self) -> Option<Magic> {
        match self {
            Value::Container(magic) => Some(magic),
            _ => None,
        }
    }

    /// The JSON rendering of the stored value. Lazy values are not evaluated
    /// and render as `null`.
    pub fn to_raw_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Lazy(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_raw_json).collect())
            }
            Value::Container(magic) => magic.to_raw_json(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Value::Container(magic) => f.debug_tuple("Container").field(magic).finish(),
            Value::Lazy(lazy) => fmt::Debug::fmt(lazy, f),
        }
    }
}

/// Lazy values never compare equal, not even to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Container(a), Value::Container(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Lazy(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => items.serialize(serializer),
            Value::Container(magic) => magic.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Container(Magic::from(map)),
        }
    }
}

impl From<Magic> for Value {
    fn from(magic: Magic) -> Self {
        Value::Container(magic)
    }
}

impl From<Lazy> for Value {
    fn from(lazy: Lazy) -> Self {
        Value::Lazy(lazy)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
