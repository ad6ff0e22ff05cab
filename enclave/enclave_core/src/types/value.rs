//! Values that cross the boundary.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::handle::Handle;

/// A value passed to or returned from an engine member.
///
/// Engine objects travel as [`Handle`]s, so passing an object back in is
/// never a copy.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null, or the result of a `void` member.
    Null,

    /// A boolean.
    Bool(bool),

    /// A signed integer.
    Int(i64),

    /// A float.
    Float(f64),

    /// A string.
    Str(String),

    /// A byte buffer.
    Bytes(Vec<u8>),

    /// A filesystem path.
    Path(PathBuf),

    /// An ordered list.
    List(Vec<Value>),

    /// A string-keyed map.
    Map(BTreeMap<String, Value>),

    /// An engine object.
    Object(Handle),
}

impl Value {
    /// A short description of the value, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Str(_) => "str".to_string(),
            Self::Bytes(_) => "bytes".to_string(),
            Self::Path(_) => "path".to_string(),
            Self::List(items) => format!("list[{}]", items.len()),
            Self::Map(entries) => format!("map[{}]", entries.len()),
            Self::Object(handle) => format!("object {}", handle.type_name()),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as a handle.
    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Self::Object(handle) => Some(handle),
            _ => None,
        }
    }

    /// Take the elements of a list.
    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Take the entries of a map.
    pub fn into_map(self) -> Option<BTreeMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Take a string.
    pub fn into_string(self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Take a path. Strings are accepted as paths.
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Path(p) => Some(p),
            Self::Str(s) => Some(PathBuf::from(s)),
            _ => None,
        }
    }

    /// Take a handle.
    pub fn into_handle(self) -> Option<Handle> {
        match self {
            Self::Object(handle) => Some(handle),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Handle> for Value {
    fn from(value: Handle) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}
