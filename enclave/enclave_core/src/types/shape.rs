//! Parameter and return shapes.
//!
//! Shapes describe what a member accepts and returns without naming any
//! engine type statically. They are kept as data and have a compact textual
//! form so that call tables can be written as plain strings:
//!
//! | descriptor            | shape                                |
//! |-----------------------|--------------------------------------|
//! | `void`                | no value (null)                      |
//! | `bool` `int` `float`  | primitives                           |
//! | `str` `bytes` `path`  | strings, byte buffers, paths         |
//! | `any`                 | anything                             |
//! | `list<S>`             | list whose elements fit `S`          |
//! | `map<S>`              | string-keyed map whose values fit `S`|
//! | `opt<S>`              | null or `S`                          |
//! | `engine.SourceFile`   | engine object implementing the name  |

use std::fmt;
use std::str::FromStr;

use crate::error::{DispatchCause, Error};
use crate::name::TypeName;
use crate::types::value::Value;

/// A parameter or return descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// No value.
    Void,

    /// A boolean.
    Bool,

    /// A signed 64-bit integer.
    Int,

    /// A 64-bit float.
    Float,

    /// A string.
    Str,

    /// A byte buffer.
    Bytes,

    /// A filesystem path.
    Path,

    /// Any value, including null.
    Any,

    /// A list of elements of the inner shape.
    List(Box<Shape>),

    /// A string-keyed map of values of the inner shape.
    Map(Box<Shape>),

    /// Null or the inner shape.
    Optional(Box<Shape>),

    /// An engine object that implements the named contract.
    Object(TypeName),
}

impl Shape {
    /// Parse a list of descriptors.
    pub fn parse_all<S: AsRef<str>>(descriptors: &[S]) -> Result<Vec<Shape>, Error> {
        descriptors.iter().map(|d| d.as_ref().parse()).collect()
    }

    /// Check whether a value fits this shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Void, Value::Null) => true,
            (Self::Optional(_), Value::Null) => true,
            (Self::Optional(inner), value) => inner.accepts(value),
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Int, Value::Int(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Str, Value::Str(_)) => true,
            (Self::Bytes, Value::Bytes(_)) => true,
            (Self::Path, Value::Path(_)) => true,
            (Self::List(inner), Value::List(items)) => items.iter().all(|item| inner.accepts(item)),
            (Self::Map(inner), Value::Map(entries)) => entries.values().all(|v| inner.accepts(v)),
            (Self::Object(contract), Value::Object(handle)) => handle.unit().is_a(contract),
            _ => false,
        }
    }

    fn parse_inner(text: &str) -> Option<Shape> {
        let text = text.trim();
        let shape = match text {
            "void" => Self::Void,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "float" => Self::Float,
            "str" => Self::Str,
            "bytes" => Self::Bytes,
            "path" => Self::Path,
            "any" => Self::Any,
            _ => {
                if let Some((head, rest)) = text.split_once('<') {
                    let inner = Box::new(Self::parse_inner(rest.strip_suffix('>')?)?);
                    match head.trim() {
                        "list" => Self::List(inner),
                        "map" => Self::Map(inner),
                        "opt" => Self::Optional(inner),
                        _ => return None,
                    }
                } else {
                    Self::Object(TypeName::new(text).ok()?)
                }
            }
        };
        Some(shape)
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_inner(s).ok_or_else(|| {
            Error::Dispatch(crate::error::DispatchError::new(
                "<descriptor>",
                s,
                DispatchCause::InvalidDescriptor(s.to_string()),
            ))
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("str"),
            Self::Bytes => f.write_str("bytes"),
            Self::Path => f.write_str("path"),
            Self::Any => f.write_str("any"),
            Self::List(inner) => write!(f, "list<{}>", inner),
            Self::Map(inner) => write!(f, "map<{}>", inner),
            Self::Optional(inner) => write!(f, "opt<{}>", inner),
            Self::Object(name) => write!(f, "{}", name),
        }
    }
}

/// Render a parameter list as `a, b, c`.
pub fn display_params(params: &[Shape]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_and_display_agree() {
        for text in [
            "void",
            "str",
            "list<engine.SourceFile>",
            "map<str>",
            "opt<list<path>>",
            "engine.config.Environment",
        ] {
            let shape: Shape = text.parse().unwrap();
            assert_eq!(shape.to_string(), text);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("list<str".parse::<Shape>().is_err());
        assert!("tuple<str>".parse::<Shape>().is_err());
        assert!("".parse::<Shape>().is_err());
        assert!("a..b".parse::<Shape>().is_err());
    }

    #[test]
    fn test_accepts_primitives() {
        assert!(Shape::Str.accepts(&Value::from("x")));
        assert!(!Shape::Str.accepts(&Value::Int(1)));
        assert!(Shape::Void.accepts(&Value::Null));
        assert!(!Shape::Str.accepts(&Value::Null));
        assert!(Shape::Optional(Box::new(Shape::Str)).accepts(&Value::Null));
        assert!(Shape::Any.accepts(&Value::Null));
    }

    #[test]
    fn test_accepts_collections_element_wise() {
        let list = Shape::List(Box::new(Shape::Path));
        assert!(list.accepts(&Value::List(vec![Value::from(std::path::PathBuf::from("a"))])));
        assert!(!list.accepts(&Value::List(vec![Value::from("a")])));
        assert!(list.accepts(&Value::List(vec![])));

        let map = Shape::Map(Box::new(Shape::Str));
        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), Value::from("v"));
        assert!(map.accepts(&Value::Map(entries.clone())));
        entries.insert("n".to_string(), Value::Int(3));
        assert!(!map.accepts(&Value::Map(entries)));
    }
}
