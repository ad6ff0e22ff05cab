//! Translation between host values and engine values.
//!
//! Going in, wrappers become their handle (never a copy) and collections map
//! element-wise. Coming out, engine objects are wrapped only if their unit
//! implements the wrapper's contract; anything else is a
//! [`BoundaryError`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enclave_core::error::{BoundaryError, Error, Result};
use enclave_core::{DynamicInvoke, Handle, TypeName, Value};

use crate::reflect::Call;

/// An engine handle plus the invoker that produced it.
#[derive(Clone)]
pub struct Remote {
    handle: Handle,
    invoker: Arc<dyn DynamicInvoke>,
}

impl Remote {
    /// Pair a handle with its invoker.
    pub fn new(handle: Handle, invoker: Arc<dyn DynamicInvoke>) -> Self {
        Self { handle, invoker }
    }

    /// The engine object.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The invoker calls go through.
    pub fn invoker(&self) -> &Arc<dyn DynamicInvoke> {
        &self.invoker
    }

    /// Call an instance member on the handle.
    pub fn call(&self, call: &Call, args: Vec<Value>) -> Result<Value> {
        self.invoker
            .invoke(&self.handle, call.member, &call.shapes()?, args)
    }

    /// Call an instance member and convert the result.
    pub fn call_as<T: FromValue>(&self, call: &Call, args: Vec<Value>) -> Result<T> {
        let value = self.call(call, args)?;
        T::from_value(value, &self.invoker)
    }
}

/// A host type that owns exactly one engine handle.
pub trait Wrapper: Sized {
    /// The engine contract the handle's unit must implement.
    const CONTRACT: &'static str;

    /// Build the wrapper without checking the contract.
    fn from_remote(remote: Remote) -> Self;

    /// The wrapped remote.
    fn remote(&self) -> &Remote;

    /// The wrapped handle.
    fn handle(&self) -> &Handle {
        self.remote().handle()
    }

    /// The runtime type of the engine object.
    fn type_name(&self) -> &TypeName {
        self.handle().type_name()
    }

    /// Wrap a handle, checking the contract.
    fn wrap(handle: Handle, invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        let contract = TypeName::new(Self::CONTRACT)?;
        if !handle.unit().is_a(&contract) {
            return Err(BoundaryError::UnrecognizedContract {
                expected: Self::CONTRACT.to_string(),
                actual: handle.type_name().to_string(),
            }
            .into());
        }
        Ok(Self::from_remote(Remote::new(handle, Arc::clone(invoker))))
    }
}

/// Conversion of host values into engine values.
pub trait IntoValue {
    /// Convert.
    fn into_value(self) -> Value;
}

/// Conversion of engine results into host values.
pub trait FromValue: Sized {
    /// Convert, wrapping engine objects with `invoker`.
    fn from_value(value: Value, invoker: &Arc<dyn DynamicInvoke>) -> Result<Self>;
}

/// The error for a value of the wrong shape.
pub fn unexpected(expected: &str, value: &Value) -> Error {
    BoundaryError::UnexpectedValue {
        expected: expected.to_string(),
        actual: value.describe(),
    }
    .into()
}

/// Wrap an object value as `W`.
pub fn wrap_value<W: Wrapper>(value: Value, invoker: &Arc<dyn DynamicInvoke>) -> Result<W> {
    match value {
        Value::Object(handle) => W::wrap(handle, invoker),
        Value::Null => Err(BoundaryError::MissingValue(W::CONTRACT.to_string()).into()),
        other => Err(unexpected(W::CONTRACT, &other)),
    }
}

/// Take a byte buffer.
pub fn expect_bytes(value: Value) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        other => Err(unexpected("bytes", &other)),
    }
}

/// Build a list value from anything convertible.
pub fn list<I>(items: I) -> Value
where
    I: IntoIterator,
    I::Item: IntoValue,
{
    Value::List(items.into_iter().map(IntoValue::into_value).collect())
}

/// Build a list of strings.
pub fn strings<S: AsRef<str>>(items: &[S]) -> Value {
    Value::List(items.iter().map(|s| Value::from(s.as_ref())).collect())
}

/// Build a string map.
pub fn properties(map: &BTreeMap<String, String>) -> Value {
    Value::Map(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect(),
    )
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &Path {
    fn into_value(self) -> Value {
        Value::Path(self.to_path_buf())
    }
}

impl IntoValue for &PathBuf {
    fn into_value(self) -> Value {
        Value::Path(self.clone())
    }
}

impl IntoValue for PathBuf {
    fn into_value(self) -> Value {
        Value::Path(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl FromValue for Value {
    fn from_value(value: Value, _invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for () {
    fn from_value(value: Value, _invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::Null => Ok(()),
            other => Err(unexpected("void", &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value, _invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(unexpected("bool", &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value, _invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(unexpected("int", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value, _invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            Value::Null => Err(BoundaryError::MissingValue("str".to_string()).into()),
            other => Err(unexpected("str", &other)),
        }
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value, _invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::Path(p) => Ok(p),
            Value::Str(s) => Ok(PathBuf::from(s)),
            other => Err(unexpected("path", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value, invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, invoker).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value, invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| T::from_value(item, invoker))
                .collect(),
            other => Err(unexpected("list", &other)),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value, invoker: &Arc<dyn DynamicInvoke>) -> Result<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_value(v, invoker)?)))
                .collect(),
            other => Err(unexpected("map", &other)),
        }
    }
}
