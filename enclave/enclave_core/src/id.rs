//! Typed identifiers for sessions, units and instances.
//!
//! A [`UnitId`] tells two definitions of the same type name apart (the
//! reflector keys its member cache on it), an [`InstanceId`] names the object
//! behind a handle, and a [`SessionId`] names a loading domain. All three are
//! random v4 UUIDs behind the same phantom-typed [`Id`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A UUID tagged with what it identifies.
pub struct Id<T> {
    uuid: Uuid,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// A fresh random id.
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            _kind: PhantomData,
        }
    }

    /// The first eight hex digits, used in log lines and handle debug output.
    pub fn short(&self) -> String {
        let mut text = self.uuid.simple().to_string();
        text.truncate(8);
        text
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls: the marker types carry no data and need no bounds.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.uuid)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            uuid: Uuid::parse_str(s)?,
            _kind: PhantomData,
        })
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.uuid.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            uuid: Uuid::deserialize(deserializer)?,
            _kind: PhantomData,
        })
    }
}

/// Tags a loading session.
pub enum SessionTag {}
/// One domain per session.
pub type SessionId = Id<SessionTag>;

/// Tags a loaded unit.
pub enum UnitTag {}
/// Every definition of a type gets a fresh one.
pub type UnitId = Id<UnitTag>;

/// Tags an engine instance.
pub enum InstanceTag {}
pub type InstanceId = Id<InstanceTag>;
