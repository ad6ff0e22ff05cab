//! Reflective invocation.

use crate::error::Result;
use crate::name::TypeName;
use crate::types::{Handle, Shape, Value};

/// Calls members by name and parameter shapes.
///
/// Members are identified by name plus the exact list of declared parameter
/// shapes. Implementations check arity, argument shapes and the declared
/// return shape, and report every failure as a
/// [`DispatchError`](crate::error::DispatchError) naming owner and member.
pub trait DynamicInvoke: Send + Sync {
    /// Call an instance member on `target`.
    fn invoke(&self, target: &Handle, member: &str, params: &[Shape], args: Vec<Value>)
        -> Result<Value>;

    /// Call a static member of the type named `owner`.
    fn invoke_static(
        &self,
        owner: &TypeName,
        member: &str,
        params: &[Shape],
        args: Vec<Value>,
    ) -> Result<Value>;

    /// Call a constructor of the type named `owner`.
    fn construct(&self, owner: &TypeName, params: &[Shape], args: Vec<Value>) -> Result<Handle>;
}
