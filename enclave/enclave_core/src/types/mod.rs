//! The object model that crosses the isolation boundary.
//!
//! Types are [`LoadedUnit`]s with [`MemberTable`]s; objects are [`Handle`]s;
//! arguments and results are [`Value`]s checked against [`Shape`]s.

pub mod handle;
pub mod resource;
pub mod shape;
pub mod tier;
pub mod unit;
pub mod value;

pub use handle::Handle;
pub use resource::{Resource, ResourceSource};
pub use shape::Shape;
pub use tier::Tier;
pub use unit::{
    CallContext, LoadedUnit, Member, MemberFn, MemberKind, MemberTable, MemberTableBuilder,
    Origin, CONSTRUCTOR,
};
pub use value::Value;
