//! Policy models.

pub mod decision;
pub mod prefix;
pub mod rule;

pub use decision::{Decision, Reason};
pub use prefix::PrefixSet;
pub use rule::{DelegationRule, StructuralRule};
