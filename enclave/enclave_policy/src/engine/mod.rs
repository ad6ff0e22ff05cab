//! Policy evaluation.

mod evaluator;

pub use evaluator::{DelegationPolicy, PolicyBuilder};
