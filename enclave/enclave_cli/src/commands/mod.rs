//! Subcommand implementations.

pub mod config;
pub mod domain;
pub mod engine;
pub mod policy;
