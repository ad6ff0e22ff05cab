//! Utility functions and types.
//!
//! This module provides the logging and configuration helpers shared by the
//! enclave crates.

pub mod config;
pub mod logging;

pub use config::{
    DomainConfig, EnclaveConfig, EngineConfig, LoggingConfig, PolicyConfig, ShutdownHook,
    StructuralKind,
};
pub use logging::{init_logging, LogLevel};
