//! Error types for the enclave engine host.
//!
//! This module defines the error hierarchy shared by the loading domain and
//! the invocation facade. Errors are organized by subsystem, and the root
//! error type, `Error`, wraps each of them so consumers can handle every
//! boundary failure uniformly.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Tier;

/// An error raised by engine code while a member body was running.
///
/// This is the original cause carried by [`DispatchCause::Faulted`].
pub type Fault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Root error type for the enclave system.
#[derive(Debug, Error)]
pub enum Error {
    /// Type and resource resolution errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Reflective dispatch errors
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Errors translating values across the boundary
    #[error("Boundary error: {0}")]
    Boundary(#[from] BoundaryError),

    /// Archive opening and reading errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Check whether this error reports a type no tier could resolve.
    pub fn is_type_not_found(&self) -> bool {
        matches!(self, Self::Load(LoadError::TypeNotFound { .. }))
    }

    /// Check whether this error is a reflective dispatch failure.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }
}

/// Errors related to resolving types and resources through a domain.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No tier could resolve the type
    #[error("Type not found: {name} (searched {})", display_tiers(.searched))]
    TypeNotFound {
        /// The requested type name
        name: String,

        /// The tiers that were searched, in order
        searched: Vec<Tier>,
    },

    /// No tier could resolve the resource
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The type name is malformed
    #[error("Invalid type name: '{0}'")]
    InvalidTypeName(String),
}

fn display_tiers(tiers: &[Tier]) -> String {
    tiers
        .iter()
        .map(|tier| tier.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A reflective dispatch failure.
///
/// Raised when a member lookup or invocation fails after the owning type
/// was resolved. Always names the member and its owner, and always carries
/// the original cause.
#[derive(Debug, Error)]
#[error("{owner}#{member}: {cause}")]
pub struct DispatchError {
    /// The type that owns (or was expected to own) the member
    pub owner: String,

    /// The member name
    pub member: String,

    /// What went wrong
    #[source]
    pub cause: DispatchCause,
}

impl DispatchError {
    /// Create a new dispatch error.
    pub fn new(owner: impl Into<String>, member: impl Into<String>, cause: DispatchCause) -> Self {
        Self {
            owner: owner.into(),
            member: member.into(),
            cause,
        }
    }
}

/// The cause of a [`DispatchError`].
#[derive(Debug, Error)]
pub enum DispatchCause {
    /// No member with the given name and parameter shapes exists
    #[error("no such member with parameters ({0})")]
    NoSuchMember(String),

    /// The member exists but is of a different kind
    #[error("member is {actual}, expected {expected}")]
    WrongKind {
        /// The expected member kind
        expected: &'static str,

        /// The actual member kind
        actual: &'static str,
    },

    /// Wrong number of arguments
    #[error("expected {expected} arguments, got {actual}")]
    Arity {
        /// Declared parameter count
        expected: usize,

        /// Supplied argument count
        actual: usize,
    },

    /// An argument does not fit its declared shape
    #[error("argument {index} does not fit {expected}: got {actual}")]
    ArgumentShape {
        /// Zero-based argument position
        index: usize,

        /// Declared shape
        expected: String,

        /// Description of the supplied value
        actual: String,
    },

    /// The member returned a value that does not fit its declared return shape
    #[error("returned {actual}, declared {expected}")]
    ReturnShape {
        /// Declared shape
        expected: String,

        /// Description of the returned value
        actual: String,
    },

    /// A shape descriptor could not be parsed
    #[error("invalid shape descriptor '{0}'")]
    InvalidDescriptor(String),

    /// The engine code itself failed
    #[error("invocation failed: {0}")]
    Faulted(#[source] Fault),
}

/// Errors translating values across the boundary.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// A value had a different shape than the host expected
    #[error("expected {expected}, got {actual}")]
    UnexpectedValue {
        /// The shape the host expected
        expected: String,

        /// Description of the actual value
        actual: String,
    },

    /// An engine object does not implement the contract of the wrapper
    #[error("object of type {actual} does not implement {expected}")]
    UnrecognizedContract {
        /// The wrapper's contract type
        expected: String,

        /// The object's runtime type
        actual: String,
    },

    /// A non-optional value was null
    #[error("missing value: {0}")]
    MissingValue(String),
}

/// Errors related to archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive could not be opened
    #[error("Failed to open archive {location}: {reason}")]
    Open {
        /// The archive location
        location: PathBuf,

        /// Why opening failed
        reason: String,
    },

    /// The location does not name a supported archive kind
    #[error("Unsupported archive: {0}")]
    Unsupported(PathBuf),

    /// The archive's entry point failed or is missing
    #[error("Archive entry point failed in {location}: {reason}")]
    EntryPoint {
        /// The archive location
        location: PathBuf,

        /// Why the entry point failed
        reason: String,
    },

    /// An archive declared a member with a malformed descriptor
    #[error("Invalid declaration of member '{member}': {reason}")]
    InvalidDeclaration {
        /// The declared member
        member: String,

        /// What was wrong
        reason: String,
    },
}

/// Result type used throughout the enclave system.
pub type Result<T> = std::result::Result<T, Error>;
