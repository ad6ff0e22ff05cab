//! Typed wrappers over engine objects.

pub mod environment;
pub mod execution;
pub mod parser;
pub mod provenance;
pub mod recipe;
pub mod source;

pub use environment::{Environment, EnvironmentBuilder, ResourceLoader};
pub use execution::{ExecutionContext, RunResult};
pub use parser::{Parser, ParserBuilder, ParserKind, TypeCache};
pub use provenance::ProjectProvenanceBuilder;
pub use recipe::{
    Invalid, NamedStyles, OptionDescriptor, OptionSummary, Recipe, RecipeDescriptor, RecipeSummary,
    Validated, ValidatedKind,
};
pub use source::{Marker, Markers, SourceFile, TreeSerializer};
