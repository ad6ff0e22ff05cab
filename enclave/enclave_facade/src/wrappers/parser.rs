//! Parsers and their builders.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use enclave_core::error::{Error, Result};

use crate::boundary::{list, IntoValue};
use crate::reflect::contract::{self, types};
use crate::reflect::Call;
use crate::wrappers::execution::ExecutionContext;
use crate::wrappers::recipe::NamedStyles;
use crate::wrappers::source::SourceFile;

/// The source languages the engine can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Java,
    Yaml,
    Properties,
    Xml,
    Groovy,
}

impl ParserKind {
    /// Every kind, in a stable order.
    pub const ALL: [ParserKind; 5] = [
        Self::Java,
        Self::Yaml,
        Self::Properties,
        Self::Xml,
        Self::Groovy,
    ];

    /// The engine type that owns this kind's `builder()`.
    pub fn owner(&self) -> &'static str {
        self.builder_call().owner
    }

    /// The static call that creates a builder for this kind.
    pub fn builder_call(&self) -> Call {
        match self {
            Self::Java => contract::JAVA_PARSER_BUILDER,
            Self::Yaml => contract::YAML_PARSER_BUILDER,
            Self::Properties => contract::PROPERTIES_PARSER_BUILDER,
            Self::Xml => contract::XML_PARSER_BUILDER,
            Self::Groovy => contract::GROOVY_PARSER_BUILDER,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Yaml => "yaml",
            Self::Properties => "properties",
            Self::Xml => "xml",
            Self::Groovy => "groovy",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("Unknown parser kind: {}", s)))
    }
}

wrapper! {
    /// Configures a [`Parser`].
    ParserBuilder => types::PARSER_BUILDER
}

impl ParserBuilder {
    /// Set the compilation classpath.
    pub fn classpath(self, entries: &[PathBuf]) -> Result<Self> {
        self.remote
            .call_as(&contract::PARSER_BUILDER_CLASSPATH, vec![list(entries)])
    }

    pub fn styles(self, styles: &[NamedStyles]) -> Result<Self> {
        self.remote
            .call_as(&contract::PARSER_BUILDER_STYLES, vec![list(styles)])
    }

    /// Share a type cache between parsers.
    pub fn type_cache(self, cache: &TypeCache) -> Result<Self> {
        self.remote
            .call_as(&contract::PARSER_BUILDER_TYPE_CACHE, vec![cache.into_value()])
    }

    pub fn log_compilation_warnings_and_errors(self, enabled: bool) -> Result<Self> {
        self.remote
            .call_as(&contract::PARSER_BUILDER_LOG_COMPILATION, vec![enabled.into_value()])
    }

    pub fn relaxed_class_type_matching(self, enabled: bool) -> Result<Self> {
        self.remote
            .call_as(&contract::PARSER_BUILDER_RELAXED_MATCHING, vec![enabled.into_value()])
    }

    pub fn build(&self) -> Result<Parser> {
        self.remote.call_as(&contract::PARSER_BUILDER_BUILD, vec![])
    }
}

wrapper! {
    /// Turns files into source trees.
    Parser => types::PARSER
}

impl Parser {
    /// Parse `paths`, relativizing source paths against `base_dir`.
    ///
    /// Files the engine cannot parse are reported through `ctx`, not as an
    /// error.
    pub fn parse(
        &self,
        paths: &[PathBuf],
        base_dir: &Path,
        ctx: &ExecutionContext,
    ) -> Result<Vec<SourceFile>> {
        self.remote.call_as(
            &contract::PARSER_PARSE,
            vec![list(paths), base_dir.into_value(), ctx.into_value()],
        )
    }
}

wrapper! {
    /// Type attribution cache shared across parsers.
    TypeCache => types::TYPE_CACHE
}

impl TypeCache {
    /// Number of cached types.
    pub fn size(&self) -> Result<i64> {
        self.remote.call_as(&contract::TYPE_CACHE_SIZE, vec![])
    }
}
