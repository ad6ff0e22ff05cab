//! The engine surface the facade calls, as data.
//!
//! Each [`Call`] names an owner type, a member and the member's parameter
//! descriptors (see [`Shape`]). Wrappers never spell a member name
//! themselves; they go through this table, so the whole mapping can be
//! checked without an engine.

use enclave_core::error::{DispatchError, Error, Result};
use enclave_core::{Shape, TypeName};

/// How a call reaches its member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// On an instance of the owner (or of a type implementing it).
    Instance,

    /// On the owner type itself.
    Static,

    /// A constructor of the owner.
    Constructor,
}

/// One engine member, identified by name and parameter shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    /// Owner type name.
    pub owner: &'static str,

    /// Member name.
    pub member: &'static str,

    /// Parameter descriptors.
    pub params: &'static [&'static str],

    /// Dispatch kind.
    pub kind: CallKind,
}

impl Call {
    /// An instance member.
    pub const fn method(
        owner: &'static str,
        member: &'static str,
        params: &'static [&'static str],
    ) -> Self {
        Self {
            owner,
            member,
            params,
            kind: CallKind::Instance,
        }
    }

    /// A static member.
    pub const fn static_method(
        owner: &'static str,
        member: &'static str,
        params: &'static [&'static str],
    ) -> Self {
        Self {
            owner,
            member,
            params,
            kind: CallKind::Static,
        }
    }

    /// A constructor.
    pub const fn constructor(owner: &'static str, params: &'static [&'static str]) -> Self {
        Self {
            owner,
            member: enclave_core::CONSTRUCTOR,
            params,
            kind: CallKind::Constructor,
        }
    }

    /// The owner as a type name.
    pub fn owner_name(&self) -> Result<TypeName> {
        TypeName::new(self.owner)
    }

    /// The parameter shapes. A bad descriptor is reported against this call.
    pub fn shapes(&self) -> Result<Vec<Shape>> {
        Shape::parse_all(self.params).map_err(|e| match e {
            Error::Dispatch(inner) => {
                Error::Dispatch(DispatchError::new(self.owner, self.member, inner.cause))
            }
            other => other,
        })
    }
}

/// Engine type names.
pub mod types {
    pub const ENVIRONMENT: &str = "engine.config.Environment";
    pub const ENVIRONMENT_BUILDER: &str = "engine.config.Environment.Builder";
    pub const RESOURCE_LOADER: &str = "engine.config.ResourceLoader";
    pub const YAML_RESOURCE_LOADER: &str = "engine.config.YamlResourceLoader";
    pub const RECIPE: &str = "engine.Recipe";
    pub const RECIPE_DESCRIPTOR: &str = "engine.config.RecipeDescriptor";
    pub const OPTION_DESCRIPTOR: &str = "engine.config.OptionDescriptor";
    pub const VALIDATED: &str = "engine.Validated";
    pub const VALIDATED_INVALID: &str = "engine.Validated.Invalid";
    pub const VALIDATED_BOTH: &str = "engine.Validated.Both";
    pub const NAMED_STYLES: &str = "engine.style.NamedStyles";
    pub const PARSER: &str = "engine.Parser";
    pub const PARSER_BUILDER: &str = "engine.Parser.Builder";
    pub const TYPE_CACHE: &str = "engine.java.JavaTypeCache";
    pub const SOURCE_FILE: &str = "engine.SourceFile";
    pub const MARKERS: &str = "engine.marker.Markers";
    pub const MARKER: &str = "engine.marker.Marker";
    pub const JAVA_SOURCE_SET: &str = "engine.java.marker.JavaSourceSet";
    pub const EXECUTION_CONTEXT: &str = "engine.ExecutionContext";
    pub const IN_MEMORY_EXECUTION_CONTEXT: &str = "engine.InMemoryExecutionContext";
    pub const RESULT: &str = "engine.Result";
    pub const TREE_SERIALIZER: &str = "engine.TreeSerializer";
    pub const JAVA_PARSER: &str = "engine.java.JavaParser";
    pub const YAML_PARSER: &str = "engine.yaml.YamlParser";
    pub const PROPERTIES_PARSER: &str = "engine.properties.PropertiesParser";
    pub const XML_PARSER: &str = "engine.xml.XmlParser";
    pub const GROOVY_PARSER: &str = "engine.groovy.GroovyParser";
    pub const CHECKSTYLE_CONFIG_LOADER: &str = "engine.java.style.CheckstyleConfigLoader";
    pub const BUILD_TOOL: &str = "engine.marker.BuildTool";
    pub const JAVA_VERSION: &str = "engine.java.marker.JavaVersion";
    pub const JAVA_PROJECT: &str = "engine.java.marker.JavaProject";
    pub const JAVA_PROJECT_PUBLICATION: &str = "engine.java.marker.JavaProject.Publication";
    /// Implemented by host callbacks handed to the engine.
    pub const ERROR_CONSUMER: &str = "std.function.Consumer";
}

use types::*;

pub const ENVIRONMENT_BUILDER_NEW: Call = Call::static_method(ENVIRONMENT, "builder", &["map<str>"]);
pub const SCAN_RUNTIME: Call = Call::method(ENVIRONMENT_BUILDER, "scanRuntime", &["list<str>"]);
pub const SCAN_ARCHIVE: Call = Call::method(ENVIRONMENT_BUILDER, "scanArchive", &["path"]);
pub const SCAN_USER_HOME: Call = Call::method(ENVIRONMENT_BUILDER, "scanUserHome", &[]);
pub const LOAD: Call = Call::method(
    ENVIRONMENT_BUILDER,
    "load",
    &["engine.config.ResourceLoader"],
);
pub const BUILD_ENVIRONMENT: Call = Call::method(ENVIRONMENT_BUILDER, "build", &[]);

pub const ACTIVATE_RECIPES: Call = Call::method(ENVIRONMENT, "activateRecipes", &["list<str>"]);
pub const ACTIVATE_STYLES: Call = Call::method(ENVIRONMENT, "activateStyles", &["list<str>"]);
pub const LIST_RECIPE_DESCRIPTORS: Call = Call::method(ENVIRONMENT, "listRecipeDescriptors", &[]);
pub const LIST_STYLES: Call = Call::method(ENVIRONMENT, "listStyles", &[]);

pub const YAML_RESOURCE_LOADER_NEW: Call =
    Call::constructor(YAML_RESOURCE_LOADER, &["bytes", "str", "map<str>"]);

pub const RECIPE_GET_NAME: Call = Call::method(RECIPE, "getName", &[]);
pub const RECIPE_RUN: Call = Call::method(RECIPE, "run", &["list<engine.SourceFile>"]);
pub const RECIPE_RUN_WITH_CONTEXT: Call = Call::method(
    RECIPE,
    "run",
    &["list<engine.SourceFile>", "engine.ExecutionContext"],
);
pub const RECIPE_VALIDATE_ALL: Call = Call::method(RECIPE, "validateAll", &[]);

pub const DESCRIPTOR_GET_NAME: Call = Call::method(RECIPE_DESCRIPTOR, "getName", &[]);
pub const DESCRIPTOR_GET_DISPLAY_NAME: Call = Call::method(RECIPE_DESCRIPTOR, "getDisplayName", &[]);
pub const DESCRIPTOR_GET_DESCRIPTION: Call = Call::method(RECIPE_DESCRIPTOR, "getDescription", &[]);
pub const DESCRIPTOR_GET_OPTIONS: Call = Call::method(RECIPE_DESCRIPTOR, "getOptions", &[]);

pub const OPTION_GET_NAME: Call = Call::method(OPTION_DESCRIPTOR, "getName", &[]);
pub const OPTION_GET_DISPLAY_NAME: Call = Call::method(OPTION_DESCRIPTOR, "getDisplayName", &[]);
pub const OPTION_GET_DESCRIPTION: Call = Call::method(OPTION_DESCRIPTOR, "getDescription", &[]);
pub const OPTION_GET_TYPE: Call = Call::method(OPTION_DESCRIPTOR, "getType", &[]);
pub const OPTION_GET_EXAMPLE: Call = Call::method(OPTION_DESCRIPTOR, "getExample", &[]);
pub const OPTION_IS_REQUIRED: Call = Call::method(OPTION_DESCRIPTOR, "isRequired", &[]);

pub const VALIDATED_FAILURES: Call = Call::method(VALIDATED, "failures", &[]);
pub const INVALID_GET_PROPERTY: Call = Call::method(VALIDATED_INVALID, "getProperty", &[]);
pub const INVALID_GET_MESSAGE: Call = Call::method(VALIDATED_INVALID, "getMessage", &[]);
pub const INVALID_GET_EXCEPTION: Call = Call::method(VALIDATED_INVALID, "getException", &[]);

pub const STYLES_GET_NAME: Call = Call::method(NAMED_STYLES, "getName", &[]);
pub const LOAD_CHECKSTYLE_CONFIG: Call = Call::static_method(
    CHECKSTYLE_CONFIG_LOADER,
    "loadCheckstyleConfig",
    &["path", "map<str>"],
);

pub const JAVA_PARSER_BUILDER: Call = Call::static_method(JAVA_PARSER, "builder", &[]);
pub const YAML_PARSER_BUILDER: Call = Call::static_method(YAML_PARSER, "builder", &[]);
pub const PROPERTIES_PARSER_BUILDER: Call = Call::static_method(PROPERTIES_PARSER, "builder", &[]);
pub const XML_PARSER_BUILDER: Call = Call::static_method(XML_PARSER, "builder", &[]);
pub const GROOVY_PARSER_BUILDER: Call = Call::static_method(GROOVY_PARSER, "builder", &[]);
pub const PARSER_BUILDER_STYLES: Call = Call::method(
    PARSER_BUILDER,
    "styles",
    &["list<engine.style.NamedStyles>"],
);
pub const PARSER_BUILDER_CLASSPATH: Call = Call::method(PARSER_BUILDER, "classpath", &["list<path>"]);
pub const PARSER_BUILDER_TYPE_CACHE: Call = Call::method(
    PARSER_BUILDER,
    "typeCache",
    &["engine.java.JavaTypeCache"],
);
pub const PARSER_BUILDER_LOG_COMPILATION: Call = Call::method(
    PARSER_BUILDER,
    "logCompilationWarningsAndErrors",
    &["bool"],
);
pub const PARSER_BUILDER_RELAXED_MATCHING: Call = Call::method(
    PARSER_BUILDER,
    "relaxedClassTypeMatching",
    &["bool"],
);
pub const PARSER_BUILDER_BUILD: Call = Call::method(PARSER_BUILDER, "build", &[]);
pub const PARSER_PARSE: Call = Call::method(
    PARSER,
    "parse",
    &["list<path>", "path", "engine.ExecutionContext"],
);

pub const TYPE_CACHE_NEW: Call = Call::constructor(TYPE_CACHE, &[]);
pub const TYPE_CACHE_SIZE: Call = Call::method(TYPE_CACHE, "size", &[]);

pub const SOURCE_GET_SOURCE_PATH: Call = Call::method(SOURCE_FILE, "getSourcePath", &[]);
pub const SOURCE_PRINT_ALL: Call = Call::method(SOURCE_FILE, "printAll", &[]);
pub const SOURCE_GET_MARKERS: Call = Call::method(SOURCE_FILE, "getMarkers", &[]);
pub const SOURCE_WITH_MARKERS: Call = Call::method(
    SOURCE_FILE,
    "withMarkers",
    &["engine.marker.Markers"],
);

pub const MARKERS_ADD_IF_ABSENT: Call = Call::method(
    MARKERS,
    "addIfAbsent",
    &["engine.marker.Marker"],
);
pub const MARKERS_ENTRIES: Call = Call::method(MARKERS, "entries", &[]);
pub const BUILD_TOOL_NEW: Call = Call::constructor(BUILD_TOOL, &["str", "opt<str>"]);
pub const JAVA_VERSION_NEW: Call = Call::constructor(
    JAVA_VERSION,
    &["opt<str>", "opt<str>", "opt<str>", "opt<str>"],
);
pub const JAVA_PROJECT_PUBLICATION_NEW: Call = Call::constructor(
    JAVA_PROJECT_PUBLICATION,
    &["opt<str>", "opt<str>", "opt<str>"],
);
pub const JAVA_PROJECT_NEW: Call = Call::constructor(
    JAVA_PROJECT,
    &["opt<str>", "engine.java.marker.JavaProject.Publication"],
);
pub const JAVA_SOURCE_SET_BUILD: Call = Call::static_method(
    JAVA_SOURCE_SET,
    "build",
    &["str", "list<path>", "engine.ExecutionContext"],
);

pub const EXECUTION_CONTEXT_NEW: Call = Call::constructor(IN_MEMORY_EXECUTION_CONTEXT, &[]);
pub const EXECUTION_CONTEXT_WITH_ON_ERROR: Call =
    Call::constructor(IN_MEMORY_EXECUTION_CONTEXT, &["std.function.Consumer"]);
pub const ERROR_CONSUMER_ACCEPT: Call = Call::method(ERROR_CONSUMER, "accept", &["str"]);
pub const EXECUTION_CONTEXT_ERRORS: Call = Call::method(EXECUTION_CONTEXT, "getErrors", &[]);

pub const RESULT_GET_BEFORE: Call = Call::method(RESULT, "getBefore", &[]);
pub const RESULT_GET_AFTER: Call = Call::method(RESULT, "getAfter", &[]);
pub const RESULT_RECIPES_THAT_MADE_CHANGES: Call =
    Call::method(RESULT, "getRecipesThatMadeChanges", &[]);
pub const RESULT_DIFF: Call = Call::method(RESULT, "diff", &[]);
pub const RESULT_GET_RECIPE_ERRORS: Call = Call::method(RESULT, "getRecipeErrors", &[]);

pub const TREE_SERIALIZER_NEW: Call = Call::constructor(TREE_SERIALIZER, &[]);
pub const TREE_SERIALIZER_WRITE: Call = Call::method(
    TREE_SERIALIZER,
    "write",
    &["list<engine.SourceFile>"],
);
pub const TREE_SERIALIZER_READ_LIST: Call = Call::method(TREE_SERIALIZER, "readList", &["bytes"]);

/// Every call above.
pub const ALL: &[Call] = &[
    ENVIRONMENT_BUILDER_NEW,
    SCAN_RUNTIME,
    SCAN_ARCHIVE,
    SCAN_USER_HOME,
    LOAD,
    BUILD_ENVIRONMENT,
    ACTIVATE_RECIPES,
    ACTIVATE_STYLES,
    LIST_RECIPE_DESCRIPTORS,
    LIST_STYLES,
    YAML_RESOURCE_LOADER_NEW,
    RECIPE_GET_NAME,
    RECIPE_RUN,
    RECIPE_RUN_WITH_CONTEXT,
    RECIPE_VALIDATE_ALL,
    DESCRIPTOR_GET_NAME,
    DESCRIPTOR_GET_DISPLAY_NAME,
    DESCRIPTOR_GET_DESCRIPTION,
    DESCRIPTOR_GET_OPTIONS,
    OPTION_GET_NAME,
    OPTION_GET_DISPLAY_NAME,
    OPTION_GET_DESCRIPTION,
    OPTION_GET_TYPE,
    OPTION_GET_EXAMPLE,
    OPTION_IS_REQUIRED,
    VALIDATED_FAILURES,
    INVALID_GET_PROPERTY,
    INVALID_GET_MESSAGE,
    INVALID_GET_EXCEPTION,
    STYLES_GET_NAME,
    LOAD_CHECKSTYLE_CONFIG,
    JAVA_PARSER_BUILDER,
    YAML_PARSER_BUILDER,
    PROPERTIES_PARSER_BUILDER,
    XML_PARSER_BUILDER,
    GROOVY_PARSER_BUILDER,
    PARSER_BUILDER_STYLES,
    PARSER_BUILDER_CLASSPATH,
    PARSER_BUILDER_TYPE_CACHE,
    PARSER_BUILDER_LOG_COMPILATION,
    PARSER_BUILDER_RELAXED_MATCHING,
    PARSER_BUILDER_BUILD,
    PARSER_PARSE,
    TYPE_CACHE_NEW,
    TYPE_CACHE_SIZE,
    SOURCE_GET_SOURCE_PATH,
    SOURCE_PRINT_ALL,
    SOURCE_GET_MARKERS,
    SOURCE_WITH_MARKERS,
    MARKERS_ADD_IF_ABSENT,
    MARKERS_ENTRIES,
    BUILD_TOOL_NEW,
    JAVA_VERSION_NEW,
    JAVA_PROJECT_PUBLICATION_NEW,
    JAVA_PROJECT_NEW,
    JAVA_SOURCE_SET_BUILD,
    EXECUTION_CONTEXT_NEW,
    EXECUTION_CONTEXT_WITH_ON_ERROR,
    ERROR_CONSUMER_ACCEPT,
    EXECUTION_CONTEXT_ERRORS,
    RESULT_GET_BEFORE,
    RESULT_GET_AFTER,
    RESULT_RECIPES_THAT_MADE_CHANGES,
    RESULT_DIFF,
    RESULT_GET_RECIPE_ERRORS,
    TREE_SERIALIZER_NEW,
    TREE_SERIALIZER_WRITE,
    TREE_SERIALIZER_READ_LIST,
];
