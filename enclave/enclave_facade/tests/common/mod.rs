//! An in-memory engine used by the facade tests.
//!
//! Text recipes over plain source files, enough of the environment, parser,
//! marker and serializer contracts to drive every wrapper.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use enclave_core::{CallContext, EnclaveConfig, Fault, Handle, MemberTable, Shape, Value};
use enclave_domain::{Archive, BundleArchive};
use enclave_facade::EngineFacade;

pub const UPPER_CASE: &str = "engine.text.UpperCase";
pub const MOVE_TO_SRC: &str = "engine.text.MoveToSrc";
pub const DELETE_EMPTY: &str = "engine.text.DeleteEmpty";
pub const GENERATE_README: &str = "engine.text.GenerateReadme";
pub const FIND_AND_REPLACE: &str = "engine.text.FindAndReplace";

const RUNTIME_RECIPES: &[&str] = &[
    UPPER_CASE,
    MOVE_TO_SRC,
    DELETE_EMPTY,
    GENERATE_README,
    FIND_AND_REPLACE,
];
const STYLES: &[&str] = &["engine.style.IntelliJ", "engine.style.Spring"];

pub struct Fixture {
    pub archive: Arc<dyn Archive>,
    pub clears: Arc<AtomicUsize>,
}

impl Fixture {
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn facade(&self) -> EngineFacade {
        self.facade_with(EnclaveConfig::default())
    }

    pub fn facade_with(&self, config: EnclaveConfig) -> EngineFacade {
        EngineFacade::builder(config)
            .archive(Arc::clone(&self.archive))
            .build()
    }
}

struct BuilderState {
    recipes: Mutex<Vec<String>>,
    archives: Mutex<Vec<PathBuf>>,
}

struct EnvState {
    recipes: Vec<String>,
}

struct LoaderState {
    recipes: Vec<String>,
}

struct RecipeState {
    names: Vec<String>,
}

struct ResultState {
    before: Option<Handle>,
    after: Option<Handle>,
    recipes: Vec<Handle>,
    diff: String,
    errors: Vec<String>,
}

struct SourceState {
    path: PathBuf,
    text: String,
    markers: Handle,
}

struct MarkersState(Vec<Handle>);

struct SourceSetState {
    name: String,
    classpath: Vec<PathBuf>,
}

struct CtxState {
    errors: Mutex<Vec<String>>,
    on_error: Option<Handle>,
}

struct BuildToolState {
    tool: String,
    version: Option<String>,
}

struct JavaVersionState {
    runtime: Option<String>,
    source: Option<String>,
}

struct PublicationState {
    group: Option<String>,
    artifact: Option<String>,
}

struct JavaProjectState {
    name: Option<String>,
    publication: Handle,
}

#[derive(Default)]
struct ParserSettings {
    classpath: Vec<PathBuf>,
    styles: usize,
    cache: Option<Handle>,
    log_compilation: bool,
    relaxed: bool,
}

struct ParserState {
    cache: Option<Handle>,
}

struct CacheState(Mutex<i64>);

struct DescriptorState {
    name: String,
    options: Vec<Handle>,
}

struct OptionState {
    name: String,
    required: bool,
    example: Option<String>,
}

struct InvalidState {
    property: String,
    message: String,
}

struct StylesState(String);

#[derive(Serialize, Deserialize)]
struct StoredSource {
    path: PathBuf,
    text: String,
}

fn fault(message: impl Into<String>) -> Fault {
    Fault::from(message.into())
}

fn strings(value: &Value) -> Result<Vec<String>, Fault> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| fault("expected str"))
            })
            .collect(),
        other => Err(fault(format!("expected list, got {}", other.describe()))),
    }
}

fn handles(value: &Value) -> Result<Vec<Handle>, Fault> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| item.as_handle().cloned().ok_or_else(|| fault("expected object")))
            .collect(),
        other => Err(fault(format!("expected list, got {}", other.describe()))),
    }
}

fn paths(value: &Value) -> Result<Vec<PathBuf>, Fault> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| item.clone().into_path().ok_or_else(|| fault("expected path")))
            .collect(),
        other => Err(fault(format!("expected list, got {}", other.describe()))),
    }
}

fn handle(value: &Value) -> Result<&Handle, Fault> {
    value.as_handle().ok_or_else(|| fault("expected object"))
}

fn objects(items: Vec<Handle>) -> Value {
    Value::List(items.into_iter().map(Value::Object).collect())
}

fn this(ctx: &CallContext<'_>) -> Result<Value, Fault> {
    Ok(Value::Object(ctx.this()?.clone()))
}

fn empty_markers(ctx: &CallContext<'_>) -> Result<Handle, Fault> {
    ctx.instantiate("engine.marker.Markers", MarkersState(Vec::new()))
}

fn record_error(ctx: &CallContext<'_>, exec: Option<&Handle>, message: String) -> Result<(), Fault> {
    let Some(state) = exec.and_then(|h| h.state::<CtxState>()) else {
        return Ok(());
    };
    if let Some(listener) = &state.on_error {
        ctx.invoke(listener, "accept", &[Shape::Str], vec![Value::from(message.as_str())])?;
    }
    state.errors.lock().push(message);
    Ok(())
}

fn opt_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn source_state(source: &Handle) -> Result<&SourceState, Fault> {
    source
        .state::<SourceState>()
        .ok_or_else(|| fault(format!("{} is not a source file", source.type_name())))
}

fn run_recipes(
    ctx: &CallContext<'_>,
    sources: Vec<Handle>,
    exec: Option<&Handle>,
) -> Result<Value, Fault> {
    let names = &ctx.state::<RecipeState>()?.names;
    if names.iter().any(|n| n == FIND_AND_REPLACE) {
        record_error(ctx, exec, format!("{}: option 'find' is required", FIND_AND_REPLACE))?;
    }

    let mut results = Vec::new();
    for source in sources {
        let state = source_state(&source)?;
        let mut path = state.path.clone();
        let mut text = state.text.clone();
        let mut deleted = false;
        let mut changed_by = Vec::new();

        for name in names {
            let changed = match name.as_str() {
                UPPER_CASE => {
                    let upper = text.to_uppercase();
                    let changed = upper != text;
                    text = upper;
                    changed
                }
                MOVE_TO_SRC if !path.starts_with("src") => {
                    path = Path::new("src").join(&path);
                    true
                }
                DELETE_EMPTY if text.trim().is_empty() => {
                    deleted = true;
                    true
                }
                _ => false,
            };
            if changed {
                changed_by.push(ctx.instantiate_owner(RecipeState {
                    names: vec![name.clone()],
                }));
            }
        }
        if changed_by.is_empty() {
            continue;
        }

        let after = if deleted {
            None
        } else {
            Some(Handle::new(
                Arc::clone(source.unit()),
                SourceState {
                    path: path.clone(),
                    text,
                    markers: state.markers.clone(),
                },
            ))
        };
        let diff = format!("--- {}\n+++ {}\n", state.path.display(), path.display());
        results.push(ctx.instantiate(
            "engine.Result",
            ResultState {
                before: Some(source.clone()),
                after,
                recipes: changed_by,
                diff,
                errors: Vec::new(),
            },
        )?);
    }

    if names.iter().any(|n| n == GENERATE_README) {
        let readme = ctx.instantiate(
            "engine.text.PlainText",
            SourceState {
                path: PathBuf::from("README.md"),
                text: "generated\n".to_string(),
                markers: empty_markers(ctx)?,
            },
        )?;
        results.push(ctx.instantiate(
            "engine.Result",
            ResultState {
                before: None,
                after: Some(readme),
                recipes: vec![ctx.instantiate_owner(RecipeState {
                    names: vec![GENERATE_README.to_string()],
                })],
                diff: "+++ README.md\n".to_string(),
                errors: Vec::new(),
            },
        )?);
    }
    Ok(objects(results))
}

pub fn fixture() -> Fixture {
    let clears = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&clears);

    let archive = BundleArchive::builder("mem:fixture-engine")
        .unit(
            "engine.config.Environment",
            MemberTable::builder()
                .static_method(
                    "builder",
                    &["map<str>"],
                    "engine.config.Environment.Builder",
                    |ctx, _| {
                        let builder = ctx.instantiate(
                            "engine.config.Environment.Builder",
                            BuilderState {
                                recipes: Mutex::new(Vec::new()),
                                archives: Mutex::new(Vec::new()),
                            },
                        )?;
                        Ok(Value::Object(builder))
                    },
                )
                .method(
                    "activateRecipes",
                    &["list<str>"],
                    "engine.Recipe",
                    |ctx, args| {
                        let known = &ctx.state::<EnvState>()?.recipes;
                        let names = strings(&args[0])?;
                        let missing: Vec<_> = names.iter().filter(|n| !known.contains(n)).collect();
                        if !missing.is_empty() {
                            return Err(fault(format!("Recipes not found: {:?}", missing)));
                        }
                        let recipe = ctx.instantiate("engine.text.TextRecipe", RecipeState { names })?;
                        Ok(Value::Object(recipe))
                    },
                )
                .method(
                    "activateStyles",
                    &["list<str>"],
                    "list<engine.style.NamedStyles>",
                    |ctx, args| {
                        let mut styles = Vec::new();
                        for name in strings(&args[0])? {
                            if STYLES.contains(&name.as_str()) {
                                styles.push(ctx.instantiate("engine.style.Autodetect", StylesState(name))?);
                            }
                        }
                        Ok(objects(styles))
                    },
                )
                .method("listStyles", &[], "list<engine.style.NamedStyles>", |ctx, _| {
                    let styles = STYLES
                        .iter()
                        .map(|name| ctx.instantiate("engine.style.Autodetect", StylesState(name.to_string())))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(objects(styles))
                })
                .method(
                    "listRecipeDescriptors",
                    &[],
                    "list<engine.config.RecipeDescriptor>",
                    |ctx, _| {
                        let mut descriptors = Vec::new();
                        for name in &ctx.state::<EnvState>()?.recipes {
                            let mut options = Vec::new();
                            if name == FIND_AND_REPLACE {
                                options.push(ctx.instantiate(
                                    "engine.config.OptionDescriptor",
                                    OptionState {
                                        name: "find".to_string(),
                                        required: true,
                                        example: None,
                                    },
                                )?);
                                options.push(ctx.instantiate(
                                    "engine.config.OptionDescriptor",
                                    OptionState {
                                        name: "replace".to_string(),
                                        required: false,
                                        example: Some("bar".to_string()),
                                    },
                                )?);
                            }
                            descriptors.push(ctx.instantiate(
                                "engine.config.RecipeDescriptor",
                                DescriptorState {
                                    name: name.clone(),
                                    options,
                                },
                            )?);
                        }
                        Ok(objects(descriptors))
                    },
                ),
        )
        .unit(
            "engine.config.Environment.Builder",
            MemberTable::builder()
                .method(
                    "scanRuntime",
                    &["list<str>"],
                    "engine.config.Environment.Builder",
                    |ctx, args| {
                        let packages = strings(&args[0])?;
                        let mut recipes = ctx.state::<BuilderState>()?.recipes.lock();
                        for recipe in RUNTIME_RECIPES {
                            let accepted = packages.is_empty()
                                || packages.iter().any(|p| recipe.starts_with(p.as_str()));
                            if accepted && !recipes.iter().any(|r| r == recipe) {
                                recipes.push(recipe.to_string());
                            }
                        }
                        this(ctx)
                    },
                )
                .method(
                    "scanArchive",
                    &["path"],
                    "engine.config.Environment.Builder",
                    |ctx, args| {
                        let path = args[0].clone().into_path().ok_or_else(|| fault("expected path"))?;
                        ctx.state::<BuilderState>()?.archives.lock().push(path);
                        this(ctx)
                    },
                )
                .method("scanUserHome", &[], "engine.config.Environment.Builder", |ctx, _| {
                    this(ctx)
                })
                .method(
                    "load",
                    &["engine.config.ResourceLoader"],
                    "engine.config.Environment.Builder",
                    |ctx, args| {
                        let loader = handle(&args[0])?
                            .state::<LoaderState>()
                            .ok_or_else(|| fault("unknown resource loader"))?;
                        ctx.state::<BuilderState>()?
                            .recipes
                            .lock()
                            .extend(loader.recipes.iter().cloned());
                        this(ctx)
                    },
                )
                .method("build", &[], "engine.config.Environment", |ctx, _| {
                    let recipes = ctx.state::<BuilderState>()?.recipes.lock().clone();
                    Ok(Value::Object(ctx.instantiate("engine.config.Environment", EnvState { recipes })?))
                }),
        )
        .unit(
            "engine.config.YamlResourceLoader",
            MemberTable::builder()
                .implements("engine.config.ResourceLoader")
                .constructor(&["bytes", "str", "map<str>"], |ctx, args| {
                    let bytes = match &args[0] {
                        Value::Bytes(bytes) => bytes.clone(),
                        _ => return Err(fault("expected bytes")),
                    };
                    let text = String::from_utf8(bytes)?;
                    let recipes = text
                        .lines()
                        .filter_map(|line| line.trim().strip_prefix("name:"))
                        .map(|name| name.trim().to_string())
                        .collect();
                    Ok(Value::Object(ctx.instantiate_owner(LoaderState { recipes })))
                }),
        )
        .unit(
            "engine.text.TextRecipe",
            MemberTable::builder()
                .implements("engine.Recipe")
                .method("getName", &[], "str", |ctx, _| {
                    let names = &ctx.state::<RecipeState>()?.names;
                    Ok(match names.as_slice() {
                        [single] => Value::from(single.as_str()),
                        _ => Value::from("engine.CompositeRecipe"),
                    })
                })
                .method("run", &["list<engine.SourceFile>"], "list<engine.Result>", |ctx, args| {
                    run_recipes(ctx, handles(&args[0])?, None)
                })
                .method(
                    "run",
                    &["list<engine.SourceFile>", "engine.ExecutionContext"],
                    "list<engine.Result>",
                    |ctx, args| run_recipes(ctx, handles(&args[0])?, Some(handle(&args[1])?)),
                )
                .method("validateAll", &[], "list<engine.Validated>", |ctx, _| {
                    let mut validated = Vec::new();
                    for name in &ctx.state::<RecipeState>()?.names {
                        let item = if name == FIND_AND_REPLACE {
                            ctx.instantiate(
                                "engine.Validated.Invalid",
                                InvalidState {
                                    property: "find".to_string(),
                                    message: "is required".to_string(),
                                },
                            )?
                        } else {
                            ctx.instantiate("engine.Validated.Valid", ())?
                        };
                        validated.push(item);
                    }
                    Ok(objects(validated))
                }),
        )
        .unit(
            "engine.Validated.Valid",
            MemberTable::builder()
                .implements("engine.Validated")
                .method("failures", &[], "list<engine.Validated.Invalid>", |_, _| {
                    Ok(Value::List(Vec::new()))
                }),
        )
        .unit(
            "engine.Validated.Invalid",
            MemberTable::builder()
                .implements("engine.Validated")
                .method("failures", &[], "list<engine.Validated.Invalid>", |ctx, _| {
                    Ok(objects(vec![ctx.this()?.clone()]))
                })
                .method("getProperty", &[], "str", |ctx, _| {
                    Ok(Value::from(ctx.state::<InvalidState>()?.property.as_str()))
                })
                .method("getMessage", &[], "str", |ctx, _| {
                    Ok(Value::from(ctx.state::<InvalidState>()?.message.as_str()))
                })
                .method("getException", &[], "opt<str>", |_, _| Ok(Value::Null)),
        )
        .unit(
            "engine.config.RecipeDescriptor",
            MemberTable::builder()
                .method("getName", &[], "str", |ctx, _| {
                    Ok(Value::from(ctx.state::<DescriptorState>()?.name.as_str()))
                })
                .method("getDisplayName", &[], "str", |ctx, _| {
                    let name = &ctx.state::<DescriptorState>()?.name;
                    Ok(Value::from(name.rsplit('.').next().unwrap_or(name)))
                })
                .method("getDescription", &[], "str", |ctx, _| {
                    Ok(Value::from(format!("Runs {}.", ctx.state::<DescriptorState>()?.name)))
                })
                .method("getOptions", &[], "list<engine.config.OptionDescriptor>", |ctx, _| {
                    Ok(objects(ctx.state::<DescriptorState>()?.options.clone()))
                }),
        )
        .unit(
            "engine.config.OptionDescriptor",
            MemberTable::builder()
                .method("getName", &[], "str", |ctx, _| {
                    Ok(Value::from(ctx.state::<OptionState>()?.name.as_str()))
                })
                .method("getDisplayName", &[], "str", |ctx, _| {
                    Ok(Value::from(ctx.state::<OptionState>()?.name.to_uppercase()))
                })
                .method("getDescription", &[], "str", |_, _| Ok(Value::from("")))
                .method("getType", &[], "str", |_, _| Ok(Value::from("String")))
                .method("getExample", &[], "opt<str>", |ctx, _| {
                    Ok(Value::from(ctx.state::<OptionState>()?.example.clone()))
                })
                .method("isRequired", &[], "bool", |ctx, _| {
                    Ok(Value::Bool(ctx.state::<OptionState>()?.required))
                }),
        )
        .unit(
            "engine.style.Autodetect",
            MemberTable::builder()
                .implements("engine.style.NamedStyles")
                .method("getName", &[], "str", |ctx, _| {
                    Ok(Value::from(ctx.state::<StylesState>()?.0.as_str()))
                }),
        )
        .unit(
            "engine.java.JavaParser",
            MemberTable::builder()
                .implements("engine.Parser")
                .static_method("builder", &[], "engine.Parser.Builder", |ctx, _| {
                    let builder = ctx.instantiate(
                        "engine.java.JavaParser.Builder",
                        Mutex::new(ParserSettings::default()),
                    )?;
                    Ok(Value::Object(builder))
                })
                .method(
                    "parse",
                    &["list<path>", "path", "engine.ExecutionContext"],
                    "list<engine.SourceFile>",
                    |ctx, args| {
                        let base = args[1].clone().into_path().ok_or_else(|| fault("expected path"))?;
                        let exec = handle(&args[2])?;
                        let cache = ctx.state::<ParserState>()?.cache.clone();
                        let mut sources = Vec::new();
                        for path in paths(&args[0])? {
                            let full = if path.is_absolute() { path.clone() } else { base.join(&path) };
                            let text = match std::fs::read_to_string(&full) {
                                Ok(text) => text,
                                Err(e) => {
                                    record_error(
                                        ctx,
                                        Some(exec),
                                        format!("Unable to parse {}: {}", path.display(), e),
                                    )?;
                                    continue;
                                }
                            };
                            if let Some(cache) = cache.as_ref().and_then(|c| c.state::<CacheState>()) {
                                *cache.0.lock() += 1;
                            }
                            let relative = full.strip_prefix(&base).unwrap_or(&full).to_path_buf();
                            sources.push(ctx.instantiate(
                                "engine.java.JavaSourceFile",
                                SourceState {
                                    path: relative,
                                    text,
                                    markers: empty_markers(ctx)?,
                                },
                            )?);
                        }
                        Ok(objects(sources))
                    },
                ),
        )
        .unit(
            "engine.java.JavaParser.Builder",
            MemberTable::builder()
                .implements("engine.Parser.Builder")
                .method("classpath", &["list<path>"], "engine.Parser.Builder", |ctx, args| {
                    ctx.state::<Mutex<ParserSettings>>()?.lock().classpath = paths(&args[0])?;
                    this(ctx)
                })
                .method(
                    "styles",
                    &["list<engine.style.NamedStyles>"],
                    "engine.Parser.Builder",
                    |ctx, args| {
                        ctx.state::<Mutex<ParserSettings>>()?.lock().styles = handles(&args[0])?.len();
                        this(ctx)
                    },
                )
                .method(
                    "typeCache",
                    &["engine.java.JavaTypeCache"],
                    "engine.Parser.Builder",
                    |ctx, args| {
                        ctx.state::<Mutex<ParserSettings>>()?.lock().cache = Some(handle(&args[0])?.clone());
                        this(ctx)
                    },
                )
                .method(
                    "logCompilationWarningsAndErrors",
                    &["bool"],
                    "engine.Parser.Builder",
                    |ctx, args| {
                        ctx.state::<Mutex<ParserSettings>>()?.lock().log_compilation =
                            args[0].as_bool().unwrap_or(false);
                        this(ctx)
                    },
                )
                .method(
                    "relaxedClassTypeMatching",
                    &["bool"],
                    "engine.Parser.Builder",
                    |ctx, args| {
                        ctx.state::<Mutex<ParserSettings>>()?.lock().relaxed = args[0].as_bool().unwrap_or(false);
                        this(ctx)
                    },
                )
                .method("build", &[], "engine.Parser", |ctx, _| {
                    let cache = ctx.state::<Mutex<ParserSettings>>()?.lock().cache.clone();
                    Ok(Value::Object(ctx.instantiate("engine.java.JavaParser", ParserState { cache })?))
                }),
        )
        .unit(
            "engine.java.JavaTypeCache",
            MemberTable::builder()
                .constructor(&[], |ctx, _| {
                    Ok(Value::Object(ctx.instantiate_owner(CacheState(Mutex::new(0)))))
                })
                .method("size", &[], "int", |ctx, _| {
                    Ok(Value::Int(*ctx.state::<CacheState>()?.0.lock()))
                }),
        )
        .unit("engine.java.JavaSourceFile", source_file_table().implements("engine.SourceFile"))
        .unit("engine.text.PlainText", source_file_table().implements("engine.SourceFile"))
        .unit(
            "engine.marker.Markers",
            MemberTable::builder()
                .method("addIfAbsent", &["engine.marker.Marker"], "engine.marker.Markers", |ctx, args| {
                    let marker = handle(&args[0])?;
                    let current = &ctx.state::<MarkersState>()?.0;
                    if current.iter().any(|m| m.type_name() == marker.type_name()) {
                        return this(ctx);
                    }
                    let mut next = current.clone();
                    next.push(marker.clone());
                    Ok(Value::Object(ctx.instantiate_owner(MarkersState(next))))
                })
                .method("entries", &[], "list<engine.marker.Marker>", |ctx, _| {
                    Ok(objects(ctx.state::<MarkersState>()?.0.clone()))
                }),
        )
        .unit(
            "engine.java.marker.JavaSourceSet",
            MemberTable::builder()
                .implements("engine.marker.Marker")
                .static_method(
                    "build",
                    &["str", "list<path>", "engine.ExecutionContext"],
                    "engine.java.marker.JavaSourceSet",
                    |ctx, args| {
                        let name = args[0].as_str().unwrap_or_default().to_string();
                        let classpath = paths(&args[1])?;
                        Ok(Value::Object(ctx.instantiate_owner(SourceSetState { name, classpath })))
                    },
                ),
        )
        .unit(
            "engine.marker.SearchResult",
            MemberTable::builder()
                .implements("engine.marker.Marker")
                .constructor(&[], |ctx, _| Ok(Value::Object(ctx.instantiate_owner(())))),
        )
        .unit(
            "engine.InMemoryExecutionContext",
            MemberTable::builder()
                .implements("engine.ExecutionContext")
                .constructor(&[], |ctx, _| {
                    Ok(Value::Object(ctx.instantiate_owner(CtxState {
                        errors: Mutex::new(Vec::new()),
                        on_error: None,
                    })))
                })
                .constructor(&["std.function.Consumer"], |ctx, args| {
                    Ok(Value::Object(ctx.instantiate_owner(CtxState {
                        errors: Mutex::new(Vec::new()),
                        on_error: Some(handle(&args[0])?.clone()),
                    })))
                })
                .method("getErrors", &[], "list<str>", |ctx, _| {
                    let errors = ctx.state::<CtxState>()?.errors.lock().clone();
                    Ok(errors.into_iter().map(Value::from).collect())
                }),
        )
        .unit(
            "engine.java.style.CheckstyleConfigLoader",
            MemberTable::builder().static_method(
                "loadCheckstyleConfig",
                &["path", "map<str>"],
                "engine.style.NamedStyles",
                |ctx, args| {
                    let path = args[0].clone().into_path().ok_or_else(|| fault("expected path"))?;
                    let text = std::fs::read_to_string(&path)?;
                    if !text.contains("<module name=\"Checker\"") {
                        return Err(fault(format!("{} is not a checkstyle configuration", path.display())));
                    }
                    let prefix = match &args[1] {
                        Value::Map(props) => props.get("checkstyle.prefix").and_then(Value::as_str).unwrap_or("Checkstyle"),
                        _ => "Checkstyle",
                    };
                    let name = format!("{}.{}", prefix, path.file_stem().and_then(|s| s.to_str()).unwrap_or("config"));
                    Ok(Value::Object(ctx.instantiate("engine.style.Autodetect", StylesState(name))?))
                },
            ),
        )
        .unit(
            "engine.marker.BuildTool",
            MemberTable::builder()
                .implements("engine.marker.Marker")
                .constructor(&["str", "opt<str>"], |ctx, args| {
                    Ok(Value::Object(ctx.instantiate_owner(BuildToolState {
                        tool: args[0].as_str().unwrap_or_default().to_string(),
                        version: opt_string(&args[1]),
                    })))
                })
                .method("describe", &[], "str", |ctx, _| {
                    let state = ctx.state::<BuildToolState>()?;
                    Ok(Value::from(format!("{} {}", state.tool, state.version.as_deref().unwrap_or("?"))))
                }),
        )
        .unit(
            "engine.java.marker.JavaVersion",
            MemberTable::builder()
                .implements("engine.marker.Marker")
                .constructor(&["opt<str>", "opt<str>", "opt<str>", "opt<str>"], |ctx, args| {
                    Ok(Value::Object(ctx.instantiate_owner(JavaVersionState {
                        runtime: opt_string(&args[0]),
                        source: opt_string(&args[2]),
                    })))
                })
                .method("describe", &[], "str", |ctx, _| {
                    let state = ctx.state::<JavaVersionState>()?;
                    Ok(Value::from(format!(
                        "runtime {} source {}",
                        state.runtime.as_deref().unwrap_or("?"),
                        state.source.as_deref().unwrap_or("?")
                    )))
                }),
        )
        .unit(
            "engine.java.marker.JavaProject.Publication",
            MemberTable::builder().constructor(&["opt<str>", "opt<str>", "opt<str>"], |ctx, args| {
                Ok(Value::Object(ctx.instantiate_owner(PublicationState {
                    group: opt_string(&args[0]),
                    artifact: opt_string(&args[1]),
                })))
            }),
        )
        .unit(
            "engine.java.marker.JavaProject",
            MemberTable::builder()
                .implements("engine.marker.Marker")
                .constructor(
                    &["opt<str>", "engine.java.marker.JavaProject.Publication"],
                    |ctx, args| {
                        Ok(Value::Object(ctx.instantiate_owner(JavaProjectState {
                            name: opt_string(&args[0]),
                            publication: handle(&args[1])?.clone(),
                        })))
                    },
                )
                .method("describe", &[], "str", |ctx, _| {
                    let state = ctx.state::<JavaProjectState>()?;
                    let publication = state
                        .publication
                        .state::<PublicationState>()
                        .ok_or_else(|| fault("publication has no state"))?;
                    Ok(Value::from(format!(
                        "{} {}:{}",
                        state.name.as_deref().unwrap_or("?"),
                        publication.group.as_deref().unwrap_or("?"),
                        publication.artifact.as_deref().unwrap_or("?")
                    )))
                }),
        )
        .unit(
            "engine.Result",
            MemberTable::builder()
                .method("getBefore", &[], "opt<engine.SourceFile>", |ctx, _| {
                    Ok(Value::from(ctx.state::<ResultState>()?.before.clone()))
                })
                .method("getAfter", &[], "opt<engine.SourceFile>", |ctx, _| {
                    Ok(Value::from(ctx.state::<ResultState>()?.after.clone()))
                })
                .method("getRecipesThatMadeChanges", &[], "list<engine.Recipe>", |ctx, _| {
                    Ok(objects(ctx.state::<ResultState>()?.recipes.clone()))
                })
                .method("diff", &[], "str", |ctx, _| {
                    Ok(Value::from(ctx.state::<ResultState>()?.diff.as_str()))
                })
                .method("getRecipeErrors", &[], "list<str>", |ctx, _| {
                    let errors = ctx.state::<ResultState>()?.errors.clone();
                    Ok(errors.into_iter().map(Value::from).collect())
                }),
        )
        .unit(
            "engine.TreeSerializer",
            MemberTable::builder()
                .constructor(&[], |ctx, _| Ok(Value::Object(ctx.instantiate_owner(()))))
                .method("write", &["list<engine.SourceFile>"], "bytes", |_, args| {
                    let stored = handles(&args[0])?
                        .iter()
                        .map(|source| {
                            let state = source_state(source)?;
                            Ok(StoredSource {
                                path: state.path.clone(),
                                text: state.text.clone(),
                            })
                        })
                        .collect::<Result<Vec<_>, Fault>>()?;
                    Ok(Value::Bytes(serde_json::to_vec(&stored)?))
                })
                .method("readList", &["bytes"], "list<engine.SourceFile>", |ctx, args| {
                    let stored: Vec<StoredSource> = match &args[0] {
                        Value::Bytes(bytes) => serde_json::from_slice(bytes)?,
                        _ => return Err(fault("expected bytes")),
                    };
                    let sources = stored
                        .into_iter()
                        .map(|s| {
                            ctx.instantiate(
                                "engine.text.PlainText",
                                SourceState {
                                    path: s.path,
                                    text: s.text,
                                    markers: empty_markers(ctx)?,
                                },
                            )
                        })
                        .collect::<Result<Vec<_>, Fault>>()?;
                    Ok(objects(sources))
                }),
        )
        .unit(
            "engine.internal.Caches",
            MemberTable::builder().static_method("clear", &[], "void", move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }),
        )
        .unit(
            "engine.internal.Scheduler",
            MemberTable::builder().static_method("shutdown", &[], "void", |_, _| {
                Err(fault("scheduler already stopped"))
            }),
        )
        .unit(
            "engine.test.Echo",
            MemberTable::builder().static_method("echo", &["any"], "any", |_, mut args| {
                Ok(args.remove(0))
            }),
        )
        .unit(
            "engine.test.Results",
            MemberTable::builder().static_method("sample", &[], "list<engine.Result>", |ctx, _| {
                let source = |path: &str| {
                    Ok::<_, Fault>(ctx.instantiate(
                        "engine.text.PlainText",
                        SourceState {
                            path: PathBuf::from(path),
                            text: String::new(),
                            markers: empty_markers(ctx)?,
                        },
                    )?)
                };
                let result = |before: Option<Handle>,
                              after: Option<Handle>,
                              diff: &str,
                              errors: &[&str]| {
                    ctx.instantiate(
                        "engine.Result",
                        ResultState {
                            before,
                            after,
                            recipes: Vec::new(),
                            diff: diff.to_string(),
                            errors: errors.iter().map(|e| e.to_string()).collect(),
                        },
                    )
                };
                Ok(objects(vec![
                    result(None, Some(source("new.txt")?), "+++ new.txt\n", &[])?,
                    result(Some(source("gone.txt")?), None, "--- gone.txt\n", &[])?,
                    result(
                        Some(source("a.txt")?),
                        Some(source("src/a.txt")?),
                        "",
                        &["engine.text.MoveToSrc: target exists"],
                    )?,
                    result(Some(source("b.txt")?), Some(source("b.txt")?), "", &[])?,
                    result(
                        Some(source("c.txt")?),
                        Some(source("c.txt")?),
                        "--- c.txt\n+++ c.txt\n",
                        &["engine.text.UpperCase: boom"],
                    )?,
                    result(None, None, "", &[])?,
                ]))
            }),
        )
        .build()
        .expect("fixture engine is well formed");

    Fixture {
        archive: Arc::new(archive),
        clears,
    }
}

fn source_file_table() -> enclave_core::MemberTableBuilder {
    MemberTable::builder()
        .method("getSourcePath", &[], "path", |ctx, _| {
            Ok(Value::Path(ctx.state::<SourceState>()?.path.clone()))
        })
        .method("printAll", &[], "str", |ctx, _| {
            Ok(Value::from(ctx.state::<SourceState>()?.text.as_str()))
        })
        .method("getMarkers", &[], "engine.marker.Markers", |ctx, _| {
            Ok(Value::Object(ctx.state::<SourceState>()?.markers.clone()))
        })
        .method("withMarkers", &["engine.marker.Markers"], "engine.SourceFile", |ctx, args| {
            let state = ctx.state::<SourceState>()?;
            let markers = handle(&args[0])?.clone();
            Ok(Value::Object(ctx.instantiate_owner(SourceState {
                path: state.path.clone(),
                text: state.text.clone(),
                markers,
            })))
        })
}
