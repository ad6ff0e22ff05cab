//! Engine commands
//!
//! Both commands open one engine session and always shut it down, even when
//! the work itself fails.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use tracing::warn;

use enclave_core::EnclaveConfig;
use enclave_facade::{EngineFacade, Environment, ParserKind, ResultsContainer};

/// Arguments for the recipes command
#[derive(Args)]
pub struct RecipesArgs {
    /// Only scan these packages
    #[clap(long = "package")]
    pub packages: Vec<String>,

    /// Print descriptors as JSON
    #[clap(long)]
    pub json: bool,
}

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Recipe to activate; repeat to compose several
    #[clap(long = "recipe", required = true)]
    pub recipes: Vec<String>,

    /// Directory source paths are relative to
    #[clap(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// Parser to use (java, yaml, properties, xml, groovy)
    #[clap(long, default_value = "java")]
    pub parser: String,

    /// Checkstyle configuration whose style the parser should apply
    #[clap(long)]
    pub checkstyle: Option<PathBuf>,

    /// Print the diff of every change
    #[clap(long)]
    pub diff: bool,

    /// Print the summary as JSON
    #[clap(long)]
    pub json: bool,

    /// Files to parse, relative to the base directory
    #[clap(required = true)]
    pub files: Vec<PathBuf>,
}

fn with_session<T>(config: &EnclaveConfig, work: impl FnOnce(&EngineFacade) -> Result<T>) -> Result<T> {
    let facade = EngineFacade::from_config(config.clone());
    let outcome = work(&facade);
    let shutdown = facade.shutdown();
    let value = outcome?;
    shutdown?;
    Ok(value)
}

fn environment(facade: &EngineFacade, packages: &[String]) -> Result<Environment> {
    Ok(facade
        .environment_builder(facade.properties())?
        .scan_runtime(packages)?
        .build()?)
}

/// List recipe descriptors.
pub fn execute_recipes(args: &RecipesArgs, config: &EnclaveConfig) -> Result<()> {
    with_session(config, |facade| {
        let summaries = environment(facade, &args.packages)?
            .list_recipe_descriptors()?
            .iter()
            .map(|d| d.summary())
            .collect::<enclave_core::Result<Vec<_>>>()?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            for summary in &summaries {
                println!("{}  {}", summary.name, summary.display_name);
                for option in &summary.options {
                    let required = if option.required { " (required)" } else { "" };
                    println!("    --{}: {}{}", option.name, option.option_type, required);
                }
            }
        }
        Ok(())
    })
}

/// Parse files, run recipes, and report what changed.
pub fn execute_run(args: &RunArgs, config: &EnclaveConfig) -> Result<()> {
    let kind: ParserKind = args.parser.parse()?;

    with_session(config, |facade| {
        let recipe = environment(facade, &[])?.activate_recipes(&args.recipes)?;

        let mut failures = Vec::new();
        for validated in recipe.validate_all()? {
            for invalid in validated.failures()? {
                failures.push(format!("{}: {}", invalid.property()?, invalid.message()?));
            }
        }
        if !failures.is_empty() {
            bail!("Recipe validation failed:\n  {}", failures.join("\n  "));
        }

        let ctx = facade.execution_context_with(|error| warn!("{}", error))?;
        let mut builder = facade.parser_builder(kind)?;
        if let Some(path) = &args.checkstyle {
            let styles = facade.load_checkstyle_config(path, facade.properties())?;
            builder = builder.styles(&[styles])?;
        }
        let parser = builder.build()?;
        let sources = parser.parse(&args.files, &args.base_dir, &ctx)?;
        let results = recipe.run_with_context(&sources, &ctx)?;

        let container = ResultsContainer::new(&args.base_dir, results)?;
        if let Some(error) = container.first_error()? {
            bail!("Recipe failed: {}", error);
        }
        let summary = container.summary()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if !container.is_not_empty() {
            println!("No changes");
        } else {
            for path in &summary.generated {
                println!("generated  {}", path.display());
            }
            for path in &summary.deleted {
                println!("deleted    {}", path.display());
            }
            for moved in &summary.moved {
                println!("moved      {} -> {}", moved.from.display(), moved.to.display());
            }
            for path in &summary.refactored_in_place {
                println!("changed    {}", path.display());
            }
        }

        if args.diff {
            for result in container
                .generated()
                .iter()
                .chain(container.deleted())
                .chain(container.moved())
                .chain(container.refactored_in_place())
            {
                print!("{}", result.diff()?);
            }
        }
        Ok(())
    })
}
