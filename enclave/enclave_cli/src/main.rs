use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use enclave_core::utils::init_logging;
use enclave_core::{EnclaveConfig, LogLevel};

mod commands;

use commands::config::ConfigCommand;
use commands::domain::{ResolveArgs, ResourcesArgs};
use commands::engine::{RecipesArgs, RunArgs};
use commands::policy::ClassifyArgs;

/// Enclave Command Line Interface
///
/// Classify and resolve names through an isolated loading domain, and run
/// engine recipes without linking against the engine.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Configuration file
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Extra archive, searched after the configured ones
    #[clap(long = "archive", global = true)]
    archives: Vec<PathBuf>,

    /// Log level (trace, debug, info, warning, error)
    #[clap(long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which tier each name is resolved from first
    Classify(ClassifyArgs),

    /// Resolve type names and show where they were defined
    Resolve(ResolveArgs),

    /// List every copy of a resource, in lookup order
    Resources(ResourcesArgs),

    /// List the recipes the engine provides
    Recipes(RecipesArgs),

    /// Parse files and run recipes over them
    Run(RunArgs),

    /// Inspect configuration
    #[clap(subcommand)]
    Config(ConfigCommand),
}

fn load_config(cli: &Cli) -> Result<EnclaveConfig> {
    let mut config = EnclaveConfig::load(cli.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    for archive in &cli.archives {
        if !config.domain.archives.contains(archive) {
            config.domain.archives.push(archive.clone());
        }
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.parse::<LogLevel>()?;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    init_logging(config.logging.level);

    match &cli.command {
        Commands::Classify(args) => commands::policy::execute_classify(args, &config),
        Commands::Resolve(args) => commands::domain::execute_resolve(args, &config),
        Commands::Resources(args) => commands::domain::execute_resources(args, &config),
        Commands::Recipes(args) => commands::engine::execute_recipes(args, &config),
        Commands::Run(args) => commands::engine::execute_run(args, &config),
        Commands::Config(command) => commands::config::execute(command, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
