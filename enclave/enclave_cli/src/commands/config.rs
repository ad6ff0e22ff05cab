//! Configuration commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use enclave_core::EnclaveConfig;

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Validate a configuration file
    Check {
        /// The file to check
        path: PathBuf,
    },
}

pub fn execute(command: &ConfigCommand, config: &EnclaveConfig) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            print!("{}", config.to_toml_string()?);
        }
        ConfigCommand::Check { path } => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let checked = EnclaveConfig::from_toml_str(&content)?;
            checked.validate()?;
            println!("{} is valid", path.display());
        }
    }
    Ok(())
}
