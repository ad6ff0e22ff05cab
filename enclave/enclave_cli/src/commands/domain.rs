//! Loading domain commands

use anyhow::{Context, Result};
use clap::Args;

use enclave_core::EnclaveConfig;
use enclave_domain::{ArchiveSet, LoadingDomain};
use enclave_policy::DelegationPolicy;

/// Arguments for the resolve command
#[derive(Args)]
pub struct ResolveArgs {
    /// Type names to resolve
    #[clap(required = true)]
    pub names: Vec<String>,
}

/// Arguments for the resources command
#[derive(Args)]
pub struct ResourcesArgs {
    /// Resource name, e.g. `META-INF/rewrite/recipes.yml`
    pub name: String,

    /// Print contents as well as locations
    #[clap(long)]
    pub show: bool,
}

/// Build a domain over the configured archives.
pub fn open_domain(config: &EnclaveConfig) -> Result<LoadingDomain> {
    let archives = ArchiveSet::open(&config.domain.archives).context("Failed to open archives")?;
    Ok(LoadingDomain::builder()
        .policy(DelegationPolicy::from_config(&config.domain.policy))
        .archives(archives)
        .build())
}

/// Resolve each name, failing on the first that cannot be found.
pub fn execute_resolve(args: &ResolveArgs, config: &EnclaveConfig) -> Result<()> {
    let domain = open_domain(config)?;
    for name in &args.names {
        let unit = domain.resolve(name)?;
        println!("{} <- {}", unit.name(), unit.origin());
    }
    Ok(())
}

/// List the copies of a resource across tiers.
pub fn execute_resources(args: &ResourcesArgs, config: &EnclaveConfig) -> Result<()> {
    let domain = open_domain(config)?;
    let resources = domain.resolve_resources(&args.name);
    if resources.is_empty() {
        anyhow::bail!("Resource not found: {}", args.name);
    }
    for resource in resources {
        println!("{} {}", resource.tier(), resource.location());
        if args.show {
            println!("{}", resource.read_to_string()?);
        }
    }
    Ok(())
}
