//! Delegation policy commands

use anyhow::Result;
use clap::Args;

use enclave_core::{EnclaveConfig, TypeName};
use enclave_policy::DelegationPolicy;

/// Arguments for the classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Type names to classify
    #[clap(required = true)]
    pub names: Vec<String>,

    /// Print decisions as JSON
    #[clap(long)]
    pub json: bool,
}

/// Classify names with the configured policy.
pub fn execute_classify(args: &ClassifyArgs, config: &EnclaveConfig) -> Result<()> {
    let policy = DelegationPolicy::from_config(&config.domain.policy);
    let decisions = args
        .names
        .iter()
        .map(|name| Ok(policy.explain(&TypeName::new(name)?)))
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decisions)?);
    } else {
        for decision in &decisions {
            println!("{}", decision);
        }
    }
    Ok(())
}
