//! `strat graph` — Display the resolved resource order and reference edges.

use clap::Args;
use stratum_common::config::SynthConfig;

use crate::output;

/// Arguments for the `graph` command.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Also list every reference edge.
    #[arg(long)]
    pub edges: bool,
}

/// Executes the `graph` command.
///
/// # Errors
///
/// Returns an error if the stack cannot be declared or resolved.
pub fn execute(args: &GraphArgs, config: &SynthConfig) -> anyhow::Result<()> {
    let stack = super::load_stack(config)?;
    let resolved = stack.graph().resolve()?;

    println!("Resolution order for stack: {}", stack.name());
    println!("{}", output::rule(40));
    println!();
    for line in output::order_lines(&resolved) {
        println!("{line}");
    }
    println!();
    println!("  {} resource(s) in dependency order.", resolved.len());

    if args.edges {
        println!();
        println!("  References:");
        for (dependency, dependent) in resolved.edges() {
            println!("    {dependency} -> {dependent}");
        }
    }
    Ok(())
}
