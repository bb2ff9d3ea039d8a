//! `strat outputs` — Display the finalized outputs.

use clap::Args;
use stratum_common::config::SynthConfig;

use crate::output;

/// Arguments for the `outputs` command.
#[derive(Args, Debug)]
pub struct OutputsArgs {
    /// Print outputs as a JSON object.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `outputs` command.
///
/// # Errors
///
/// Returns an error if the stack cannot be synthesized.
pub fn execute(args: &OutputsArgs, config: &SynthConfig) -> anyhow::Result<()> {
    let mut stack = super::load_stack(config)?;
    let synthesis = stack.synthesize()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(synthesis.outputs)?);
    } else {
        for line in output::output_lines(synthesis.outputs) {
            println!("{line}");
        }
    }
    Ok(())
}
