//! `strat synth` — Resolve the stack and emit the backend document.

use std::path::PathBuf;

use clap::Args;
use stratum_common::config::SynthConfig;
use stratum_synth::artifact::write_artifact;
use stratum_synth::emitter::Emitter;
use stratum_synth::json::JsonEmitter;

/// Arguments for the `synth` command.
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Directory to write the artifact into (overrides the configured one).
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file.
    #[arg(long)]
    pub stdout: bool,
}

/// Executes the `synth` command.
///
/// Declares the stack, resolves dependency order, finalizes outputs, and
/// emits the JSON document.
///
/// # Errors
///
/// Returns an error if declaration, resolution, emission, or writing fails.
pub fn execute(args: SynthArgs, mut config: SynthConfig) -> anyhow::Result<()> {
    if let Some(dir) = args.out_dir {
        config.output_dir = dir;
    }

    let mut stack = super::load_stack(&config)?;
    let synthesis = stack.synthesize()?;
    let rendered = JsonEmitter.emit(&synthesis.resolved, synthesis.outputs, &config)?;

    if args.stdout {
        println!("{rendered}");
        return Ok(());
    }

    let path = write_artifact(&config.artifact_path(), &rendered)?;
    println!("Synthesized stack \"{}\" -> {}", synthesis.name, path.display());
    println!("  {} resource(s), {} output(s)", synthesis.resolved.len(), synthesis.outputs.len());
    Ok(())
}
