//! CLI command definitions and dispatch.

pub mod graph;
pub mod outputs;
pub mod synth;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stratum_common::config::SynthConfig;
use stratum_common::constants;
use stratum_sdk::blueprint;
use stratum_sdk::stack::Stack;

/// Stratum — declarative identity stacks, resolved and emitted.
#[derive(Parser, Debug)]
#[command(name = constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file; flags below override its values.
    #[arg(long, global = true, env = "STRATUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stack name, also the stem of the emitted artifact.
    #[arg(long, global = true, env = "STRATUM_STACK_NAME")]
    pub stack_name: Option<String>,

    /// Provider region.
    #[arg(long, global = true, env = "STRATUM_REGION")]
    pub region: Option<String>,

    /// Remote backend hostname.
    #[arg(long, global = true, env = "STRATUM_BACKEND_HOSTNAME")]
    pub hostname: Option<String>,

    /// Remote backend organization.
    #[arg(long, global = true, env = "STRATUM_ORGANIZATION")]
    pub organization: Option<String>,

    /// Remote backend workspace.
    #[arg(long, global = true, env = "STRATUM_WORKSPACE")]
    pub workspace: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the stack and emit the backend document.
    Synth(synth::SynthArgs),
    /// Display the resolved resource order and reference edges.
    Graph(graph::GraphArgs),
    /// Display the finalized outputs.
    Outputs(outputs::OutputsArgs),
}

impl Cli {
    /// Builds the effective configuration: defaults, then the config file,
    /// then flags and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the result
    /// has a blank identifier.
    pub fn synth_config(&self) -> anyhow::Result<SynthConfig> {
        let mut config = match &self.config {
            Some(path) => SynthConfig::load(path)?,
            None => SynthConfig::default(),
        };

        let overrides = [
            (&self.stack_name, &mut config.stack_name),
            (&self.region, &mut config.region),
            (&self.hostname, &mut config.backend.hostname),
            (&self.organization, &mut config.backend.organization),
            (&self.workspace, &mut config.backend.workspace),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                field.clone_from(value);
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Declares the stack every command operates on.
///
/// # Errors
///
/// Returns an error if a resource fails to build or declare.
pub fn load_stack(config: &SynthConfig) -> anyhow::Result<Stack> {
    Ok(blueprint::iam_demo(&config.stack_name)?)
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.synth_config()?;
    tracing::debug!(?config, "effective configuration");
    match cli.command {
        Command::Synth(args) => synth::execute(args, config),
        Command::Graph(args) => graph::execute(&args, &config),
        Command::Outputs(args) => outputs::execute(&args, &config),
    }
}
