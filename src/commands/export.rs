//! # Single-Operation Export Commands
//!
//! One shared implementation behind the per-operation subcommands
//! (`gerbers`, `drills`, `pcb_pdf`, ...). Each subcommand names its input
//! file explicitly and runs exactly one operation through the same
//! orchestration path as `run`, so section resolution, output sequencing,
//! and logging behave identically in both modes.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use kifab::config::Config;
use kifab::error::Error;
use kifab::generators;
use kifab::orchestrator::{self, InputKind, Outcome, RunContext};
use kifab::plan::CommandPlan;
use kifab::project::{ProjectMeta, RunInputs};

/// Arguments shared by every single-operation subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the input design file
    #[arg(short = 'i', long, value_name = "PATH")]
    pub input_file: PathBuf,

    /// Output root directory (overrides the configured one)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short = 'c', long, value_name = "PATH", env = "KIFAB_CONFIG")]
    pub config: Option<PathBuf>,
}

/// [`ExportArgs`] plus a format variant, for the operations that have one.
#[derive(Args, Debug)]
pub struct VariantExportArgs {
    #[command(flatten)]
    pub export: ExportArgs,

    /// Output format variant
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub variant: Option<String>,
}

/// Execute a single-operation subcommand.
///
/// Unlike a `run` pass, a missing input file here is a hard error: the user
/// named the file on the command line, so there is nothing to fall back to.
pub fn execute(operation: &'static str, args: ExportArgs, variant: Option<String>) -> Result<()> {
    let registry = generators::registry();
    let spec = registry
        .get(operation)
        .ok_or_else(|| anyhow::anyhow!("no generator registered for '{operation}'"))?;

    if !args.input_file.is_file() {
        return Err(Error::MissingInput {
            kind: input_label(spec.input).to_string(),
            path: args.input_file,
        }
        .into());
    }

    let project_dir = match args.input_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let config = Config::load(args.config.as_deref(), &project_dir)?;
    let inputs = inputs_for(spec.input, &args.input_file);
    let project = ProjectMeta::resolve(&config, &inputs, &project_dir)?;
    let plan = CommandPlan::single(operation, variant.into_iter().collect())?;

    let ctx = RunContext {
        config: &config,
        project: &project,
        inputs: &inputs,
        project_dir: &project_dir,
        output_override: args.output_dir.as_deref(),
    };
    let report = orchestrator::run(&plan, &registry, &ctx);

    if let Some(status) = report
        .statuses()
        .iter()
        .find(|status| status.outcome != Outcome::Success)
    {
        anyhow::bail!("{} did not complete: {}", status.operation, status.message);
    }
    Ok(())
}

fn input_label(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Board => "board",
        InputKind::Schematic => "schematic",
        InputKind::ProjectDir => "project",
    }
}

/// Slots the named file into the input it serves; the other slot stays
/// empty so nothing silently reads a file the user never named.
fn inputs_for(kind: InputKind, input_file: &Path) -> RunInputs {
    match kind {
        InputKind::Board => RunInputs {
            board: Some(input_file.to_path_buf()),
            schematic: None,
        },
        InputKind::Schematic => RunInputs {
            board: None,
            schematic: Some(input_file.to_path_buf()),
        },
        InputKind::ProjectDir => RunInputs {
            board: None,
            schematic: None,
        },
    }
}
