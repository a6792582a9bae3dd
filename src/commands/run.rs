//! # Run Command Implementation
//!
//! Drives the configured command list end to end: load the layered
//! configuration, parse the plan (from the file or the `--commands`
//! override), discover the design files, then execute every request in
//! order. Individual failures never stop the pass; they surface in the
//! end-of-run summary and in the exit code.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use kifab::config::Config;
use kifab::generators;
use kifab::orchestrator::{self, RunContext};
use kifab::output::OutputConfig;
use kifab::plan::CommandPlan;
use kifab::project::{ProjectMeta, RunInputs};
use kifab::report;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short = 'c', long, value_name = "PATH", env = "KIFAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Comma-separated command list overriding the configured one
    #[arg(long, value_name = "LIST")]
    pub commands: Option<String>,

    /// Output root directory (overrides the configured one)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Project directory holding the design files
    #[arg(short = 'p', long, value_name = "PATH", default_value = ".")]
    pub project_dir: PathBuf,
}

/// Execute the `run` command.
pub fn execute(args: RunArgs, output: &OutputConfig) -> Result<()> {
    let config = Config::load(args.config.as_deref(), &args.project_dir)?;

    let plan = match &args.commands {
        Some(text) => CommandPlan::from_text(text)?,
        None => CommandPlan::from_value(config.commands()?)?,
    };
    if plan.is_empty() {
        log::warn!("command list is empty; nothing to do");
        return Ok(());
    }

    let inputs = RunInputs::discover(&config, &args.project_dir)?;
    let project = ProjectMeta::resolve(&config, &inputs, &args.project_dir)?;
    log::info!(
        "running {} operation(s) for {} R{}",
        plan.len(),
        project.name,
        project.revision
    );

    let registry = generators::registry();
    let ctx = RunContext {
        config: &config,
        project: &project,
        inputs: &inputs,
        project_dir: &args.project_dir,
        output_override: args.output_dir.as_deref(),
    };
    let run_report = orchestrator::run(&plan, &registry, &ctx);

    report::print_summary(&run_report, output);

    let (_, failures, _) = run_report.counts();
    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} operations failed",
            run_report.statuses().len()
        );
    }
    Ok(())
}
