//! # Custom Commands
//!
//! Runs a user-defined program named by the `kie_command` key of the
//! section the command list points at. The program starts in the project
//! directory and finds the resolved category directory in the
//! [`OUTPUT_DIR_VAR`] environment variable. Remaining `--` keys of the
//! section are appended as arguments under the usual pass-through rules.

use std::process::Command;

use crate::error::{Error, Result};
use crate::kicad;
use crate::orchestrator::GenerateContext;

/// Environment variable carrying the resolved output directory.
pub const OUTPUT_DIR_VAR: &str = "KIFAB_OUTPUT_DIR";

/// Runs the section's `kie_command` and reports its first line of output.
pub fn run(ctx: &GenerateContext) -> Result<Option<String>> {
    let line = ctx
        .app_str("kie_command")?
        .filter(|line| !line.trim().is_empty())
        .ok_or_else(|| Error::InvalidCommand {
            message: format!("section '{}' does not define kie_command", ctx.section),
        })?;

    // Plain whitespace split; quoting is not interpreted.
    let mut parts = line.split_whitespace().map(str::to_string);
    let program = parts.next().ok_or_else(|| Error::InvalidCommand {
        message: format!("section '{}' has an empty kie_command", ctx.section),
    })?;
    let arguments: Vec<String> = parts.collect();
    let extra = ctx.tool_args()?;

    let mut display = program.clone();
    for word in arguments.iter().chain(extra.iter()) {
        display.push(' ');
        display.push_str(word);
    }

    let mut command = Command::new(&program);
    command
        .args(&arguments)
        .args(&extra)
        .current_dir(ctx.project_dir)
        .env(OUTPUT_DIR_VAR, &ctx.output_dir);

    let stdout = kicad::run_command(command, display)?;
    let message = stdout.lines().map(str::trim).find(|line| !line.is_empty());
    Ok(message.map(str::to_string))
}
