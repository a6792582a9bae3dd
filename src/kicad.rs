//! # External Tool Invocation
//!
//! Wrapper around the `kicad-cli` executable plus the assembly of its
//! argument vectors from configuration tables. Invocation is a mechanical
//! pass-through: this module never interprets what a flag means to
//! `kicad-cli`, it only maps configuration values onto command-line words.
//!
//! ## Argument Table Convention
//!
//! Inside a `data.<section>` table, keys starting with `--` are forwarded
//! verbatim:
//!
//! - `true` becomes a bare flag, `false` omits the flag entirely;
//! - a non-empty string becomes `--flag value`, an empty string omits it;
//! - a number becomes `--flag <number>`;
//! - an array becomes one comma-joined value (`--layers F.Cu,B.Cu`).
//!
//! Keys with the `kie_` prefix belong to this tool and are never forwarded,
//! and `--output` is reserved because output placement is owned by the
//! sequencing layer.

use std::process::Command;

use serde_json::{Map, Value};

use crate::config::expand_home;
use crate::error::{Error, Result};

/// Prefix of configuration keys consumed by this tool, never forwarded.
pub const APP_KEY_PREFIX: &str = "kie_";

/// Reserved key: output placement belongs to the sequencer.
pub const OUTPUT_KEY: &str = "--output";

/// Handle on the configured `kicad-cli` binary.
#[derive(Debug, Clone)]
pub struct KicadCli {
    binary: String,
}

impl KicadCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs one `kicad-cli` invocation and returns its captured stdout.
    pub fn run(&self, args: &[String]) -> Result<String> {
        run_program(&self.binary, args)
    }
}

/// Spawns an external program, waits for it, and maps failures to typed
/// errors: [`Error::Tool`] when the program cannot be launched at all,
/// [`Error::ToolExit`] with captured stderr on a non-zero exit.
pub fn run_program(program: &str, args: &[String]) -> Result<String> {
    let mut command = Command::new(program);
    command.args(args);
    run_command(command, display_command(program, args))
}

/// Runs a prepared [`Command`] with the shared error mapping. Used directly
/// by custom commands that need a working directory or environment set up.
pub fn run_command(mut command: Command, command_line: String) -> Result<String> {
    log::debug!("running: {command_line}");

    let output = command.output().map_err(|source| Error::Tool {
        command: command_line.clone(),
        message: source.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::ToolExit {
            command: command_line,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn display_command(program: &str, args: &[String]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Builds the pass-through argument words for one configuration section.
///
/// `section` is the dotted path of the table, used only in error messages.
/// Key order follows the table, so defaults keep their declared order.
pub fn section_args(section: &str, table: &Map<String, Value>) -> Result<Vec<String>> {
    let mut args = Vec::new();
    for (key, value) in table {
        if key == OUTPUT_KEY || key.starts_with(APP_KEY_PREFIX) {
            continue;
        }
        if !key.starts_with("--") {
            log::debug!("ignoring non-argument key '{section}.{key}'");
            continue;
        }
        match value {
            Value::Bool(true) => args.push(key.clone()),
            Value::Bool(false) | Value::Null => {}
            Value::String(text) => {
                let expanded = expand_home(text);
                if !expanded.is_empty() {
                    args.push(key.clone());
                    args.push(expanded);
                }
            }
            Value::Number(number) => {
                args.push(key.clone());
                args.push(number.to_string());
            }
            Value::Array(items) => {
                let mut words = Vec::with_capacity(items.len());
                for item in items {
                    words.push(scalar_word(section, key, item)?);
                }
                let joined = words.join(",");
                if !joined.is_empty() {
                    args.push(key.clone());
                    args.push(joined);
                }
            }
            Value::Object(_) => {
                return Err(Error::ConfigValue {
                    path: format!("{section}.{key}"),
                    expected: "a flag, scalar, or array",
                })
            }
        }
    }
    Ok(args)
}

fn scalar_word(section: &str, key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(expand_home(text)),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(Error::ConfigValue {
            path: format!("{section}.{key}"),
            expected: "an array of scalars",
        }),
    }
}
