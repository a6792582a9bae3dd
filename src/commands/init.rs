//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which writes the built-in
//! default configuration to a fresh `kifab.json` in the current directory.
//! The written file is the complete default tree, so users start from a
//! document that lists every section and key they can override.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::Path;

use kifab::defaults;

/// Write the default configuration file
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs) -> Result<()> {
    let config_path = Path::new(defaults::CONFIG_FILE_NAME);

    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            defaults::CONFIG_FILE_NAME
        ));
    }

    fs::write(config_path, default_config_document()?)?;
    println!("✅ Created {}", defaults::CONFIG_FILE_NAME);
    println!("💡 Run `kifab run` to export everything in the command list");

    Ok(())
}

/// The default tree, pretty-printed with a trailing newline.
fn default_config_document() -> Result<String> {
    let mut document = serde_json::to_string_pretty(defaults::default_tree())?;
    document.push('\n');
    Ok(document)
}
