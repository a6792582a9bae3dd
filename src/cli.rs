//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use kifab::output::OutputConfig;

/// KiFab - Export manufacturing artifacts from KiCad projects
#[derive(Parser, Debug)]
#[command(name = "kifab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export gerber files, optionally with drill data, and archive them
    Gerbers(commands::export::ExportArgs),

    /// Export drill files and drill maps
    Drills(commands::export::ExportArgs),

    /// Export component position files for assembly
    Positions(commands::export::ExportArgs),

    /// Export board layers as a PDF
    #[command(name = "pcb_pdf")]
    PcbPdf(commands::export::ExportArgs),

    /// Export the schematic as a PDF
    #[command(name = "sch_pdf")]
    SchPdf(commands::export::ExportArgs),

    /// Export the 3D model of the board (STEP or VRML)
    Ddd(commands::export::VariantExportArgs),

    /// Render an image of the board
    Render(commands::export::ExportArgs),

    /// Export the bill of materials (CSV or XML)
    Bom(commands::export::VariantExportArgs),

    /// Run the design rule check and save its report
    Drc(commands::export::ExportArgs),

    /// Export schematic sheets as SVG drawings
    Svg(commands::export::ExportArgs),

    /// Run every operation in the configured command list
    Run(commands::run::RunArgs),

    /// Write the default kifab.json configuration
    Init(commands::init::InitArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Gerbers(args) => commands::export::execute("gerbers", args, None),
            Commands::Drills(args) => commands::export::execute("drills", args, None),
            Commands::Positions(args) => commands::export::execute("positions", args, None),
            Commands::PcbPdf(args) => commands::export::execute("pcb_pdf", args, None),
            Commands::SchPdf(args) => commands::export::execute("sch_pdf", args, None),
            Commands::Ddd(args) => commands::export::execute("ddd", args.export, args.variant),
            Commands::Render(args) => commands::export::execute("render", args, None),
            Commands::Bom(args) => commands::export::execute("bom", args.export, args.variant),
            Commands::Drc(args) => commands::export::execute("drc", args, None),
            Commands::Svg(args) => commands::export::execute("svg", args, None),
            Commands::Run(args) => commands::run::execute(args, &output),
            Commands::Init(args) => commands::init::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Logging goes to stderr; `RUST_LOG` still wins over the flag when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}
