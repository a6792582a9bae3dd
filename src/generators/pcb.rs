//! # Board-Side Generators
//!
//! Exporters that read the `.kicad_pcb` board file: gerber layers, drill
//! files, component positions, layered PDF, 3D models, rendered images,
//! and DRC reports.

use std::path::Path;

use crate::error::{Error, Result};
use crate::kicad::section_args;
use crate::orchestrator::GenerateContext;
use crate::sequence;

use super::{bundle, category, directory_arg, export_file, path_arg, words};

/// Configuration section the drill export reads, both standalone and when
/// riding along with the gerbers.
const DRILL_SECTION: &str = "data.drills";

/// Exports the configured gerber layer set, folds in drill files when
/// `kie_include_drill` is set, and bundles the directory into the next
/// numbered archive.
pub fn gerbers(ctx: &GenerateContext) -> Result<Option<String>> {
    sequence::clean_standalone_outputs(&ctx.output_dir)?;

    let kicad = ctx.kicad()?;
    let mut args = words(&["pcb", "export", "gerbers", "--output"]);
    args.push(path_arg(&ctx.output_dir));
    args.extend(ctx.tool_args()?);
    args.push(path_arg(ctx.input));
    kicad.run(&args)?;

    // The drill export reuses its own section but targets this directory,
    // so one archive carries both.
    if ctx.app_flag("kie_include_drill", true)? {
        let table = ctx.config.resolve_table(DRILL_SECTION)?;
        let drill_args = section_args(DRILL_SECTION, &table)?;
        kicad.run(&drill_command(drill_args, &ctx.output_dir, ctx.input))?;
    }

    if ctx.app_flag("kie_zip_files", true)? {
        return bundle(ctx, category::GERBER);
    }
    Ok(None)
}

/// Exports drill files and drill maps on their own.
pub fn drills(ctx: &GenerateContext) -> Result<Option<String>> {
    sequence::clean_standalone_outputs(&ctx.output_dir)?;
    ctx.kicad()?
        .run(&drill_command(ctx.tool_args()?, &ctx.output_dir, ctx.input))?;

    if ctx.app_flag("kie_zip_files", false)? {
        return bundle(ctx, category::DRILL);
    }
    Ok(None)
}

/// Exports component placement data for assembly.
pub fn positions(ctx: &GenerateContext) -> Result<Option<String>> {
    let format = ctx
        .config
        .try_resolve_str(&format!("{}.--format", ctx.section))?
        .unwrap_or_default();
    export_file(
        ctx,
        &["pcb", "export", "pos"],
        category::POSITION,
        position_extension(&format),
    )
}

/// Exports the configured board layers as one PDF.
pub fn pdf(ctx: &GenerateContext) -> Result<Option<String>> {
    export_file(ctx, &["pcb", "export", "pdf"], category::PCB, "pdf")
}

/// Exports the 3D model of the board in the requested format.
pub fn ddd(ctx: &GenerateContext) -> Result<Option<String>> {
    let (subcommand, extension) = match ctx.variant.unwrap_or("STEP") {
        "STEP" => ("step", "step"),
        "VRML" => ("vrml", "wrl"),
        other => {
            return Err(Error::InvalidCommand {
                message: format!("unknown 3D format '{other}'; expected STEP or VRML"),
            });
        }
    };
    export_file(
        ctx,
        &["pcb", "export", subcommand],
        category::DDD,
        extension,
    )
}

/// Renders a raytraced image of the board.
pub fn render(ctx: &GenerateContext) -> Result<Option<String>> {
    export_file(ctx, &["pcb", "render"], category::RENDER, "png")
}

/// Runs the design rule check and writes its report. With
/// `--exit-code-violations` set in the section, rule violations surface as
/// a failed run.
pub fn drc(ctx: &GenerateContext) -> Result<Option<String>> {
    let format = ctx
        .config
        .try_resolve_str(&format!("{}.--format", ctx.section))?
        .unwrap_or_default();
    export_file(ctx, &["pcb", "drc"], category::DRC, drc_extension(&format))
}

/// `pcb export drill` argument vector. The output directory needs a
/// trailing separator or `kicad-cli` treats it as a file name prefix.
fn drill_command(tool_args: Vec<String>, output_dir: &Path, input: &Path) -> Vec<String> {
    let mut args = words(&["pcb", "export", "drill", "--output"]);
    args.push(directory_arg(output_dir));
    args.extend(tool_args);
    args.push(path_arg(input));
    args
}

fn position_extension(format: &str) -> &'static str {
    match format {
        "ascii" => "pos",
        "gerber" => "gbr",
        _ => "csv",
    }
}

fn drc_extension(format: &str) -> &'static str {
    if format == "json" {
        "json"
    } else {
        "rpt"
    }
}
