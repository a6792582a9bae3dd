//! # Schematic-Side Generators
//!
//! Exporters that read the `.kicad_sch` schematic file: the schematic PDF,
//! bills of materials, and per-sheet SVG drawings.

use crate::error::{Error, Result};
use crate::orchestrator::GenerateContext;
use crate::sequence;

use super::{bundle, category, export_file, path_arg, words};

/// Exports all schematic sheets as one PDF.
pub fn pdf(ctx: &GenerateContext) -> Result<Option<String>> {
    export_file(ctx, &["sch", "export", "pdf"], category::SCH, "pdf")
}

/// Exports the bill of materials in the requested format. CSV uses the
/// configurable field and grouping options; XML is the legacy netlist-style
/// export and takes none.
pub fn bom(ctx: &GenerateContext) -> Result<Option<String>> {
    let (subcommand, extension) = match ctx.variant.unwrap_or("CSV") {
        "CSV" => ("bom", "csv"),
        "XML" => ("python-bom", "xml"),
        other => {
            return Err(Error::InvalidCommand {
                message: format!("unknown BoM format '{other}'; expected CSV or XML"),
            });
        }
    };
    export_file(
        ctx,
        &["sch", "export", subcommand],
        category::BOM,
        extension,
    )
}

/// Exports every schematic sheet as an SVG drawing into the category
/// directory.
pub fn svg(ctx: &GenerateContext) -> Result<Option<String>> {
    sequence::clean_standalone_outputs(&ctx.output_dir)?;

    let mut args = words(&["sch", "export", "svg", "--output"]);
    args.push(path_arg(&ctx.output_dir));
    args.extend(ctx.tool_args()?);
    args.push(path_arg(ctx.input));
    ctx.kicad()?.run(&args)?;

    if ctx.app_flag("kie_zip_files", false)? {
        return bundle(ctx, category::SVG);
    }
    Ok(None)
}
