//! # Artifact Generators
//!
//! One generator per operation name, each a thin function that assembles a
//! `kicad-cli` argument vector from its configuration section, invokes the
//! tool, and optionally bundles the results. Board-side operations live in
//! [`pcb`], schematic-side in [`sch`], and user-defined commands in
//! [`custom`].
//!
//! [`registry`] builds the complete name-to-generator mapping the
//! orchestrator dispatches against; it is constructed once at startup.

use crate::error::Result;
use crate::orchestrator::{
    GenerateContext, HandlerRegistry, InputKind, OperationSpec, SectionRule,
};
use crate::{archive, sequence};

pub mod custom;
pub mod pcb;
pub mod sch;

/// Category directory names, also used as the tag inside artifact names.
pub mod category {
    pub const GERBER: &str = "Gerber";
    pub const DRILL: &str = "Drill";
    pub const POSITION: &str = "Position";
    pub const PCB: &str = "PCB";
    pub const SCH: &str = "SCH";
    pub const DDD: &str = "3D";
    pub const RENDER: &str = "Render";
    pub const BOM: &str = "BoM";
    pub const DRC: &str = "DRC";
    pub const SVG: &str = "SVG";
    pub const CUSTOM: &str = "Custom";
}

/// Builds the full operation registry.
pub fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    let mut add = |name, category, input, section, handler| {
        registry.register(
            name,
            OperationSpec {
                category,
                input,
                section,
                handler,
            },
        );
    };

    add(
        "gerbers",
        category::GERBER,
        InputKind::Board,
        SectionRule::Plain,
        pcb::gerbers,
    );
    add(
        "drills",
        category::DRILL,
        InputKind::Board,
        SectionRule::Plain,
        pcb::drills,
    );
    add(
        "positions",
        category::POSITION,
        InputKind::Board,
        SectionRule::Plain,
        pcb::positions,
    );
    add(
        "pcb_pdf",
        category::PCB,
        InputKind::Board,
        SectionRule::Plain,
        pcb::pdf,
    );
    add(
        "ddd",
        category::DDD,
        InputKind::Board,
        SectionRule::Variant("STEP"),
        pcb::ddd,
    );
    add(
        "render",
        category::RENDER,
        InputKind::Board,
        SectionRule::Plain,
        pcb::render,
    );
    add(
        "drc",
        category::DRC,
        InputKind::Board,
        SectionRule::Plain,
        pcb::drc,
    );
    add(
        "sch_pdf",
        category::SCH,
        InputKind::Schematic,
        SectionRule::Plain,
        sch::pdf,
    );
    add(
        "bom",
        category::BOM,
        InputKind::Schematic,
        SectionRule::Variant("CSV"),
        sch::bom,
    );
    add(
        "svg",
        category::SVG,
        InputKind::Schematic,
        SectionRule::Plain,
        sch::svg,
    );
    add(
        "custom",
        category::CUSTOM,
        InputKind::ProjectDir,
        SectionRule::Named,
        custom::run,
    );

    registry
}

/// Owned words for a subcommand prefix.
pub(crate) fn words(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| (*part).to_string()).collect()
}

/// Command-line form of a path.
pub(crate) fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Command-line form of a directory with a guaranteed trailing separator.
pub(crate) fn directory_arg(path: &std::path::Path) -> String {
    let mut arg = path_arg(path);
    if !arg.ends_with(std::path::MAIN_SEPARATOR) {
        arg.push(std::path::MAIN_SEPARATOR);
    }
    arg
}

/// Shared shape of the single-file exporters: clean earlier standalone
/// outputs, run one `kicad-cli` invocation targeting a stable file name,
/// then either report that file or bundle the directory.
pub(crate) fn export_file(
    ctx: &GenerateContext,
    subcommand: &[&str],
    tag: &str,
    extension: &str,
) -> Result<Option<String>> {
    sequence::clean_standalone_outputs(&ctx.output_dir)?;

    let file = standalone_filename(ctx, tag, extension);
    let mut args = words(subcommand);
    args.push("--output".into());
    args.push(path_arg(&ctx.output_dir.join(&file)));
    args.extend(ctx.tool_args()?);
    args.push(path_arg(ctx.input));
    ctx.kicad()?.run(&args)?;

    if ctx.app_flag("kie_zip_files", false)? {
        return bundle(ctx, tag);
    }
    Ok(Some(file))
}

/// Name of a standalone artifact: stable across runs so re-runs overwrite.
pub(crate) fn standalone_filename(ctx: &GenerateContext, tag: &str, extension: &str) -> String {
    format!(
        "{}-{}-{}.{}",
        ctx.project.name, ctx.project.revision, tag, extension
    )
}

/// Bundles the category directory into the next archive of its series and
/// returns the archive name, or `None` when there was nothing to bundle.
pub(crate) fn bundle(ctx: &GenerateContext, tag: &str) -> Result<Option<String>> {
    let sequence_number = sequence::next_sequence_number(
        &ctx.output_dir,
        &ctx.project.name,
        &ctx.project.revision,
        tag,
        ctx.project.date,
        "zip",
    )?;
    let name = sequence::archive_filename(
        &ctx.project.name,
        &ctx.project.revision,
        tag,
        ctx.project.date,
        sequence_number,
        "zip",
    );
    let stored = archive::bundle_directory(&ctx.output_dir, &ctx.output_dir.join(&name))?;
    if stored == 0 {
        return Ok(None);
    }
    Ok(Some(name))
}
