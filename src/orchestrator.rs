//! # Run Orchestration
//!
//! Executes a [`CommandPlan`] request by request against a
//! [`HandlerRegistry`], collecting one [`ExecutionStatus`] per request into a
//! [`RunReport`]. A failing operation never aborts the run; the report
//! carries the failure and later requests still execute. The process exit
//! code is derived from the report afterwards: failures make it non-zero,
//! skips alone do not.
//!
//! ## Per-request lifecycle
//!
//! 1. disabled requests are recorded as `Skipped` without dispatch;
//! 2. a name with no registered generator is a `Failure`;
//! 3. a missing required input (board or schematic) is a `Skipped`;
//! 4. the category directory is resolved through the sequencing layer and
//!    handed to the handler inside a [`GenerateContext`];
//! 5. the handler result becomes `Success` (with the produced artifact name
//!    when one is reported) or `Failure` (with the error display).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::kicad::{section_args, KicadCli, OUTPUT_KEY};
use crate::plan::{CommandPlan, OperationRequest};
use crate::project::{ProjectMeta, RunInputs};
use crate::sequence;

/// Which input file an operation needs before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Board,
    Schematic,
    /// No design file; the handler works from the project directory.
    ProjectDir,
}

/// How an operation's configuration section is addressed.
#[derive(Debug, Clone, Copy)]
pub enum SectionRule {
    /// `data.<name>`
    Plain,
    /// `data.<name>.<variant>`, with this default variant.
    Variant(&'static str),
    /// `data.<first-argument>`: the request names its own section.
    Named,
}

/// Terminal outcome of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Skipped,
}

/// One line of the run report.
#[derive(Debug, Clone)]
pub struct ExecutionStatus {
    pub operation: String,
    pub variant: Option<String>,
    pub outcome: Outcome,
    pub message: String,
}

/// Ordered per-request statuses of a finished run.
#[derive(Debug, Default)]
pub struct RunReport {
    statuses: Vec<ExecutionStatus>,
}

impl RunReport {
    pub fn push(&mut self, status: ExecutionStatus) {
        self.statuses.push(status);
    }

    pub fn statuses(&self) -> &[ExecutionStatus] {
        &self.statuses
    }

    pub fn has_failures(&self) -> bool {
        self.statuses
            .iter()
            .any(|status| status.outcome == Outcome::Failure)
    }

    /// (successes, failures, skips)
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for status in &self.statuses {
            match status.outcome {
                Outcome::Success => counts.0 += 1,
                Outcome::Failure => counts.1 += 1,
                Outcome::Skipped => counts.2 += 1,
            }
        }
        counts
    }
}

/// Handler signature: on success, optionally name the main artifact
/// produced so the summary can show it.
pub type Handler = fn(&GenerateContext) -> Result<Option<String>>;

/// Registration record for one operation name.
pub struct OperationSpec {
    /// Category directory name under `<root>/R<rev>/<date>/`.
    pub category: &'static str,
    pub input: InputKind,
    pub section: SectionRule,
    pub handler: Handler,
}

/// Operation name to generator mapping, built once at startup.
#[derive(Default)]
pub struct HandlerRegistry {
    specs: HashMap<String, OperationSpec>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, spec: OperationSpec) {
        self.specs.insert(name.to_string(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&OperationSpec> {
        self.specs.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Run-wide inputs shared by every request.
pub struct RunContext<'a> {
    pub config: &'a Config,
    pub project: &'a ProjectMeta,
    pub inputs: &'a RunInputs,
    pub project_dir: &'a Path,
    pub output_override: Option<&'a Path>,
}

/// Everything one handler invocation can see.
pub struct GenerateContext<'a> {
    pub config: &'a Config,
    pub project: &'a ProjectMeta,
    /// Effective variant: the requested one, or the operation's default.
    pub variant: Option<&'a str>,
    /// Dotted path of this request's configuration section.
    pub section: String,
    /// Input file, or the project directory for [`InputKind::ProjectDir`].
    pub input: &'a Path,
    pub project_dir: &'a Path,
    /// Resolved category directory, already created.
    pub output_dir: PathBuf,
}

impl GenerateContext<'_> {
    /// Pass-through `kicad-cli` arguments from this request's section.
    pub fn tool_args(&self) -> Result<Vec<String>> {
        let table = self.config.resolve_table(&self.section)?;
        section_args(&self.section, &table)
    }

    /// App-only key (`kie_*`) lookup with a default for absent keys.
    pub fn app_flag(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self
            .config
            .try_resolve_bool(&format!("{}.{key}", self.section))?
            .unwrap_or(default))
    }

    /// The configured external tool.
    pub fn kicad(&self) -> Result<KicadCli> {
        Ok(KicadCli::new(self.config.resolve_str("kicad_cli_path")?))
    }

    /// App-only string key (`kie_*`), `None` when absent.
    pub fn app_str(&self, key: &str) -> Result<Option<String>> {
        self.config.try_resolve_str(&format!("{}.{key}", self.section))
    }
}

/// Executes the plan in order and returns the collected statuses.
pub fn run(plan: &CommandPlan, registry: &HandlerRegistry, ctx: &RunContext) -> RunReport {
    let mut report = RunReport::default();
    for request in plan.iter() {
        let status = execute_request(request, registry, ctx);
        match status.outcome {
            Outcome::Success => log::info!("{}: success", status.operation),
            Outcome::Failure => log::error!("{}: {}", status.operation, status.message),
            Outcome::Skipped => log::info!("{}: skipped ({})", status.operation, status.message),
        }
        report.push(status);
    }
    report
}

fn execute_request(
    request: &OperationRequest,
    registry: &HandlerRegistry,
    ctx: &RunContext,
) -> ExecutionStatus {
    if !request.enabled {
        return status(request, request.variant(), Outcome::Skipped, "disabled by command list");
    }

    let Some(spec) = registry.get(&request.name) else {
        return status(
            request,
            request.variant(),
            Outcome::Failure,
            format!("no generator registered for '{}'", request.name),
        );
    };

    let variant = effective_variant(request, spec.section);

    let input = match required_input(spec.input, ctx) {
        Ok(path) => path,
        Err(message) => return status(request, variant, Outcome::Skipped, message),
    };

    let generate = match prepare_context(request, spec, variant, input, ctx) {
        Ok(generate) => generate,
        Err(error) => return status(request, variant, Outcome::Failure, error.to_string()),
    };

    log::info!(
        "running {}{} for {}",
        request.name,
        variant.map(|v| format!(" ({v})")).unwrap_or_default(),
        ctx.project.name
    );

    match (spec.handler)(&generate) {
        Ok(Some(artifact)) => status(request, variant, Outcome::Success, artifact),
        Ok(None) => status(request, variant, Outcome::Success, ""),
        Err(error) => status(request, variant, Outcome::Failure, error.to_string()),
    }
}

fn effective_variant<'a>(request: &'a OperationRequest, rule: SectionRule) -> Option<&'a str> {
    match rule {
        SectionRule::Plain => request.variant(),
        SectionRule::Variant(default) => Some(request.variant().unwrap_or(default)),
        SectionRule::Named => request.variant(),
    }
}

/// Checks input presence; the error branch carries the skip message.
fn required_input<'a>(
    kind: InputKind,
    ctx: &'a RunContext,
) -> std::result::Result<&'a Path, String> {
    let (configured, label) = match kind {
        InputKind::Board => (&ctx.inputs.board, "board"),
        InputKind::Schematic => (&ctx.inputs.schematic, "schematic"),
        InputKind::ProjectDir => return Ok(ctx.project_dir),
    };
    match configured {
        Some(path) if path.is_file() => Ok(path),
        Some(path) => Err(format!("{label} file {} not found", path.display())),
        None => Err(format!("no {label} file configured or discovered")),
    }
}

fn prepare_context<'a>(
    request: &'a OperationRequest,
    spec: &OperationSpec,
    variant: Option<&'a str>,
    input: &'a Path,
    ctx: &'a RunContext<'a>,
) -> Result<GenerateContext<'a>> {
    let section = section_path(request, spec.section, variant)?;
    let configured_root = ctx
        .config
        .try_resolve_str(&format!("{section}.{OUTPUT_KEY}"))?;
    let output_dir = sequence::final_directory(
        ctx.project_dir,
        configured_root.as_deref(),
        ctx.output_override,
        &ctx.project.revision,
        ctx.project.date,
        spec.category,
    )?;
    Ok(GenerateContext {
        config: ctx.config,
        project: ctx.project,
        variant,
        section,
        input,
        project_dir: ctx.project_dir,
        output_dir,
    })
}

fn section_path(
    request: &OperationRequest,
    rule: SectionRule,
    variant: Option<&str>,
) -> Result<String> {
    match rule {
        SectionRule::Plain => Ok(format!("data.{}", request.name)),
        SectionRule::Variant(default) => Ok(format!(
            "data.{}.{}",
            request.name,
            variant.unwrap_or(default)
        )),
        SectionRule::Named => variant
            .map(|section| format!("data.{section}"))
            .ok_or_else(|| Error::InvalidCommand {
                message: format!("'{}' requires a section name argument", request.name),
            }),
    }
}

fn status(
    request: &OperationRequest,
    variant: Option<&str>,
    outcome: Outcome,
    message: impl Into<String>,
) -> ExecutionStatus {
    ExecutionStatus {
        operation: request.name.clone(),
        variant: variant.map(str::to_string),
        outcome,
        message: message.into(),
    }
}
