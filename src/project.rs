//! Project metadata and design-file discovery.
//!
//! A run needs to know which board and schematic files it is working on and
//! what to call the results. Both can be pinned in the configuration
//! (`data.project.board_file`, `data.project.schematic_file`,
//! `project_name`); anything left empty is discovered from the project
//! directory, with a shallow sorted scan so the choice is deterministic.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;

/// Extension of board design files.
pub const BOARD_EXTENSION: &str = "kicad_pcb";

/// Extension of schematic design files.
pub const SCHEMATIC_EXTENSION: &str = "kicad_sch";

/// Identity baked into every output name of a run.
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub name: String,
    pub revision: String,
    pub date: NaiveDate,
}

impl ProjectMeta {
    /// Resolves name, revision and date for a run.
    ///
    /// The name comes from `project_name` when set, else the board file
    /// stem, else the schematic file stem, else the project directory name.
    pub fn resolve(config: &Config, inputs: &RunInputs, project_dir: &Path) -> Result<Self> {
        let configured = config.resolve_str("project_name")?;
        let name = if !configured.is_empty() {
            configured
        } else {
            fallback_name(inputs, project_dir)
        };
        Ok(Self {
            name,
            revision: config.resolve_str("revision")?,
            date: Local::now().date_naive(),
        })
    }
}

fn fallback_name(inputs: &RunInputs, project_dir: &Path) -> String {
    inputs
        .board
        .as_deref()
        .or(inputs.schematic.as_deref())
        .and_then(Path::file_stem)
        .or_else(|| project_dir.file_name())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

/// The design files a run operates on. `None` means neither configured nor
/// found; a configured path is kept even when the file is absent so the
/// skip message can name it.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub board: Option<PathBuf>,
    pub schematic: Option<PathBuf>,
}

impl RunInputs {
    /// Resolves both inputs from configuration, falling back to a directory
    /// scan for anything not pinned.
    pub fn discover(config: &Config, project_dir: &Path) -> Result<Self> {
        Ok(Self {
            board: resolve_input(
                config,
                "data.project.board_file",
                project_dir,
                BOARD_EXTENSION,
            )?,
            schematic: resolve_input(
                config,
                "data.project.schematic_file",
                project_dir,
                SCHEMATIC_EXTENSION,
            )?,
        })
    }
}

fn resolve_input(
    config: &Config,
    path_key: &str,
    project_dir: &Path,
    extension: &str,
) -> Result<Option<PathBuf>> {
    if let Some(configured) = config.try_resolve_str(path_key)? {
        if !configured.is_empty() {
            let path = PathBuf::from(configured);
            let path = if path.is_absolute() {
                path
            } else {
                project_dir.join(path)
            };
            return Ok(Some(path));
        }
    }
    Ok(scan_for_extension(project_dir, extension))
}

/// Shallow scan: the project directory and one subdirectory level, sorted
/// by name, first match wins.
fn scan_for_extension(project_dir: &Path, extension: &str) -> Option<PathBuf> {
    for entry in WalkDir::new(project_dir)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            log::debug!("discovered {}", path.display());
            return Some(path.to_path_buf());
        }
    }
    None
}
