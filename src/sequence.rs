//! # Output Layout and Archive Sequencing
//!
//! Every operation writes into a deterministic category directory of the
//! form `<root>/R<revision>/<date>/<category>/`. Within it, two kinds of
//! artifact coexist:
//!
//! - **standalone outputs** (per-layer Gerber files, a PDF, a position
//!   table) are overwritten on every run, so re-running is idempotent;
//! - **archive outputs** (`<project>-<revision>-<tag>-<date>-<N>.zip`) are
//!   never clobbered: each run picks the highest existing `N` for the same
//!   project, revision, tag and date and adds one.
//!
//! [`clean_standalone_outputs`] removes stale standalone files before a new
//! generation pass while leaving the sequenced archives untouched, so a
//! layer dropped from the configuration does not survive as a leftover file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use glob::Pattern;
use regex::Regex;

use crate::error::Result;

/// Date stamp used in directory names and archive file names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves and creates the category directory for one operation.
///
/// Root precedence: `explicit_override` (CLI flag), else `configured_root`
/// (configuration value, empty meaning unset), else the project root. A
/// relative configured root is joined to the project root, never to the
/// process working directory; a relative override keeps its usual CLI
/// meaning and resolves against the working directory. The returned path
/// is always absolute: a relative project root is itself anchored to the
/// working directory first.
pub fn final_directory(
    project_root: &Path,
    configured_root: Option<&str>,
    explicit_override: Option<&Path>,
    revision: &str,
    date: NaiveDate,
    category: &str,
) -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    let base = match (explicit_override, configured_root) {
        (Some(path), _) => absolutize_from(path, &cwd),
        (None, Some(root)) if !root.is_empty() => {
            absolutize_from(Path::new(root), &absolutize_from(project_root, &cwd))
        }
        _ => absolutize_from(project_root, &cwd),
    };
    let dir = base
        .join(format!("R{revision}"))
        .join(date.format(DATE_FORMAT).to_string())
        .join(category);
    fs::create_dir_all(&dir)?;
    log::debug!("category directory resolved to {}", dir.display());
    Ok(dir)
}

fn absolutize_from(path: &Path, anchor: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        anchor.join(path)
    }
}

/// Builds an archive file name for the given sequence number.
pub fn archive_filename(
    project: &str,
    revision: &str,
    tag: &str,
    date: NaiveDate,
    sequence: u32,
    extension: &str,
) -> String {
    format!(
        "{project}-{revision}-{tag}-{}-{sequence}.{extension}",
        date.format(DATE_FORMAT)
    )
}

/// Scans `dir` for earlier archives of the same series and returns the next
/// free sequence number: one past the highest found, or `1` for none.
pub fn next_sequence_number(
    dir: &Path,
    project: &str,
    revision: &str,
    tag: &str,
    date: NaiveDate,
    extension: &str,
) -> Result<u32> {
    let pattern = Regex::new(&format!(
        r"^{}-{}-{}-{}-(\d+)\.{}$",
        regex::escape(project),
        regex::escape(revision),
        regex::escape(tag),
        date.format(DATE_FORMAT),
        regex::escape(extension)
    ))?;

    let mut highest = 0u32;
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(captures) = pattern.captures(name) {
                if let Ok(number) = captures[1].parse::<u32>() {
                    highest = highest.max(number);
                }
            }
        }
    }
    Ok(highest + 1)
}

/// Deletes plain files in a category directory, keeping `*.zip` archives
/// and subdirectories. Returns how many files were removed.
pub fn clean_standalone_outputs(dir: &Path) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let archives = Pattern::new("*.zip")?;
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if archives.matches(name) {
            continue;
        }
        fs::remove_file(&path)?;
        removed += 1;
    }
    if removed > 0 {
        log::debug!("removed {removed} stale files from {}", dir.display());
    }
    Ok(removed)
}
