//! ZIP bundling for archive artifacts.
//!
//! An archive bundles the standalone files of one category directory as they
//! stand after generation. Earlier archives in the same directory are never
//! included, so a sequence of runs produces independent snapshots.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use glob::Pattern;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Bundles every plain file of `dir` into a new ZIP at `archive_path`.
///
/// Subdirectories and existing `*.zip` files are left out. Entries are
/// stored in sorted name order so identical inputs produce identical
/// archives. When the directory holds nothing to bundle, no archive is
/// created and `Ok(0)` is returned.
pub fn bundle_directory(dir: &Path, archive_path: &Path) -> Result<usize> {
    let mut names = eligible_files(dir)?;
    if names.is_empty() {
        return Ok(0);
    }
    names.sort();

    let file = File::create(archive_path).map_err(|source| Error::Archive {
        path: archive_path.to_path_buf(),
        message: source.to_string(),
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for name in &names {
        writer.start_file(name.clone(), options)?;
        let bytes = fs::read(dir.join(name))?;
        writer.write_all(&bytes)?;
    }
    writer.finish()?;

    log::debug!(
        "bundled {} files into {}",
        names.len(),
        archive_path.display()
    );
    Ok(names.len())
}

fn eligible_files(dir: &Path) -> Result<Vec<String>> {
    let archives = Pattern::new("*.zip")?;
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if archives.matches(name) {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}
