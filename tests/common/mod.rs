//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ProjectFixture::new().with_board().with_stub_tool();
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::category_dir;
    pub use super::ProjectFixture;
}

/// Name of the board file every fixture writes.
pub const BOARD_FILE: &str = "board.kicad_pcb";

/// Name of the schematic file every fixture writes.
pub const SCHEMATIC_FILE: &str = "board.kicad_sch";

/// A KiCad project in a temporary directory, with optional design files,
/// configuration, and a stand-in `kicad-cli` executable.
///
/// The stub tool records every invocation into `kicad-cli.log` (one line
/// per call) and fabricates the output files or directories a real
/// `kicad-cli` would have produced, so sequencing and archiving run against
/// real artifacts. Setting the `STUB_FAIL` environment variable to a
/// subcommand name (for example `drc`) makes exactly that subcommand exit
/// non-zero.
pub struct ProjectFixture {
    temp_dir: assert_fs::TempDir,
}

impl ProjectFixture {
    /// Create a new fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add an empty board file.
    pub fn with_board(self) -> Self {
        self.with_file(BOARD_FILE, "(kicad_pcb (version 20240108))")
    }

    /// Add an empty schematic file.
    pub fn with_schematic(self) -> Self {
        self.with_file(SCHEMATIC_FILE, "(kicad_sch (version 20231120))")
    }

    /// Add a `kifab.json` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("kifab.json", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Install the stand-in `kicad-cli` executable.
    #[cfg(unix)]
    pub fn with_stub_tool(self) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let script = format!(
            r#"#!/bin/sh
# kicad-cli stand-in: records the invocation, then fabricates outputs.
printf '%s\n' "$*" >> "{log}"
if [ -n "$STUB_FAIL" ] && [ "$2" = "$STUB_FAIL" ]; then
    echo "stub failure for $2" >&2
    exit 5
fi
out=""
prev=""
for arg in "$@"; do
    [ "$prev" = "--output" ] && out="$arg"
    prev="$arg"
done
[ -z "$out" ] && exit 0
base="${{out##*/}}"
case "$base" in
    *.*) : > "$out" ;;
    *) mkdir -p "$out" && : > "$out/stub-F_Cu.gbr" && : > "$out/stub-B_Cu.gbr" ;;
esac
exit 0
"#,
            log = self.log_path().display()
        );

        let stub = self.stub_path();
        fs::write(&stub, script).expect("Failed to write stub tool");
        let mut permissions = fs::metadata(&stub)
            .expect("Failed to stat stub tool")
            .permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&stub, permissions).expect("Failed to mark stub tool executable");
        self
    }

    /// A configuration document pointing `kicad_cli_path` at the stub,
    /// with the given JSON command list.
    pub fn stub_config(&self, commands: &str) -> String {
        format!(
            r#"{{
  "version": "1.0",
  "revision": "0.1",
  "kicad_cli_path": "{}",
  "commands": {commands}
}}"#,
            self.stub_path().display()
        )
    }

    /// Path of the stand-in executable.
    pub fn stub_path(&self) -> PathBuf {
        self.temp_dir.path().join("kicad-cli")
    }

    /// Path of the invocation log the stub appends to.
    pub fn log_path(&self) -> PathBuf {
        self.temp_dir.path().join("kicad-cli.log")
    }

    /// Everything the stub tool was invoked with, one line per call.
    pub fn stub_log(&self) -> String {
        fs::read_to_string(self.log_path()).unwrap_or_default()
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The output root the tests pass via `-o`.
    pub fn output_root(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("kifab");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate `<root>/R<revision>/<some date>/<category>` without assuming
/// which day the run happened on.
#[allow(dead_code)]
pub fn category_dir(root: &Path, revision: &str, category: &str) -> Option<PathBuf> {
    let revision_dir = root.join(format!("R{revision}"));
    for entry in fs::read_dir(revision_dir).ok()? {
        let candidate = entry.ok()?.path().join(category);
        if candidate.is_dir() {
            return Some(candidate);
        }
    }
    None
}

/// File names (not directories) directly inside `dir`, sorted.
#[allow(dead_code)]
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| {
                    let entry = entry.ok()?;
                    entry
                        .file_type()
                        .ok()?
                        .is_file()
                        .then(|| entry.file_name().to_string_lossy().into_owned())
                })
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = ProjectFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_board_and_config() {
        let fixture = ProjectFixture::new()
            .with_board()
            .with_config(r#"{ "version": "1.0" }"#);
        assert!(fixture.path().join(BOARD_FILE).is_file());
        assert!(fixture.path().join("kifab.json").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_stub_tool_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = ProjectFixture::new().with_stub_tool();
        let mode = fs::metadata(fixture.stub_path()).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }

    #[test]
    fn test_stub_config_is_valid_json() {
        let fixture = ProjectFixture::new();
        let document = fixture.stub_config(r#"["gerbers", ["ddd", "VRML"]]"#);
        let parsed: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert!(parsed.get("kicad_cli_path").is_some());
    }
}
