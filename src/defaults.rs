//! Default values for kifab configuration.
//!
//! This module provides the built-in default configuration tree, compiled
//! into the binary. Every configuration path the program ever queries must
//! resolve against this tree; the user's `kifab.json` only ever narrows or
//! overrides it. That invariant is what lets the resolver treat a
//! both-trees miss as a programming error rather than a user error.

use std::sync::OnceLock;

use serde_json::Value;

/// Conventional name of the per-project configuration file.
pub const CONFIG_FILE_NAME: &str = "kifab.json";

/// Schema version of the configuration format understood by this build.
/// A user file carrying a different `version` gets a warning, not an error.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0";

/// The built-in default configuration.
///
/// `data` holds one section per operation. Keys with the `--` prefix are
/// forwarded to `kicad-cli` verbatim; keys with the `kie_` prefix are
/// consumed by kifab itself and never reach the tool. The `--output` key is
/// reserved as the configured output root (the path sequencer appends the
/// revision/date/category levels to it).
pub const DEFAULT_CONFIG: &str = r#"{
  "name": "KiFab.JSON",
  "description": "Configuration file for KiFab",
  "filetype": "json",
  "version": "1.0",
  "project_name": "",
  "revision": "0.1",
  "kicad_cli_path": "kicad-cli",
  "commands": [
    "gerbers",
    "drills",
    "positions",
    "pcb_pdf",
    "sch_pdf",
    ["ddd", "STEP"],
    "bom"
  ],
  "data": {
    "project": {
      "board_file": "",
      "schematic_file": ""
    },
    "gerbers": {
      "--output": "",
      "--layers": "F.Cu,B.Cu,F.Paste,B.Paste,F.Silkscreen,B.Silkscreen,F.Mask,B.Mask,User.Drawings,User.Comments,Edge.Cuts,F.Courtyard,B.Courtyard,F.Fab,B.Fab",
      "--no-protel-ext": true,
      "--no-netlist": true,
      "--use-drill-file-origin": true,
      "--subtract-soldermask": false,
      "--disable-aperture-macros": false,
      "kie_include_drill": true,
      "kie_zip_files": true
    },
    "drills": {
      "--output": "",
      "--format": "excellon",
      "--drill-origin": "absolute",
      "--excellon-units": "mm",
      "--excellon-zeros-format": "decimal",
      "--excellon-separate-th": true,
      "--generate-map": true,
      "--map-format": "pdf",
      "kie_zip_files": false
    },
    "positions": {
      "--output": "",
      "--side": "both",
      "--format": "csv",
      "--units": "mm",
      "--use-drill-file-origin": true,
      "--exclude-dnp": false,
      "kie_zip_files": true
    },
    "pcb_pdf": {
      "--output": "",
      "--layers": "F.Cu,B.Cu,F.Silkscreen,B.Silkscreen,F.Mask,B.Mask,Edge.Cuts",
      "--include-border-title": true,
      "--black-and-white": false,
      "--theme": "",
      "kie_zip_files": false
    },
    "sch_pdf": {
      "--output": "",
      "--black-and-white": false,
      "--exclude-drawing-sheet": false,
      "--theme": "",
      "kie_zip_files": false
    },
    "ddd": {
      "STEP": {
        "--output": "",
        "--force": true,
        "--subst-models": true,
        "--no-dnp": false,
        "kie_zip_files": false
      },
      "VRML": {
        "--output": "",
        "--force": true,
        "--units": "mm",
        "kie_zip_files": false
      }
    },
    "render": {
      "--output": "",
      "--width": 1600,
      "--height": 900,
      "--side": "top",
      "--background": "transparent",
      "--quality": "high",
      "--zoom": 1,
      "kie_zip_files": false
    },
    "bom": {
      "CSV": {
        "--output": "",
        "--fields": "Reference,Value,Footprint,${QUANTITY},${DNP}",
        "--labels": "Refs,Value,Footprint,Qty,DNP",
        "--group-by": "Value,Footprint",
        "--exclude-dnp": false,
        "kie_zip_files": false
      },
      "XML": {
        "--output": "",
        "kie_zip_files": false
      }
    },
    "drc": {
      "--output": "",
      "--format": "report",
      "--severity-error": true,
      "--exit-code-violations": false,
      "kie_zip_files": false
    },
    "svg": {
      "--output": "",
      "--black-and-white": false,
      "--exclude-drawing-sheet": false,
      "--theme": "",
      "kie_zip_files": false
    }
  }
}"#;

/// Returns the parsed built-in default tree.
///
/// The literal is part of the binary, so a parse failure here is a build
/// defect, not a runtime condition; it is asserted once and cached.
pub fn default_tree() -> &'static Value {
    static TREE: OnceLock<Value> = OnceLock::new();
    TREE.get_or_init(|| {
        serde_json::from_str(DEFAULT_CONFIG)
            .expect("built-in default configuration must be valid JSON")
    })
}
