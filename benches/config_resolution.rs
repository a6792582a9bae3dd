//! Benchmarks for layered configuration resolution.
//!
//! These benchmarks measure building a [`Config`] from user trees of various
//! densities and the staged lookups every export handler performs: scalar
//! resolution with default fallback and the table union that assembles a
//! section's command-line arguments.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kifab::config::Config;
use serde_json::Value;

/// Empty user tree; every lookup falls through to the built-in defaults.
const EMPTY_TREE: &str = "{}";

/// A sparse tree like most projects write: identity plus a few overrides.
const SPARSE_TREE: &str = r#"{
  "project_name": "widget",
  "revision": "r4",
  "data": {
    "gerbers": {
      "--layers": "F.Cu,B.Cu,F.Silkscreen,B.Silkscreen,Edge.Cuts"
    }
  }
}"#;

/// Overrides touching every built-in section.
const DENSE_TREE: &str = r#"{
  "project_name": "widget",
  "revision": "r4",
  "kicad_cli_path": "/usr/local/bin/kicad-cli",
  "commands": ["gerbers", "drills", "positions", ["ddd", "STEP"], "bom"],
  "data": {
    "gerbers": {
      "--layers": "F.Cu,B.Cu,F.Silkscreen,B.Silkscreen,Edge.Cuts",
      "--subtract-soldermask": true,
      "kie_zip_files": false
    },
    "drills": {
      "--format": "gerber",
      "--generate-map": false
    },
    "positions": {
      "--format": "ascii",
      "--side": "front",
      "--exclude-dnp": true
    },
    "pcb_pdf": { "--black-and-white": true },
    "sch_pdf": { "--theme": "KiCad Classic" },
    "ddd": {
      "STEP": { "--no-dnp": true },
      "VRML": { "--units": "in" }
    },
    "render": { "--width": 3200, "--height": 1800 },
    "bom": {
      "CSV": { "--group-by": "Value" }
    },
    "drc": { "--format": "json" },
    "svg": { "--exclude-drawing-sheet": true }
  }
}"#;

/// Builds a user tree holding `sections` custom command sections with
/// `keys_per_section` argument keys each.
fn generate_user_tree(sections: usize, keys_per_section: usize) -> String {
    let mut tree = String::from("{\n  \"data\": {\n");
    for section in 0..sections {
        tree.push_str(&format!("    \"extra{section}\": {{\n"));
        tree.push_str(&format!(
            "      \"kie_command\": \"deliver-{section} --fast\",\n"
        ));
        for key in 0..keys_per_section {
            tree.push_str(&format!("      \"--flag{key}\": \"value{key}\""));
            tree.push_str(if key + 1 == keys_per_section {
                "\n"
            } else {
                ",\n"
            });
        }
        tree.push_str(if section + 1 == sections {
            "    }\n"
        } else {
            "    },\n"
        });
    }
    tree.push_str("  }\n}\n");
    tree
}

fn build(text: &str) -> Config {
    let tree: Value = serde_json::from_str(text).expect("benchmark tree must be valid JSON");
    Config::from_user_tree(tree)
}

fn bench_tree_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_building");

    group.bench_function("empty", |b| b.iter(|| build(black_box(EMPTY_TREE))));

    group.bench_function("sparse", |b| b.iter(|| build(black_box(SPARSE_TREE))));

    group.bench_function("dense", |b| b.iter(|| build(black_box(DENSE_TREE))));

    group.finish();
}

fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookups");

    let defaults_only = build(EMPTY_TREE);
    group.bench_function("default_fallback", |b| {
        b.iter(|| defaults_only.resolve_str(black_box("data.gerbers.--layers")))
    });

    let dense = build(DENSE_TREE);
    group.bench_function("user_hit", |b| {
        b.iter(|| dense.resolve_str(black_box("data.gerbers.--layers")))
    });

    group.bench_function("absent_key", |b| {
        b.iter(|| dense.try_resolve(black_box("data.gerbers.kie_command")))
    });

    group.bench_function("table_union", |b| {
        b.iter(|| dense.resolve_table(black_box("data.gerbers")))
    });

    group.finish();
}

fn bench_resolution_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution_scaling");

    // Test table union scaling with keys per section
    for keys in [5, 10, 20, 50] {
        let config = build(&generate_user_tree(1, keys));
        group.bench_with_input(BenchmarkId::new("table_keys", keys), &config, |b, config| {
            b.iter(|| config.resolve_table(black_box("data.extra0")))
        });
    }

    // Test tree building scaling with section count
    for sections in [5, 10, 20, 50] {
        let text = generate_user_tree(sections, 5);
        group.bench_with_input(
            BenchmarkId::new("tree_sections", sections),
            &text,
            |b, text| b.iter(|| build(black_box(text))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_building,
    bench_lookups,
    bench_resolution_scaling
);
criterion_main!(benches);
