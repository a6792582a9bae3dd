//! # KiFab Library
//!
//! This library provides the core functionality for exporting manufacturing
//! artifacts from KiCad projects by driving the `kicad-cli` tool. It is
//! designed to be used by the `kifab` command-line tool but can also be
//! integrated into other applications that automate fabrication outputs.
//!
//! ## Quick Example
//!
//! ```
//! use kifab::plan::CommandPlan;
//!
//! // Parse a command list in its compact text form. Group brackets select
//! // a format variant, a leading underscore disables an entry.
//! let plan = CommandPlan::from_text("gerbers, [ddd, STEP], _bom").unwrap();
//! assert_eq!(plan.len(), 3);
//!
//! let requests: Vec<_> = plan.iter().collect();
//! assert_eq!(requests[0].name, "gerbers");
//! assert_eq!(requests[1].variant(), Some("STEP"));
//! assert!(!requests[2].enabled);
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Configuration (`config`, `defaults`)**: A layered JSON store. Every
//!   lookup falls back from the user's `kifab.json` to the built-in default
//!   tree, so the rest of the code never handles "key absent" cases.
//! - **Command Plans (`plan`)**: The ordered list of operations to run, in
//!   either structured JSON form or the compact text form shown above.
//! - **Output Sequencing (`sequence`)**: Builds the dated, revisioned
//!   directory layout under the output root and numbers archive files so
//!   repeated runs never overwrite a delivered bundle.
//! - **Generators (`generators`)**: One function per operation that turns a
//!   configuration section into a `kicad-cli` invocation.
//! - **Orchestration (`orchestrator`, `report`)**: Executes a plan request
//!   by request, records per-operation outcomes, and never lets one failed
//!   export abort the rest of the run.
//!
//! ## Execution Flow
//!
//! A `run` pass executes the following high-level steps:
//!
//! 1.  **Load**: Read the user configuration over the built-in defaults.
//! 2.  **Plan**: Parse the command list into ordered operation requests.
//! 3.  **Discover**: Locate the board and schematic files.
//! 4.  **Execute**: For each request, resolve its section and output
//!     directory, then dispatch to its generator.
//! 5.  **Report**: Print the per-operation summary and derive the exit
//!     code from it.

pub mod archive;
pub mod config;
pub mod defaults;
pub mod error;
pub mod generators;
pub mod kicad;
pub mod orchestrator;
pub mod output;
pub mod plan;
pub mod project;
pub mod report;
pub mod sequence;

#[cfg(test)]
mod plan_proptest;
