//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `kifab`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! The ten single-operation exporters share one implementation in [`export`];
//! [`run`] drives the whole configured command list in one pass.

pub mod completions;
pub mod export;
pub mod init;
pub mod run;
