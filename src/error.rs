//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `kifab` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures.
//!
//! ## Fatal vs. recoverable
//!
//! The variants split into two groups with different propagation rules:
//!
//! - Fatal errors (`ConfigLoad`, `ConfigContract`, `ConfigValue`,
//!   `InvalidCommand`) abort the whole run before or during setup and reach
//!   the user through the binary's top-level error path.
//! - Recoverable errors (`MissingInput`, `Tool`, `ToolExit` and the wrapped
//!   I/O family) are captured per operation by the orchestrator and surface
//!   as `Failure`/`Skipped` entries in the end-of-run summary; they never
//!   interrupt sibling operations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kifab operations
#[derive(Error, Debug)]
pub enum Error {
    /// A named configuration file could not be read or is not well-formed
    /// JSON. Raised for an explicitly supplied path, or for the conventional
    /// `kifab.json` when it exists but cannot be parsed.
    #[error("Configuration load error: {}: {message}", path.display())]
    ConfigLoad { path: PathBuf, message: String },

    /// A configuration path queried by the program is absent from both the
    /// user tree and the built-in default tree.
    ///
    /// The default tree must cover every path the program reads, so this is
    /// a code/data mismatch rather than a user mistake.
    #[error("Configuration contract violation: no value at '{path}' in either tree")]
    ConfigContract { path: String },

    /// A configuration value exists but has the wrong shape for the caller
    /// (e.g. a table where a string was expected).
    #[error("Configuration value error: '{path}' is not {expected}")]
    ConfigValue { path: String, expected: &'static str },

    /// A command list could not be parsed into a plan: malformed syntax, an
    /// empty bracket group, a non-string element, or an unknown operation
    /// name.
    #[error("Invalid command list: {message}")]
    InvalidCommand { message: String },

    /// A required source file for a single-operation invocation is missing.
    ///
    /// Within an aggregate run the same condition is recorded as a skip
    /// instead, so that a board-only project can still run its board
    /// operations.
    #[error("Missing {kind} file: {}", path.display())]
    MissingInput { kind: String, path: PathBuf },

    /// The external tool could not be launched at all (not installed, not on
    /// `PATH`, or not executable).
    #[error("Failed to launch '{command}': {message}")]
    Tool { command: String, message: String },

    /// The external tool ran but exited with a non-zero status.
    #[error(
        "'{command}' exited with {}{}",
        code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")),
        if stderr.trim().is_empty() {
            String::new()
        } else {
            format!(": {}", stderr.trim())
        }
    )]
    ToolExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An error occurred while assembling a ZIP archive.
    #[error("Archive error for {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A ZIP encoding error, wrapped from `zip::result::ZipError`.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
