//! # Layered Configuration Resolution
//!
//! This module loads the `kifab.json` project configuration and resolves
//! values against the compiled-in defaults from [`crate::defaults`]. The two
//! trees are never merged up front; every lookup walks the user tree first
//! and falls back to the default tree only when the user tree misses. A
//! sparse user file therefore inherits everything it does not mention, and a
//! key that exists in neither tree is a [`Error::ConfigContract`] bug, not a
//! silent `None`.
//!
//! ## Key Components
//!
//! - [`Config`]: the pair of trees plus the path the user tree came from.
//! - [`Config::resolve`] / [`Config::try_resolve`]: staged lookup by dotted
//!   path (`"data.gerbers.--layers"`).
//! - [`Config::resolve_table`]: a union view over an argument table, with
//!   per-key user precedence and default key order preserved.
//! - [`expand_home`]: `~` expansion applied to every resolved string.
//!
//! ## Loading Rules
//!
//! An explicitly requested file that is missing or malformed is fatal. A
//! conventional `kifab.json` that is absent merely logs a warning and leaves
//! the user tree empty; one that exists but fails to parse is fatal, since
//! silently ignoring a broken file the user wrote would mask typos.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::defaults::{default_tree, CONFIG_FILE_NAME, CONFIG_SCHEMA_VERSION};
use crate::error::{Error, Result};

/// Layered view over the user configuration tree and the built-in defaults.
#[derive(Debug)]
pub struct Config {
    /// Parsed user tree, or `Value::Null` when no configuration file exists.
    user: Value,
    /// Compiled-in default tree shared by every instance.
    defaults: &'static Value,
    /// Path the user tree was read from, if any.
    source: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration for a project.
    ///
    /// When `explicit` is given, that file must exist and parse; any problem
    /// with it is a [`Error::ConfigLoad`]. Otherwise the conventional
    /// `kifab.json` inside `project_dir` is used when present, and a missing
    /// conventional file downgrades to a warning plus pure defaults.
    pub fn load(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let source = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let conventional = project_dir.join(CONFIG_FILE_NAME);
                if conventional.is_file() {
                    Some(conventional)
                } else {
                    log::warn!(
                        "no {} found in {}; continuing with built-in defaults",
                        CONFIG_FILE_NAME,
                        project_dir.display()
                    );
                    None
                }
            }
        };

        let user = match &source {
            Some(path) => read_user_tree(path)?,
            None => Value::Null,
        };

        let config = Self {
            user,
            defaults: default_tree(),
            source,
        };
        config.warn_on_schema_drift();
        Ok(config)
    }

    /// Builds a configuration directly from an in-memory user tree.
    ///
    /// Used by tests and benchmarks; `Value::Null` yields a defaults-only
    /// configuration.
    pub fn from_user_tree(user: Value) -> Self {
        Self {
            user,
            defaults: default_tree(),
            source: None,
        }
    }

    /// Path of the loaded user configuration file, if one was read.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Resolves a dotted path, falling back to the default tree.
    ///
    /// The fallback branch runs only when the user tree misses, so resolution
    /// of one key never depends on any other key being well formed.
    pub fn resolve(&self, path: &str) -> Result<&Value> {
        self.try_resolve(path).ok_or_else(|| Error::ConfigContract {
            path: path.to_string(),
        })
    }

    /// Like [`Config::resolve`], but a key absent from both trees is `None`
    /// instead of an error. Handlers use this for sections the defaults
    /// cannot anticipate, such as custom command definitions.
    pub fn try_resolve(&self, path: &str) -> Option<&Value> {
        lookup(&self.user, path).or_else(|| lookup(self.defaults, path))
    }

    /// Resolves a path that must hold a string, with `~` expanded.
    pub fn resolve_str(&self, path: &str) -> Result<String> {
        match self.resolve(path)? {
            Value::String(text) => Ok(expand_home(text)),
            _ => Err(wrong_type(path, "a string")),
        }
    }

    /// Resolves a path that must hold a boolean.
    pub fn resolve_bool(&self, path: &str) -> Result<bool> {
        match self.resolve(path)? {
            Value::Bool(flag) => Ok(*flag),
            _ => Err(wrong_type(path, "a boolean")),
        }
    }

    /// String lookup that treats a key absent from both trees as `Ok(None)`.
    pub fn try_resolve_str(&self, path: &str) -> Result<Option<String>> {
        match self.try_resolve(path) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(expand_home(text))),
            Some(_) => Err(wrong_type(path, "a string")),
        }
    }

    /// Boolean lookup that treats a key absent from both trees as `Ok(None)`.
    pub fn try_resolve_bool(&self, path: &str) -> Result<Option<bool>> {
        match self.try_resolve(path) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(wrong_type(path, "a boolean")),
        }
    }

    /// Resolves an argument table as a union of the user and default tables.
    ///
    /// Keys the default table defines come first in default order; keys only
    /// the user supplies follow in user order. For every key the user value
    /// wins, so `resolve_table(p)[k]` always agrees with `resolve("p.k")`.
    pub fn resolve_table(&self, path: &str) -> Result<Map<String, Value>> {
        let user_table = match lookup(&self.user, path) {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => return Err(wrong_type(path, "a table")),
        };
        let default_table = match lookup(self.defaults, path) {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => return Err(wrong_type(path, "a table")),
        };
        if user_table.is_none() && default_table.is_none() {
            return Err(Error::ConfigContract {
                path: path.to_string(),
            });
        }

        let mut merged = Map::new();
        if let Some(defaults) = default_table {
            for (key, value) in defaults {
                let winner = user_table.and_then(|user| user.get(key)).unwrap_or(value);
                merged.insert(key.clone(), winner.clone());
            }
        }
        if let Some(user) = user_table {
            for (key, value) in user {
                if !merged.contains_key(key) {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(merged)
    }

    /// The command list value, in whichever shape the user wrote it.
    pub fn commands(&self) -> Result<&Value> {
        self.resolve("commands")
    }

    fn warn_on_schema_drift(&self) {
        if let Some(version) = self.user.get("version").and_then(Value::as_str) {
            if version != CONFIG_SCHEMA_VERSION {
                log::warn!(
                    "configuration declares schema version {version}, this build supports \
                     {CONFIG_SCHEMA_VERSION}; unknown keys will be ignored"
                );
            }
        }
    }
}

fn read_user_tree(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| Error::ConfigLoad {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    let tree: Value = serde_json::from_str(&text).map_err(|source| Error::ConfigLoad {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    if !tree.is_object() {
        return Err(Error::ConfigLoad {
            path: path.to_path_buf(),
            message: "top level must be a JSON object".to_string(),
        });
    }
    Ok(tree)
}

/// Walks one tree by dotted path, one object level per segment.
fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn wrong_type(path: &str, expected: &'static str) -> Error {
    Error::ConfigValue {
        path: path.to_string(),
        expected,
    }
}

/// Expands a leading `~` or `~/` to the current user's home directory.
///
/// Anything else, including `~user` forms, passes through untouched. When no
/// home directory can be determined the input is returned as-is.
pub fn expand_home(raw: &str) -> String {
    let Some(home) = dirs::home_dir() else {
        return raw.to_string();
    };
    if raw == "~" {
        return home.to_string_lossy().into_owned();
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        return home.join(rest).to_string_lossy().into_owned();
    }
    raw.to_string()
}
