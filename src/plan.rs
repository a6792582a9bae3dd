//! # Command Plan Parsing
//!
//! A plan is the ordered list of operations a run will attempt. It arrives in
//! one of two shapes and always normalizes to the same request sequence:
//!
//! 1. **Structured**: the JSON `commands` value from the configuration file,
//!    an array whose items are bare names (`"gerbers"`) or groups
//!    (`["ddd", "STEP"]`, first element the operation name, the rest
//!    positional arguments).
//! 2. **Flat text**: the `--commands` override string
//!    (`"gerbers, [ddd, STEP], _bom"`). Splitting happens on top-level
//!    commas only; commas inside a single bracket level stay within their
//!    group, and empty segments are skipped so trailing commas are harmless.
//!
//! Prefixing or suffixing a name with `_` keeps the request in the plan but
//! marks it disabled, so a temporarily switched-off operation still shows up
//! in the run summary. Names are validated against [`KNOWN_OPERATIONS`]
//! except for the opaque set ([`OPAQUE_OPERATIONS`]), whose arguments the
//! parser carries through uninterpreted.

use serde_json::Value;

use crate::error::{Error, Result};

/// Operations with a built-in generator.
pub const KNOWN_OPERATIONS: &[&str] = &[
    "gerbers",
    "drills",
    "positions",
    "pcb_pdf",
    "sch_pdf",
    "ddd",
    "render",
    "bom",
    "drc",
    "svg",
];

/// Operations whose arguments the plan grammar does not interpret.
///
/// `custom` runs whatever command line its named configuration section
/// defines, so its first argument is a section name rather than a variant
/// from a closed set.
pub const OPAQUE_OPERATIONS: &[&str] = &["custom"];

/// Marker that keeps a request in the plan but stops it from running.
pub const DISABLE_MARKER: char = '_';

/// One parsed entry of a command plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    /// Operation name with any disable marker stripped.
    pub name: String,
    /// Positional arguments from a bracketed group, in order.
    pub args: Vec<String>,
    /// False when the entry carried a disable marker.
    pub enabled: bool,
}

impl OperationRequest {
    /// The variant argument, when one was given (`["ddd", "STEP"]` ⇒ `STEP`).
    pub fn variant(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Normalized, validated sequence of operation requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPlan {
    requests: Vec<OperationRequest>,
}

impl CommandPlan {
    /// Parses the structured `commands` value from a configuration tree.
    pub fn from_value(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| invalid("the command list must be an array"))?;
        let mut requests = Vec::with_capacity(items.len());
        for item in items {
            requests.push(parse_value_item(item)?);
        }
        Ok(Self { requests })
    }

    /// Parses the flat text form used by the `--commands` override.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut requests = Vec::new();
        for segment in split_top_level(text)? {
            if let Some(request) = parse_text_segment(segment)? {
                requests.push(request);
            }
        }
        Ok(Self { requests })
    }

    /// Builds a one-request plan, as used by the single-operation commands.
    pub fn single(name: &str, args: Vec<String>) -> Result<Self> {
        Ok(Self {
            requests: vec![parse_name(name, args)?],
        })
    }

    pub fn requests(&self) -> &[OperationRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationRequest> {
        self.requests.iter()
    }
}

fn parse_value_item(item: &Value) -> Result<OperationRequest> {
    match item {
        Value::String(name) => parse_name(name, Vec::new()),
        Value::Array(parts) => {
            let mut words = Vec::with_capacity(parts.len());
            for part in parts {
                match part {
                    Value::String(word) => words.push(word.clone()),
                    other => {
                        return Err(invalid(format!(
                            "command group elements must be strings, found {other}"
                        )))
                    }
                }
            }
            let (name, args) = words
                .split_first()
                .ok_or_else(|| invalid("empty command group"))?;
            parse_name(name, args.to_vec())
        }
        other => Err(invalid(format!(
            "command entries must be names or groups, found {other}"
        ))),
    }
}

/// Splits on commas outside brackets. Exactly one bracket level is allowed.
fn split_top_level(text: &str) -> Result<Vec<&str>> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '[' => {
                depth += 1;
                if depth > 1 {
                    return Err(invalid("nested command groups are not supported"));
                }
            }
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid("unbalanced ']' in command list"))?;
            }
            ',' if depth == 0 => {
                segments.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(invalid("unbalanced '[' in command list"));
    }
    segments.push(&text[start..]);
    Ok(segments)
}

fn parse_text_segment(segment: &str) -> Result<Option<OperationRequest>> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Ok(None);
    }
    if let Some(opened) = segment.strip_prefix('[') {
        let inner = opened
            .strip_suffix(']')
            .ok_or_else(|| invalid(format!("command group must end with ']': '{segment}'")))?;
        let words: Vec<String> = inner
            .split(',')
            .map(|word| word.trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();
        let (name, args) = words
            .split_first()
            .ok_or_else(|| invalid("empty command group"))?;
        return parse_name(name, args.to_vec()).map(Some);
    }
    parse_name(segment, Vec::new()).map(Some)
}

fn parse_name(raw: &str, args: Vec<String>) -> Result<OperationRequest> {
    let (name, enabled) = strip_disable_marker(raw.trim());
    if name.is_empty() {
        return Err(invalid("empty operation name"));
    }
    if !KNOWN_OPERATIONS.contains(&name) && !OPAQUE_OPERATIONS.contains(&name) {
        return Err(invalid(format!(
            "unknown operation '{name}'; known operations are {}",
            KNOWN_OPERATIONS.join(", ")
        )));
    }
    Ok(OperationRequest {
        name: name.to_string(),
        args,
        enabled,
    })
}

/// A marker at either end disables the request; interior underscores are
/// part of the name (`pcb_pdf`).
fn strip_disable_marker(raw: &str) -> (&str, bool) {
    let mut name = raw;
    let mut enabled = true;
    if let Some(rest) = name.strip_prefix(DISABLE_MARKER) {
        name = rest;
        enabled = false;
    }
    if let Some(rest) = name.strip_suffix(DISABLE_MARKER) {
        name = rest;
        enabled = false;
    }
    (name, enabled)
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidCommand {
        message: message.into(),
    }
}
