//! # Run Summary Rendering
//!
//! Turns a [`RunReport`] into the listing printed at the end of a run: one
//! line per request in plan order with its outcome marker and message,
//! closed by a counts line. Rendering is pure so the exact text can be
//! asserted; printing happens at the command layer.

use console::style;

use crate::orchestrator::{Outcome, RunReport};
use crate::output::{glyph, OutputConfig};

/// Renders the summary listing as a string.
pub fn render(report: &RunReport, output: &OutputConfig) -> String {
    let mut rendered = String::from("Run summary:\n");
    for status in report.statuses() {
        let name = match &status.variant {
            Some(variant) => format!("{} ({variant})", status.operation),
            None => status.operation.clone(),
        };
        let line = format!(
            "  {}{:<16} {}",
            marker(status.outcome, output),
            name,
            status.message
        );
        rendered.push_str(line.trim_end());
        rendered.push('\n');
    }
    let (succeeded, failed, skipped) = report.counts();
    rendered.push_str(&format!(
        "{succeeded} succeeded, {failed} failed, {skipped} skipped\n"
    ));
    rendered
}

/// Prints the summary to stdout.
pub fn print_summary(report: &RunReport, output: &OutputConfig) {
    print!("{}", render(report, output));
}

fn marker(outcome: Outcome, output: &OutputConfig) -> String {
    let (fancy, plain) = match outcome {
        Outcome::Success => ("✓", "ok"),
        Outcome::Failure => ("✗", "fail"),
        Outcome::Skipped => ("-", "skip"),
    };
    let text = format!("{:<5}", glyph(output, fancy, plain));
    if !output.use_color {
        return text;
    }
    let styled = match outcome {
        Outcome::Success => style(text).green(),
        Outcome::Failure => style(text).red(),
        Outcome::Skipped => style(text).yellow(),
    };
    styled.force_styling(true).to_string()
}
