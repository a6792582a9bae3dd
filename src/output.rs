//! # Terminal Output Configuration
//!
//! Controls whether the run summary and other user-facing output use color
//! and unicode glyphs, based on terminal capabilities and user preference.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - the CLI flag
//! - `NO_COLOR` - disables color when set (per https://no-color.org/)
//! - `CLICOLOR=0` - disables color
//! - `CLICOLOR_FORCE=1` - forces color even without a TTY
//! - `TERM=dumb` - disables color
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kifab::output::{glyph, OutputConfig};
//!
//! let output = OutputConfig::from_env_and_flag("auto");
//! println!("{} gerbers", glyph(&output, "✓", "ok"));
//! ```

use std::env;

/// Whether user-facing output may use color and unicode glyphs.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Builds the configuration from the `--color` flag value.
    ///
    /// `always` forces color on (overriding `NO_COLOR`), `never` forces it
    /// off, anything else detects from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => detect_color_support(),
        };
        Self { use_color }
    }

    /// Configuration with color forced on.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Configuration with color forced off.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

fn detect_color_support() -> bool {
    // NO_COLOR disables even when set to an empty value.
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}

/// Picks the unicode glyph or its plain fallback per the configuration.
pub fn glyph<'a>(config: &OutputConfig, fancy: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        fancy
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_forces_color_on() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_never_forces_color_off() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_flag_value_is_case_insensitive() {
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
        assert!(!OutputConfig::from_env_and_flag("Never").use_color);
    }

    #[test]
    fn test_glyph_follows_color_setting() {
        assert_eq!(glyph(&OutputConfig::with_color(), "✓", "ok"), "✓");
        assert_eq!(glyph(&OutputConfig::without_color(), "✓", "ok"), "ok");
    }
}
