//! Configuration for Drill exercises.
//!
//! Controls how templates name their embedding slots, which format
//! specifier selects math notation, and which delimiter characters are
//! trimmed when deriving a plain-text fallback from math payloads.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DrillError, Result};

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "drill.json";

fn prefix_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").ok())
        .as_ref()
}

/// Default prefix of the `data-*` attributes on embedding slots.
fn default_attribute_prefix() -> String {
    "drill".to_string()
}

/// Default format specifier for math notation.
fn default_math_format_spec() -> String {
    "latex".to_string()
}

/// Default delimiter characters stripped from math payloads.
fn default_math_delimiters() -> String {
    " $".to_string()
}

/// Main configuration for Drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Slots are tagged with `data-{prefix}-field-name` and `data-{prefix}-format-spec`.
    #[serde(default = "default_attribute_prefix")]
    pub attribute_prefix: String,

    /// The format specifier that requests math notation, e.g. `<<x:latex>>`.
    #[serde(default = "default_math_format_spec")]
    pub math_format_spec: String,

    /// Characters trimmed from both ends of a math payload to get plain text.
    #[serde(default = "default_math_delimiters")]
    pub math_delimiters: String,

    /// Debug mode for exercises whose definition does not set it.
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attribute_prefix: default_attribute_prefix(),
            math_format_spec: default_math_format_spec(),
            math_delimiters: default_math_delimiters(),
            debug: false,
        }
    }
}

impl Config {
    /// Loads configuration from a specific directory.
    ///
    /// Looks for `drill.json` in the given directory. If not found, returns
    /// the default configuration.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::ConfigParseError` if the file exists but cannot be
    /// read or holds invalid JSON, and `DrillError::ConfigValidationError` if
    /// a value breaks the rules checked by [`Config::validate`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(DrillError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| DrillError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `attributePrefix` must match `[a-z][a-z0-9-]*`
    /// - `mathFormatSpec` must be non-empty and free of `:`, `<`, `>` and whitespace
    /// - `mathDelimiters` must not be empty
    pub fn validate(&self) -> Result<()> {
        let prefix_ok = prefix_pattern().is_some_and(|re| re.is_match(&self.attribute_prefix));
        if !prefix_ok {
            return Err(DrillError::config_validation(
                format!(
                    "attributePrefix '{}' is not a valid data attribute prefix",
                    self.attribute_prefix
                ),
                "Use lowercase letters, digits and '-', starting with a letter",
            ));
        }

        if self.math_format_spec.is_empty()
            || self
                .math_format_spec
                .chars()
                .any(|c| matches!(c, ':' | '<' | '>') || c.is_whitespace())
        {
            return Err(DrillError::config_validation(
                format!(
                    "mathFormatSpec '{}' cannot be used inside a field marker",
                    self.math_format_spec
                ),
                "Pick a single word such as \"latex\"",
            ));
        }

        if self.math_delimiters.is_empty() {
            return Err(DrillError::config_validation(
                "mathDelimiters must not be empty",
                "Set mathDelimiters to the characters wrapping math payloads, e.g. \" $\"",
            ));
        }

        Ok(())
    }

    /// Name of the slot attribute carrying the field name.
    #[must_use]
    pub fn field_name_attribute(&self) -> String {
        format!("data-{}-field-name", self.attribute_prefix)
    }

    /// Name of the slot attribute carrying the format specifier.
    #[must_use]
    pub fn format_spec_attribute(&self) -> String {
        format!("data-{}-format-spec", self.attribute_prefix)
    }
}
