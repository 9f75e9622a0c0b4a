//! Error types for Drill exercises.
//!
//! This module defines the error hierarchy for all core operations:
//! configuration and definition loading, template formatting, and the
//! usage errors raised by widget and exercise assignments.

use std::path::PathBuf;

/// A specialized `Result` type for Drill operations.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors that can occur while building, rendering or driving an exercise.
///
/// Usage errors are fatal to the call that raised them, never to the
/// exercise. Incomplete submissions and unresolved template fields are not
/// errors at all.
#[derive(Debug, thiserror::Error)]
pub enum DrillError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your drill.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Definition Loading Errors
    // ========================================================================
    /// Exercise definition file was not found at the specified path.
    #[error("Exercise definition not found: '{path}'\n\nSuggestion: Check the path passed on the command line")]
    DefinitionNotFound {
        /// Path where the definition was expected.
        path: PathBuf,
    },

    /// Exercise definition could not be parsed.
    #[error("Invalid exercise definition '{path}': {message}\n\nSuggestion: Check the definition against the documented widget kinds and fields")]
    DefinitionParseError {
        /// Path to the definition file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    // ========================================================================
    // Template Usage Errors
    // ========================================================================
    /// A field marker used a format specifier other than none or math notation.
    #[error("Unknown format specifier \"{spec}\" for field '{field}'\n\nSuggestion: Use <<{field}>> or <<{field}:{accepted}>>")]
    UnknownFormatSpec {
        /// Name of the field carrying the specifier.
        field: String,
        /// The rejected specifier.
        spec: String,
        /// The accepted math-notation specifier.
        accepted: String,
    },

    // ========================================================================
    // Widget Usage Errors
    // ========================================================================
    /// Something other than an input widget was assigned into the widget collection.
    #[error("All widgets have to be input widgets: '{key}' is a '{kind}'\n\nSuggestion: Use one of checkbox, dropdown, radio_buttons, slider, text, text_area")]
    NotAnInputWidget {
        /// Key of the offending entry.
        key: String,
        /// Kind that was supplied.
        kind: String,
    },

    /// A single-choice index outside the option list.
    #[error("Index {index} is out of range for widget '{widget}' with {len} options")]
    ChoiceIndexOutOfRange {
        /// Widget id.
        widget: String,
        /// The rejected index.
        index: usize,
        /// Number of options.
        len: usize,
    },

    /// A value whose JSON type does not fit the widget variant.
    #[error("Widget '{widget}' expects a {expected} value, got {found}")]
    ValueTypeMismatch {
        /// Widget id.
        widget: String,
        /// Expected value type.
        expected: &'static str,
        /// The JSON value that was supplied.
        found: String,
    },

    /// A single-choice value that is not one of the options.
    #[error("Value {value} is not an option of widget '{widget}'")]
    OptionNotFound {
        /// Widget id.
        widget: String,
        /// The rejected value.
        value: String,
    },

    /// No widget with the given id exists in the exercise.
    #[error("Unknown widget '{id}'")]
    UnknownWidget {
        /// The requested widget id.
        id: String,
    },

    /// An operation that only applies to one widget variant.
    #[error("Widget '{widget}' is a {kind} and does not support {operation}")]
    WrongWidgetKind {
        /// Widget id.
        widget: String,
        /// Kind name of the widget.
        kind: &'static str,
        /// The attempted operation.
        operation: &'static str,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DrillError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `DefinitionNotFound` error.
    #[must_use]
    pub fn definition_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DefinitionNotFound { path: path.into() }
    }

    /// Creates a new `DefinitionParseError`.
    #[must_use]
    pub fn definition_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DefinitionParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `UnknownFormatSpec` error.
    #[must_use]
    pub fn unknown_format_spec(
        field: impl Into<String>,
        spec: impl Into<String>,
        accepted: impl Into<String>,
    ) -> Self {
        Self::UnknownFormatSpec {
            field: field.into(),
            spec: spec.into(),
            accepted: accepted.into(),
        }
    }

    /// Creates a new `NotAnInputWidget` error.
    #[must_use]
    pub fn not_an_input_widget(key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::NotAnInputWidget {
            key: key.into(),
            kind: kind.into(),
        }
    }

    /// Creates a new `ChoiceIndexOutOfRange` error.
    #[must_use]
    pub fn index_out_of_range(widget: impl Into<String>, index: usize, len: usize) -> Self {
        Self::ChoiceIndexOutOfRange {
            widget: widget.into(),
            index,
            len,
        }
    }

    /// Creates a new `ValueTypeMismatch` error.
    #[must_use]
    pub fn value_type_mismatch(
        widget: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        Self::ValueTypeMismatch {
            widget: widget.into(),
            expected,
            found: found.to_string(),
        }
    }

    /// Creates a new `OptionNotFound` error.
    #[must_use]
    pub fn option_not_found(widget: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::OptionNotFound {
            widget: widget.into(),
            value: value.to_string(),
        }
    }

    /// Creates a new `UnknownWidget` error.
    #[must_use]
    pub fn unknown_widget(id: impl Into<String>) -> Self {
        Self::UnknownWidget { id: id.into() }
    }

    /// Creates a new `WrongWidgetKind` error.
    #[must_use]
    pub fn wrong_widget_kind(
        widget: impl Into<String>,
        kind: &'static str,
        operation: &'static str,
    ) -> Self {
        Self::WrongWidgetKind {
            widget: widget.into(),
            kind,
            operation,
        }
    }

    /// Returns `true` if this error reports a misuse of the API by the caller.
    ///
    /// Usage errors are surfaced immediately and leave the exercise untouched.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownFormatSpec { .. }
                | Self::NotAnInputWidget { .. }
                | Self::ChoiceIndexOutOfRange { .. }
                | Self::ValueTypeMismatch { .. }
                | Self::OptionNotFound { .. }
                | Self::UnknownWidget { .. }
                | Self::WrongWidgetKind { .. }
        )
    }

    /// Returns `true` if this error came from loading a file.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::DefinitionNotFound { .. }
                | Self::DefinitionParseError { .. }
                | Self::Io(_)
        )
    }
}
