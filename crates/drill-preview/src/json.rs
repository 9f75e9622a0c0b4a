//! JSON preview generation.
//!
//! [`JsonGenerator`] serializes a [`Preview`] as compact single-line JSON
//! or pretty-printed for reading.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{Preview, PreviewError, Result};

/// JSON preview generator.
pub struct JsonGenerator<'a> {
    preview: &'a Preview,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a new JSON generator for the given preview.
    #[must_use]
    pub const fn new(preview: &'a Preview) -> Self {
        Self { preview }
    }

    /// Generates compact JSON output (single line, no extra whitespace).
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::Serialization`] if JSON serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.preview).map_err(PreviewError::from)
    }

    /// Generates pretty-printed JSON output with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::Serialization`] if JSON serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.preview).map_err(PreviewError::from)
    }

    /// Writes the JSON preview to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::Serialization`] if JSON serialization fails.
    /// Returns [`PreviewError::Io`] if file creation or writing fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
