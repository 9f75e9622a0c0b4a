//! Drill Preview Generation
//!
//! Static previews of an exercise, built from an [`ExerciseSnapshot`]. A
//! preview shows what a host would display at the moment the snapshot was
//! taken, with every embedding slot filled in.
//!
//! # Generators
//!
//! - [`json::JsonGenerator`] - The snapshot as compact or pretty JSON
//! - [`HtmlGenerator`] - A standalone HTML page
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use drill_core::{Config, Discard, Exercise};
//! use drill_preview::{HtmlGenerator, Preview};
//!
//! let mut exercise = Exercise::new("Greeting", &Config::default(), Rc::new(Discard));
//! exercise.render_preamble("Say hello").unwrap();
//!
//! let preview = Preview::new(exercise.snapshot());
//! let html = HtmlGenerator::new(&preview).generate().unwrap();
//! assert!(html.contains("Say hello"));
//! ```

pub mod json;
mod html;

pub use html::HtmlGenerator;

use chrono::{DateTime, Utc};
use drill_core::ExerciseSnapshot;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during preview generation.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Failed to serialize the preview to JSON.
    #[error("failed to serialize preview: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write preview files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot cannot be previewed.
    #[error("invalid preview data: {0}")]
    InvalidData(String),
}

/// Result type for preview operations.
pub type Result<T> = std::result::Result<T, PreviewError>;

// ============================================================================
// Preview
// ============================================================================

/// An exercise snapshot stamped with the time the preview was generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    /// When the preview was generated.
    pub generated_at: DateTime<Utc>,
    /// The previewed exercise.
    pub exercise: ExerciseSnapshot,
}

impl Preview {
    /// Creates a preview stamped with the current time.
    #[must_use]
    pub fn new(exercise: ExerciseSnapshot) -> Self {
        Self::at(exercise, Utc::now())
    }

    /// Creates a preview with an explicit timestamp.
    #[must_use]
    pub const fn at(exercise: ExerciseSnapshot, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            exercise,
        }
    }
}
