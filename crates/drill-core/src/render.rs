//! Rendering of values into mime bundles.
//!
//! A [`MimeBundle`] is the set of representations a host can choose from
//! when it fills an embedding slot. The actual value-to-representation
//! conversion is delegated to an injected [`DisplayFormatter`]; the
//! [`Renderer`] wraps it with the rules every bundle must follow.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

/// Plain-text mime type.
pub const TEXT_PLAIN: &str = "text/plain";
/// Math-notation mime type.
pub const TEXT_LATEX: &str = "text/latex";
/// HTML mime type.
pub const TEXT_HTML: &str = "text/html";

/// Key under which a JSON object carries its own representations.
pub const REPR_KEY: &str = "$repr";
/// Key under which a JSON object carries representation metadata.
pub const METADATA_KEY: &str = "$metadata";

// ============================================================================
// MimeBundle
// ============================================================================

/// Representations of one value, keyed by mime type, plus per-type metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MimeBundle {
    /// Mime type to payload.
    pub data: BTreeMap<String, Value>,
    /// Mime type to metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl MimeBundle {
    /// A bundle with a single plain-text representation.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::default().with(TEXT_PLAIN, Value::String(text.into()))
    }

    /// Adds a representation.
    #[must_use]
    pub fn with(mut self, mime: impl Into<String>, payload: Value) -> Self {
        self.data.insert(mime.into(), payload);
        self
    }

    /// Returns `true` if there is no representation at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the payload for `mime` if it is a string.
    #[must_use]
    pub fn text(&self, mime: &str) -> Option<&str> {
        self.data.get(mime).and_then(Value::as_str)
    }
}

// ============================================================================
// DisplayFormatter
// ============================================================================

/// Converts arbitrary values into representations.
///
/// This is the host's rendering backend. It is injected into the
/// [`Renderer`] rather than looked up globally.
pub trait DisplayFormatter: std::fmt::Debug + Send + Sync {
    /// Returns every representation the backend knows for `value`.
    fn format(&self, value: &Value) -> MimeBundle;
}

/// Default backend for JSON values.
///
/// - `null` has no representation.
/// - `{"$repr": {...}, "$metadata": {...}}` carries its own representations.
/// - Everything else renders as its compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDisplayFormatter;

impl DisplayFormatter for JsonDisplayFormatter {
    fn format(&self, value: &Value) -> MimeBundle {
        match value {
            Value::Null => MimeBundle::default(),
            Value::Object(map) => {
                if let Some(Value::Object(repr)) = map.get(REPR_KEY) {
                    let data = repr.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                    let metadata = match map.get(METADATA_KEY) {
                        Some(Value::Object(meta)) => {
                            meta.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
                        }
                        _ => BTreeMap::new(),
                    };
                    MimeBundle { data, metadata }
                } else {
                    MimeBundle::plain(value.to_string())
                }
            }
            other => MimeBundle::plain(other.to_string()),
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders values into bundles that are safe to embed.
#[derive(Debug, Clone)]
pub struct Renderer {
    backend: Arc<dyn DisplayFormatter>,
    delimiters: Vec<char>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Arc::new(JsonDisplayFormatter), &Config::default())
    }
}

impl Renderer {
    /// Creates a renderer around `backend`, trimming `config.math_delimiters`.
    #[must_use]
    pub fn new(backend: Arc<dyn DisplayFormatter>, config: &Config) -> Self {
        Self {
            backend,
            delimiters: config.math_delimiters.chars().collect(),
        }
    }

    /// Renders `value`.
    ///
    /// Strings are always plain text, so they are never shown quoted. A
    /// math representation always comes with a plain-text fallback derived
    /// from it.
    #[must_use]
    pub fn render(&self, value: &Value) -> MimeBundle {
        if let Value::String(text) = value {
            return MimeBundle::plain(text.clone());
        }

        let mut bundle = self.backend.format(value);
        let plain = bundle
            .text(TEXT_LATEX)
            .map(|latex| latex.trim_matches(|c| self.delimiters.contains(&c)).to_string());
        if let Some(plain) = plain {
            bundle.data.insert(TEXT_PLAIN.to_string(), Value::String(plain));
        }
        bundle
    }
}
