//! Template formatting for exercise text.
//!
//! Templates are plain text with three kinds of markup:
//!
//! - `<<name>>` and `<<name:spec>>` field markers
//! - `\<` and `\>` escape sequences
//! - everything else, passed through as-is
//!
//! Formatting replaces every bound field with an inert embedding slot that
//! the host fills later, and leaves unbound fields as visible placeholder
//! text. Only the marker characters are translated into HTML entities; the
//! rest of the template is not escaped here.
//!
//! # Example
//!
//! ```
//! use drill_core::formatter::TemplateFormatter;
//! use indexmap::IndexMap;
//!
//! let formatter = TemplateFormatter::default();
//! let mut fields: IndexMap<String, serde_json::Value> = IndexMap::new();
//!
//! let out = formatter.format("Result: <<x>>", &fields).unwrap();
//! assert_eq!(out, "Result: &lt;&lt;x&gt;&gt;");
//!
//! fields.insert("x".to_string(), serde_json::json!(5));
//! let out = formatter.format("Result: <<x>>", &fields).unwrap();
//! assert_eq!(out, r#"Result: <span data-drill-field-name="x"></span>"#);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::hash::BuildHasher;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::config::Config;
use crate::error::{DrillError, Result};

/// Body of a field marker: a name, optionally followed by `:` and a format spec.
fn field_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?::([^<>]*))?$").ok())
        .as_ref()
}

// ============================================================================
// Segments
// ============================================================================

/// One of the two escapable marker characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `<`
    Open,
    /// `>`
    Close,
}

impl Marker {
    /// The HTML entity shown in place of the marker.
    #[must_use]
    pub const fn entity(self) -> &'static str {
        match self {
            Self::Open => "&lt;",
            Self::Close => "&gt;",
        }
    }
}

/// A piece of a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, copied with only `<<` and `>>` translated.
    Literal(&'a str),
    /// An escaped marker (`\<` or `\>`).
    Escaped(Marker),
    /// A field marker.
    Field {
        /// Field name.
        name: &'a str,
        /// Format specifier, `None` for `<<name>>` and `<<name:>>`.
        format_spec: Option<&'a str>,
    },
}

/// Splits a template into segments, scanning left to right.
///
/// A `<<` that does not open a well-formed field marker is literal text.
#[must_use]
pub fn parse(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if matches!(bytes.get(i + 1), Some(b'<' | b'>')) => {
                push_literal(&mut segments, &template[literal_start..i]);
                let marker = if bytes[i + 1] == b'<' {
                    Marker::Open
                } else {
                    Marker::Close
                };
                segments.push(Segment::Escaped(marker));
                i += 2;
                literal_start = i;
            }
            b'<' if bytes.get(i + 1) == Some(&b'<') => {
                if let Some((field, end)) = parse_field(template, i) {
                    push_literal(&mut segments, &template[literal_start..i]);
                    segments.push(field);
                    i = end;
                    literal_start = i;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    push_literal(&mut segments, &template[literal_start..]);
    segments
}

fn push_literal<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Literal(text));
    }
}

/// Tries to read a field marker whose `<<` starts at `start`.
///
/// Returns the segment and the byte offset just past the closing `>>`.
fn parse_field(template: &str, start: usize) -> Option<(Segment<'_>, usize)> {
    let body_start = start + 2;
    let body_len = template[body_start..].find(">>")?;
    let body = &template[body_start..body_start + body_len];
    let caps = field_pattern()?.captures(body)?;
    let name = caps.get(1)?.as_str();
    let format_spec = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|spec| !spec.is_empty());
    Some((Segment::Field { name, format_spec }, body_start + body_len + 2))
}

/// Translates double markers in literal text.
fn escape_double_markers(text: &str) -> String {
    text.replace("<<", "&lt;&lt;").replace(">>", "&gt;&gt;")
}

// ============================================================================
// Field lookup
// ============================================================================

/// Answers whether a field name is bound.
///
/// The formatter never needs the bound values themselves: a bound field
/// becomes a slot that the host fills from the rendered representations.
pub trait FieldLookup {
    /// Returns `true` if `name` is bound.
    fn has_field(&self, name: &str) -> bool;
}

impl<V, S: BuildHasher> FieldLookup for HashMap<String, V, S> {
    fn has_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl<V> FieldLookup for BTreeMap<String, V> {
    fn has_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl<V, S: BuildHasher> FieldLookup for IndexMap<String, V, S> {
    fn has_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl FieldLookup for serde_json::Map<String, serde_json::Value> {
    fn has_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl FieldLookup for [&str] {
    fn has_field(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

/// Union of two lookups, used for the problem template (fields and widgets).
impl<A, B> FieldLookup for (&A, &B)
where
    A: FieldLookup + ?Sized,
    B: FieldLookup + ?Sized,
{
    fn has_field(&self, name: &str) -> bool {
        self.0.has_field(name) || self.1.has_field(name)
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// Expands templates into HTML with embedding slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFormatter {
    field_name_attribute: String,
    format_spec_attribute: String,
    math_format_spec: String,
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl TemplateFormatter {
    /// Creates a formatter using the slot prefix and math specifier from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            field_name_attribute: config.field_name_attribute(),
            format_spec_attribute: config.format_spec_attribute(),
            math_format_spec: config.math_format_spec.clone(),
        }
    }

    /// The specifier accepted for math notation.
    #[must_use]
    pub fn math_format_spec(&self) -> &str {
        &self.math_format_spec
    }

    /// Attribute carrying the field name on a slot.
    #[must_use]
    pub fn field_name_attribute(&self) -> &str {
        &self.field_name_attribute
    }

    /// Attribute carrying the format specifier on a slot.
    #[must_use]
    pub fn format_spec_attribute(&self) -> &str {
        &self.format_spec_attribute
    }

    /// Formats `template` against `bindings`.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::UnknownFormatSpec` if any field marker carries a
    /// specifier other than none or the math specifier.
    pub fn format<B: FieldLookup + ?Sized>(&self, template: &str, bindings: &B) -> Result<String> {
        let segments = parse(template);
        tracing::trace!(segments = segments.len(), "Formatting template");

        let mut output = String::with_capacity(template.len());
        for segment in segments {
            match segment {
                Segment::Literal(text) => output.push_str(&escape_double_markers(text)),
                Segment::Escaped(marker) => output.push_str(marker.entity()),
                Segment::Field { name, format_spec } => {
                    self.check_format_spec(name, format_spec)?;
                    if bindings.has_field(name) {
                        self.write_slot(&mut output, name, format_spec);
                    } else {
                        write_placeholder(&mut output, name, format_spec);
                    }
                }
            }
        }
        Ok(output)
    }

    fn check_format_spec(&self, name: &str, format_spec: Option<&str>) -> Result<()> {
        match format_spec {
            None => Ok(()),
            Some(spec) if spec == self.math_format_spec => Ok(()),
            Some(spec) => Err(DrillError::unknown_format_spec(
                name,
                spec,
                &self.math_format_spec,
            )),
        }
    }

    fn write_slot(&self, output: &mut String, name: &str, format_spec: Option<&str>) {
        // Writing into a String cannot fail.
        let _ = write!(output, r#"<span {}="{name}""#, self.field_name_attribute);
        if let Some(spec) = format_spec {
            let _ = write!(output, r#" {}="{spec}""#, self.format_spec_attribute);
        }
        output.push_str("></span>");
    }
}

fn write_placeholder(output: &mut String, name: &str, format_spec: Option<&str>) {
    output.push_str("&lt;&lt;");
    output.push_str(name);
    if let Some(spec) = format_spec {
        output.push(':');
        output.push_str(spec);
    }
    output.push_str("&gt;&gt;");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(names: &[&str]) -> IndexMap<String, serde_json::Value> {
        names.iter().map(|n| ((*n).to_string(), json!(1))).collect()
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_fields_and_literals() {
        let segments = parse("a <<x>> b <<y:latex>>");
        assert_eq!(
            segments,
            vec![
                Segment::Literal("a "),
                Segment::Field {
                    name: "x",
                    format_spec: None
                },
                Segment::Literal(" b "),
                Segment::Field {
                    name: "y",
                    format_spec: Some("latex")
                },
            ]
        );
    }

    #[test]
    fn test_parse_escapes() {
        let segments = parse(r"\<b\>");
        assert_eq!(
            segments,
            vec![
                Segment::Escaped(Marker::Open),
                Segment::Literal("b"),
                Segment::Escaped(Marker::Close),
            ]
        );
    }

    #[test]
    fn test_parse_empty_spec_is_none() {
        assert_eq!(
            parse("<<x:>>"),
            vec![Segment::Field {
                name: "x",
                format_spec: None
            }]
        );
    }

    #[test]
    fn test_parse_malformed_markers_are_literal() {
        assert_eq!(parse("<< x >>"), vec![Segment::Literal("<< x >>")]);
        assert_eq!(parse("<<1x>>"), vec![Segment::Literal("<<1x>>")]);
        assert_eq!(parse("<<x"), vec![Segment::Literal("<<x")]);
    }

    #[test]
    fn test_parse_triple_open_finds_inner_field() {
        assert_eq!(
            parse("<<<x>>"),
            vec![
                Segment::Literal("<"),
                Segment::Field {
                    name: "x",
                    format_spec: None
                },
            ]
        );
    }

    #[test]
    fn test_parse_backslash_without_marker_is_literal() {
        assert_eq!(parse(r"a\b"), vec![Segment::Literal(r"a\b")]);
    }

    // ------------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------------

    #[test]
    fn test_format_unbound_field_is_placeholder() {
        let out = TemplateFormatter::default()
            .format("Result: <<x>>", &fields(&[]))
            .unwrap();
        insta::assert_snapshot!(out, @"Result: &lt;&lt;x&gt;&gt;");
    }

    #[test]
    fn test_format_bound_field_is_slot() {
        let out = TemplateFormatter::default()
            .format("Result: <<x>>", &fields(&["x"]))
            .unwrap();
        insta::assert_snapshot!(out, @r#"Result: <span data-drill-field-name="x"></span>"#);
    }

    #[test]
    fn test_format_math_spec_on_slot() {
        let out = TemplateFormatter::default()
            .format("<<x:latex>>", &fields(&["x"]))
            .unwrap();
        assert_eq!(
            out,
            r#"<span data-drill-field-name="x" data-drill-format-spec="latex"></span>"#
        );
    }

    #[test]
    fn test_format_unbound_math_placeholder_keeps_spec() {
        let out = TemplateFormatter::default()
            .format("<<x:latex>>", &fields(&[]))
            .unwrap();
        assert_eq!(out, "&lt;&lt;x:latex&gt;&gt;");
    }

    #[test]
    fn test_format_unknown_spec_is_error() {
        let err = TemplateFormatter::default()
            .format("<<x:bold>>", &fields(&["x"]))
            .unwrap_err();
        assert!(
            matches!(&err, DrillError::UnknownFormatSpec { field, spec, .. } if field == "x" && spec == "bold"),
            "Expected UnknownFormatSpec, got: {err:?}"
        );

        // Unbound fields are checked too.
        assert!(TemplateFormatter::default()
            .format("<<y:bold>>", &fields(&[]))
            .is_err());
    }

    #[test]
    fn test_format_without_fields_only_translates_markers() {
        let template = r"if a << b and c >> d then \<tag\> stays <i>markup</i>";
        let out = TemplateFormatter::default()
            .format(template, &fields(&[]))
            .unwrap();
        insta::assert_snapshot!(out, @"if a &lt;&lt; b and c &gt;&gt; d then &lt;tag&gt; stays <i>markup</i>");
    }

    #[test]
    fn test_format_plain_text_round_trips() {
        let template = "No markers here, just <b>bold</b> & text.";
        let out = TemplateFormatter::default()
            .format(template, &fields(&[]))
            .unwrap();
        assert_eq!(out, template);
    }

    #[test]
    fn test_format_bound_never_placeholder_unbound_always() {
        let template = "<<a>> <<b>> <<c:latex>> <<d>>";
        let bound = fields(&["a", "c"]);
        let out = TemplateFormatter::default().format(template, &bound).unwrap();

        assert!(!out.contains("&lt;&lt;a&gt;&gt;"));
        assert!(!out.contains("&lt;&lt;c:latex&gt;&gt;"));
        assert!(out.contains("&lt;&lt;b&gt;&gt;"));
        assert!(out.contains("&lt;&lt;d&gt;&gt;"));
        assert!(out.contains(r#"data-drill-field-name="a""#));
        assert!(out.contains(r#"data-drill-field-name="c""#));
    }

    #[test]
    fn test_format_adjacent_slots_are_not_corrupted() {
        let out = TemplateFormatter::default()
            .format("<<a>>><<b>>", &fields(&["a", "b"]))
            .unwrap();
        assert_eq!(
            out,
            r#"<span data-drill-field-name="a"></span>><span data-drill-field-name="b"></span>"#
        );
    }

    #[test]
    fn test_format_escaped_marker_before_field() {
        let out = TemplateFormatter::default()
            .format(r"\<<<x>>", &fields(&[]))
            .unwrap();
        assert_eq!(out, "&lt;&lt;&lt;x&gt;&gt;");
    }

    #[test]
    fn test_format_union_lookup() {
        let values = fields(&["a"]);
        let widgets: &[&str] = &["w1"];
        let out = TemplateFormatter::default()
            .format("<<a>> <<w1>> <<w2>>", &(&values, widgets))
            .unwrap();
        assert!(out.contains(r#"data-drill-field-name="a""#));
        assert!(out.contains(r#"data-drill-field-name="w1""#));
        assert!(out.contains("&lt;&lt;w2&gt;&gt;"));
    }

    #[test]
    fn test_format_custom_config() {
        let config = Config {
            attribute_prefix: "quiz".to_string(),
            math_format_spec: "tex".to_string(),
            ..Config::default()
        };
        let formatter = TemplateFormatter::new(&config);
        let out = formatter.format("<<x:tex>>", &fields(&["x"])).unwrap();
        assert_eq!(
            out,
            r#"<span data-quiz-field-name="x" data-quiz-format-spec="tex"></span>"#
        );
        assert!(formatter.format("<<x:latex>>", &fields(&["x"])).is_err());
    }

    #[test]
    fn test_format_non_ascii_text() {
        let out = TemplateFormatter::default()
            .format("Lösung: <<x>> ✓", &fields(&[]))
            .unwrap();
        assert_eq!(out, "Lösung: &lt;&lt;x&gt;&gt; ✓");
    }
}
