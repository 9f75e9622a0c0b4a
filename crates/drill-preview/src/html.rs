//! HTML preview generation.
//!
//! [`HtmlGenerator`] renders a [`Preview`] as a standalone page. Rendered
//! templates only contain empty embedding slots; the generator attaches
//! content to each of them:
//!
//! - a field binding shows its `text/html` payload, its `text/latex`
//!   payload when the slot asks for math notation, or its escaped
//!   `text/plain` payload
//! - a widget shows a static rendition of its current state
//! - any other slot stays empty

use std::fmt::Write;

use drill_core::render::{TEXT_HTML, TEXT_LATEX, TEXT_PLAIN};
use drill_core::{ChoiceStyle, MimeBundle, WidgetKind, WidgetSnapshot};
use regex::{Captures, Regex};

use crate::{Preview, PreviewError, Result};

/// Generates HTML pages from exercise previews.
pub struct HtmlGenerator<'a> {
    preview: &'a Preview,
}

impl<'a> HtmlGenerator<'a> {
    /// Creates a new HTML generator for the given preview.
    #[must_use]
    pub const fn new(preview: &'a Preview) -> Self {
        Self { preview }
    }

    /// Generates the complete page.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::InvalidData`] if the slot attribute names in
    /// the snapshot cannot be matched.
    pub fn generate(&self) -> Result<String> {
        let slots = self.slot_pattern()?;
        let exercise = &self.preview.exercise;
        let mut output = String::new();

        let _ = writeln!(output, "<!DOCTYPE html>");
        let _ = writeln!(output, "<html lang=\"en\">");
        let _ = writeln!(output, "<head>");
        let _ = writeln!(output, "<meta charset=\"utf-8\">");
        let _ = writeln!(output, "<title>{}</title>", escape_html(&exercise.kind));
        let _ = writeln!(output, "</head>");
        let _ = writeln!(output, "<body>");
        let _ = writeln!(
            output,
            "<article class=\"drill-exercise\" data-kind=\"{}\">",
            escape_html(&exercise.kind)
        );

        self.write_section(&mut output, "preamble", &exercise.preamble, &slots);
        self.write_section(&mut output, "problem", &exercise.problem, &slots);
        self.write_hints(&mut output, &slots);
        self.write_controls(&mut output);
        self.write_section(&mut output, "feedback", &exercise.feedback, &slots);
        self.write_total_score(&mut output);
        self.write_debug(&mut output);
        self.write_footer(&mut output);

        let _ = writeln!(output, "</article>");
        let _ = writeln!(output, "</body>");
        let _ = writeln!(output, "</html>");
        Ok(output)
    }

    /// Fills every slot in `html`.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::InvalidData`] if the slot attribute names in
    /// the snapshot cannot be matched.
    pub fn attach(&self, html: &str) -> Result<String> {
        Ok(self.attach_with(html, &self.slot_pattern()?))
    }

    fn slot_pattern(&self) -> Result<Regex> {
        let slots = &self.preview.exercise.slots;
        let pattern = format!(
            r#"(<span {}="([A-Za-z_][A-Za-z0-9_]*)"(?: {}="([^"]*)")?>)</span>"#,
            regex::escape(&slots.field_name),
            regex::escape(&slots.format_spec),
        );
        Regex::new(&pattern).map_err(|e| PreviewError::InvalidData(e.to_string()))
    }

    fn attach_with(&self, html: &str, slots: &Regex) -> String {
        slots
            .replace_all(html, |caps: &Captures| {
                let name = &caps[2];
                let format_spec = caps.get(3).map(|m| m.as_str());
                format!("{}{}</span>", &caps[1], self.slot_content(name, format_spec))
            })
            .into_owned()
    }

    fn slot_content(&self, name: &str, format_spec: Option<&str>) -> String {
        let exercise = &self.preview.exercise;
        if let Some(bundle) = exercise.fields.get(name) {
            let math = format_spec == Some(exercise.slots.math_format_spec.as_str());
            return field_content(bundle, math);
        }
        exercise
            .widgets
            .get(name)
            .map(render_widget)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------------

    fn write_section(&self, output: &mut String, class: &str, html: &str, slots: &Regex) {
        if html.is_empty() {
            return;
        }
        let _ = writeln!(
            output,
            "<section class=\"{class}\">{}</section>",
            self.attach_with(html, slots)
        );
    }

    fn write_hints(&self, output: &mut String, slots: &Regex) {
        let hints = &self.preview.exercise.displayed_hints;
        if hints.is_empty() {
            return;
        }
        let _ = writeln!(output, "<section class=\"hints\">");
        let _ = writeln!(output, "<ol>");
        for hint in hints {
            let _ = writeln!(output, "<li>{}</li>", self.attach_with(hint, slots));
        }
        let _ = writeln!(output, "</ol>");
        let _ = writeln!(output, "</section>");
    }

    fn write_controls(&self, output: &mut String) {
        let exercise = &self.preview.exercise;
        let _ = writeln!(output, "<section class=\"controls\">");
        let _ = writeln!(
            output,
            "<button class=\"hint\"{}>{}</button>",
            disabled_attr(exercise.hint_control.disabled),
            escape_html(&exercise.hint_control.label)
        );
        let _ = writeln!(
            output,
            "<button class=\"submit\"{}>{}</button>",
            disabled_attr(exercise.submit_control.disabled),
            escape_html(&exercise.submit_control.label)
        );
        if !exercise.warning.is_empty() {
            let _ = writeln!(
                output,
                "<span class=\"warning\">{}</span>",
                escape_html(&exercise.warning)
            );
        }
        let _ = writeln!(output, "</section>");
    }

    fn write_total_score(&self, output: &mut String) {
        let total = &self.preview.exercise.total_score;
        if !total.is_empty() {
            let _ = writeln!(
                output,
                "<section class=\"total-score\">{}</section>",
                escape_html(total)
            );
        }
    }

    fn write_debug(&self, output: &mut String) {
        let exercise = &self.preview.exercise;
        if !exercise.debug {
            return;
        }
        let _ = writeln!(output, "<section class=\"debug\">");
        let _ = writeln!(output, "<pre>{}</pre>", escape_html(&exercise.debug_log));
        let _ = writeln!(
            output,
            "<button class=\"clear-debug\"{}>{}</button>",
            disabled_attr(exercise.clear_debug_control.disabled),
            escape_html(&exercise.clear_debug_control.label)
        );
        let _ = writeln!(output, "</section>");
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(
            output,
            "<footer>Generated {}</footer>",
            self.preview.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}

// ============================================================================
// Slot content
// ============================================================================

fn field_content(bundle: &MimeBundle, math: bool) -> String {
    if let Some(html) = bundle.text(TEXT_HTML) {
        return html.to_string();
    }
    if math {
        if let Some(latex) = bundle.text(TEXT_LATEX) {
            return escape_html(latex);
        }
    }
    bundle.text(TEXT_PLAIN).map(escape_html).unwrap_or_default()
}

fn render_widget(widget: &WidgetSnapshot) -> String {
    let mut output = String::new();
    let disabled = disabled_attr(widget.disabled);
    let id = escape_html(&widget.id);

    let _ = write!(
        output,
        "<span class=\"drill-widget\" data-widget-kind=\"{}\"",
        widget.kind_name
    );
    if let Some(valid) = widget.valid {
        let _ = write!(output, " data-valid=\"{valid}\"");
    }
    if let Some(correct) = widget.correct {
        let _ = write!(output, " data-correct=\"{correct}\"");
    }
    if !widget.title.is_empty() {
        let _ = write!(output, " title=\"{}\"", escape_html(&widget.title));
    }
    output.push('>');

    match &widget.properties {
        WidgetKind::Checkbox { value } => {
            let checked = if *value { " checked" } else { "" };
            let _ = write!(output, "<input type=\"checkbox\" name=\"{id}\"{checked}{disabled}>");
        }
        WidgetKind::SingleChoice(choice) => match choice.style() {
            ChoiceStyle::Dropdown => {
                let _ = write!(output, "<select name=\"{id}\"{disabled}>");
                for i in 0..choice.options().len() {
                    let selected = if choice.index() == Some(i) { " selected" } else { "" };
                    let label = choice.label(i).unwrap_or_default();
                    let _ = write!(output, "<option{selected}>{}</option>", escape_html(&label));
                }
                output.push_str("</select>");
            }
            ChoiceStyle::RadioButtons { vertical } => {
                for i in 0..choice.options().len() {
                    if vertical && i > 0 {
                        output.push_str("<br>");
                    }
                    let checked = if choice.index() == Some(i) { " checked" } else { "" };
                    let label = choice.label(i).unwrap_or_default();
                    let _ = write!(
                        output,
                        "<label><input type=\"radio\" name=\"{id}\"{checked}{disabled}> {}</label>",
                        escape_html(&label)
                    );
                }
            }
        },
        WidgetKind::Slider(slider) => {
            let _ = write!(
                output,
                "<input type=\"range\" name=\"{id}\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{}\"{disabled}>",
                slider.minimum, slider.maximum, slider.step, slider.value
            );
        }
        WidgetKind::Text(text) => {
            let _ = write!(
                output,
                "<input type=\"text\" name=\"{id}\" size=\"{}\" value=\"{}\" placeholder=\"{}\"{disabled}>",
                text.width,
                escape_html(&text.value),
                escape_html(&text.placeholder)
            );
        }
        WidgetKind::TextArea { text, height } => {
            let _ = write!(
                output,
                "<textarea name=\"{id}\" rows=\"{height}\" cols=\"{}\" placeholder=\"{}\"{disabled}>{}</textarea>",
                text.width,
                escape_html(&text.placeholder),
                escape_html(&text.value)
            );
        }
    }

    if !widget.score.is_empty() {
        let _ = write!(output, "<span class=\"score\">{}</span>", escape_html(&widget.score));
    }
    if let Some(solution) = widget.solution.as_ref().filter(|_| widget.disabled) {
        let _ = write!(
            output,
            "<span class=\"solution\">{}</span>",
            field_content(solution, false)
        );
    }
    output.push_str("</span>");
    output
}

const fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

/// Escapes text for use in HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
