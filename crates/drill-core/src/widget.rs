//! Input widgets and their synchronized state.
//!
//! An [`InputWidget`] holds the attributes shared by every input (validity,
//! solution, score display, hover text) and a [`WidgetKind`] with the
//! variant-specific payload. Every state change is emitted as a
//! [`WidgetChange`] on the widget's own [`EventBus`].

use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{DrillError, Result};
use crate::events::{Discard, Notification, Notifier};
use crate::observe::{EventBus, HandlerId};
use crate::render::{MimeBundle, Renderer};

// ============================================================================
// Variant payloads
// ============================================================================

/// How a single-choice widget is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceStyle {
    /// A drop-down list.
    Dropdown,
    /// A group of radio buttons.
    RadioButtons {
        /// Stack the buttons vertically.
        vertical: bool,
    },
}

/// Payload of a single-choice widget.
///
/// Only the selected index is stored; the value is always the option at
/// that index, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleChoice {
    options: Vec<Value>,
    labels: Vec<String>,
    index: Option<usize>,
    style: ChoiceStyle,
}

impl SingleChoice {
    /// Creates a choice over `options` with nothing selected.
    ///
    /// Labels default to the plain text of each option.
    #[must_use]
    pub fn new(options: Vec<Value>, style: ChoiceStyle) -> Self {
        let labels = options.iter().map(default_label).collect();
        Self {
            options,
            labels,
            index: None,
            style,
        }
    }

    /// Replaces the displayed labels.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Selects option `index`. Returns `None` if it is out of range.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Option<Self> {
        (index < self.options.len()).then(|| {
            self.index = Some(index);
            self
        })
    }

    /// Index of the first option equal to `value`.
    #[must_use]
    pub fn position(&self, value: &Value) -> Option<usize> {
        self.options.iter().position(|option| option == value)
    }

    /// The options in display order.
    #[must_use]
    pub fn options(&self) -> &[Value] {
        &self.options
    }

    /// The label shown for option `i`.
    #[must_use]
    pub fn label(&self, i: usize) -> Option<String> {
        self.labels
            .get(i)
            .cloned()
            .or_else(|| self.options.get(i).map(default_label))
    }

    /// The selected index.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// The selected option.
    #[must_use]
    pub fn selected(&self) -> Option<&Value> {
        self.index.and_then(|i| self.options.get(i))
    }

    /// The presentation style.
    #[must_use]
    pub const fn style(&self) -> ChoiceStyle {
        self.style
    }
}

fn default_label(option: &Value) -> String {
    match option {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Payload of a slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slider {
    /// Lower bound.
    pub minimum: f64,
    /// Upper bound.
    pub maximum: f64,
    /// Step size.
    pub step: f64,
    /// Current value.
    pub value: f64,
    /// Display width in characters.
    pub width: u32,
}

impl Slider {
    /// Returns `value` moved into `[minimum, maximum]`; the minimum wins if the bounds cross.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.maximum).max(self.minimum)
    }
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            minimum: 0.0,
            maximum: 100.0,
            step: 1.0,
            value: 0.0,
            width: 25,
        }
    }
}

/// Payload of a text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInput {
    /// Current text.
    pub value: String,
    /// Hint shown while the input is empty.
    pub placeholder: String,
    /// Display width in characters.
    pub width: u32,
}

impl Default for TextInput {
    fn default() -> Self {
        Self {
            value: String::new(),
            placeholder: String::new(),
            width: 20,
        }
    }
}

/// The closed set of input widget variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetKind {
    /// Boolean choice.
    Checkbox {
        /// Whether the box is ticked.
        value: bool,
    },
    /// One option out of many.
    SingleChoice(SingleChoice),
    /// Continuous value within bounds.
    Slider(Slider),
    /// Single-line text.
    Text(TextInput),
    /// Multi-line text.
    TextArea {
        /// Text payload.
        text: TextInput,
        /// Height in lines.
        height: u32,
    },
}

impl WidgetKind {
    /// An unticked checkbox.
    #[must_use]
    pub const fn checkbox() -> Self {
        Self::Checkbox { value: false }
    }

    /// A drop-down over `options`.
    #[must_use]
    pub fn dropdown(options: Vec<Value>) -> Self {
        Self::SingleChoice(SingleChoice::new(options, ChoiceStyle::Dropdown))
    }

    /// Radio buttons over `options`.
    #[must_use]
    pub fn radio_buttons(options: Vec<Value>, vertical: bool) -> Self {
        Self::SingleChoice(SingleChoice::new(
            options,
            ChoiceStyle::RadioButtons { vertical },
        ))
    }

    /// A slider over `[0, 100]` with step 1.
    #[must_use]
    pub fn slider() -> Self {
        Self::Slider(Slider::default())
    }

    /// An empty single-line text input.
    #[must_use]
    pub fn text() -> Self {
        Self::Text(TextInput::default())
    }

    /// An empty multi-line text input.
    #[must_use]
    pub fn text_area() -> Self {
        Self::TextArea {
            text: TextInput {
                width: 50,
                ..TextInput::default()
            },
            height: 4,
        }
    }

    /// Kind name used in notifications.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Checkbox { .. } => "Checkbox",
            Self::SingleChoice(choice) => match choice.style {
                ChoiceStyle::Dropdown => "Dropdown",
                ChoiceStyle::RadioButtons { .. } => "RadioButtons",
            },
            Self::Slider(_) => "Slider",
            Self::Text(_) => "Text",
            Self::TextArea { .. } => "TextArea",
        }
    }

    /// The current value as JSON.
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Checkbox { value } => Value::Bool(*value),
            Self::SingleChoice(choice) => choice.selected().cloned().unwrap_or(Value::Null),
            Self::Slider(slider) => Value::from(slider.value),
            Self::Text(text) | Self::TextArea { text, .. } => Value::String(text.value.clone()),
        }
    }

    /// The value a fresh widget of this variant starts with.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Self::Checkbox { .. } => Value::Bool(false),
            Self::SingleChoice(_) => Value::Null,
            Self::Slider(_) => Value::from(Slider::default().value),
            Self::Text(_) | Self::TextArea { .. } => Value::String(String::new()),
        }
    }

    /// Whether the widget counts as unanswered.
    ///
    /// Checkboxes and sliders are never empty: `false` and `0` are answers.
    /// The other variants are empty while their value equals the default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Checkbox { .. } | Self::Slider(_) => false,
            Self::SingleChoice(_) | Self::Text(_) | Self::TextArea { .. } => {
                self.value() == self.default_value()
            }
        }
    }
}

// ============================================================================
// Change events
// ============================================================================

/// Synchronized widget attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetAttribute {
    /// The answer.
    Value,
    /// Selected single-choice index.
    Index,
    /// Single-choice options.
    Options,
    /// Slider lower bound.
    Minimum,
    /// Slider upper bound.
    Maximum,
    /// Slider step.
    Step,
    /// Tri-state validity.
    Valid,
    /// Tri-state correctness.
    Correct,
    /// Whether input is blocked.
    Disabled,
    /// Author description.
    Description,
    /// Grader info.
    Info,
    /// Derived hover text.
    Title,
    /// Rendered solution.
    Solution,
    /// Rendered score text.
    Score,
}

impl WidgetAttribute {
    /// Attribute name as synchronized to the host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Index => "index",
            Self::Options => "options",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::Step => "step",
            Self::Valid => "valid",
            Self::Correct => "correct",
            Self::Disabled => "disabled",
            Self::Description => "description",
            Self::Info => "info",
            Self::Title => "title",
            Self::Solution => "solution",
            Self::Score => "score",
        }
    }
}

/// A change of one widget attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetChange {
    /// Which attribute changed.
    pub attribute: WidgetAttribute,
    /// Its new value.
    pub new_value: Value,
}

/// Formats a score line, `?` standing in for unknown parts.
///
/// Returns an empty string when both parts are unknown.
#[must_use]
pub fn score_text(label: &str, score: Option<f64>, max_score: Option<f64>) -> String {
    if score.is_none() && max_score.is_none() {
        return String::new();
    }
    let part = |v: Option<f64>| v.map_or_else(|| "?".to_string(), score_number);
    format!("{label}: {}/{}", part(score), part(max_score))
}

/// Formats a score number with a fractional part, e.g. `1.0` or `1.5`.
fn score_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let text = value.to_string();
    if value.is_finite() && value.abs() < 1e16 && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

fn option_value<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}

// ============================================================================
// InputWidget
// ============================================================================

/// A live input widget.
#[derive(Debug)]
pub struct InputWidget {
    id: String,
    kind: WidgetKind,
    valid: Option<bool>,
    correct: Option<bool>,
    disabled: bool,
    description: String,
    info: String,
    title: String,
    solution: Option<Value>,
    solution_bundle: Option<MimeBundle>,
    displayed_score: Option<f64>,
    displayed_max_score: Option<f64>,
    score: String,
    renderer: Rc<Renderer>,
    bus: EventBus<WidgetChange>,
}

impl InputWidget {
    /// Creates a widget that reports value changes to `notifier`.
    ///
    /// The notifier handler is the first handler on the widget's bus.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: WidgetKind,
        renderer: Rc<Renderer>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let id = id.into();
        let mut bus = EventBus::new();
        let widget_kind = kind.kind_name();
        let widget_id = id.clone();
        bus.subscribe(move |change: &WidgetChange| {
            if change.attribute == WidgetAttribute::Value {
                notifier.notify(Notification::value_changed(
                    widget_kind,
                    widget_id.clone(),
                    change.new_value.clone(),
                ));
            }
        });

        Self {
            id,
            kind,
            valid: None,
            correct: None,
            disabled: false,
            description: String::new(),
            info: String::new(),
            title: String::new(),
            solution: None,
            solution_bundle: None,
            displayed_score: None,
            displayed_max_score: None,
            score: String::new(),
            renderer,
            bus,
        }
    }

    /// Creates a widget with the default renderer that notifies nobody.
    #[must_use]
    pub fn standalone(id: impl Into<String>, kind: WidgetKind) -> Self {
        Self::new(id, kind, Rc::new(Renderer::default()), Rc::new(Discard))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Stable id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Variant payload.
    #[must_use]
    pub const fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    /// Kind name used in notifications.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    /// Current value as JSON.
    #[must_use]
    pub fn value(&self) -> Value {
        self.kind.value()
    }

    /// Whether the widget counts as unanswered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Tri-state validity.
    #[must_use]
    pub const fn valid(&self) -> Option<bool> {
        self.valid
    }

    /// Whether the widget blocks submission.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self.valid, Some(false))
    }

    /// Tri-state correctness.
    #[must_use]
    pub const fn correct(&self) -> Option<bool> {
        self.correct
    }

    /// Whether input is blocked.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// Author description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Grader info.
    #[must_use]
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Hover text: the description if set, otherwise the info.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The solution value, if any.
    #[must_use]
    pub const fn solution(&self) -> Option<&Value> {
        self.solution.as_ref()
    }

    /// The cached rendering of the solution.
    #[must_use]
    pub const fn solution_bundle(&self) -> Option<&MimeBundle> {
        self.solution_bundle.as_ref()
    }

    /// Score to show after submission.
    #[must_use]
    pub const fn displayed_score(&self) -> Option<f64> {
        self.displayed_score
    }

    /// Maximum score to show after submission.
    #[must_use]
    pub const fn displayed_max_score(&self) -> Option<f64> {
        self.displayed_max_score
    }

    /// Rendered score text, empty until [`InputWidget::display_score`] runs.
    #[must_use]
    pub fn score(&self) -> &str {
        &self.score
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    /// Registers a change handler after all existing ones.
    pub fn on_change(&mut self, handler: impl FnMut(&WidgetChange) + 'static) -> HandlerId {
        self.bus.subscribe(handler)
    }

    /// Removes a change handler.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn emit(&mut self, attribute: WidgetAttribute, new_value: Value) {
        tracing::trace!(widget = %self.id, attribute = attribute.as_str(), "Widget change");
        self.bus.emit(&WidgetChange {
            attribute,
            new_value,
        });
    }

    // ------------------------------------------------------------------------
    // Value
    // ------------------------------------------------------------------------

    /// Assigns a new value, coerced to the variant's type.
    ///
    /// Assigning the current value again changes nothing and emits nothing.
    ///
    /// # Errors
    ///
    /// `ValueTypeMismatch` if the JSON type does not fit the variant,
    /// `OptionNotFound` if a single-choice value is not one of the options.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        let before = self.value();
        let index_before = self.choice_index();

        match &mut self.kind {
            WidgetKind::Checkbox { value: current } => {
                *current = value
                    .as_bool()
                    .ok_or_else(|| DrillError::value_type_mismatch(&self.id, "boolean", &value))?;
            }
            WidgetKind::SingleChoice(choice) => {
                choice.index = if value.is_null() {
                    None
                } else {
                    Some(
                        choice
                            .options
                            .iter()
                            .position(|option| *option == value)
                            .ok_or_else(|| DrillError::option_not_found(&self.id, &value))?,
                    )
                };
            }
            WidgetKind::Slider(slider) => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| DrillError::value_type_mismatch(&self.id, "number", &value))?;
                slider.value = slider.clamp(number);
            }
            WidgetKind::Text(text) | WidgetKind::TextArea { text, .. } => match value {
                Value::String(new) => text.value = new,
                other => {
                    return Err(DrillError::value_type_mismatch(&self.id, "string", &other));
                }
            },
        }

        self.emit_value_changes(&before, index_before);
        Ok(())
    }

    fn choice_index(&self) -> Option<usize> {
        match &self.kind {
            WidgetKind::SingleChoice(choice) => choice.index,
            _ => None,
        }
    }

    fn emit_value_changes(&mut self, before: &Value, index_before: Option<usize>) {
        let index_after = self.choice_index();
        if index_after != index_before {
            self.emit(WidgetAttribute::Index, option_value(index_after));
        }
        let after = self.value();
        if after != *before {
            tracing::debug!(widget = %self.id, value = %after, "Value changed");
            self.emit(WidgetAttribute::Value, after);
        }
    }

    /// Selects a single-choice option by index, `None` clearing the selection.
    ///
    /// # Errors
    ///
    /// `ChoiceIndexOutOfRange` if `index` is not a valid option index,
    /// `WrongWidgetKind` if the widget is not a single choice.
    pub fn set_index(&mut self, index: Option<usize>) -> Result<()> {
        let before = self.value();
        let index_before = self.choice_index();
        let kind_name = self.kind.kind_name();

        let WidgetKind::SingleChoice(choice) = &mut self.kind else {
            return Err(DrillError::wrong_widget_kind(&self.id, kind_name, "index"));
        };
        if let Some(i) = index {
            if i >= choice.options.len() {
                return Err(DrillError::index_out_of_range(
                    &self.id,
                    i,
                    choice.options.len(),
                ));
            }
        }
        choice.index = index;

        self.emit_value_changes(&before, index_before);
        Ok(())
    }

    /// Replaces the single-choice options and clears the selection.
    ///
    /// # Errors
    ///
    /// `WrongWidgetKind` if the widget is not a single choice.
    pub fn set_options(&mut self, options: Vec<Value>) -> Result<()> {
        let before = self.value();
        let index_before = self.choice_index();
        let kind_name = self.kind.kind_name();

        let WidgetKind::SingleChoice(choice) = &mut self.kind else {
            return Err(DrillError::wrong_widget_kind(&self.id, kind_name, "options"));
        };
        choice.labels = options.iter().map(default_label).collect();
        choice.options = options;
        choice.index = None;
        let options_json = Value::Array(choice.options.clone());

        self.emit(WidgetAttribute::Options, options_json);
        self.emit_value_changes(&before, index_before);
        Ok(())
    }

    /// Sets the slider minimum and moves the value onto it.
    ///
    /// # Errors
    ///
    /// `WrongWidgetKind` if the widget is not a slider.
    pub fn set_minimum(&mut self, minimum: f64) -> Result<()> {
        let before = self.value();
        let kind_name = self.kind.kind_name();

        let WidgetKind::Slider(slider) = &mut self.kind else {
            return Err(DrillError::wrong_widget_kind(&self.id, kind_name, "minimum"));
        };
        slider.minimum = minimum;
        slider.value = minimum;

        self.emit(WidgetAttribute::Minimum, Value::from(minimum));
        self.emit_value_changes(&before, None);
        Ok(())
    }

    /// Sets the slider maximum, pulling the value down if it lies above.
    ///
    /// # Errors
    ///
    /// `WrongWidgetKind` if the widget is not a slider.
    pub fn set_maximum(&mut self, maximum: f64) -> Result<()> {
        let before = self.value();
        let kind_name = self.kind.kind_name();
        let WidgetKind::Slider(slider) = &mut self.kind else {
            return Err(DrillError::wrong_widget_kind(&self.id, kind_name, "maximum"));
        };
        slider.maximum = maximum;
        slider.value = slider.clamp(slider.value);

        self.emit(WidgetAttribute::Maximum, Value::from(maximum));
        self.emit_value_changes(&before, None);
        Ok(())
    }

    /// Sets the slider step.
    ///
    /// # Errors
    ///
    /// `WrongWidgetKind` if the widget is not a slider.
    pub fn set_step(&mut self, step: f64) -> Result<()> {
        let kind_name = self.kind.kind_name();
        let WidgetKind::Slider(slider) = &mut self.kind else {
            return Err(DrillError::wrong_widget_kind(&self.id, kind_name, "step"));
        };
        slider.step = step;
        self.emit(WidgetAttribute::Step, Value::from(step));
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Validation, hover text and solution
    // ------------------------------------------------------------------------

    /// Sets validity. Leaving the invalid state refreshes the hover text.
    pub fn set_valid(&mut self, valid: Option<bool>) {
        if self.valid == valid {
            return;
        }
        self.valid = valid;
        self.emit(WidgetAttribute::Valid, option_value(valid));
        if valid != Some(false) {
            self.refresh_title();
        }
    }

    /// Sets correctness.
    pub fn set_correct(&mut self, correct: Option<bool>) {
        if self.correct == correct {
            return;
        }
        self.correct = correct;
        self.emit(WidgetAttribute::Correct, option_value(correct));
    }

    /// Blocks or unblocks input.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled == disabled {
            return;
        }
        self.disabled = disabled;
        self.emit(WidgetAttribute::Disabled, Value::Bool(disabled));
    }

    /// Sets the description and refreshes the hover text.
    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        if self.description == description {
            return;
        }
        self.description = description;
        self.emit(
            WidgetAttribute::Description,
            Value::String(self.description.clone()),
        );
        self.refresh_title();
    }

    /// Sets the info text and refreshes the hover text.
    pub fn set_info(&mut self, info: impl Into<String>) {
        let info = info.into();
        if self.info == info {
            return;
        }
        self.info = info;
        self.emit(WidgetAttribute::Info, Value::String(self.info.clone()));
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        let title = if self.description.is_empty() {
            &self.info
        } else {
            &self.description
        };
        if *title != self.title {
            self.title = title.clone();
            self.emit(WidgetAttribute::Title, Value::String(self.title.clone()));
        }
    }

    /// Sets the solution, rendering it once and caching the bundle.
    pub fn set_solution(&mut self, solution: Option<Value>) {
        self.solution_bundle = solution.as_ref().map(|v| self.renderer.render(v));
        self.solution = solution;
        let rendered = self
            .solution_bundle
            .as_ref()
            .and_then(|bundle| serde_json::to_value(bundle).ok())
            .unwrap_or(Value::Null);
        self.emit(WidgetAttribute::Solution, rendered);
    }

    // ------------------------------------------------------------------------
    // Score
    // ------------------------------------------------------------------------

    /// Sets the score shown by [`InputWidget::display_score`].
    pub fn set_displayed_score(&mut self, score: Option<f64>) {
        self.displayed_score = score;
    }

    /// Sets the maximum score shown by [`InputWidget::display_score`].
    pub fn set_displayed_max_score(&mut self, max_score: Option<f64>) {
        self.displayed_max_score = max_score;
    }

    /// Renders the score text from the displayed score and maximum.
    pub fn display_score(&mut self) {
        let text = score_text("Score", self.displayed_score, self.displayed_max_score);
        if text != self.score {
            self.score = text;
            self.emit(WidgetAttribute::Score, Value::String(self.score.clone()));
        }
    }

    /// Serializable view of the widget.
    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            id: self.id.clone(),
            kind_name: self.kind_name().to_string(),
            value: self.value(),
            empty: self.is_empty(),
            valid: self.valid,
            correct: self.correct,
            disabled: self.disabled,
            title: self.title.clone(),
            score: self.score.clone(),
            solution: self.solution_bundle.clone(),
            properties: self.kind.clone(),
        }
    }
}

/// Serializable view of an [`InputWidget`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetSnapshot {
    /// Stable id.
    pub id: String,
    /// Kind name, e.g. `RadioButtons`.
    pub kind_name: String,
    /// Current value.
    pub value: Value,
    /// Whether the widget counts as unanswered.
    pub empty: bool,
    /// Tri-state validity.
    pub valid: Option<bool>,
    /// Tri-state correctness.
    pub correct: Option<bool>,
    /// Whether input is blocked.
    pub disabled: bool,
    /// Hover text.
    pub title: String,
    /// Rendered score text.
    pub score: String,
    /// Rendered solution.
    pub solution: Option<MimeBundle>,
    /// Variant payload.
    pub properties: WidgetKind,
}
