//! The exercise controller.
//!
//! An [`Exercise`] owns the field bindings, the input widgets, the hints and
//! the rendered templates of one exercise, and runs the submission flow:
//!
//! 1. [`Exercise::click_submit`] checks the widgets. Empty or invalid
//!    answers move the gate to `NeedsConfirmation` with a warning.
//! 2. A second click, or a first click with complete answers, finalizes:
//!    a `Submit` notification is sent, every control is disabled and the
//!    scores are displayed.
//! 3. Changing any answer in between puts the gate back to `Initial`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{DrillError, Result};
use crate::events::{Notification, Notifier};
use crate::formatter::TemplateFormatter;
use crate::gate::{incomplete_warning, GateChange, SubmissionState, SubmitGate};
use crate::hints::HintDispenser;
use crate::observe::{EventBus, HandlerId};
use crate::render::{JsonDisplayFormatter, MimeBundle, Renderer};
use crate::widget::{score_text, InputWidget, WidgetAttribute, WidgetKind, WidgetSnapshot};

/// First line of every debug log.
pub const DEBUG_LOG_HEADER: &str = "Debug Messages:\n";

// ============================================================================
// Events and outcomes
// ============================================================================

/// Result of a click on the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The exercise was finalized.
    Submitted,
    /// Answers are empty or invalid; a second click will finalize.
    NeedsConfirmation,
    /// The control is disabled; nothing happened.
    Disabled,
}

/// A change of an exercise attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum ExerciseChange {
    /// Rendered preamble.
    Preamble(String),
    /// Rendered problem.
    Problem(String),
    /// Rendered feedback.
    Feedback(String),
    /// Hints shown so far.
    DisplayedHints(Vec<String>),
    /// Hint control label and availability.
    HintControl {
        /// Control label.
        label: String,
        /// Whether a request would dispense a hint.
        enabled: bool,
    },
    /// Total score text.
    TotalScore(String),
    /// Names of the rendered field bindings.
    Fields(Vec<String>),
    /// Ids of the widgets, in order.
    Widgets(Vec<String>),
    /// Debug log content.
    DebugLog(String),
    /// Debug flag.
    Debug(bool),
}

// ============================================================================
// Snapshot
// ============================================================================

/// State of a button-like control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlSnapshot {
    /// Label shown on the control.
    pub label: String,
    /// Whether clicks are ignored.
    pub disabled: bool,
}

/// Slot attribute names used by the exercise's templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAttributes {
    /// Attribute carrying the field name.
    pub field_name: String,
    /// Attribute carrying the format specifier.
    pub format_spec: String,
    /// Specifier requesting math notation.
    pub math_format_spec: String,
}

/// Serializable view of every synchronized exercise attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSnapshot {
    /// Exercise kind name.
    pub kind: String,
    /// Rendered preamble.
    pub preamble: String,
    /// Rendered problem.
    pub problem: String,
    /// Rendered feedback.
    pub feedback: String,
    /// Hints shown so far.
    pub displayed_hints: Vec<String>,
    /// Hint control.
    pub hint_control: ControlSnapshot,
    /// Submit control.
    pub submit_control: ControlSnapshot,
    /// Warning next to the submit control.
    pub warning: String,
    /// Total score text.
    pub total_score: String,
    /// Rendered field bindings.
    pub fields: IndexMap<String, MimeBundle>,
    /// Widgets by id.
    pub widgets: IndexMap<String, WidgetSnapshot>,
    /// Debug flag.
    pub debug: bool,
    /// Debug log content.
    pub debug_log: String,
    /// Clear-debug control.
    pub clear_debug_control: ControlSnapshot,
    /// Slot attribute names.
    pub slots: SlotAttributes,
}

// ============================================================================
// Exercise
// ============================================================================

/// A live exercise.
#[derive(Debug)]
pub struct Exercise {
    kind: String,
    formatter: TemplateFormatter,
    renderer: Rc<Renderer>,
    notifier: Rc<dyn Notifier>,
    fields: IndexMap<String, Value>,
    field_bundles: IndexMap<String, MimeBundle>,
    widgets: IndexMap<String, InputWidget>,
    hints: HintDispenser,
    displayed_hints: Vec<String>,
    preamble: String,
    problem: String,
    feedback: String,
    total_score: Option<f64>,
    max_total_score: Option<f64>,
    total_score_text: String,
    gate: Rc<RefCell<SubmitGate>>,
    debug: bool,
    debug_log: String,
    clear_debug_disabled: bool,
    bus: EventBus<ExerciseChange>,
}

impl Exercise {
    /// Creates an empty exercise that reports to `notifier`.
    #[must_use]
    pub fn new(kind: impl Into<String>, config: &Config, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            kind: kind.into(),
            formatter: TemplateFormatter::new(config),
            renderer: Rc::new(Renderer::new(Arc::new(JsonDisplayFormatter), config)),
            notifier,
            fields: IndexMap::new(),
            field_bundles: IndexMap::new(),
            widgets: IndexMap::new(),
            hints: HintDispenser::default(),
            displayed_hints: Vec::new(),
            preamble: String::new(),
            problem: String::new(),
            feedback: String::new(),
            total_score: None,
            max_total_score: None,
            total_score_text: String::new(),
            gate: Rc::new(RefCell::new(SubmitGate::new())),
            debug: config.debug,
            debug_log: DEBUG_LOG_HEADER.to_string(),
            clear_debug_disabled: false,
            bus: EventBus::new(),
        }
    }

    /// Replaces the rendering backend.
    ///
    /// Widgets created afterwards with [`Exercise::new_widget`] share it.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Rc::new(renderer);
        self
    }

    /// Exercise kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Registers an exercise change handler.
    pub fn on_change(&mut self, handler: impl FnMut(&ExerciseChange) + 'static) -> HandlerId {
        self.bus.subscribe(handler)
    }

    /// Registers a submit gate change handler.
    ///
    /// The handler must not call back into this exercise.
    pub fn on_gate_change(&mut self, handler: impl FnMut(&GateChange) + 'static) -> HandlerId {
        self.gate.borrow_mut().on_change(handler)
    }

    fn emit(&mut self, change: ExerciseChange) {
        self.bus.emit(&change);
    }

    // ------------------------------------------------------------------------
    // Fields
    // ------------------------------------------------------------------------

    /// Replaces the field bindings and renders each of them.
    pub fn set_fields(&mut self, fields: IndexMap<String, Value>) {
        self.field_bundles = fields
            .iter()
            .map(|(name, value)| (name.clone(), self.renderer.render(value)))
            .collect();
        self.fields = fields;
        tracing::debug!(count = self.fields.len(), "Fields assigned");
        let names = self.fields.keys().cloned().collect();
        self.emit(ExerciseChange::Fields(names));
    }

    /// Field bindings.
    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Rendered field bindings.
    #[must_use]
    pub const fn field_bundles(&self) -> &IndexMap<String, MimeBundle> {
        &self.field_bundles
    }

    // ------------------------------------------------------------------------
    // Widgets
    // ------------------------------------------------------------------------

    /// Creates a widget that shares this exercise's renderer and notifier.
    #[must_use]
    pub fn new_widget(&self, id: impl Into<String>, kind: WidgetKind) -> InputWidget {
        InputWidget::new(id, kind, Rc::clone(&self.renderer), Rc::clone(&self.notifier))
    }

    /// Replaces the widget collection.
    ///
    /// The previous widgets are dropped together with their handlers.
    pub fn set_widgets(&mut self, widgets: impl IntoIterator<Item = InputWidget>) {
        self.widgets.clear();
        for widget in widgets {
            self.insert_widget(widget);
        }
        let ids = self.widgets.keys().cloned().collect();
        self.emit(ExerciseChange::Widgets(ids));
    }

    /// Adds a widget, replacing any widget with the same id.
    pub fn add_widget(&mut self, widget: InputWidget) {
        self.insert_widget(widget);
        let ids = self.widgets.keys().cloned().collect();
        self.emit(ExerciseChange::Widgets(ids));
    }

    fn insert_widget(&mut self, mut widget: InputWidget) {
        let gate = Rc::clone(&self.gate);
        widget.on_change(move |change| {
            if change.attribute == WidgetAttribute::Value {
                gate.borrow_mut().reset();
            }
        });
        tracing::debug!(widget = widget.id(), kind = widget.kind_name(), "Widget attached");
        self.widgets.insert(widget.id().to_string(), widget);
    }

    /// Widgets by id, in insertion order.
    #[must_use]
    pub const fn widgets(&self) -> &IndexMap<String, InputWidget> {
        &self.widgets
    }

    /// Looks up a widget.
    #[must_use]
    pub fn widget(&self, id: &str) -> Option<&InputWidget> {
        self.widgets.get(id)
    }

    /// Looks up a widget for modification.
    ///
    /// # Errors
    ///
    /// `UnknownWidget` if there is no widget with that id.
    pub fn widget_mut(&mut self, id: &str) -> Result<&mut InputWidget> {
        self.widgets
            .get_mut(id)
            .ok_or_else(|| DrillError::unknown_widget(id))
    }

    // ------------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------------

    /// Renders the preamble against the field bindings.
    ///
    /// # Errors
    ///
    /// `UnknownFormatSpec` if a marker carries an unsupported specifier.
    pub fn render_preamble(&mut self, template: &str) -> Result<()> {
        self.preamble = self.formatter.format(template, &self.fields)?;
        self.emit(ExerciseChange::Preamble(self.preamble.clone()));
        Ok(())
    }

    /// Renders the problem against the field bindings and widget ids.
    ///
    /// # Errors
    ///
    /// `UnknownFormatSpec` if a marker carries an unsupported specifier.
    pub fn render_problem(&mut self, template: &str) -> Result<()> {
        self.problem = self
            .formatter
            .format(template, &(&self.fields, &self.widgets))?;
        self.emit(ExerciseChange::Problem(self.problem.clone()));
        Ok(())
    }

    /// Renders the feedback against the field bindings.
    ///
    /// # Errors
    ///
    /// `UnknownFormatSpec` if a marker carries an unsupported specifier.
    pub fn render_feedback(&mut self, template: &str) -> Result<()> {
        self.feedback = self.formatter.format(template, &self.fields)?;
        self.emit(ExerciseChange::Feedback(self.feedback.clone()));
        Ok(())
    }

    /// Rendered preamble.
    #[must_use]
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Rendered problem.
    #[must_use]
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Rendered feedback.
    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    // ------------------------------------------------------------------------
    // Hints
    // ------------------------------------------------------------------------

    /// Replaces the hints, clearing the hints shown so far.
    pub fn set_hints(&mut self, hints: Vec<String>) {
        self.displayed_hints.clear();
        self.emit(ExerciseChange::DisplayedHints(Vec::new()));
        self.hints.assign(hints);
        self.emit_hint_control();
    }

    /// Shows the next hint, formatted against the field bindings.
    ///
    /// Returns the formatted hint, or `None` if the hint control is
    /// disabled or exhausted.
    ///
    /// # Errors
    ///
    /// `UnknownFormatSpec` if the hint carries an unsupported specifier. The
    /// hint stays pending in that case.
    pub fn request_hint(&mut self) -> Result<Option<String>> {
        if !self.hints.is_enabled() {
            return Ok(None);
        }
        let Some(template) = self.hints.peek() else {
            return Ok(None);
        };
        let hint = self.formatter.format(template, &self.fields)?;
        self.hints.next_hint();

        tracing::debug!(given = self.hints.given(), "Hint displayed");
        self.displayed_hints.push(hint.clone());
        self.emit(ExerciseChange::DisplayedHints(self.displayed_hints.clone()));
        self.emit_hint_control();
        Ok(Some(hint))
    }

    /// Hints shown so far, oldest first.
    #[must_use]
    pub fn displayed_hints(&self) -> &[String] {
        &self.displayed_hints
    }

    /// The hint dispenser.
    #[must_use]
    pub const fn hints(&self) -> &HintDispenser {
        &self.hints
    }

    fn emit_hint_control(&mut self) {
        let change = ExerciseChange::HintControl {
            label: self.hints.label().to_string(),
            enabled: self.hints.is_enabled(),
        };
        self.emit(change);
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Handles a click on the submit control.
    pub fn click_submit(&mut self) -> SubmitOutcome {
        let state = {
            let gate = self.gate.borrow();
            if gate.disabled() {
                tracing::debug!("Submit ignored, control disabled");
                return SubmitOutcome::Disabled;
            }
            gate.state()
        };

        if state == SubmissionState::Initial {
            let invalid = self.widgets.values().any(InputWidget::is_invalid);
            let empty = self.widgets.values().any(InputWidget::is_empty);
            if let Some(warning) = incomplete_warning(invalid, empty) {
                self.gate.borrow_mut().request_confirmation(warning);
                return SubmitOutcome::NeedsConfirmation;
            }
        }

        self.submit();
        SubmitOutcome::Submitted
    }

    /// Finalizes the exercise without checking the answers.
    pub fn submit(&mut self) {
        tracing::info!(exercise = %self.kind, "Exercise submitted");
        self.notifier.notify(Notification::submit(self.kind.as_str()));
        self.disable();
        for widget in self.widgets.values_mut() {
            widget.display_score();
        }
        self.display_total_score();
    }

    fn disable(&mut self) {
        self.clear_debug_disabled = true;
        self.hints.set_disabled(true);
        self.emit_hint_control();
        self.gate.borrow_mut().set_disabled(true);
        for widget in self.widgets.values_mut() {
            widget.set_disabled(true);
        }
    }

    fn display_total_score(&mut self) {
        let text = score_text("Total Score", self.total_score, self.max_total_score);
        if !text.is_empty() && text != self.total_score_text {
            self.total_score_text = text;
            self.emit(ExerciseChange::TotalScore(self.total_score_text.clone()));
        }
    }

    /// Current state of the submit control.
    #[must_use]
    pub fn submission_state(&self) -> SubmissionState {
        self.gate.borrow().state()
    }

    /// Warning next to the submit control.
    #[must_use]
    pub fn warning(&self) -> String {
        self.gate.borrow().warning().to_string()
    }

    /// Whether the submit control is disabled.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.gate.borrow().disabled()
    }

    // ------------------------------------------------------------------------
    // Scores
    // ------------------------------------------------------------------------

    /// Sets the total score shown after submission.
    pub fn set_total_score(&mut self, score: Option<f64>) {
        self.total_score = score;
    }

    /// Sets the maximum total score shown after submission.
    pub fn set_max_total_score(&mut self, max_score: Option<f64>) {
        self.max_total_score = max_score;
    }

    /// Total score text, empty until the exercise is submitted.
    #[must_use]
    pub fn total_score_text(&self) -> &str {
        &self.total_score_text
    }

    // ------------------------------------------------------------------------
    // Debug
    // ------------------------------------------------------------------------

    /// Whether debug output is shown.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Shows or hides debug output.
    pub fn set_debug(&mut self, debug: bool) {
        if self.debug != debug {
            self.debug = debug;
            self.emit(ExerciseChange::Debug(debug));
        }
    }

    /// Appends a line to the debug log.
    pub fn log_debug(&mut self, message: &str) {
        self.debug_log.push_str(message);
        self.debug_log.push('\n');
        self.emit(ExerciseChange::DebugLog(self.debug_log.clone()));
    }

    /// Clears the debug log back to its header.
    ///
    /// Returns `false` if the clear-debug control is disabled.
    pub fn clear_debug(&mut self) -> bool {
        if self.clear_debug_disabled {
            return false;
        }
        self.debug_log = DEBUG_LOG_HEADER.to_string();
        self.emit(ExerciseChange::DebugLog(self.debug_log.clone()));
        true
    }

    /// Debug log content.
    #[must_use]
    pub fn debug_log(&self) -> &str {
        &self.debug_log
    }

    // ------------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------------

    /// Serializable view of the exercise.
    #[must_use]
    pub fn snapshot(&self) -> ExerciseSnapshot {
        let gate = self.gate.borrow();
        ExerciseSnapshot {
            kind: self.kind.clone(),
            preamble: self.preamble.clone(),
            problem: self.problem.clone(),
            feedback: self.feedback.clone(),
            displayed_hints: self.displayed_hints.clone(),
            hint_control: ControlSnapshot {
                label: self.hints.label().to_string(),
                disabled: !self.hints.is_enabled(),
            },
            submit_control: ControlSnapshot {
                label: gate.label().to_string(),
                disabled: gate.disabled(),
            },
            warning: gate.warning().to_string(),
            total_score: self.total_score_text.clone(),
            fields: self.field_bundles.clone(),
            widgets: self
                .widgets
                .iter()
                .map(|(id, widget)| (id.clone(), widget.snapshot()))
                .collect(),
            debug: self.debug,
            debug_log: self.debug_log.clone(),
            clear_debug_control: ControlSnapshot {
                label: "Clear Debug".to_string(),
                disabled: self.clear_debug_disabled,
            },
            slots: SlotAttributes {
                field_name: self.formatter.field_name_attribute().to_string(),
                format_spec: self.formatter.format_spec_attribute().to_string(),
                math_format_spec: self.formatter.math_format_spec().to_string(),
            },
        }
    }
}
