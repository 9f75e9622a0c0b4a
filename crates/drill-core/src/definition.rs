//! Exercise definitions.
//!
//! A definition is the JSON description of one exercise: its kind, the
//! templates, the field bindings, the hints and the input widgets. It is
//! turned into a live [`Exercise`] with [`ExerciseDefinition::instantiate`].
//!
//! ```json
//! {
//!   "kind": "Quadratic",
//!   "problem": "Solve <<eq:latex>> for x: <<x>>",
//!   "fields": {"eq": {"$repr": {"text/latex": "$x^2 = 4$"}}},
//!   "widgets": {"x": {"kind": "text", "placeholder": "x = ?"}}
//! }
//! ```

use std::path::Path;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{DrillError, Result};
use crate::events::{Discard, Notifier};
use crate::exercise::{Exercise, SubmitOutcome};
use crate::formatter::TemplateFormatter;
use crate::script::{Interaction, InteractionOutcome, Script};
use crate::widget::{ChoiceStyle, InputWidget, SingleChoice, Slider, TextInput, WidgetKind};

// ============================================================================
// Definition
// ============================================================================

/// JSON description of an exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDefinition {
    /// Exercise kind name, reported on submission.
    pub kind: String,

    /// Preamble template.
    #[serde(default)]
    pub preamble: String,

    /// Problem template.
    #[serde(default)]
    pub problem: String,

    /// Feedback template, rendered after submission.
    #[serde(default)]
    pub feedback: String,

    /// Field bindings.
    #[serde(default)]
    pub fields: IndexMap<String, Value>,

    /// Hint templates in the order they are given.
    #[serde(default)]
    pub hints: Vec<String>,

    /// Input widgets by id.
    #[serde(default)]
    pub widgets: IndexMap<String, WidgetSpec>,

    /// Debug mode; falls back to the configuration when absent.
    #[serde(default)]
    pub debug: Option<bool>,
}

/// Description of one widget: a `kind` tag plus variant properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    /// Widget kind, e.g. `radio_buttons`.
    pub kind: String,

    /// Remaining properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl ExerciseDefinition {
    /// Loads a definition from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::DefinitionNotFound` if the file doesn't exist and
    /// `DrillError::DefinitionParseError` if it cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DrillError::definition_not_found(path));
            }
            Err(e) => {
                return Err(DrillError::definition_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let definition: Self = serde_json::from_str(&contents)
            .map_err(|e| DrillError::definition_parse(path, e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            kind = %definition.kind,
            widgets = definition.widgets.len(),
            "Loaded exercise definition"
        );
        Ok(definition)
    }

    /// Builds a live exercise with preamble and problem rendered.
    ///
    /// # Errors
    ///
    /// `NotAnInputWidget` for a widget whose kind is not an input,
    /// `UnknownFormatSpec` for a bad template marker, and the assignment
    /// errors of the widgets' initial values.
    pub fn instantiate(&self, config: &Config, notifier: Rc<dyn Notifier>) -> Result<Exercise> {
        let mut exercise = Exercise::new(self.kind.clone(), config, notifier);
        if let Some(debug) = self.debug {
            exercise.set_debug(debug);
        }
        exercise.set_fields(self.fields.clone());

        let widgets = self
            .widgets
            .iter()
            .map(|(id, spec)| spec.build(id, &exercise))
            .collect::<Result<Vec<_>>>()?;
        exercise.set_widgets(widgets);

        exercise.set_hints(self.hints.clone());
        exercise.render_preamble(&self.preamble)?;
        exercise.render_problem(&self.problem)?;
        Ok(exercise)
    }

    /// Applies one interaction to an exercise built from this definition.
    ///
    /// A submit that finalizes the exercise renders the feedback template.
    ///
    /// # Errors
    ///
    /// The errors of [`Exercise::apply`], and `UnknownFormatSpec` from the
    /// feedback template.
    pub fn apply(
        &self,
        exercise: &mut Exercise,
        interaction: &Interaction,
    ) -> Result<InteractionOutcome> {
        let outcome = exercise.apply(interaction)?;
        if outcome == InteractionOutcome::Submit(SubmitOutcome::Submitted) {
            tracing::debug!(kind = %self.kind, "Rendering feedback");
            exercise.render_feedback(&self.feedback)?;
        }
        Ok(outcome)
    }

    /// Replays every step of `script`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error returned by [`ExerciseDefinition::apply`].
    pub fn replay(
        &self,
        exercise: &mut Exercise,
        script: &Script,
    ) -> Result<Vec<InteractionOutcome>> {
        script
            .steps
            .iter()
            .map(|step| self.apply(exercise, step))
            .collect()
    }

    /// Checks that the definition can be instantiated and that every
    /// template, including feedback and hints, formats.
    ///
    /// # Errors
    ///
    /// The first error [`ExerciseDefinition::instantiate`] or formatting
    /// would raise.
    pub fn check(&self, config: &Config) -> Result<()> {
        let mut exercise = self.instantiate(config, Rc::new(Discard))?;
        exercise.render_feedback(&self.feedback)?;
        let formatter = TemplateFormatter::new(config);
        for hint in &self.hints {
            formatter.format(hint, &self.fields)?;
        }
        Ok(())
    }
}

// ============================================================================
// Widget specs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommonProps {
    description: String,
    info: String,
    solution: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckboxProps {
    value: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChoiceProps {
    options: Vec<Value>,
    labels: Option<Vec<String>>,
    index: Option<usize>,
    value: Option<Value>,
    vertical: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SliderProps {
    minimum: f64,
    maximum: f64,
    step: f64,
    value: Option<f64>,
    width: u32,
}

impl Default for SliderProps {
    fn default() -> Self {
        let slider = Slider::default();
        Self {
            minimum: slider.minimum,
            maximum: slider.maximum,
            step: slider.step,
            value: None,
            width: slider.width,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextProps {
    value: String,
    placeholder: String,
    width: Option<u32>,
    height: Option<u32>,
}

impl WidgetSpec {
    /// Builds the widget for `id`, sharing the exercise's renderer and
    /// notifier.
    ///
    /// Initial values are part of the widget's construction and are not
    /// reported as changes.
    ///
    /// # Errors
    ///
    /// `NotAnInputWidget` for kinds other than `checkbox`, `dropdown`,
    /// `radio_buttons`, `slider`, `text` and `text_area`; `Json` for
    /// malformed properties; `OptionNotFound` or `ChoiceIndexOutOfRange`
    /// for a bad initial selection.
    pub fn build(&self, id: &str, exercise: &Exercise) -> Result<InputWidget> {
        let kind = self.widget_kind(id)?;
        let common: CommonProps = self.props()?;

        let mut widget = exercise.new_widget(id, kind);
        widget.set_description(common.description);
        widget.set_info(common.info);
        if common.solution.is_some() {
            widget.set_solution(common.solution);
        }
        Ok(widget)
    }

    fn props<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.properties.clone()))?)
    }

    fn widget_kind(&self, id: &str) -> Result<WidgetKind> {
        match self.kind.as_str() {
            "checkbox" => {
                let props: CheckboxProps = self.props()?;
                Ok(WidgetKind::Checkbox { value: props.value })
            }
            "dropdown" | "radio_buttons" => {
                let props: ChoiceProps = self.props()?;
                let style = if self.kind == "dropdown" {
                    ChoiceStyle::Dropdown
                } else {
                    ChoiceStyle::RadioButtons {
                        vertical: props.vertical,
                    }
                };
                Ok(WidgetKind::SingleChoice(build_choice(id, props, style)?))
            }
            "slider" => {
                let props: SliderProps = self.props()?;
                let mut slider = Slider {
                    minimum: props.minimum,
                    maximum: props.maximum,
                    step: props.step,
                    value: props.minimum,
                    width: props.width,
                };
                if let Some(value) = props.value {
                    slider.value = slider.clamp(value);
                }
                Ok(WidgetKind::Slider(slider))
            }
            "text" => {
                let props: TextProps = self.props()?;
                Ok(WidgetKind::Text(props.into_text(TextInput::default().width)))
            }
            "text_area" => {
                let props: TextProps = self.props()?;
                let height = props.height.unwrap_or(4);
                Ok(WidgetKind::TextArea {
                    text: props.into_text(50),
                    height,
                })
            }
            other => Err(DrillError::not_an_input_widget(id, other)),
        }
    }
}

impl TextProps {
    fn into_text(self, default_width: u32) -> TextInput {
        TextInput {
            value: self.value,
            placeholder: self.placeholder,
            width: self.width.unwrap_or(default_width),
        }
    }
}

fn build_choice(id: &str, props: ChoiceProps, style: ChoiceStyle) -> Result<SingleChoice> {
    let len = props.options.len();
    let mut choice = SingleChoice::new(props.options, style);
    if let Some(labels) = props.labels {
        choice = choice.with_labels(labels);
    }

    let index = match (props.index, props.value) {
        (Some(index), _) => Some(index),
        (None, Some(value)) if !value.is_null() => Some(
            choice
                .position(&value)
                .ok_or_else(|| DrillError::option_not_found(id, &value))?,
        ),
        _ => None,
    };

    match index {
        Some(index) => choice
            .with_index(index)
            .ok_or_else(|| DrillError::index_out_of_range(id, index, len)),
        None => Ok(choice),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::events::NotificationLog;
    use serde_json::json;

    fn definition(json: Value) -> ExerciseDefinition {
        serde_json::from_value(json).unwrap()
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("drill-definition-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    #[test]
    fn test_load_missing_file() {
        let err = ExerciseDefinition::load("/nonexistent/exercise.json").unwrap_err();
        assert!(matches!(err, DrillError::DefinitionNotFound { .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_file("invalid.json", "{ not json");
        let err = ExerciseDefinition::load(&path).unwrap_err();
        assert!(matches!(err, DrillError::DefinitionParseError { .. }));
    }

    #[test]
    fn test_load_minimal() {
        let path = temp_file("minimal.json", r#"{"kind": "Minimal"}"#);
        let definition = ExerciseDefinition::load(&path).unwrap();
        assert_eq!(definition.kind, "Minimal");
        assert!(definition.widgets.is_empty());
        assert_eq!(definition.debug, None);
    }

    // ------------------------------------------------------------------------
    // Widgets
    // ------------------------------------------------------------------------

    #[test]
    fn test_non_input_widget_is_rejected() {
        let def = definition(json!({
            "kind": "K",
            "widgets": {"go": {"kind": "button"}}
        }));
        let err = def
            .instantiate(&Config::default(), Rc::new(Discard))
            .unwrap_err();
        assert!(
            matches!(&err, DrillError::NotAnInputWidget { key, kind } if key == "go" && kind == "button"),
            "Expected NotAnInputWidget, got: {err:?}"
        );
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_every_input_kind_builds() {
        let def = definition(json!({
            "kind": "K",
            "widgets": {
                "c": {"kind": "checkbox", "value": true},
                "d": {"kind": "dropdown", "options": ["a", "b"], "value": "b"},
                "r": {"kind": "radio_buttons", "options": [1, 2], "index": 0, "vertical": true},
                "s": {"kind": "slider", "minimum": 5, "maximum": 10},
                "t": {"kind": "text", "placeholder": "x = ?"},
                "ta": {"kind": "text_area", "height": 8}
            }
        }));
        let exercise = def.instantiate(&Config::default(), Rc::new(Discard)).unwrap();
        let kinds: Vec<_> = exercise.widgets().values().map(InputWidget::kind_name).collect();
        assert_eq!(
            kinds,
            vec!["Checkbox", "Dropdown", "RadioButtons", "Slider", "Text", "TextArea"]
        );

        assert_eq!(exercise.widget("c").unwrap().value(), json!(true));
        assert_eq!(exercise.widget("d").unwrap().value(), json!("b"));
        assert_eq!(exercise.widget("r").unwrap().value(), json!(1));
        assert_eq!(exercise.widget("s").unwrap().value(), json!(5.0));
        assert!(matches!(
            exercise.widget("ta").unwrap().kind(),
            WidgetKind::TextArea { height: 8, text } if text.width == 50
        ));
    }

    #[test]
    fn test_initial_values_are_not_notified() {
        let log = NotificationLog::new();
        let def = definition(json!({
            "kind": "K",
            "widgets": {"t": {"kind": "text", "value": "pre", "description": "Root"}}
        }));
        let exercise = def.instantiate(&Config::default(), Rc::new(log.clone())).unwrap();
        assert!(log.is_empty());
        assert_eq!(exercise.widget("t").unwrap().title(), "Root");
    }

    #[test]
    fn test_bad_initial_selection() {
        let def = definition(json!({
            "kind": "K",
            "widgets": {"d": {"kind": "dropdown", "options": ["a"], "index": 3}}
        }));
        assert!(matches!(
            def.instantiate(&Config::default(), Rc::new(Discard)).unwrap_err(),
            DrillError::ChoiceIndexOutOfRange { index: 3, len: 1, .. }
        ));

        let def = definition(json!({
            "kind": "K",
            "widgets": {"d": {"kind": "dropdown", "options": ["a"], "value": "z"}}
        }));
        assert!(matches!(
            def.instantiate(&Config::default(), Rc::new(Discard)).unwrap_err(),
            DrillError::OptionNotFound { .. }
        ));
    }

    #[test]
    fn test_initial_slider_value_is_clamped() {
        let def = definition(json!({
            "kind": "K",
            "widgets": {
                "hi": {"kind": "slider", "maximum": 10, "value": 40},
                "lo": {"kind": "slider", "minimum": 5, "value": 1}
            }
        }));
        let exercise = def.instantiate(&Config::default(), Rc::new(Discard)).unwrap();
        assert_eq!(exercise.widget("hi").unwrap().value(), json!(10.0));
        assert_eq!(exercise.widget("lo").unwrap().value(), json!(5.0));
    }

    #[test]
    fn test_feedback_rendered_on_submit() {
        let def = definition(json!({
            "kind": "K",
            "feedback": "Answer: <<a>>",
            "fields": {"a": 4},
            "widgets": {"t": {"kind": "text"}}
        }));
        let mut exercise = def.instantiate(&Config::default(), Rc::new(Discard)).unwrap();

        // Needs confirmation first: feedback stays empty.
        let outcome = def.apply(&mut exercise, &Interaction::Submit).unwrap();
        assert_eq!(
            outcome,
            InteractionOutcome::Submit(SubmitOutcome::NeedsConfirmation)
        );
        assert_eq!(exercise.feedback(), "");

        let script = Script {
            steps: vec![Interaction::Submit, Interaction::Submit],
        };
        let outcomes = def.replay(&mut exercise, &script).unwrap();
        assert_eq!(
            outcomes,
            vec![
                InteractionOutcome::Submit(SubmitOutcome::Submitted),
                InteractionOutcome::Submit(SubmitOutcome::Disabled),
            ]
        );
        assert_eq!(exercise.feedback(), r#"Answer: <span data-drill-field-name="a"></span>"#);
    }

    #[test]
    fn test_malformed_properties() {
        let def = definition(json!({
            "kind": "K",
            "widgets": {"c": {"kind": "checkbox", "value": "yes"}}
        }));
        assert!(matches!(
            def.instantiate(&Config::default(), Rc::new(Discard)).unwrap_err(),
            DrillError::Json(_)
        ));
    }

    #[test]
    fn test_solution_is_rendered() {
        let def = definition(json!({
            "kind": "K",
            "widgets": {"t": {"kind": "text", "solution": 4}}
        }));
        let exercise = def.instantiate(&Config::default(), Rc::new(Discard)).unwrap();
        let bundle = exercise.widget("t").unwrap().solution_bundle().unwrap();
        assert_eq!(bundle, &crate::render::MimeBundle::plain("4"));
    }

    // ------------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------------

    #[test]
    fn test_instantiate_renders_templates() {
        let def = definition(json!({
            "kind": "K",
            "preamble": "Given <<a>>",
            "problem": "Answer: <<x>>",
            "feedback": "Was <<a>>",
            "fields": {"a": 1},
            "widgets": {"x": {"kind": "text"}}
        }));
        let exercise = def.instantiate(&Config::default(), Rc::new(Discard)).unwrap();
        assert!(exercise.preamble().contains(r#"data-drill-field-name="a""#));
        assert!(exercise.problem().contains(r#"data-drill-field-name="x""#));
        assert_eq!(exercise.feedback(), "");
    }

    #[test]
    fn test_check_covers_feedback_and_hints() {
        let def = definition(json!({"kind": "K", "feedback": "<<a:bold>>"}));
        assert!(def.check(&Config::default()).is_err());

        let def = definition(json!({"kind": "K", "hints": ["<<a:bold>>"]}));
        assert!(def.check(&Config::default()).is_err());

        let def = definition(json!({"kind": "K", "hints": ["<<a:latex>>"]}));
        assert!(def.check(&Config::default()).is_ok());
    }

    #[test]
    fn test_debug_falls_back_to_config() {
        let config = Config {
            debug: true,
            ..Config::default()
        };
        let def = definition(json!({"kind": "K"}));
        assert!(def.instantiate(&config, Rc::new(Discard)).unwrap().debug());

        let def = definition(json!({"kind": "K", "debug": false}));
        assert!(!def.instantiate(&config, Rc::new(Discard)).unwrap().debug());
    }
}
