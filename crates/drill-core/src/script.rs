//! Scripted interactions.
//!
//! An [`Interaction`] is one inbound event from the learner or the exercise
//! engine. A [`Script`] is an ordered list of them, replayed against an
//! exercise with [`Exercise::apply`].
//!
//! ```json
//! {
//!   "steps": [
//!     {"action": "set_value", "widget": "x", "value": "2"},
//!     {"action": "submit"}
//!   ]
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DrillError, Result};
use crate::exercise::{Exercise, SubmitOutcome};

/// One inbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Interaction {
    /// The learner changes an answer.
    SetValue {
        /// Widget id.
        widget: String,
        /// New value.
        value: Value,
    },
    /// The learner picks a single-choice option by index.
    SetIndex {
        /// Widget id.
        widget: String,
        /// Option index, `None` to clear.
        index: Option<usize>,
    },
    /// The engine reports validity.
    SetValid {
        /// Widget id.
        widget: String,
        /// Tri-state validity.
        valid: Option<bool>,
    },
    /// The engine reports correctness.
    SetCorrect {
        /// Widget id.
        widget: String,
        /// Tri-state correctness.
        correct: Option<bool>,
    },
    /// The engine provides the solution.
    SetSolution {
        /// Widget id.
        widget: String,
        /// Solution value.
        solution: Option<Value>,
    },
    /// The engine provides a widget score.
    SetScore {
        /// Widget id.
        widget: String,
        /// Score.
        score: Option<f64>,
        /// Maximum score.
        max_score: Option<f64>,
    },
    /// The engine provides the total score.
    SetTotalScore {
        /// Score.
        score: Option<f64>,
        /// Maximum score.
        max_score: Option<f64>,
    },
    /// The engine replaces the field bindings.
    SetFields {
        /// New bindings.
        fields: IndexMap<String, Value>,
    },
    /// The engine replaces the hints.
    SetHints {
        /// Hint templates.
        hints: Vec<String>,
    },
    /// The engine renders the feedback.
    RenderFeedback {
        /// Feedback template.
        template: String,
    },
    /// The engine moves a slider's lower bound.
    SetMinimum {
        /// Widget id.
        widget: String,
        /// New minimum.
        minimum: f64,
    },
    /// The engine sets a widget description.
    SetDescription {
        /// Widget id.
        widget: String,
        /// Description text.
        description: String,
    },
    /// The engine sets a widget's grader info.
    SetInfo {
        /// Widget id.
        widget: String,
        /// Info text.
        info: String,
    },
    /// The engine writes to the debug log.
    LogDebug {
        /// Message line.
        message: String,
    },
    /// The learner asks for a hint.
    Hint,
    /// The learner clicks submit.
    Submit,
    /// The learner clears the debug log.
    ClearDebug,
}

/// What an interaction did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// State was updated.
    Applied,
    /// The submit control was clicked.
    Submit(SubmitOutcome),
    /// A hint was requested; `None` if none was given.
    Hint(Option<String>),
    /// The debug log was cleared, or the control was disabled.
    ClearDebug(bool),
}

/// An ordered list of interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Interactions in replay order.
    pub steps: Vec<Interaction>,
}

impl Script {
    /// Loads a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::DefinitionNotFound` if the file doesn't exist and
    /// `DrillError::DefinitionParseError` if it cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DrillError::definition_not_found(path)
            } else {
                DrillError::definition_parse(path, format!("failed to read file: {e}"))
            }
        })?;
        serde_json::from_str(&contents).map_err(|e| DrillError::definition_parse(path, e.to_string()))
    }
}

impl Exercise {
    /// Executes one interaction.
    ///
    /// # Errors
    ///
    /// `UnknownWidget` for an id not in the collection, and the usage
    /// errors of the underlying operation.
    pub fn apply(&mut self, interaction: &Interaction) -> Result<InteractionOutcome> {
        tracing::trace!(?interaction, "Applying interaction");
        match interaction {
            Interaction::SetValue { widget, value } => {
                self.widget_mut(widget)?.set_value(value.clone())?;
            }
            Interaction::SetIndex { widget, index } => {
                self.widget_mut(widget)?.set_index(*index)?;
            }
            Interaction::SetValid { widget, valid } => {
                self.widget_mut(widget)?.set_valid(*valid);
            }
            Interaction::SetCorrect { widget, correct } => {
                self.widget_mut(widget)?.set_correct(*correct);
            }
            Interaction::SetSolution { widget, solution } => {
                self.widget_mut(widget)?.set_solution(solution.clone());
            }
            Interaction::SetScore {
                widget,
                score,
                max_score,
            } => {
                let widget = self.widget_mut(widget)?;
                widget.set_displayed_score(*score);
                widget.set_displayed_max_score(*max_score);
            }
            Interaction::SetTotalScore { score, max_score } => {
                self.set_total_score(*score);
                self.set_max_total_score(*max_score);
            }
            Interaction::SetFields { fields } => self.set_fields(fields.clone()),
            Interaction::SetHints { hints } => self.set_hints(hints.clone()),
            Interaction::RenderFeedback { template } => self.render_feedback(template)?,
            Interaction::SetMinimum { widget, minimum } => {
                self.widget_mut(widget)?.set_minimum(*minimum)?;
            }
            Interaction::SetDescription {
                widget,
                description,
            } => {
                self.widget_mut(widget)?.set_description(description.clone());
            }
            Interaction::SetInfo { widget, info } => {
                self.widget_mut(widget)?.set_info(info.clone());
            }
            Interaction::LogDebug { message } => self.log_debug(message),
            Interaction::Hint => return Ok(InteractionOutcome::Hint(self.request_hint()?)),
            Interaction::Submit => return Ok(InteractionOutcome::Submit(self.click_submit())),
            Interaction::ClearDebug => return Ok(InteractionOutcome::ClearDebug(self.clear_debug())),
        }
        Ok(InteractionOutcome::Applied)
    }

    /// Executes every step of `script` in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Exercise::apply`].
    pub fn run(&mut self, script: &Script) -> Result<Vec<InteractionOutcome>> {
        script.steps.iter().map(|step| self.apply(step)).collect()
    }
}
