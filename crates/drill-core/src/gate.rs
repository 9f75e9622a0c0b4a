//! Two-step submission gate.
//!
//! The gate holds the state of the submit control. A submission with empty
//! or invalid answers is not final: it moves the gate to
//! [`SubmissionState::NeedsConfirmation`] and shows a warning, and only a
//! second submission goes through. Any change of an answer puts the gate
//! back to [`SubmissionState::Initial`].

use serde::Serialize;

use crate::observe::{EventBus, HandlerId};

// ============================================================================
// SubmissionState
// ============================================================================

/// State of the submit control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// A submission is checked for empty and invalid answers.
    #[default]
    Initial,
    /// A submission goes through unconditionally.
    NeedsConfirmation,
}

impl SubmissionState {
    /// Label of the submit control.
    ///
    /// # Examples
    ///
    /// ```
    /// use drill_core::SubmissionState;
    ///
    /// assert_eq!(SubmissionState::Initial.label(), "Submit");
    /// assert_eq!(SubmissionState::NeedsConfirmation.label(), "Submit anyway?");
    /// ```
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "Submit",
            Self::NeedsConfirmation => "Submit anyway?",
        }
    }
}

/// Warning shown for a submission that needs confirmation.
///
/// Returns `None` when nothing is invalid or empty.
#[must_use]
pub const fn incomplete_warning(invalid: bool, empty: bool) -> Option<&'static str> {
    match (invalid, empty) {
        (true, true) => Some("There are empty and invalid input fields."),
        (true, false) => Some("There are invalid input fields."),
        (false, true) => Some("There are empty input fields."),
        (false, false) => None,
    }
}

// ============================================================================
// SubmitGate
// ============================================================================

/// A change of the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum GateChange {
    /// The state moved.
    State(SubmissionState),
    /// The warning text changed.
    Warning(String),
    /// The control was blocked or unblocked.
    Disabled(bool),
}

/// The submit control and its warning.
///
/// Handlers registered with [`SubmitGate::on_change`] run while the gate is
/// mutably borrowed by its owner, so they must not reach back into it.
#[derive(Debug, Default)]
pub struct SubmitGate {
    state: SubmissionState,
    warning: String,
    disabled: bool,
    bus: EventBus<GateChange>,
}

impl SubmitGate {
    /// Creates a gate in the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Current warning text, empty in the initial state.
    #[must_use]
    pub fn warning(&self) -> &str {
        &self.warning
    }

    /// Whether the control is blocked.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// Label of the control.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.state.label()
    }

    /// Registers a change handler.
    pub fn on_change(&mut self, handler: impl FnMut(&GateChange) + 'static) -> HandlerId {
        self.bus.subscribe(handler)
    }

    /// Asks for confirmation, showing `warning`.
    pub fn request_confirmation(&mut self, warning: &str) {
        tracing::warn!(warning, "Submission needs confirmation");
        self.set_state(SubmissionState::NeedsConfirmation);
        self.set_warning(warning);
    }

    /// Returns to the initial state and clears the warning.
    pub fn reset(&mut self) {
        self.set_state(SubmissionState::Initial);
        self.set_warning("");
    }

    /// Blocks or unblocks the control.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled != disabled {
            self.disabled = disabled;
            self.bus.emit(&GateChange::Disabled(disabled));
        }
    }

    fn set_state(&mut self, state: SubmissionState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "Submission state transition");
            self.state = state;
            self.bus.emit(&GateChange::State(state));
        }
    }

    fn set_warning(&mut self, warning: &str) {
        if self.warning != warning {
            self.warning = warning.to_string();
            self.bus.emit(&GateChange::Warning(self.warning.clone()));
        }
    }
}
