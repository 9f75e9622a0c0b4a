//! Progressive hint delivery.

use serde::Serialize;

/// What the hint control shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintState {
    /// The exercise has no hints at all.
    NoHints,
    /// At least one hint is left.
    Available,
    /// Every hint has been given.
    Exhausted,
}

impl HintState {
    /// Label of the hint control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoHints => "No Hints",
            Self::Available => "Next Hint",
            Self::Exhausted => "No Further Hints",
        }
    }
}

/// Hands out hint templates in order, one per request.
#[derive(Debug, Clone, Default)]
pub struct HintDispenser {
    hints: Vec<String>,
    cursor: usize,
    disabled: bool,
}

impl HintDispenser {
    /// Creates a dispenser over `hints`.
    #[must_use]
    pub fn new(hints: Vec<String>) -> Self {
        Self {
            hints,
            cursor: 0,
            disabled: false,
        }
    }

    /// Replaces the hints and starts over from the first one.
    ///
    /// Assigning unblocks the control, even after the exercise disabled it.
    pub fn assign(&mut self, hints: Vec<String>) {
        tracing::debug!(count = hints.len(), "Hints assigned");
        self.hints = hints;
        self.cursor = 0;
        self.disabled = false;
    }

    /// The hint template [`HintDispenser::next_hint`] would return.
    #[must_use]
    pub fn peek(&self) -> Option<&str> {
        self.hints.get(self.cursor).map(String::as_str)
    }

    /// Returns the next hint template, or `None` once all are given.
    pub fn next_hint(&mut self) -> Option<&str> {
        let hint = self.hints.get(self.cursor)?;
        self.cursor += 1;
        Some(hint.as_str())
    }

    /// Current state of the dispenser.
    #[must_use]
    pub fn state(&self) -> HintState {
        if self.hints.is_empty() {
            HintState::NoHints
        } else if self.cursor < self.hints.len() {
            HintState::Available
        } else {
            HintState::Exhausted
        }
    }

    /// Label of the hint control.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.state().label()
    }

    /// Whether the hint control accepts requests.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.disabled && self.state() == HintState::Available
    }

    /// Blocks or unblocks the hint control.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether the exercise blocked the hint control.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// All hint templates.
    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Number of hints already given.
    #[must_use]
    pub const fn given(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispenser(hints: &[&str]) -> HintDispenser {
        HintDispenser::new(hints.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_hints_come_in_order_then_exhaust() {
        let mut hints = dispenser(&["first", "second"]);
        assert_eq!(hints.state(), HintState::Available);
        assert_eq!(hints.next_hint(), Some("first"));
        assert_eq!(hints.next_hint(), Some("second"));
        assert_eq!(hints.state(), HintState::Exhausted);
        assert_eq!(hints.next_hint(), None);
        assert_eq!(hints.next_hint(), None);
        assert_eq!(hints.given(), 2);
    }

    #[test]
    fn test_assign_resets_cursor() {
        let mut hints = dispenser(&["a"]);
        hints.next_hint();
        assert_eq!(hints.state(), HintState::Exhausted);

        hints.assign(vec!["b".to_string(), "c".to_string()]);
        assert_eq!(hints.given(), 0);
        assert_eq!(hints.next_hint(), Some("b"));
    }

    #[test]
    fn test_labels() {
        let mut hints = HintDispenser::default();
        assert_eq!(hints.label(), "No Hints");
        assert!(!hints.is_enabled());

        hints.assign(vec!["a".to_string()]);
        assert_eq!(hints.label(), "Next Hint");
        assert!(hints.is_enabled());

        hints.next_hint();
        assert_eq!(hints.label(), "No Further Hints");
        assert!(!hints.is_enabled());
    }

    #[test]
    fn test_disabled_control() {
        let mut hints = dispenser(&["a"]);
        hints.set_disabled(true);
        assert!(!hints.is_enabled());
        assert_eq!(hints.label(), "Next Hint");
    }

    #[test]
    fn test_assign_unblocks_control() {
        let mut hints = dispenser(&["a"]);
        hints.set_disabled(true);

        hints.assign(vec!["b".to_string()]);
        assert!(!hints.disabled());
        assert!(hints.is_enabled());

        hints.set_disabled(true);
        hints.assign(Vec::new());
        assert!(!hints.is_enabled());
        assert_eq!(hints.label(), "No Hints");
    }
}
