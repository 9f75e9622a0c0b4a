//! Outward notifications to the exercise engine.
//!
//! An exercise reports two kinds of events to its surroundings: a finished
//! submission and every change of an input widget's value. Events are
//! handed to a [`Notifier`] synchronously, in the order they happen.
//!
//! # Event Types
//!
//! - `submit` - The exercise was submitted
//! - `change_widget_attribute` - An input widget's value changed
//!
//! # Example
//!
//! ```
//! use drill_core::events::{Notification, NotificationLog, Notifier};
//!
//! let log = NotificationLog::new();
//! log.notify(Notification::submit("Quadratic"));
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.snapshot()[0].event_name(), "submit");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Event Payloads
// ============================================================================

/// Payload for the `submit` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    /// Kind name of the submitted exercise.
    pub exercise_kind: String,
}

/// Payload for the `change_widget_attribute` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeWidgetAttributePayload {
    /// Kind name of the widget, e.g. `Text`.
    pub widget_kind: String,
    /// Stable id of the widget.
    pub widget_id: String,
    /// Name of the changed attribute.
    pub attribute: String,
    /// The attribute's new value.
    pub new_value: Value,
}

// ============================================================================
// Notification Enum
// ============================================================================

/// Notifications sent to the external exercise engine.
///
/// Serialized as JSON objects with "event" and "payload" fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum Notification {
    /// Sent once per finalized submission.
    Submit(SubmitPayload),
    /// Sent once per observed widget value change.
    ChangeWidgetAttribute(ChangeWidgetAttributePayload),
}

impl Notification {
    /// Creates a `Submit` notification.
    #[must_use]
    pub fn submit(exercise_kind: impl Into<String>) -> Self {
        Self::Submit(SubmitPayload {
            exercise_kind: exercise_kind.into(),
        })
    }

    /// Creates a `ChangeWidgetAttribute` notification for a value change.
    #[must_use]
    pub fn value_changed(
        widget_kind: impl Into<String>,
        widget_id: impl Into<String>,
        new_value: Value,
    ) -> Self {
        Self::ChangeWidgetAttribute(ChangeWidgetAttributePayload {
            widget_kind: widget_kind.into(),
            widget_id: widget_id.into(),
            attribute: "value".to_string(),
            new_value,
        })
    }

    /// Returns the event name as a string.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::ChangeWidgetAttribute(_) => "change_widget_attribute",
        }
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Receives outward notifications.
pub trait Notifier {
    /// Handles one notification.
    fn notify(&self, notification: Notification);
}

impl std::fmt::Debug for dyn Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Notifier")
    }
}

impl<F: Fn(Notification)> Notifier for F {
    fn notify(&self, notification: Notification) {
        self(notification);
    }
}

/// A notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Notifier for Discard {
    fn notify(&self, _notification: Notification) {}
}

/// Records notifications in order.
///
/// Clones share the same record, so one clone can be handed to an
/// exercise while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Rc<RefCell<Vec<Notification>>>,
}

impl NotificationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded notifications.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    /// Removes and returns all recorded notifications.
    pub fn drain(&self) -> Vec<Notification> {
        self.entries.take()
    }

    /// Number of recorded notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        tracing::debug!(event = notification.event_name(), "Notification");
        self.entries.borrow_mut().push(notification);
    }
}
