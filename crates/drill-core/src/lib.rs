//! Drill Core
//!
//! Template formatting, input widgets, hints and the submission flow of
//! interactive exercises.

pub mod config;
pub mod definition;
pub mod error;
pub mod events;
pub mod exercise;
pub mod formatter;
pub mod gate;
pub mod hints;
pub mod observe;
pub mod render;
pub mod script;
pub mod widget;

pub use config::{Config, CONFIG_FILE_NAME};
pub use definition::{ExerciseDefinition, WidgetSpec};
pub use error::{DrillError, Result};
pub use events::{Discard, Notification, NotificationLog, Notifier};
pub use exercise::{
    ControlSnapshot, Exercise, ExerciseChange, ExerciseSnapshot, SlotAttributes, SubmitOutcome,
    DEBUG_LOG_HEADER,
};
pub use formatter::{parse, FieldLookup, Segment, TemplateFormatter};
pub use gate::{GateChange, SubmissionState, SubmitGate};
pub use hints::{HintDispenser, HintState};
pub use observe::{EventBus, HandlerId};
pub use render::{DisplayFormatter, JsonDisplayFormatter, MimeBundle, Renderer};
pub use script::{Interaction, InteractionOutcome, Script};
pub use widget::{
    ChoiceStyle, InputWidget, SingleChoice, Slider, TextInput, WidgetAttribute, WidgetChange,
    WidgetKind, WidgetSnapshot,
};
