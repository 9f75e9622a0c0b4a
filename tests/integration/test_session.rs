//! End-to-end tests for an exercise session
//!
//! These tests load the quadratic fixture, replay its script and check the
//! notifications, the final state and the generated previews.

use std::path::PathBuf;
use std::rc::Rc;

use chrono::TimeZone;
use drill_core::{
    Config, Exercise, ExerciseDefinition, InteractionOutcome, Notification, NotificationLog,
    Script, SubmissionState, SubmitOutcome,
};
use drill_preview::{json::JsonGenerator, HtmlGenerator, Preview};
use serde_json::json;

/// Path to the quadratic exercise fixture.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/quadratic")
}

fn load_definition() -> ExerciseDefinition {
    ExerciseDefinition::load(fixture_path().join("exercise.json"))
        .expect("Failed to load exercise definition")
}

fn load_exercise(config: &Config) -> (Exercise, NotificationLog) {
    let definition = load_definition();
    let log = NotificationLog::new();
    let exercise = definition
        .instantiate(config, Rc::new(log.clone()))
        .expect("Failed to instantiate exercise");
    (exercise, log)
}

fn load_script() -> Script {
    Script::load(fixture_path().join("script.json")).expect("Failed to load script")
}

/// Instantiates the fixture and replays its script.
fn play_fixture() -> (Exercise, NotificationLog, Vec<InteractionOutcome>) {
    let (mut exercise, log) = load_exercise(&Config::default());
    let outcomes = load_definition()
        .replay(&mut exercise, &load_script())
        .expect("Script should run");
    (exercise, log, outcomes)
}

fn fixed_preview(exercise: &Exercise) -> Preview {
    let time = chrono::Utc
        .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
        .single()
        .expect("valid timestamp");
    Preview::at(exercise.snapshot(), time)
}

// ============================================================================
// Loading
// ============================================================================

/// Tests that the fixture definition loads with its widgets in order.
#[test]
fn test_fixture_definition_loads() {
    let definition = ExerciseDefinition::load(fixture_path().join("exercise.json"))
        .expect("Failed to load exercise definition");

    assert_eq!(definition.kind, "Quadratic");
    assert_eq!(definition.hints.len(), 2);
    let ids: Vec<_> = definition.widgets.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["x", "sign"]);

    definition
        .check(&Config::default())
        .expect("Fixture should pass the template check");
}

/// Tests that the fixture config is picked up from its directory.
#[test]
fn test_fixture_config_loads() {
    let config = Config::load_from_dir(&fixture_path()).expect("Failed to load config");

    assert_eq!(config.attribute_prefix, "quiz");
    assert_eq!(config.math_format_spec, "latex");
    assert!(config.debug);

    let (exercise, _log) = load_exercise(&config);
    assert!(exercise.debug());
    assert!(exercise
        .problem()
        .contains(r#"<span data-quiz-field-name="x"></span>"#));
}

/// Tests the state of a freshly instantiated exercise.
#[test]
fn test_initial_state() {
    let (exercise, log) = load_exercise(&Config::default());

    assert!(log.is_empty(), "Initial values must not be notified");
    assert_eq!(
        exercise.problem(),
        r#"Positive root: x = <span data-drill-field-name="x"></span> Sign of the other root: <span data-drill-field-name="sign"></span>"#
    );
    assert_eq!(exercise.feedback(), "");
    assert_eq!(exercise.submission_state(), SubmissionState::Initial);
    assert_eq!(exercise.hints().label(), "Next Hint");
    assert!(exercise.widget("x").is_some_and(|w| w.is_empty()));
    assert!(exercise.widget("sign").is_some_and(|w| w.is_empty()));
}

// ============================================================================
// Script replay
// ============================================================================

/// Tests the outcome of every scripted step.
#[test]
fn test_script_outcomes() {
    let (_exercise, _log, outcomes) = play_fixture();

    let first_hint = r#"Take the square root of both sides of <span data-drill-field-name="eq" data-drill-format-spec="latex"></span>."#;
    assert_eq!(
        outcomes,
        vec![
            InteractionOutcome::Applied,
            InteractionOutcome::Hint(Some(first_hint.to_string())),
            InteractionOutcome::Submit(SubmitOutcome::NeedsConfirmation),
            InteractionOutcome::Applied,
            InteractionOutcome::Applied,
            InteractionOutcome::Applied,
            InteractionOutcome::Applied,
            InteractionOutcome::Applied,
            InteractionOutcome::Applied,
            InteractionOutcome::Submit(SubmitOutcome::Submitted),
            InteractionOutcome::Hint(None),
        ]
    );
}

/// Tests that notifications arrive in order: two value changes, one submit.
#[test]
fn test_script_notifications() {
    let (_exercise, log, _outcomes) = play_fixture();

    assert_eq!(
        log.snapshot(),
        vec![
            Notification::value_changed("Text", "x", json!("2")),
            Notification::value_changed("RadioButtons", "sign", json!("-")),
            Notification::submit("Quadratic"),
        ]
    );
}

/// Tests the final state after the script has run.
#[test]
fn test_script_final_state() {
    let (exercise, _log, _outcomes) = play_fixture();

    assert!(exercise.is_submitted());
    assert_eq!(exercise.warning(), "");
    assert_eq!(exercise.total_score_text(), "Total Score: 2.0/2.0");
    assert_eq!(exercise.feedback(), "The roots are <span data-drill-field-name=\"roots\"></span>.");
    assert_eq!(exercise.displayed_hints().len(), 1);
    assert!(!exercise.hints().is_enabled());

    for id in ["x", "sign"] {
        let widget = exercise.widget(id).expect("widget exists");
        assert!(widget.disabled(), "{id} should be disabled");
        assert_eq!(widget.displayed_score(), Some(1.0));
    }
    let x = exercise.widget("x").expect("widget exists");
    assert_eq!(x.correct(), Some(true));
    assert_eq!(x.value(), json!("2"));
}

/// Tests that a confirmation request is cleared by the next value change.
#[test]
fn test_confirmation_is_reset_by_answer_change() {
    let (mut exercise, _log) = load_exercise(&Config::default());

    assert_eq!(exercise.click_submit(), SubmitOutcome::NeedsConfirmation);
    assert_eq!(exercise.submission_state(), SubmissionState::NeedsConfirmation);
    assert_eq!(exercise.warning(), "There are empty input fields.");

    exercise
        .widget_mut("x")
        .and_then(|w| w.set_value(json!("2")))
        .expect("set value");
    assert_eq!(exercise.submission_state(), SubmissionState::Initial);
    assert_eq!(exercise.warning(), "");

    // Still one empty widget: ask again, then confirm.
    assert_eq!(exercise.click_submit(), SubmitOutcome::NeedsConfirmation);
    assert_eq!(exercise.click_submit(), SubmitOutcome::Submitted);
    assert_eq!(exercise.click_submit(), SubmitOutcome::Disabled);
}

// ============================================================================
// Previews
// ============================================================================

/// Tests the HTML preview of the submitted exercise.
#[test]
fn test_html_preview_after_script() {
    let (exercise, _log, _outcomes) = play_fixture();

    let preview = fixed_preview(&exercise);
    let html = HtmlGenerator::new(&preview)
        .generate()
        .expect("Failed to generate HTML");

    assert!(html.contains(
        r#"<section class="preamble">Solve the equation <span data-drill-field-name="eq" data-drill-format-spec="latex">$x^2 = 4$</span>.</section>"#
    ));
    assert!(html.contains(r#"<section class="feedback">The roots are <span data-drill-field-name="roots">-2 and 2</span>.</section>"#));
    assert!(html.contains(r#"<button class="submit" disabled>Submit</button>"#));
    assert!(html.contains(r#"<section class="total-score">Total Score: 2.0/2.0</section>"#));
    assert!(html.contains(r#"<span class="solution">-</span>"#));
    assert!(html.contains(r#"<span class="score">Score: 1.0/1.0</span>"#));
    assert!(html.contains("<footer>Generated 2024-01-15 10:30:00 UTC</footer>"));
    assert!(!html.contains(r#"class="debug""#));
}

/// Tests the JSON preview of a fresh exercise.
#[test]
fn test_json_preview_of_fresh_exercise() {
    let (exercise, _log) = load_exercise(&Config::default());
    let preview = fixed_preview(&exercise);
    let json = JsonGenerator::new(&preview)
        .generate()
        .expect("Failed to generate JSON");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    insta::assert_json_snapshot!(value["exercise"]["submit_control"], @r#"
    {
      "label": "Submit",
      "disabled": false
    }
    "#);
    assert_eq!(value["exercise"]["fields"]["eq"]["data"]["text/plain"], "x^2 = 4");
    assert_eq!(value["exercise"]["widgets"]["sign"]["kind_name"], "RadioButtons");
    assert_eq!(value["exercise"]["slots"]["field_name"], "data-drill-field-name");
}
