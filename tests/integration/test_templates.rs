//! Integration tests for template formatting and slot filling
//!
//! These tests format templates through a live exercise and check that the
//! preview fills every slot from the rendered field or widget.

use std::rc::Rc;

use drill_core::{Config, Discard, DrillError, Exercise, TemplateFormatter, WidgetKind};
use drill_preview::{HtmlGenerator, Preview};
use serde_json::{json, Value};

fn exercise_with(fields: Value, config: &Config) -> Exercise {
    let mut exercise = Exercise::new("Templates", config, Rc::new(Discard));
    let fields = serde_json::from_value(fields).expect("fields are an object");
    exercise.set_fields(fields);
    exercise
}

fn attach(exercise: &Exercise, html: &str) -> String {
    let preview = Preview::new(exercise.snapshot());
    HtmlGenerator::new(&preview)
        .attach(html)
        .expect("Failed to attach slots")
}

/// Tests that escaped markers and stray double brackets survive as text.
#[test]
fn test_escapes_and_stray_markers() {
    let mut exercise = exercise_with(json!({}), &Config::default());
    exercise
        .render_preamble(r"Compare: a << b, c >> d, \<html\>")
        .expect("Failed to render preamble");

    insta::assert_snapshot!(
        exercise.preamble(),
        @"Compare: a &lt;&lt; b, c &gt;&gt; d, &lt;html&gt;"
    );
}

/// Tests that plain, math and html fields fill their slots differently.
#[test]
fn test_slots_filled_by_representation() {
    let mut exercise = exercise_with(
        json!({
            "n": 42,
            "label": "a < b",
            "eq": {"$repr": {"text/latex": "$y = 2x$"}},
            "chart": {"$repr": {"text/html": "<svg></svg>", "text/plain": "chart"}}
        }),
        &Config::default(),
    );
    exercise
        .render_problem("<<n>> | <<label>> | <<eq:latex>> | <<eq>> | <<chart>>")
        .expect("Failed to render problem");

    let filled = attach(&exercise, exercise.problem());
    assert_eq!(
        filled,
        concat!(
            r#"<span data-drill-field-name="n">42</span> | "#,
            r#"<span data-drill-field-name="label">a &lt; b</span> | "#,
            r#"<span data-drill-field-name="eq" data-drill-format-spec="latex">$y = 2x$</span> | "#,
            r#"<span data-drill-field-name="eq">y = 2x</span> | "#,
            r#"<span data-drill-field-name="chart"><svg></svg></span>"#,
        )
    );
}

/// Tests that unbound markers stay visible as placeholders.
#[test]
fn test_unbound_fields_are_placeholders() {
    let mut exercise = exercise_with(json!({"a": 1}), &Config::default());
    exercise
        .render_problem("<<a>> and <<missing>>")
        .expect("Failed to render problem");

    assert_eq!(
        exercise.problem(),
        r#"<span data-drill-field-name="a"></span> and &lt;&lt;missing&gt;&gt;"#
    );
}

/// Tests that the problem template also binds widget ids.
#[test]
fn test_problem_binds_widgets() {
    let mut exercise = exercise_with(json!({}), &Config::default());
    let widget = exercise.new_widget("agree", WidgetKind::checkbox());
    exercise.set_widgets([widget]);
    exercise
        .render_problem("Agree? <<agree>>")
        .expect("Failed to render problem");
    exercise
        .render_feedback("You said <<agree>>")
        .expect("Failed to render feedback");

    let filled = attach(&exercise, exercise.problem());
    assert!(filled.contains(r#"<input type="checkbox" name="agree">"#));
    assert_eq!(exercise.feedback(), "You said &lt;&lt;agree&gt;&gt;");
}

/// Tests that an unknown format specifier is rejected, bound or not.
#[test]
fn test_unknown_format_spec() {
    let mut exercise = exercise_with(json!({"x": 1}), &Config::default());

    for template in ["<<x:bold>>", "<<unbound:bold>>"] {
        let err = exercise.render_problem(template).unwrap_err();
        assert!(
            matches!(err, DrillError::UnknownFormatSpec { .. }),
            "Expected UnknownFormatSpec for {template}, got: {err:?}"
        );
        assert!(err.is_usage_error());
    }
    assert_eq!(exercise.problem(), "", "Failed render must not replace content");
}

/// Tests that a custom prefix and math specifier reach both sides.
#[test]
fn test_custom_slot_attributes() {
    let config = Config {
        attribute_prefix: "quiz".to_string(),
        math_format_spec: "tex".to_string(),
        ..Config::default()
    };
    let mut exercise = exercise_with(json!({"eq": {"$repr": {"text/latex": "$z$"}}}), &config);
    exercise
        .render_problem("<<eq:tex>>")
        .expect("Failed to render problem");

    assert_eq!(
        exercise.problem(),
        r#"<span data-quiz-field-name="eq" data-quiz-format-spec="tex"></span>"#
    );
    let filled = attach(&exercise, exercise.problem());
    assert!(filled.ends_with(">$z$</span>"));

    assert!(TemplateFormatter::new(&config)
        .format("<<eq:latex>>", exercise.fields())
        .is_err());
}
