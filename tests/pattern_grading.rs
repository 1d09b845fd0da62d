use std::{fs, path::PathBuf};

use output_grader::{
    config::GraderConfig,
    grade::{MemorySink, PatternRule},
    runner::{self, Task},
    submission::SubmissionError,
};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("grader-markers-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn config_for(root: &PathBuf, contents: Option<&str>) -> GraderConfig {
    if let Some(contents) = contents {
        fs::write(root.join("output.txt"), contents).expect("write submission");
    }
    GraderConfig::resolve(
        Some("vecmul".into()),
        Some("output.txt".into()),
        Some(root.clone()),
        Some(root.join("feedback.json")),
    )
    .expect("resolve config")
}

fn grade(contents: &str) -> runner::Graded {
    let root = temp_root();
    let graded =
        runner::grade(&config_for(&root, Some(contents)), &Task::default_markers()).expect("grade");
    let _ = fs::remove_dir_all(root);
    graded
}

#[test]
fn both_markers_give_full_credit() {
    let graded = grade(
        "[Vector multiplication of 50000 elements]\nCopy input data\nCUDA kernel launch\nTest \
         PASSED\nDone\n",
    );

    assert_eq!(graded.feedback.fractional_score, 1.0);
    assert!(
        graded
            .feedback
            .feedback
            .contains("Runtime API part: vecmul content was fully found.")
    );
    assert!(graded.feedback.feedback.ends_with("Your grade will be 100.0%.\n"));
    assert!(!graded.feedback.feedback.contains("was not found"));
}

#[test]
fn markers_are_found_in_any_order() {
    let graded = grade("Test PASSED\nnoise\nVector multiplication of 3 elements\n");
    assert_eq!(graded.feedback.fractional_score, 1.0);
}

#[test]
fn invalid_utf8_between_markers_keeps_full_credit() {
    let root = temp_root();
    fs::write(
        root.join("output.txt"),
        b"Vector multiplication of 5 elements\n\xff\xfe\nTest PASSED\n",
    )
    .expect("write submission");

    let graded = runner::grade(&config_for(&root, None), &Task::default_markers())
        .expect("grade despite stray bytes");
    let _ = fs::remove_dir_all(root);

    assert_eq!(graded.feedback.fractional_score, 1.0);
    assert!(!graded.feedback.feedback.contains("was not found"));
}

#[test]
fn missing_test_passed_gives_half_credit() {
    let graded = grade("Vector multiplication of 3 elements\nTest FAILED\n");

    assert_eq!(graded.feedback.fractional_score, 0.5);
    assert!(graded.feedback.feedback.contains("Test PASSED statement was not found."));
    assert!(
        !graded
            .feedback
            .feedback
            .contains("Vector multiplication initial line of code was not found.")
    );
    assert!(graded.feedback.feedback.contains("Your grade will be 50.0%."));
}

#[test]
fn missing_vector_line_gives_half_credit() {
    let graded = grade("Test PASSED\n");

    assert_eq!(graded.feedback.fractional_score, 0.5);
    assert!(
        graded
            .feedback
            .feedback
            .contains("Vector multiplication initial line of code was not found.")
    );
}

#[test]
fn no_markers_give_no_credit_and_name_both() {
    let graded = grade("segmentation fault\n");

    assert_eq!(graded.feedback.fractional_score, 0.0);
    assert!(
        graded
            .feedback
            .feedback
            .contains("Vector multiplication initial line of code was not found.")
    );
    assert!(graded.feedback.feedback.contains("Test PASSED statement was not found."));
    assert!(graded.feedback.feedback.contains(
        "The output for vecmul was not found, refer to the README.md file to understand the \
         commands to execute."
    ));
    assert_eq!(graded.results.len(), 2);
    assert!(graded.results.iter().all(|r| r.grade_value() == 0.0));
}

#[test]
fn feedback_starts_with_preamble() {
    let root = temp_root();
    let config = config_for(&root, Some("Test PASSED\n"));
    let graded = runner::grade(&config, &Task::default_markers()).expect("grade");

    let expected = format!(
        "Processing part: vecmul with file: {}.\n",
        root.join("output.txt").display()
    );
    assert!(graded.feedback.feedback.starts_with(&expected));
    let _ = fs::remove_dir_all(root);
}

#[test]
fn custom_rules_replace_defaults() {
    let root = temp_root();
    let config = config_for(&root, Some("checksum ok\n"));
    let task = Task::Markers(vec![
        PatternRule::parse("Checksum line=^checksum ok$").expect("rule"),
    ]);
    let graded = runner::grade(&config, &task).expect("grade");

    assert_eq!(graded.feedback.fractional_score, 1.0);
    let _ = fs::remove_dir_all(root);
}

#[test]
fn unreadable_submission_propagates() {
    let root = temp_root();
    let config = config_for(&root, None);
    let err = runner::grade(&config, &Task::default_markers()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SubmissionError>(),
        Some(SubmissionError::Unreadable { .. })
    ));
    let _ = fs::remove_dir_all(root);
}

#[test]
fn unreadable_submission_still_emits_zero_feedback() {
    let root = temp_root();
    let config = config_for(&root, None);
    let sink = MemorySink::new();

    assert!(runner::run(&config, &Task::default_markers(), &sink).is_err());

    let emitted = sink.emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].fractional_score, 0.0);
    assert!(emitted[0].feedback.contains("Could not read submission file"));
    let _ = fs::remove_dir_all(root);
}
