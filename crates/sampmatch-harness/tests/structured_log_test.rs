//! Integration tests for the structured logging contract.
//!
//! Validates that:
//! 1. `LogEmitter` output written to disk passes `validate_log_file`.
//! 2. Validation reports line numbers for broken lines in a file.
//!
//! Run: cargo test -p sampmatch-harness --test structured_log_test

use sampmatch_harness::structured_log::{
    LogEmitter, LogEntry, LogLevel, Outcome, validate_log_file,
};
use sampmatch_membrane::{FaultClass, FaultClasses};

#[test]
fn emitter_writes_valid_jsonl() {
    let dir = std::env::temp_dir().join("sampmatch_log_test");
    std::fs::create_dir_all(&dir).unwrap();
    let log_path = dir.join("test_output.jsonl");

    {
        let mut emitter = LogEmitter::to_file(&log_path, "sampmatch", "run-integ").unwrap();
        emitter.emit(LogLevel::Info, "suite_start").unwrap();
        emitter
            .emit_entry(
                LogEntry::new("", LogLevel::Info, "check")
                    .with_scenario("fixed_clean")
                    .with_env("hardware", "inclusive")
                    .with_comparison(4, 0.6)
                    .with_result(true, true, 4, None)
                    .with_outcome(Outcome::Pass),
            )
            .unwrap();
        emitter
            .emit_entry(
                LogEntry::new("", LogLevel::Warn, "fault_observed")
                    .with_scenario("poisoned")
                    .with_faults(FaultClasses::from_iter([
                        FaultClass::Invalid,
                        FaultClass::Inexact,
                    ])),
            )
            .unwrap();
        emitter.emit(LogLevel::Info, "suite_end").unwrap();
        emitter.flush().unwrap();
    }

    let (line_count, errors) = validate_log_file(&log_path).unwrap();
    assert_eq!(line_count, 4, "Expected 4 log lines");
    assert!(
        errors.is_empty(),
        "Emitter output should validate: {errors:?}"
    );

    let content = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(lines[0]["trace_id"].as_str().unwrap().ends_with("::001"));
    assert!(lines[3]["trace_id"].as_str().unwrap().ends_with("::004"));
    assert_eq!(lines[2]["faults"], serde_json::json!(["invalid", "inexact"]));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn file_validation_reports_line_numbers() {
    let dir = std::env::temp_dir().join("sampmatch_log_validate_test");
    std::fs::create_dir_all(&dir).unwrap();
    let log_path = dir.join("mixed.jsonl");

    let good = LogEntry::new("sampmatch::r::001", LogLevel::Info, "suite_start")
        .to_jsonl()
        .unwrap();
    let body = format!(
        "{good}\n\n{}\n{}\n",
        r#"{"timestamp":"T","trace_id":"a::b::c","level":"info","event":"check","scenario":"x"}"#,
        "not json",
    );
    std::fs::write(&log_path, body).unwrap();

    let (line_count, errors) = validate_log_file(&log_path).unwrap();
    assert_eq!(line_count, 3, "blank lines are skipped");
    assert!(errors.iter().all(|e| e.line_number != 1));
    assert!(errors.iter().any(|e| e.line_number == 3 && e.field == "expected"));
    assert!(errors.iter().any(|e| e.line_number == 4 && e.field == "<json>"));

    std::fs::remove_dir_all(&dir).ok();
}
