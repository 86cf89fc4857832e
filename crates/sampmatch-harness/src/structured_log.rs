//! Structured logging contract for harness runs.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL log record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file, stdout or an arbitrary writer.
//! - [`LogReporter`]: a fault reporter that records `fault_observed` entries.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.
//! - [`validate_log_file`]: validates an entire JSONL file.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use sampmatch_core::FaultReporter;
use sampmatch_membrane::{FaultClass, FaultClasses};

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Check/scenario outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

impl Outcome {
    #[must_use]
    pub const fn from_passed(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    /// Label of a single check within a scenario.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    /// Fault environment the run used (`hardware` or `simulated`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bins: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
    /// Pairs evaluated before the comparison stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_mismatch: Option<usize>,
    /// Fault classes raised when the entry was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faults: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            run_id: None,
            scenario: None,
            check: None,
            env: None,
            boundary: None,
            outcome: None,
            bins: None,
            threshold: None,
            expected: None,
            matched: None,
            evaluated: None,
            first_mismatch: None,
            faults: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }

    #[must_use]
    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    /// Set the fault environment name and boundary mode.
    #[must_use]
    pub fn with_env(mut self, env: impl Into<String>, boundary: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self.boundary = Some(boundary.into());
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Set the comparison inputs.
    #[must_use]
    pub fn with_comparison(mut self, bins: usize, threshold: f64) -> Self {
        self.bins = Some(bins);
        self.threshold = Some(threshold);
        self
    }

    /// Set expected vs. observed result and where the comparison stopped.
    #[must_use]
    pub fn with_result(
        mut self,
        expected: bool,
        matched: bool,
        evaluated: usize,
        first_mismatch: Option<usize>,
    ) -> Self {
        self.expected = Some(expected);
        self.matched = Some(matched);
        self.evaluated = Some(evaluated);
        self.first_mismatch = first_mismatch;
        self
    }

    #[must_use]
    pub fn with_faults(mut self, faults: FaultClasses) -> Self {
        self.faults = Some(faults.names());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

/// Writes structured JSONL log entries to a file or stdout.
pub struct LogEmitter {
    writer: Box<dyn Write>,
    seq: u64,
    suite: String,
    run_id: String,
}

impl LogEmitter {
    /// Create an emitter that writes to a file.
    pub fn to_file(path: &Path, suite: &str, run_id: &str) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::to_writer(
            std::io::BufWriter::new(file),
            suite,
            run_id,
        ))
    }

    /// Open the destination named on the command line: `-` is standard
    /// output, anything else a file whose parent directories are created.
    pub fn open(target: &Path, suite: &str, run_id: &str) -> std::io::Result<Self> {
        if target == Path::new("-") {
            return Ok(Self::to_stdout(suite, run_id));
        }
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Self::to_file(target, suite, run_id)
    }

    /// Create an emitter that writes to standard output.
    #[must_use]
    pub fn to_stdout(suite: &str, run_id: &str) -> Self {
        Self::to_writer(std::io::stdout(), suite, run_id)
    }

    /// Create an emitter over any writer (tests pass a shared buffer).
    #[must_use]
    pub fn to_writer(writer: impl Write + 'static, suite: &str, run_id: &str) -> Self {
        Self {
            writer: Box::new(writer),
            seq: 0,
            suite: suite.to_string(),
            run_id: run_id.to_string(),
        }
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.seq
    }

    /// Generate the next trace ID.
    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("{}::{}::{:03}", self.suite, self.run_id, self.seq)
    }

    /// Emit a log entry with auto-generated trace_id and run_id.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<LogEntry> {
        let entry = LogEntry::new(String::new(), level, event);
        self.emit_entry(entry)
    }

    /// Emit a fully-populated log entry, filling in trace_id and run_id
    /// when absent.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<LogEntry> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        } else {
            self.seq += 1;
        }
        if entry.run_id.is_none() {
            entry.run_id = Some(self.run_id.clone());
        }
        let line = serde_json::to_string(&entry).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{line}")?;
        Ok(entry)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

// ---------------------------------------------------------------------------
// Fault reporter
// ---------------------------------------------------------------------------

/// Fault reporter that records each fault as a `fault_observed` entry.
///
/// `report` cannot fail, so the first write error is kept for the caller to
/// collect with [`finish`](Self::finish).
pub struct LogReporter<'a> {
    emitter: &'a mut LogEmitter,
    scenario: String,
    faults: usize,
    error: Option<std::io::Error>,
}

impl<'a> LogReporter<'a> {
    #[must_use]
    pub fn new(emitter: &'a mut LogEmitter, scenario: impl Into<String>) -> Self {
        Self {
            emitter,
            scenario: scenario.into(),
            faults: 0,
            error: None,
        }
    }

    /// Number of faults reported, or the first write error.
    pub fn finish(self) -> std::io::Result<usize> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.faults),
        }
    }
}

impl FaultReporter for LogReporter<'_> {
    fn report(&mut self) {
        self.faults += 1;
        let entry = LogEntry::new(String::new(), LogLevel::Warn, "fault_observed")
            .with_scenario(self.scenario.clone())
            .with_faults(FaultClasses::only(FaultClass::Invalid))
            .with_details(serde_json::json!({
                "message": sampmatch_core::FAULT_MESSAGE,
            }));
        if let Err(err) = self.emitter.emit_entry(entry)
            && self.error.is_none()
        {
            self.error = Some(err);
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validation error for a log line.
#[derive(Debug)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Validate a single JSONL line against the schema.
///
/// Returns the parsed entry if valid, or a list of validation errors.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let mut errors = Vec::new();

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            errors.push(LogValidationError {
                line_number,
                field: "<json>".to_string(),
                message: format!("invalid JSON: {e}"),
            });
            return Err(errors);
        }
    };

    let Some(obj) = value.as_object() else {
        errors.push(LogValidationError {
            line_number,
            field: "<root>".to_string(),
            message: "expected JSON object".to_string(),
        });
        return Err(errors);
    };

    // Required fields
    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            errors.push(LogValidationError {
                line_number,
                field: field.to_string(),
                message: "required field missing".to_string(),
            });
        }
    }

    if let Some(level) = obj.get("level").and_then(|v| v.as_str())
        && !["trace", "debug", "info", "warn", "error"].contains(&level)
    {
        errors.push(LogValidationError {
            line_number,
            field: "level".to_string(),
            message: format!("invalid level: '{level}'"),
        });
    }

    if let Some(outcome) = obj.get("outcome").and_then(|v| v.as_str())
        && !["pass", "fail", "error"].contains(&outcome)
    {
        errors.push(LogValidationError {
            line_number,
            field: "outcome".to_string(),
            message: format!("invalid outcome: '{outcome}'"),
        });
    }

    if let Some(faults) = obj.get("faults") {
        let known: Vec<&str> = FaultClass::ALL.iter().map(|c| c.as_str()).collect();
        match faults.as_array() {
            Some(items) => {
                for item in items {
                    if !item.as_str().is_some_and(|name| known.contains(&name)) {
                        errors.push(LogValidationError {
                            line_number,
                            field: "faults".to_string(),
                            message: format!("unknown fault class: {item}"),
                        });
                    }
                }
            }
            None => errors.push(LogValidationError {
                line_number,
                field: "faults".to_string(),
                message: "expected array of fault class names".to_string(),
            }),
        }
    }

    // Check contract: a check event carries what was expected and what happened.
    if obj.get("event").and_then(|v| v.as_str()) == Some("check") {
        for field in ["scenario", "expected", "matched", "outcome"] {
            if !obj.contains_key(field) {
                errors.push(LogValidationError {
                    line_number,
                    field: field.to_string(),
                    message: "check events must include this field".to_string(),
                });
            }
        }
    }

    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str())
        && !trace_id.contains("::")
    {
        errors.push(LogValidationError {
            line_number,
            field: "trace_id".to_string(),
            message: format!(
                "trace_id should follow <suite>::<run_id>::<seq> format, got: '{trace_id}'"
            ),
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    match serde_json::from_value::<LogEntry>(value) {
        Ok(entry) => Ok(entry),
        Err(e) => {
            errors.push(LogValidationError {
                line_number,
                field: "<deserialization>".to_string(),
                message: format!("failed to deserialize: {e}"),
            });
            Err(errors)
        }
    }
}

/// Validate an entire JSONL file.
///
/// Returns the total line count and any validation errors found.
pub fn validate_log_file(path: &Path) -> Result<(usize, Vec<LogValidationError>), std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    let mut all_errors = Vec::new();
    let mut line_count = 0;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        line_count += 1;
        if let Err(errs) = validate_log_line(line, i + 1) {
            all_errors.extend(errs);
        }
    }

    Ok((line_count, all_errors))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    // Approximate calendar fields; ordering and uniqueness are what matter here.
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        1970 + secs / 31_557_600,
        (secs % 31_557_600) / 2_629_800 + 1,
        (secs % 2_629_800) / 86400 + 1,
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
        millis,
    )
}
