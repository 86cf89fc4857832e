//! Harness error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid sample {value:?} at position {index}")]
    InvalidSamples { index: usize, value: String },
    #[error("length mismatch: test has {test} samples, reference has {reference}")]
    LengthMismatch { test: usize, reference: usize },
    #[error("invalid operation did not raise the invalid flag in the {env} environment")]
    PoisonIneffective { env: &'static str },
    #[error("scenario {name} failed {failed} of {total} checks")]
    ScenarioFailed {
        name: &'static str,
        failed: usize,
        total: usize,
    },
}
