//! Demonstration and verification harness for sampmatch.
//!
//! This crate provides:
//! - Configuration: default boundary mode from `SAMPMATCH_BOUNDARY`
//! - Sample generation: deterministic jittered waveforms for repeatable runs
//! - Scenario suite: clean, poisoned and recovered fault environments
//! - Structured logging: JSONL records of every check, plus schema validation

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod scenarios;
pub mod signal;
pub mod structured_log;

pub use error::HarnessError;
pub use scenarios::{PoisonMethod, ScenarioResult, SuiteConfig, run_suite};
pub use structured_log::{LogEmitter, LogEntry, LogReporter};
