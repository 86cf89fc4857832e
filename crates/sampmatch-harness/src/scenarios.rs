//! Demonstration suite: fixed arrays, jittered rounds, a poisoned
//! environment and its recovery.
//!
//! Scenarios run in order against one [`FloatEnv`]. `poisoned` leaves the
//! invalid flag raised on purpose and `recovered` clears it, so running a
//! single scenario out of order gives different answers.

use std::hint::black_box;

use sampmatch_core::{CountingReporter, FaultReporter, MatchReport, SequenceMatcher};
use sampmatch_membrane::fenv::provoke_invalid;
use sampmatch_membrane::{BoundaryMode, FaultClass, FloatEnv};

use crate::error::HarnessError;
use crate::signal::{XorShift64, add_jitter, null_samples};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, LogReporter, Outcome};

pub const FIXED_TEST: [f64; 4] = [1.0, 2.0, 1.5, -3.0];
pub const FIXED_REFERENCE: [f64; 4] = [0.4, 2.2, 0.9, -2.8];

/// How the `poisoned` scenario raises the invalid flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoisonMethod {
    /// Evaluate `sqrt(-1)`. Only reaches the hardware flags.
    Arithmetic,
    /// Call [`FloatEnv::raise`] on the environment under test.
    Raise,
}

impl PoisonMethod {
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arithmetic" | "sqrt" => Some(Self::Arithmetic),
            "raise" => Some(Self::Raise),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Raise => "raise",
        }
    }

    /// Raise the invalid flag and confirm `env` now reports it.
    pub fn apply<E: FloatEnv + ?Sized>(
        self,
        env: &E,
        env_name: &'static str,
    ) -> Result<(), HarnessError> {
        match self {
            Self::Arithmetic => {
                let _ = black_box(provoke_invalid());
            }
            Self::Raise => env.raise(FaultClass::Invalid.into()),
        }
        if env.is_raised(FaultClass::Invalid) {
            Ok(())
        } else {
            Err(HarnessError::PoisonIneffective { env: env_name })
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub seed: u64,
    pub rounds: u32,
    pub bins: usize,
    pub jitter: f64,
    pub boundary: BoundaryMode,
    pub poison: PoisonMethod,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            seed: 0xDEAD_BEEF,
            rounds: 50,
            bins: 100,
            jitter: 1.0,
            boundary: BoundaryMode::Inclusive,
            poison: PoisonMethod::Arithmetic,
        }
    }
}

/// One comparison and the answer it should have produced.
#[derive(Debug, Clone)]
pub struct Check {
    pub label: String,
    pub bins: usize,
    pub threshold: f64,
    pub expected: bool,
    pub report: MatchReport,
}

impl Check {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.report.matched == self.expected
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: &'static str,
    pub checks: Vec<Check>,
    /// Reporter invocations observed while the scenario ran.
    pub faults_reported: usize,
}

impl ScenarioResult {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed()).count()
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.failed() == 0
    }

    /// `Err(ScenarioFailed)` when any check failed.
    pub fn ensure_passed(&self) -> Result<(), HarnessError> {
        match self.failed() {
            0 => Ok(()),
            failed => Err(HarnessError::ScenarioFailed {
                name: self.name,
                failed,
                total: self.checks.len(),
            }),
        }
    }
}

struct Recorder<'e, 'r, E: ?Sized> {
    env: &'e E,
    boundary: BoundaryMode,
    reporter: &'r mut dyn FaultReporter,
    checks: Vec<Check>,
    faults: usize,
}

impl<'e, 'r, E: FloatEnv + ?Sized> Recorder<'e, 'r, E> {
    fn new(env: &'e E, config: &SuiteConfig, reporter: &'r mut dyn FaultReporter) -> Self {
        Self {
            env,
            boundary: config.boundary,
            reporter,
            checks: Vec::new(),
            faults: 0,
        }
    }

    fn check(
        &mut self,
        label: impl Into<String>,
        test: &[f64],
        reference: &[f64],
        threshold: f64,
        expected: bool,
    ) {
        let bins = test.len().min(reference.len());
        let faults = &mut self.faults;
        let reporter = &mut *self.reporter;
        let mut matcher = SequenceMatcher::with_boundary(
            self.env,
            || {
                *faults += 1;
                reporter.report();
            },
            self.boundary,
        );
        let report = matcher.compare(test, reference, bins, threshold);
        self.checks.push(Check {
            label: label.into(),
            bins,
            threshold,
            expected,
            report,
        });
    }

    fn finish(self, name: &'static str) -> ScenarioResult {
        ScenarioResult {
            name,
            checks: self.checks,
            faults_reported: self.faults,
        }
    }
}

fn fixed_checks<E: FloatEnv + ?Sized>(rec: &mut Recorder<'_, '_, E>) {
    let inclusive = rec.boundary == BoundaryMode::Inclusive;
    rec.check("test~test", &FIXED_TEST, &FIXED_TEST, 0.5, true);
    rec.check("reference~reference", &FIXED_REFERENCE, &FIXED_REFERENCE, 0.5, true);
    // Identical samples differ by exactly zero.
    rec.check("test~test", &FIXED_TEST, &FIXED_TEST, 0.0, inclusive);
    for threshold in [0.0, 0.1] {
        rec.check("test~reference", &FIXED_TEST, &FIXED_REFERENCE, threshold, false);
    }
    // Pairs 0 and 2 differ by exactly 0.6.
    rec.check("test~reference", &FIXED_TEST, &FIXED_REFERENCE, 1.0, true);
    rec.check("test~reference", &FIXED_TEST, &FIXED_REFERENCE, 0.6, inclusive);
    for threshold in [0.59, 0.5] {
        rec.check("test~reference", &FIXED_TEST, &FIXED_REFERENCE, threshold, false);
    }
}

/// Reference is `jitter` noise around zero, test is the reference plus
/// another `jitter` of noise.
fn jittered_pair(config: &SuiteConfig, rng: &mut XorShift64) -> (Vec<f64>, Vec<f64>) {
    let mut reference = vec![0.0; config.bins];
    add_jitter(null_samples(&mut reference), config.jitter, rng);
    let mut test = reference.clone();
    add_jitter(&mut test, config.jitter, rng);
    (test, reference)
}

/// The fixed four-sample arrays on a clean environment.
pub fn fixed_clean<E: FloatEnv + ?Sized>(
    env: &E,
    config: &SuiteConfig,
    reporter: &mut dyn FaultReporter,
) -> ScenarioResult {
    let mut rec = Recorder::new(env, config, reporter);
    fixed_checks(&mut rec);
    rec.finish("fixed_clean")
}

/// Rounds of jittered samples on a clean environment.
pub fn jitter_clean<E: FloatEnv + ?Sized>(
    env: &E,
    config: &SuiteConfig,
    reporter: &mut dyn FaultReporter,
) -> ScenarioResult {
    let mut rng = XorShift64::new(config.seed);
    let mut rec = Recorder::new(env, config, reporter);
    let j = config.jitter;
    for round in 0..config.rounds {
        let (test, reference) = jittered_pair(config, &mut rng);
        let label = format!("round{round}");
        rec.check(label.clone(), &test, &reference, 1.5 * j, true);
        rec.check(label.clone(), &test, &reference, j, true);
        rec.check(label.clone(), &test, &reference, 0.8 * j, false);
        rec.check(label, &test, &reference, 0.0, false);
    }
    rec.finish("jitter_clean")
}

/// Raise the invalid flag and leave it raised: every comparison fails.
pub fn poisoned<E: FloatEnv + ?Sized>(
    env: &E,
    env_name: &'static str,
    config: &SuiteConfig,
    reporter: &mut dyn FaultReporter,
) -> Result<ScenarioResult, HarnessError> {
    config.poison.apply(env, env_name)?;

    let mut rec = Recorder::new(env, config, reporter);
    rec.check("test~test", &FIXED_TEST, &FIXED_TEST, 0.0, false);
    for threshold in [0.0, 0.1, 1.0, 0.6, 0.59, 0.5] {
        rec.check("test~reference", &FIXED_TEST, &FIXED_REFERENCE, threshold, false);
    }

    let mut rng = XorShift64::new(config.seed);
    for round in 0..config.rounds {
        let (test, reference) = jittered_pair(config, &mut rng);
        for threshold in [1.5, 1.0, 0.8, 0.0] {
            rec.check(format!("round{round}"), &test, &reference, threshold * config.jitter, false);
        }
    }
    Ok(rec.finish("poisoned"))
}

/// Clear every flag, then the fixed arrays behave as on a clean environment.
pub fn recovered<E: FloatEnv + ?Sized>(
    env: &E,
    config: &SuiteConfig,
    reporter: &mut dyn FaultReporter,
) -> ScenarioResult {
    env.reset_all();
    let mut rec = Recorder::new(env, config, reporter);
    fixed_checks(&mut rec);
    rec.finish("recovered")
}

/// Run every scenario in order, logging each check when `log` is given.
///
/// The environment is reset before the first scenario. Failed checks do not
/// stop the suite; inspect [`ScenarioResult::passed`] afterwards.
pub fn run_suite<E: FloatEnv + ?Sized>(
    env: &E,
    env_name: &'static str,
    config: &SuiteConfig,
    mut log: Option<&mut LogEmitter>,
) -> Result<Vec<ScenarioResult>, HarnessError> {
    env.reset_all();
    if let Some(emitter) = log.as_deref_mut() {
        let entry = LogEntry::new(String::new(), LogLevel::Info, "suite_start")
            .with_env(env_name, config.boundary.as_str())
            .with_details(serde_json::json!({
                "seed": format!("{:#x}", config.seed),
                "rounds": config.rounds,
                "bins": config.bins,
                "jitter": config.jitter,
                "poison": config.poison.as_str(),
            }));
        emitter.emit_entry(entry)?;
    }

    let mut results = Vec::with_capacity(4);
    for step in 0..4 {
        let run = |reporter: &mut dyn FaultReporter| -> Result<ScenarioResult, HarnessError> {
            Ok(match step {
                0 => fixed_clean(env, config, reporter),
                1 => jitter_clean(env, config, reporter),
                2 => poisoned(env, env_name, config, reporter)?,
                _ => recovered(env, config, reporter),
            })
        };
        let result = match log.as_deref_mut() {
            Some(emitter) => {
                let name = ["fixed_clean", "jitter_clean", "poisoned", "recovered"][step];
                let mut reporter = LogReporter::new(emitter, name);
                let result = run(&mut reporter);
                reporter.finish()?;
                result?
            }
            None => run(&mut CountingReporter::new())?,
        };
        if let Some(emitter) = log.as_deref_mut() {
            log_result(emitter, env_name, config, &result)?;
        }
        results.push(result);
    }

    if let Some(emitter) = log.as_deref_mut() {
        let failed: usize = results.iter().map(ScenarioResult::failed).sum();
        let entry = LogEntry::new(String::new(), LogLevel::Info, "suite_end")
            .with_env(env_name, config.boundary.as_str())
            .with_outcome(Outcome::from_passed(failed == 0))
            .with_details(serde_json::json!({ "failed_checks": failed }));
        emitter.emit_entry(entry)?;
        emitter.flush()?;
    }
    Ok(results)
}

fn log_result(
    emitter: &mut LogEmitter,
    env_name: &'static str,
    config: &SuiteConfig,
    result: &ScenarioResult,
) -> Result<(), HarnessError> {
    for check in &result.checks {
        let passed = check.passed();
        let level = if passed { LogLevel::Debug } else { LogLevel::Error };
        let entry = LogEntry::new(String::new(), level, "check")
            .with_scenario(result.name)
            .with_check(check.label.as_str())
            .with_env(env_name, config.boundary.as_str())
            .with_outcome(Outcome::from_passed(passed))
            .with_comparison(check.bins, check.threshold)
            .with_result(
                check.expected,
                check.report.matched,
                check.report.evaluated,
                check.report.first_mismatch,
            );
        emitter.emit_entry(entry)?;
    }
    let entry = LogEntry::new(String::new(), LogLevel::Info, "scenario_end")
        .with_scenario(result.name)
        .with_env(env_name, config.boundary.as_str())
        .with_outcome(Outcome::from_passed(result.passed()))
        .with_details(serde_json::json!({
            "checks": result.checks.len(),
            "failed": result.failed(),
            "faults_reported": result.faults_reported,
        }));
    emitter.emit_entry(entry)?;
    Ok(())
}
