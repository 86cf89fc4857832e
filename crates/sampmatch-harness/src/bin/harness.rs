//! CLI entrypoint for the sampmatch harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sampmatch_core::{SequenceMatcher, StdoutReporter};
use sampmatch_harness::scenarios::{PoisonMethod, ScenarioResult, SuiteConfig, run_suite};
use sampmatch_harness::signal::{parse_samples, parse_seed};
use sampmatch_harness::structured_log::{LogEmitter, validate_log_file};
use sampmatch_harness::HarnessError;
use sampmatch_harness::config::boundary_mode;
use sampmatch_membrane::{BoundaryMode, FloatEnv, HardwareEnv, SimulatedEnv};

/// Conservative sample comparison tooling.
#[derive(Debug, Parser)]
#[command(name = "sampmatch-harness")]
#[command(about = "Demonstration harness for sampmatch")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the scenario suite: clean, poisoned, recovered.
    Demo {
        /// Fault environment (`hardware` or `simulated`).
        #[arg(long, default_value = "hardware")]
        env: String,
        /// Root seed (decimal or 0x...).
        #[arg(long, default_value = "0xDEAD_BEEF")]
        seed: String,
        /// Number of jittered rounds per scenario.
        #[arg(long, default_value_t = 50)]
        rounds: u32,
        /// Samples per jittered waveform.
        #[arg(long, default_value_t = 100)]
        bins: usize,
        /// Noise amplitude of the jittered waveforms.
        #[arg(long, default_value_t = 1.0)]
        jitter: f64,
        /// Boundary mode (`inclusive` or `strict`); defaults to SAMPMATCH_BOUNDARY.
        #[arg(long)]
        boundary: Option<String>,
        /// How to raise the invalid flag (`arithmetic` or `raise`).
        /// Defaults to `arithmetic` on hardware and `raise` when simulated.
        #[arg(long)]
        poison: Option<String>,
        /// Structured JSONL log path, or `-` for stdout.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Compare two sample lists on the hardware environment.
    Compare {
        /// Measured samples, comma or space separated.
        #[arg(long, allow_hyphen_values = true)]
        test: String,
        /// Reference samples, comma or space separated.
        #[arg(long, allow_hyphen_values = true)]
        reference: String,
        /// Greatest acceptable per-sample difference.
        #[arg(long)]
        threshold: f64,
        /// Evaluate an invalid operation before comparing.
        #[arg(long)]
        poison: bool,
        /// Boundary mode (`inclusive` or `strict`); defaults to SAMPMATCH_BOUNDARY.
        #[arg(long)]
        boundary: Option<String>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// Log file to check.
        #[arg(long)]
        log: PathBuf,
    },
}

fn resolve_boundary(raw: Option<&str>) -> BoundaryMode {
    raw.map_or_else(boundary_mode, BoundaryMode::from_str_loose)
}

fn print_summary(results: &[ScenarioResult]) {
    for result in results {
        let status = if result.passed() { "PASS" } else { "FAIL" };
        eprintln!(
            "[{status}] {:<13} checks={:<4} failed={:<3} faults_reported={}",
            result.name,
            result.checks.len(),
            result.failed(),
            result.faults_reported,
        );
        for check in result.checks.iter().filter(|c| !c.passed()) {
            eprintln!(
                "         {} @ {}: expected {}, got {} (evaluated {}/{})",
                check.label,
                check.threshold,
                check.expected,
                check.report.matched,
                check.report.evaluated,
                check.bins,
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Demo {
            env,
            seed,
            rounds,
            bins,
            jitter,
            boundary,
            poison,
            log,
        } => {
            let seed = parse_seed(&seed).map_err(|e| format!("invalid --seed '{seed}': {e}"))?;
            let default_poison = match env.as_str() {
                "hardware" => PoisonMethod::Arithmetic,
                "simulated" => PoisonMethod::Raise,
                other => {
                    return Err(
                        format!("Unsupported env '{other}', expected hardware|simulated").into(),
                    );
                }
            };
            let poison = match poison.as_deref() {
                None => default_poison,
                Some(raw) => PoisonMethod::from_str_loose(raw)
                    .ok_or_else(|| format!("Unsupported poison '{raw}', expected arithmetic|raise"))?,
            };
            let config = SuiteConfig {
                seed,
                rounds,
                bins,
                jitter,
                boundary: resolve_boundary(boundary.as_deref()),
                poison,
            };
            eprintln!(
                "Running sampmatch demo on the {env} environment ({} boundary, seed {seed:#x})",
                config.boundary.as_str()
            );

            let mut emitter = log
                .as_deref()
                .map(|path| LogEmitter::open(path, "sampmatch", &format!("{seed:x}")))
                .transpose()?;

            let results = if env == "hardware" {
                run_suite(&HardwareEnv::current(), "hardware", &config, emitter.as_mut())?
            } else {
                run_suite(&SimulatedEnv::new(), "simulated", &config, emitter.as_mut())?
            };
            print_summary(&results);
            if let (Some(path), Some(emitter)) = (&log, &emitter) {
                eprintln!(
                    "Wrote {} structured log entries for run {} to {}",
                    emitter.emitted(),
                    emitter.run_id(),
                    path.display()
                );
            }
            for result in &results {
                result.ensure_passed()?;
            }
        }
        Command::Compare {
            test,
            reference,
            threshold,
            poison,
            boundary,
        } => {
            let test = parse_samples(&test)?;
            let reference = parse_samples(&reference)?;
            if test.len() != reference.len() {
                return Err(HarnessError::LengthMismatch {
                    test: test.len(),
                    reference: reference.len(),
                }
                .into());
            }

            let env = HardwareEnv::current();
            env.reset_all();
            if poison {
                PoisonMethod::Arithmetic.apply(&env, "hardware")?;
            }
            let mut matcher = SequenceMatcher::with_boundary(
                &env,
                StdoutReporter::stdout(),
                resolve_boundary(boundary.as_deref()),
            );
            let report = matcher.compare(&test, &reference, test.len(), threshold);
            let body = serde_json::json!({
                "matched": report.matched,
                "evaluated": report.evaluated,
                "first_mismatch": report.first_mismatch,
                "faulted": report.faulted,
                "faults": env.raised().names(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for error in &errors {
                eprintln!("{error}");
            }
            if !errors.is_empty() {
                return Err(format!(
                    "Log validation failed: {} error(s) in {lines} line(s)",
                    errors.len()
                )
                .into());
            }
            eprintln!("{}: {lines} line(s) valid", log.display());
        }
    }

    Ok(())
}
