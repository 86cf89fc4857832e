//! Fault reporters.
//!
//! A reporter is told that a comparison observed a raised fault flag. It may
//! emit a diagnostic; it has no channel back into the comparison. `report`
//! takes no arguments and returns `()`, and the comparator has already
//! decided the element failed before calling it.
//!
//! Anything that is not a callable of exactly that shape is rejected by the
//! compiler. A plain data value does not implement the trait:
//!
//! ```compile_fail
//! use sampmatch_core::ElementComparator;
//! use sampmatch_membrane::SimulatedEnv;
//!
//! let env = SimulatedEnv::new();
//! let cmp = ElementComparator::new(&env);
//! let mut message = "Error: a math error occurred";
//! cmp.matches(1.0, 2.0, 0.0, &mut message);
//! ```
//!
//! Nor does a closure that tries to hand back a verdict:
//!
//! ```compile_fail
//! use sampmatch_core::ElementComparator;
//! use sampmatch_membrane::SimulatedEnv;
//!
//! let env = SimulatedEnv::new();
//! let cmp = ElementComparator::new(&env);
//! cmp.matches(1.0, 2.0, 0.0, &mut || true);
//! ```

use std::io::{self, Write};

/// Diagnostic written by [`WriteReporter`].
pub const FAULT_MESSAGE: &str = "Error: - A math error occurred. Returning no match found.";

/// Side-effect-only notification that a fault was observed.
pub trait FaultReporter {
    fn report(&mut self);
}

impl<F: FnMut()> FaultReporter for F {
    fn report(&mut self) {
        self();
    }
}

/// Writes [`FAULT_MESSAGE`] to a stream on every fault.
///
/// Write errors are counted, not propagated: the comparison result is
/// already fixed when the reporter runs.
#[derive(Debug)]
pub struct WriteReporter<W> {
    out: W,
    write_errors: usize,
}

/// The default reporter: [`FAULT_MESSAGE`] on standard output.
pub type StdoutReporter = WriteReporter<io::Stdout>;

impl StdoutReporter {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for StdoutReporter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> WriteReporter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            write_errors: 0,
        }
    }

    /// Number of diagnostics that could not be written.
    #[must_use]
    pub fn write_errors(&self) -> usize {
        self.write_errors
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FaultReporter for WriteReporter<W> {
    fn report(&mut self) {
        if writeln!(self.out, "{FAULT_MESSAGE}").is_err() {
            self.write_errors += 1;
        }
    }
}

/// Counts fault notifications.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingReporter {
    count: usize,
}

impl CountingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl FaultReporter for CountingReporter {
    fn report(&mut self) {
        self.count += 1;
    }
}

/// Ignores fault notifications. The comparison result still reflects them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SilentReporter;

impl FaultReporter for SilentReporter {
    fn report(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn closure_is_a_reporter() {
        let mut calls = 0;
        {
            let mut reporter = || calls += 1;
            reporter.report();
            reporter.report();
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn write_reporter_emits_fixed_message() {
        let mut reporter = WriteReporter::new(Vec::new());
        reporter.report();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, format!("{FAULT_MESSAGE}\n"));
    }

    #[test]
    fn write_errors_are_counted_not_raised() {
        let mut reporter = WriteReporter::new(BrokenPipe);
        reporter.report();
        reporter.report();
        assert_eq!(reporter.write_errors(), 2);
    }

    #[test]
    fn counting_reporter_counts() {
        let mut reporter = CountingReporter::new();
        for _ in 0..3 {
            reporter.report();
        }
        assert_eq!(reporter.count(), 3);
    }

    #[test]
    fn silent_reporter_does_not_hide_faults() {
        use crate::SequenceMatcher;
        use sampmatch_membrane::{BoundaryMode, FaultClass, SimulatedEnv};

        let env = SimulatedEnv::poisoned(FaultClass::Invalid);
        let mut matcher =
            SequenceMatcher::with_boundary(&env, SilentReporter, BoundaryMode::Inclusive);
        assert!(!matcher.matches(&[1.0], &[1.0], 1, 1.0));
    }
}
