//! Conservative tolerance comparison of floating-point sample sequences.
//!
//! Two sequences match when every pair of samples differs by at most a
//! threshold. The comparison is *conservative*: if the arithmetic
//! environment reports that an invalid operation happened, the comparison
//! fails, even when the samples are identical. The environment is an
//! explicit [`FloatEnv`] so the scope of that check is visible at every
//! call site:
//!
//! ```
//! use sampmatch_core::{CountingReporter, SequenceMatcher};
//! use sampmatch_membrane::{BoundaryMode, FaultClass, FloatEnv, SimulatedEnv};
//!
//! let env = SimulatedEnv::new();
//! let samples = [1.0, 2.0, 1.5, -3.0];
//! let mut matcher =
//!     SequenceMatcher::with_boundary(&env, CountingReporter::new(), BoundaryMode::Inclusive);
//! assert!(matcher.matches(&samples, &samples, 4, 0.0));
//!
//! env.raise(FaultClass::Invalid.into());
//! assert!(!matcher.matches(&samples, &samples, 4, 0.0));
//! assert_eq!(matcher.reporter().count(), 1);
//! ```
//!
//! [`match_samples`] and [`reset_fault_state`] bind the same machinery to
//! the calling thread's hardware flags.

pub mod comparator;
pub mod matcher;
pub mod reporter;

pub use comparator::{ElementComparator, ElementVerdict};
pub use matcher::{MatchReport, SequenceMatcher};
pub use reporter::{
    CountingReporter, FAULT_MESSAGE, FaultReporter, SilentReporter, StdoutReporter, WriteReporter,
};

use sampmatch_membrane::{FaultClasses, FloatEnv, HardwareEnv};

/// Compare the first `bins` samples of `test` and `reference` within
/// `threshold`, against the calling thread's hardware fault flags.
///
/// The bound is always inclusive, so a sequence matches itself at threshold
/// `0` whenever no fault flag is raised.
///
/// Prints [`FAULT_MESSAGE`] to standard output when the invalid-operation
/// flag is found raised. The flag is *not* cleared; any invalid operation
/// executed earlier on this thread and never reset makes every call return
/// `false` until [`reset_fault_state`] runs.
///
/// # Panics
///
/// Panics if either slice is shorter than `bins`.
#[must_use]
pub fn match_samples(test: &[f64], reference: &[f64], bins: usize, threshold: f64) -> bool {
    let env = HardwareEnv::current();
    SequenceMatcher::new(&env, StdoutReporter::stdout()).matches(test, reference, bins, threshold)
}

/// Clear every sticky fault flag of the calling thread.
pub fn reset_fault_state() {
    HardwareEnv::current().reset_all();
}

/// Fault classes currently raised on the calling thread.
#[must_use]
pub fn fault_state() -> FaultClasses {
    HardwareEnv::current().raised()
}
