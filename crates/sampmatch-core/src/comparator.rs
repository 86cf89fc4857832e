//! Single-pair comparison against a threshold.

use std::hint::black_box;

use sampmatch_membrane::{BoundaryMode, FaultClass, FloatEnv};

use crate::reporter::FaultReporter;

/// Outcome of comparing one pair of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementVerdict {
    /// Difference within the threshold and no fault observed.
    Match,
    /// Difference outside the threshold (or NaN) and no fault observed.
    Mismatch,
    /// The invalid-operation flag was raised; the difference was not consulted.
    Fault,
}

impl ElementVerdict {
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Compares pairs of samples inside one arithmetic environment.
///
/// The comparator is conservative: whenever the environment reports an
/// invalid operation, the pair fails regardless of how close the samples
/// are. It cannot tell a fault raised by its own subtraction from one left
/// behind by unrelated code earlier in the thread, so callers that want a
/// comparison to reflect only its own inputs must reset the environment
/// first.
#[derive(Debug)]
pub struct ElementComparator<'e, E: ?Sized> {
    env: &'e E,
    boundary: BoundaryMode,
}

impl<'e, E: FloatEnv + ?Sized> ElementComparator<'e, E> {
    /// Inclusive comparator: `|a - b| <= threshold`.
    #[must_use]
    pub const fn new(env: &'e E) -> Self {
        Self::with_boundary(env, BoundaryMode::Inclusive)
    }

    #[must_use]
    pub const fn with_boundary(env: &'e E, boundary: BoundaryMode) -> Self {
        Self { env, boundary }
    }

    #[must_use]
    pub const fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    #[must_use]
    pub const fn env(&self) -> &'e E {
        self.env
    }

    /// Do `a` and `b` match within `threshold`?
    ///
    /// Returns `false` unconditionally, after invoking `on_fault`, when the
    /// environment has the invalid-operation flag raised.
    pub fn matches<R: FaultReporter + ?Sized>(
        &self,
        a: f64,
        b: f64,
        threshold: f64,
        on_fault: &mut R,
    ) -> bool {
        self.check(a, b, threshold, on_fault).is_match()
    }

    /// Like [`matches`](Self::matches) but distinguishes a fault from an
    /// ordinary mismatch.
    pub fn check<R: FaultReporter + ?Sized>(
        &self,
        a: f64,
        b: f64,
        threshold: f64,
        on_fault: &mut R,
    ) -> ElementVerdict {
        // The subtraction has to run, and run before the flag read, or a
        // fault it raises (inf - inf) would be missed.
        let diff = black_box((black_box(a) - black_box(b)).abs());
        if self.env.is_raised(FaultClass::Invalid) {
            on_fault.report();
            return ElementVerdict::Fault;
        }
        if self.boundary.admits(diff, threshold) {
            ElementVerdict::Match
        } else {
            ElementVerdict::Mismatch
        }
    }
}
