//! Index-by-index comparison of two sample sequences.

use sampmatch_membrane::{BoundaryMode, FloatEnv};

use crate::comparator::{ElementComparator, ElementVerdict};
use crate::reporter::FaultReporter;

/// Result of a sequence comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    /// Every compared pair matched.
    pub matched: bool,
    /// Number of pairs actually evaluated. Stops at the first failure.
    pub evaluated: usize,
    /// Index of the pair that ended the comparison, if any.
    pub first_mismatch: Option<usize>,
    /// The failing pair failed because a fault was observed.
    pub faulted: bool,
}

impl MatchReport {
    const fn all_matched(bins: usize) -> Self {
        Self {
            matched: true,
            evaluated: bins,
            first_mismatch: None,
            faulted: false,
        }
    }
}

/// Compares `test` against `reference` pair by pair, stopping at the first
/// pair that does not match.
///
/// The matcher owns its reporter; retrieve it with
/// [`into_reporter`](Self::into_reporter) to inspect what it recorded.
#[derive(Debug)]
pub struct SequenceMatcher<'e, E: ?Sized, R> {
    comparator: ElementComparator<'e, E>,
    reporter: R,
}

impl<'e, E: FloatEnv + ?Sized, R: FaultReporter> SequenceMatcher<'e, E, R> {
    /// Inclusive matcher. Use [`with_boundary`](Self::with_boundary) for
    /// the strict variant.
    #[must_use]
    pub fn new(env: &'e E, reporter: R) -> Self {
        Self {
            comparator: ElementComparator::new(env),
            reporter,
        }
    }

    #[must_use]
    pub fn with_boundary(env: &'e E, reporter: R, boundary: BoundaryMode) -> Self {
        Self {
            comparator: ElementComparator::with_boundary(env, boundary),
            reporter,
        }
    }

    #[must_use]
    pub fn comparator(&self) -> &ElementComparator<'e, E> {
        &self.comparator
    }

    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    #[must_use]
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Do the first `bins` samples of `test` and `reference` all match?
    ///
    /// # Panics
    ///
    /// Panics if either slice is shorter than `bins`.
    pub fn matches(&mut self, test: &[f64], reference: &[f64], bins: usize, threshold: f64) -> bool {
        self.compare(test, reference, bins, threshold).matched
    }

    /// Same as [`matches`](Self::matches), reporting where and why the
    /// comparison stopped.
    ///
    /// # Panics
    ///
    /// Panics if either slice is shorter than `bins`.
    pub fn compare(
        &mut self,
        test: &[f64],
        reference: &[f64],
        bins: usize,
        threshold: f64,
    ) -> MatchReport {
        let (test, reference) = (&test[..bins], &reference[..bins]);
        for (i, (&a, &b)) in test.iter().zip(reference).enumerate() {
            match self.comparator.check(a, b, threshold, &mut self.reporter) {
                ElementVerdict::Match => {}
                verdict => {
                    return MatchReport {
                        matched: false,
                        evaluated: i + 1,
                        first_mismatch: Some(i),
                        faulted: verdict == ElementVerdict::Fault,
                    };
                }
            }
        }
        MatchReport::all_matched(bins)
    }
}
