//! The default constructors and `match_samples` keep the inclusive bound no
//! matter what the process environment asks for.
//!
//! Lives in its own test binary so setting the variable cannot race other
//! tests.

#![allow(unsafe_code)]

use sampmatch_core::{
    ElementComparator, SequenceMatcher, SilentReporter, match_samples, reset_fault_state,
};
use sampmatch_membrane::{BoundaryMode, SimulatedEnv};

const TEST: [f64; 3] = [1.0, 2.0, -4.0];
const AT_EDGE: [f64; 3] = [1.5, 2.25, -3.5];

#[test]
fn defaults_stay_inclusive_with_strict_requested_by_env() {
    // SAFETY: this binary runs a single test, so no other thread reads the
    // environment concurrently.
    unsafe { std::env::set_var("SAMPMATCH_BOUNDARY", "strict") };

    let env = SimulatedEnv::new();
    assert_eq!(ElementComparator::new(&env).boundary(), BoundaryMode::Inclusive);
    let mut matcher = SequenceMatcher::new(&env, SilentReporter);
    assert_eq!(matcher.comparator().boundary(), BoundaryMode::Inclusive);
    assert!(matcher.matches(&TEST, &AT_EDGE, 3, 0.5));

    reset_fault_state();
    assert!(match_samples(&TEST, &TEST, 3, 0.0));
    assert!(match_samples(&TEST, &AT_EDGE, 3, 0.5));
    assert!(!match_samples(&TEST, &AT_EDGE, 3, 0.25));

    let mut strict = SequenceMatcher::with_boundary(&env, SilentReporter, BoundaryMode::Strict);
    assert!(!strict.matches(&TEST, &AT_EDGE, 3, 0.5));
}
