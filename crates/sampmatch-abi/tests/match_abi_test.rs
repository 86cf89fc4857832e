//! Integration tests for the C boundary, driven the way a C harness would.

use std::sync::atomic::{AtomicUsize, Ordering};

use libc::c_int;
use sampmatch_abi::{
    sampmatch_fault_invalid_raised, sampmatch_match, sampmatch_match_with_reporter,
    sampmatch_reset_fault_state,
};
use sampmatch_membrane::fenv::provoke_invalid;

static FAULT_CALLS: AtomicUsize = AtomicUsize::new(0);

extern "C" fn count_fault() {
    FAULT_CALLS.fetch_add(1, Ordering::SeqCst);
}

const TEST: [f64; 4] = [1.0, 2.0, 1.5, -3.0];
const REFERENCE: [f64; 4] = [0.4, 2.2, 0.9, -2.8];

fn abi_match(test: &[f64], reference: &[f64], threshold: f64) -> c_int {
    let bins = c_int::try_from(test.len().min(reference.len())).unwrap();
    // SAFETY: both slices hold at least `bins` doubles.
    unsafe { sampmatch_match(test.as_ptr(), reference.as_ptr(), bins, threshold) }
}

#[test]
fn threshold_sweep_matches_historical_expectations() {
    sampmatch_reset_fault_state();
    assert_eq!(abi_match(&TEST, &TEST, 0.0), 1);
    assert_eq!(abi_match(&TEST, &REFERENCE, 0.0), 0);
    assert_eq!(abi_match(&TEST, &REFERENCE, 0.59), 0);
    assert_eq!(abi_match(&TEST, &REFERENCE, 0.6), 1);
    assert_eq!(abi_match(&TEST, &REFERENCE, 1.0), 1);
}

#[test]
fn zero_bins_matches_without_reading() {
    sampmatch_reset_fault_state();
    assert_eq!(abi_match(&[], &[], 0.0), 1);
}

#[test]
fn poisoned_thread_fails_and_invokes_callback() {
    sampmatch_reset_fault_state();
    let _ = provoke_invalid();
    assert_eq!(sampmatch_fault_invalid_raised(), 1);

    let before = FAULT_CALLS.load(Ordering::SeqCst);
    // SAFETY: both arrays hold four doubles.
    let result = unsafe {
        sampmatch_match_with_reporter(TEST.as_ptr(), TEST.as_ptr(), 4, 1.0, Some(count_fault))
    };
    assert_eq!(result, 0);
    assert_eq!(FAULT_CALLS.load(Ordering::SeqCst), before + 1);

    sampmatch_reset_fault_state();
    assert_eq!(sampmatch_fault_invalid_raised(), 0);
    // SAFETY: as above.
    let result = unsafe {
        sampmatch_match_with_reporter(TEST.as_ptr(), TEST.as_ptr(), 4, 0.0, Some(count_fault))
    };
    assert_eq!(result, 1);
    assert_eq!(FAULT_CALLS.load(Ordering::SeqCst), before + 1);
}
