// Every export takes raw pointers from C callers and documents its contract
// once at module level.
#![allow(clippy::missing_safety_doc)]
//! # sampmatch-abi
//!
//! `extern "C"` boundary for sampmatch, for C test harnesses that compare
//! measured against reference waveforms.
//!
//! ```text
//! C caller -> ABI entry (this crate) -> SequenceMatcher -> HardwareEnv (calling thread's flags)
//! ```
//!
//! The fault reporter crosses the boundary as `Option<extern "C" fn()>`, a
//! nullable function pointer with no arguments and no return value. Rust
//! callers cannot hand it anything else; a C caller that casts a data
//! pointer to this type has already left defined behaviour on its side of
//! the boundary.
//!
//! Pointer contract for `test`/`reference`: either null, or valid for
//! reading `bins` consecutive `double`s. With `bins == 0` neither pointer is
//! looked at, so `(NULL, NULL, 0, t)` matches like any empty comparison.

use libc::c_int;

use sampmatch_core::{SequenceMatcher, StdoutReporter};
use sampmatch_membrane::{FaultClass, FloatEnv, HardwareEnv};

/// Fault notification callback accepted from C.
pub type FaultCallback = extern "C" fn();

/// Returns `1` when the first `bins` samples match within `threshold`,
/// `0` otherwise. Prints the default diagnostic on fault.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sampmatch_match(
    test: *const f64,
    reference: *const f64,
    bins: c_int,
    threshold: f64,
) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { sampmatch_match_with_reporter(test, reference, bins, threshold, None) }
}

/// Like [`sampmatch_match`], invoking `on_fault` instead of printing when a
/// fault is observed. A null `on_fault` selects the default diagnostic.
///
/// `bins == 0` returns `1` before the pointers are checked. Null sample
/// pointers with `bins > 0`, or a negative `bins`, return `0` without
/// reading.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sampmatch_match_with_reporter(
    test: *const f64,
    reference: *const f64,
    bins: c_int,
    threshold: f64,
    on_fault: Option<FaultCallback>,
) -> c_int {
    let Ok(bins) = usize::try_from(bins) else {
        return 0;
    };
    if bins == 0 {
        return 1;
    }
    if test.is_null() || reference.is_null() {
        return 0;
    }

    // SAFETY: non-null, and the caller guarantees `bins` readable doubles.
    let (test, reference) = unsafe {
        (
            std::slice::from_raw_parts(test, bins),
            std::slice::from_raw_parts(reference, bins),
        )
    };

    let env = HardwareEnv::current();
    let matched = match on_fault {
        Some(callback) => {
            SequenceMatcher::new(&env, || callback()).matches(test, reference, bins, threshold)
        }
        None => SequenceMatcher::new(&env, StdoutReporter::stdout())
            .matches(test, reference, bins, threshold),
    };
    c_int::from(matched)
}

/// Clear every sticky floating-point exception flag of the calling thread.
#[unsafe(no_mangle)]
pub extern "C" fn sampmatch_reset_fault_state() {
    HardwareEnv::current().reset_all();
}

/// Returns `1` when the calling thread's invalid-operation flag is raised.
#[unsafe(no_mangle)]
pub extern "C" fn sampmatch_fault_invalid_raised() -> c_int {
    c_int::from(HardwareEnv::current().is_raised(FaultClass::Invalid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_pointers_never_match() {
        let samples = [1.0_f64; 2];
        // SAFETY: null is handled before any read.
        unsafe {
            assert_eq!(sampmatch_match(std::ptr::null(), samples.as_ptr(), 2, 1.0), 0);
            assert_eq!(sampmatch_match(samples.as_ptr(), std::ptr::null(), 2, 1.0), 0);
        }
    }

    #[test]
    fn empty_comparison_matches_even_with_null_pointers() {
        let samples = [1.0_f64; 2];
        // SAFETY: zero bins never dereferences either pointer.
        unsafe {
            assert_eq!(sampmatch_match(std::ptr::null(), std::ptr::null(), 0, 0.0), 1);
            assert_eq!(sampmatch_match(std::ptr::null(), samples.as_ptr(), 0, 0.0), 1);
            assert_eq!(sampmatch_match(std::ptr::null(), std::ptr::null(), -1, 0.0), 0);
        }
    }

    #[test]
    fn negative_bins_never_match() {
        let samples = [1.0_f64; 2];
        // SAFETY: negative length is rejected before any read.
        let result = unsafe { sampmatch_match(samples.as_ptr(), samples.as_ptr(), -1, 1.0) };
        assert_eq!(result, 0);
    }
}
