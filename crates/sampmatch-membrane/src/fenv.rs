//! Hardware floating-point exception flags via `<fenv.h>`.
//!
//! The flags live in the FPU status register of the *calling thread*
//! (MXCSR/x87 status word on x86, FPSR on aarch64). A new thread starts
//! with a copy of its creator's floating-point environment, raised flags
//! included; after the spawn the two sets are independent. A
//! [`HardwareEnv`] handle is neither `Send` nor `Sync`: a handle moved to
//! another thread would read that thread's flags, not the ones it was
//! created to describe.

use libc::c_int;
use std::marker::PhantomData;

use crate::fault::{FaultClass, FaultClasses, FloatEnv};

#[cfg_attr(all(target_os = "linux", target_env = "gnu"), link(name = "m"))]
unsafe extern "C" {
    fn fetestexcept(excepts: c_int) -> c_int;
    fn feclearexcept(excepts: c_int) -> c_int;
    fn feraiseexcept(excepts: c_int) -> c_int;
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod bits {
    use libc::c_int;

    pub const FE_INVALID: c_int = 0x01;
    pub const FE_DIVBYZERO: c_int = 0x04;
    pub const FE_OVERFLOW: c_int = 0x08;
    pub const FE_UNDERFLOW: c_int = 0x10;
    pub const FE_INEXACT: c_int = 0x20;
}

// aarch64, arm, riscv and loongarch all share this layout.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
mod bits {
    use libc::c_int;

    pub const FE_INVALID: c_int = 0x01;
    pub const FE_DIVBYZERO: c_int = 0x02;
    pub const FE_OVERFLOW: c_int = 0x04;
    pub const FE_UNDERFLOW: c_int = 0x08;
    pub const FE_INEXACT: c_int = 0x10;
}

pub use bits::{FE_DIVBYZERO, FE_INEXACT, FE_INVALID, FE_OVERFLOW, FE_UNDERFLOW};

/// Union of every `FE_*` bit this crate understands.
pub const FE_ALL_EXCEPT: c_int = FE_INVALID | FE_DIVBYZERO | FE_OVERFLOW | FE_UNDERFLOW | FE_INEXACT;

/// Platform `FE_*` bit for one class.
#[must_use]
pub const fn class_to_fe(class: FaultClass) -> c_int {
    match class {
        FaultClass::Invalid => FE_INVALID,
        FaultClass::DivByZero => FE_DIVBYZERO,
        FaultClass::Overflow => FE_OVERFLOW,
        FaultClass::Underflow => FE_UNDERFLOW,
        FaultClass::Inexact => FE_INEXACT,
    }
}

/// Platform `FE_*` mask for a set of classes.
#[must_use]
pub fn classes_to_fe(classes: FaultClasses) -> c_int {
    classes.iter().fold(0, |mask, class| mask | class_to_fe(class))
}

/// Decode a platform `FE_*` mask. Unknown bits are ignored.
#[must_use]
pub fn fe_to_classes(mask: c_int) -> FaultClasses {
    FaultClass::ALL
        .into_iter()
        .filter(|class| mask & class_to_fe(*class) != 0)
        .collect()
}

/// Handle on the calling thread's hardware exception flags.
///
/// Zero-sized; creating one has no effect on the flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareEnv {
    _thread_bound: PhantomData<*const ()>,
}

impl HardwareEnv {
    /// Handle for the current thread.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            _thread_bound: PhantomData,
        }
    }
}

impl FloatEnv for HardwareEnv {
    fn raised(&self) -> FaultClasses {
        // SAFETY: fetestexcept only reads the FPU status register.
        let mask = unsafe { fetestexcept(FE_ALL_EXCEPT) };
        fe_to_classes(mask)
    }

    fn raise(&self, classes: FaultClasses) {
        let mask = classes_to_fe(classes);
        if mask == 0 {
            return;
        }
        // SAFETY: traps are masked by default, so raising only sets the
        // sticky bits. The return value is non-zero only for bits outside
        // FE_ALL_EXCEPT, which classes_to_fe never produces.
        unsafe {
            feraiseexcept(mask);
        }
    }

    fn reset(&self, classes: FaultClasses) {
        let mask = classes_to_fe(classes);
        if mask == 0 {
            return;
        }
        // SAFETY: feclearexcept only writes the sticky status bits.
        unsafe {
            feclearexcept(mask);
        }
    }

    fn is_raised(&self, class: FaultClass) -> bool {
        // SAFETY: see `raised`.
        unsafe { fetestexcept(class_to_fe(class)) != 0 }
    }
}

/// Execute an invalid operation (`sqrt(-1)`) at runtime.
///
/// The operand goes through [`std::hint::black_box`] so the square root is
/// not folded at compile time; the invalid flag of the calling thread is
/// raised as a side effect. Returns the resulting NaN.
#[must_use]
pub fn provoke_invalid() -> f64 {
    std::hint::black_box(-1.0_f64).sqrt()
}
