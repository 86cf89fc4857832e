//! In-memory fault environment.
//!
//! Real arithmetic never touches a [`SimulatedEnv`]; its flags change only
//! through [`FloatEnv::raise`] and [`FloatEnv::reset`]. Tests use it to
//! construct an environment that is already poisoned before a comparison
//! runs, without depending on the optimiser preserving a faulting operation.

use std::cell::Cell;

use crate::fault::{FaultClasses, FloatEnv};

/// Fault environment backed by a `Cell`.
#[derive(Debug, Default)]
pub struct SimulatedEnv {
    flags: Cell<FaultClasses>,
}

impl SimulatedEnv {
    /// Environment with every flag clear.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment with `classes` already raised.
    #[must_use]
    pub fn poisoned(classes: impl Into<FaultClasses>) -> Self {
        Self {
            flags: Cell::new(classes.into()),
        }
    }
}

impl FloatEnv for SimulatedEnv {
    fn raised(&self) -> FaultClasses {
        self.flags.get()
    }

    fn raise(&self, classes: FaultClasses) {
        self.flags.set(self.flags.get().union(classes));
    }

    fn reset(&self, classes: FaultClasses) {
        self.flags.set(self.flags.get().difference(classes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultClass;

    #[test]
    fn starts_clear() {
        let env = SimulatedEnv::new();
        assert!(env.raised().is_empty());
        assert!(!env.is_raised(FaultClass::Invalid));
    }

    #[test]
    fn poisoned_constructor_pre_raises() {
        let env = SimulatedEnv::poisoned(FaultClass::Invalid);
        assert!(env.is_raised(FaultClass::Invalid));
        assert!(!env.is_raised(FaultClass::Overflow));
    }

    #[test]
    fn flags_are_sticky_until_reset() {
        let env = SimulatedEnv::new();
        env.raise(FaultClass::Invalid.into());
        env.raise(FaultClass::Inexact.into());
        assert!(env.is_raised(FaultClass::Invalid));

        env.reset(FaultClass::Inexact.into());
        assert!(env.is_raised(FaultClass::Invalid));
        assert!(!env.is_raised(FaultClass::Inexact));

        env.reset_all();
        assert!(env.raised().is_empty());
    }

    #[test]
    fn shared_reference_observes_same_state() {
        let env = SimulatedEnv::new();
        let alias: &dyn FloatEnv = &env;
        alias.raise(FaultClass::Invalid.into());
        assert!(env.is_raised(FaultClass::Invalid));
    }
}
