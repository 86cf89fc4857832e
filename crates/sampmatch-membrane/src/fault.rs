//! Fault classes and the arithmetic environment contract.

use std::fmt;

/// One class of floating-point exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaultClass {
    /// Invalid operation (`0/0`, `inf - inf`, `sqrt(-1)`, ...).
    Invalid,
    /// Finite non-zero value divided by zero.
    DivByZero,
    /// Result too large to represent.
    Overflow,
    /// Result too small to represent as a normal number.
    Underflow,
    /// Result was rounded.
    Inexact,
}

impl FaultClass {
    /// Every class, in bit order.
    pub const ALL: [FaultClass; 5] = [
        FaultClass::Invalid,
        FaultClass::DivByZero,
        FaultClass::Overflow,
        FaultClass::Underflow,
        FaultClass::Inexact,
    ];

    /// Stable lowercase name, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::DivByZero => "div_by_zero",
            Self::Overflow => "overflow",
            Self::Underflow => "underflow",
            Self::Inexact => "inexact",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Invalid => 1 << 0,
            Self::DivByZero => 1 << 1,
            Self::Overflow => 1 << 2,
            Self::Underflow => 1 << 3,
            Self::Inexact => 1 << 4,
        }
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of fault classes.
///
/// The bit layout is private and independent of any hardware encoding;
/// `fenv` translates to and from the platform's `FE_*` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaultClasses(u8);

impl FaultClasses {
    /// No classes.
    pub const EMPTY: Self = Self(0);
    /// Every class.
    pub const ALL: Self = Self(0b1_1111);

    /// Set containing exactly `class`.
    #[must_use]
    pub const fn only(class: FaultClass) -> Self {
        Self(class.bit())
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, class: FaultClass) -> bool {
        self.0 & class.bit() != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn insert(&mut self, class: FaultClass) {
        self.0 |= class.bit();
    }

    pub fn remove(&mut self, class: FaultClass) {
        self.0 &= !class.bit();
    }

    /// Iterate the contained classes in bit order.
    pub fn iter(self) -> impl Iterator<Item = FaultClass> {
        FaultClass::ALL
            .into_iter()
            .filter(move |class| self.contains(*class))
    }

    /// Names of the contained classes, for structured logs.
    #[must_use]
    pub fn names(self) -> Vec<String> {
        self.iter().map(|class| class.as_str().to_string()).collect()
    }
}

impl From<FaultClass> for FaultClasses {
    fn from(class: FaultClass) -> Self {
        Self::only(class)
    }
}

impl FromIterator<FaultClass> for FaultClasses {
    fn from_iter<I: IntoIterator<Item = FaultClass>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for class in iter {
            set.insert(class);
        }
        set
    }
}

impl fmt::Display for FaultClasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, class) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(class.as_str())?;
        }
        Ok(())
    }
}

/// The arithmetic environment a comparison runs in.
///
/// Implementations describe state that outlives any single call: a flag
/// raised by unrelated code earlier in the thread is indistinguishable from
/// one raised by the caller's own arithmetic. Reads have no side effects;
/// `reset` is visible to every later reader of the same environment.
pub trait FloatEnv {
    /// Classes currently raised.
    fn raised(&self) -> FaultClasses;

    /// Raise `classes`, as a faulting operation would.
    fn raise(&self, classes: FaultClasses);

    /// Clear `classes`; other raised classes stay raised.
    fn reset(&self, classes: FaultClasses);

    /// Whether `class` is currently raised.
    fn is_raised(&self, class: FaultClass) -> bool {
        self.raised().contains(class)
    }

    /// Clear every class.
    fn reset_all(&self) {
        self.reset(FaultClasses::ALL);
    }
}

impl<E: FloatEnv + ?Sized> FloatEnv for &E {
    fn raised(&self) -> FaultClasses {
        (**self).raised()
    }

    fn raise(&self, classes: FaultClasses) {
        (**self).raise(classes);
    }

    fn reset(&self, classes: FaultClasses) {
        (**self).reset(classes);
    }
}

impl<E: FloatEnv + ?Sized> FloatEnv for Box<E> {
    fn raised(&self) -> FaultClasses {
        (**self).raised()
    }

    fn raise(&self, classes: FaultClasses) {
        (**self).raise(classes);
    }

    fn reset(&self, classes: FaultClasses) {
        (**self).reset(classes);
    }
}
