//! Threshold boundary modes.
//!
//! - `Inclusive` (default): a pair matches when `|a - b| <= threshold`. A
//!   difference exactly at the threshold counts as a match.
//! - `Strict`: a pair matches only when `|a - b| < threshold`. This is the
//!   historical variant; with it a threshold of `0` matches nothing.
//!
//! Nothing in this crate or in `sampmatch-core` picks `Strict` on its own;
//! a caller has to name it.

/// How the threshold bound is applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryMode {
    /// `diff <= threshold`.
    #[default]
    Inclusive,
    /// `diff < threshold`.
    Strict,
}

impl BoundaryMode {
    /// Parse from string (case-insensitive). Unknown values are `Inclusive`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "exclusive" | "lt" | "<" => Self::Strict,
            _ => Self::Inclusive,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inclusive => "inclusive",
            Self::Strict => "strict",
        }
    }

    /// Apply the bound to an already computed difference.
    #[inline]
    #[must_use]
    pub fn admits(self, diff: f64, threshold: f64) -> bool {
        match self {
            Self::Inclusive => diff <= threshold,
            Self::Strict => diff < threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_boundary_modes() {
        assert_eq!(BoundaryMode::from_str_loose("strict"), BoundaryMode::Strict);
        assert_eq!(BoundaryMode::from_str_loose("STRICT"), BoundaryMode::Strict);
        assert_eq!(BoundaryMode::from_str_loose(" lt "), BoundaryMode::Strict);
        assert_eq!(
            BoundaryMode::from_str_loose("inclusive"),
            BoundaryMode::Inclusive
        );
        assert_eq!(BoundaryMode::from_str_loose("<="), BoundaryMode::Inclusive);
        assert_eq!(BoundaryMode::from_str_loose("bogus"), BoundaryMode::Inclusive);
    }

    #[test]
    fn default_is_inclusive() {
        assert_eq!(BoundaryMode::default(), BoundaryMode::Inclusive);
    }

    #[test]
    fn admits_differs_only_at_the_boundary() {
        assert!(BoundaryMode::Inclusive.admits(0.5, 0.5));
        assert!(!BoundaryMode::Strict.admits(0.5, 0.5));
        assert!(BoundaryMode::Inclusive.admits(0.4, 0.5));
        assert!(BoundaryMode::Strict.admits(0.4, 0.5));
        assert!(!BoundaryMode::Inclusive.admits(0.6, 0.5));
        assert!(!BoundaryMode::Strict.admits(0.6, 0.5));
        assert!(BoundaryMode::Inclusive.admits(0.0, 0.0));
        assert!(!BoundaryMode::Strict.admits(0.0, 0.0));
    }

    #[test]
    fn nan_difference_is_never_admitted() {
        assert!(!BoundaryMode::Inclusive.admits(f64::NAN, 1.0));
        assert!(!BoundaryMode::Strict.admits(f64::NAN, f64::INFINITY));
    }
}
