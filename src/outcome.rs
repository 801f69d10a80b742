//! Outcome wrapper for statistical computations
//!
//! A hypothesis test or effect size that cannot meet its statistical
//! precondition is not a program failure: the result is marked skipped with a
//! reason and the run continues with the other analyses. [`Analysis`] is that
//! marker. There is exactly one signal for "analysis not computed" — a
//! [`SkipReason`] — regardless of which component declined to compute.

use serde::Serialize;
use std::fmt;

/// Why a statistical computation was not performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// A contributing group has fewer observations than the test requires
    InsufficientData(String),
    /// A denominator (pooled SD, error mean square, standard error) is zero,
    /// so the statistic is undefined — distinct from a genuinely large effect
    Degenerate(String),
    /// The factorial cell configuration makes the requested term inestimable
    /// (an empty cell in a crossed design)
    Inestimable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData(detail) => write!(f, "insufficient data: {detail}"),
            Self::Degenerate(detail) => write!(f, "degenerate statistic: {detail}"),
            Self::Inestimable(detail) => write!(f, "inestimable: {detail}"),
        }
    }
}

/// Outcome of a statistical computation: either a computed value or an
/// explicit skip with its reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Analysis<T> {
    /// The computation met its preconditions and produced a value
    Computed(T),
    /// The computation was skipped; the reason is part of the result
    Skipped(SkipReason),
}

impl<T> Analysis<T> {
    /// True if a value was computed.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    /// The computed value, if any.
    #[must_use]
    pub const fn as_computed(&self) -> Option<&T> {
        match self {
            Self::Computed(value) => Some(value),
            Self::Skipped(_) => None,
        }
    }

    /// The skip reason, if the computation was skipped.
    #[must_use]
    pub const fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Computed(_) => None,
            Self::Skipped(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_accessors() {
        let outcome: Analysis<f64> = Analysis::Computed(1.5);
        assert!(outcome.is_computed());
        assert_eq!(outcome.as_computed(), Some(&1.5));
        assert!(outcome.skip_reason().is_none());
    }

    #[test]
    fn skipped_accessors() {
        let outcome: Analysis<f64> =
            Analysis::Skipped(SkipReason::InsufficientData("n=1".to_string()));
        assert!(!outcome.is_computed());
        assert!(outcome.as_computed().is_none());
        assert_eq!(
            outcome.skip_reason().map(ToString::to_string),
            Some("insufficient data: n=1".to_string())
        );
    }
}
