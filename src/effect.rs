//! Effect Size Calculator
//!
//! Cohen's d via the pooled standard deviation:
//!
//! ```text
//! pooled_sd = sqrt( ((n1−1)·sd1² + (n2−1)·sd2²) / (n1+n2−2) )
//! d = (mean1 − mean2) / pooled_sd
//! ```
//!
//! A zero pooled SD (all values identical in both groups) is reported as
//! degenerate — it must never masquerade as an infinite effect.

use crate::describe::{mean, sample_variance};
use crate::outcome::{Analysis, SkipReason};
use serde::Serialize;

/// Standardized mean difference between two groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectSize {
    /// Cohen's d
    pub d: f64,
    /// Pooled standard deviation used in the denominator
    pub pooled_std_dev: f64,
}

impl EffectSize {
    /// Conventional magnitude label (Cohen 1988 thresholds).
    #[must_use]
    pub fn magnitude(&self) -> &'static str {
        let d = self.d.abs();
        if d < 0.2 {
            "negligible"
        } else if d < 0.5 {
            "small"
        } else if d < 0.8 {
            "medium"
        } else {
            "large"
        }
    }
}

/// Cohen's d for two independent samples.
///
/// Skipped with insufficient data when `n1 + n2 <= 2` (the pooled-variance
/// divisor vanishes) and degenerate when the pooled SD is zero.
#[must_use]
pub fn cohens_d(a: &[f64], b: &[f64]) -> Analysis<EffectSize> {
    let (n1, n2) = (a.len(), b.len());
    if n1 + n2 <= 2 || n1 == 0 || n2 == 0 {
        return Analysis::Skipped(SkipReason::InsufficientData(format!(
            "need more than 2 observations across both groups, got n1={n1}, n2={n2}"
        )));
    }

    // Singleton groups contribute zero to the pooled sum via the (n−1) weight
    let var1 = sample_variance(a).unwrap_or(0.0);
    let var2 = sample_variance(b).unwrap_or(0.0);

    #[allow(clippy::cast_precision_loss)]
    let pooled_variance =
        ((n1 as f64 - 1.0) * var1 + (n2 as f64 - 1.0) * var2) / (n1 + n2 - 2) as f64;
    let pooled_std_dev = pooled_variance.sqrt();

    if pooled_std_dev == 0.0 {
        return Analysis::Skipped(SkipReason::Degenerate(
            "pooled standard deviation is zero (all values identical)".to_string(),
        ));
    }

    // Both slices are non-empty here
    let (mean1, mean2) = (mean(a).unwrap_or(0.0), mean(b).unwrap_or(0.0));

    Analysis::Computed(EffectSize {
        d: (mean1 - mean2) / pooled_std_dev,
        pooled_std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_effect_size() {
        // means 4 and 12, pooled sd 2 => d = -4.0 exactly
        let result = cohens_d(&[2.0, 4.0, 6.0], &[10.0, 12.0, 14.0]);
        let effect = result.as_computed().unwrap();
        assert!((effect.d - (-4.0)).abs() < 1e-12);
        assert!((effect.pooled_std_dev - 2.0).abs() < 1e-12);
        assert_eq!(effect.magnitude(), "large");
    }

    #[test]
    fn swapping_groups_negates_d() {
        let a = [1.0, 3.0, 5.0, 9.0];
        let b = [2.0, 2.5, 4.0];
        let ab = cohens_d(&a, &b).as_computed().unwrap().d;
        let ba = cohens_d(&b, &a).as_computed().unwrap().d;
        assert!((ab + ba).abs() < 1e-12);
    }

    #[test]
    fn too_few_observations_is_insufficient() {
        let result = cohens_d(&[1.0], &[2.0]);
        assert!(matches!(
            result.skip_reason(),
            Some(SkipReason::InsufficientData(_))
        ));
    }

    #[test]
    fn empty_group_is_insufficient() {
        let result = cohens_d(&[], &[1.0, 2.0, 3.0]);
        assert!(matches!(
            result.skip_reason(),
            Some(SkipReason::InsufficientData(_))
        ));
    }

    #[test]
    fn identical_values_are_degenerate_not_infinite() {
        let result = cohens_d(&[5.0, 5.0, 5.0], &[5.0, 5.0]);
        assert!(matches!(
            result.skip_reason(),
            Some(SkipReason::Degenerate(_))
        ));
    }

    #[test]
    fn magnitude_thresholds() {
        let effect = |d: f64| EffectSize {
            d,
            pooled_std_dev: 1.0,
        };
        assert_eq!(effect(0.1).magnitude(), "negligible");
        assert_eq!(effect(-0.3).magnitude(), "small");
        assert_eq!(effect(0.6).magnitude(), "medium");
        assert_eq!(effect(-1.2).magnitude(), "large");
    }
}
