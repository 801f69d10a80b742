//! Welch's two-sample t-test (unequal variances)

use crate::describe::{mean, sample_variance};
use crate::effect::{cohens_d, EffectSize};
use crate::outcome::{Analysis, SkipReason};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of a Welch two-sample comparison.
///
/// The test statistic uses unpooled variances; only the companion effect size
/// pools them. The p-value is two-tailed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WelchTest {
    /// t statistic
    pub t: f64,
    /// Welch–Satterthwaite approximate degrees of freedom
    pub df: f64,
    /// Two-tailed p-value in [0, 1]
    pub p_value: f64,
    /// Companion pooled-variance Cohen's d (may itself be degenerate)
    pub effect: Analysis<EffectSize>,
}

/// Welch's t-test for two independent samples.
///
/// Requires at least 2 observations per sample. A zero standard error of the
/// mean difference (both samples constant) is degenerate: the statistic is
/// undefined, not infinite.
#[must_use]
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Analysis<WelchTest> {
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 {
        return Analysis::Skipped(SkipReason::InsufficientData(format!(
            "each sample needs at least 2 observations, got n1={n1}, n2={n2}"
        )));
    }

    // Guarded by the n >= 2 check above
    let (Some(mean1), Some(mean2)) = (mean(a), mean(b)) else {
        return Analysis::Skipped(SkipReason::InsufficientData(
            "empty sample".to_string(),
        ));
    };
    let (Some(var1), Some(var2)) = (sample_variance(a), sample_variance(b)) else {
        return Analysis::Skipped(SkipReason::InsufficientData(
            "variance undefined".to_string(),
        ));
    };

    #[allow(clippy::cast_precision_loss)]
    let (nf1, nf2) = (n1 as f64, n2 as f64);
    let se1 = var1 / nf1;
    let se2 = var2 / nf2;
    let se_diff = (se1 + se2).sqrt();

    if se_diff == 0.0 {
        return Analysis::Skipped(SkipReason::Degenerate(
            "zero standard error (both samples have zero variance)".to_string(),
        ));
    }

    let t = (mean1 - mean2) / se_diff;

    // Welch–Satterthwaite approximation
    let df = (se1 + se2).powi(2) / (se1.powi(2) / (nf1 - 1.0) + se2.powi(2) / (nf2 - 1.0));

    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => {
            return Analysis::Skipped(SkipReason::Degenerate(format!(
                "t-distribution undefined for df={df}"
            )))
        }
    };

    Analysis::Computed(WelchTest {
        t,
        df,
        p_value,
        effect: cohens_d(a, b),
    })
}
