//! One-way analysis of variance

use crate::describe::mean;
use crate::outcome::{Analysis, SkipReason};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Result of a one-way ANOVA across k groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneWayAnova {
    /// F statistic (between-group MS over within-group MS)
    pub f: f64,
    /// Between-group degrees of freedom, k−1
    pub df_between: f64,
    /// Within-group degrees of freedom, N−k
    pub df_within: f64,
    /// p-value against the F(k−1, N−k) distribution
    pub p_value: f64,
    /// Between-group sum of squares
    pub ss_between: f64,
    /// Within-group sum of squares
    pub ss_within: f64,
}

/// One-way ANOVA over k independent samples.
///
/// Partitions the total sum of squares into between-group and within-group
/// components. Requires k ≥ 2 groups, no empty group, and at least one
/// residual degree of freedom (N > k).
#[must_use]
pub fn one_way_anova(groups: &[&[f64]]) -> Analysis<OneWayAnova> {
    let k = groups.len();
    if k < 2 {
        return Analysis::Skipped(SkipReason::InsufficientData(format!(
            "need at least 2 groups, got {k}"
        )));
    }
    if let Some(empty) = groups.iter().position(|g| g.is_empty()) {
        return Analysis::Skipped(SkipReason::InsufficientData(format!(
            "group {empty} is empty"
        )));
    }

    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    if n_total <= k {
        return Analysis::Skipped(SkipReason::InsufficientData(format!(
            "no residual degrees of freedom ({n_total} observations across {k} groups)"
        )));
    }

    let all: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    // Non-empty by construction
    let grand_mean = mean(&all).unwrap_or(0.0);

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group).unwrap_or(0.0);
        #[allow(clippy::cast_precision_loss)]
        let weight = group.len() as f64;
        ss_between += weight * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    #[allow(clippy::cast_precision_loss)]
    let df_between = (k - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    let df_within = (n_total - k) as f64;

    let ms_within = ss_within / df_within;
    if ms_within == 0.0 {
        return Analysis::Skipped(SkipReason::Degenerate(
            "zero within-group variance".to_string(),
        ));
    }

    let f = (ss_between / df_between) / ms_within;

    let p_value = match FisherSnedecor::new(df_between, df_within) {
        Ok(dist) => (1.0 - dist.cdf(f)).clamp(0.0, 1.0),
        Err(_) => {
            return Analysis::Skipped(SkipReason::Degenerate(format!(
                "F-distribution undefined for df=({df_between}, {df_within})"
            )))
        }
    };

    Analysis::Computed(OneWayAnova {
        f,
        df_between,
        df_within,
        p_value,
        ss_between,
        ss_within,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_group_f_equals_squared_pooled_t() {
        let a = [2.0, 4.0, 6.0];
        let b = [10.0, 12.0, 14.0];
        let result = one_way_anova(&[&a, &b]);
        let anova = result.as_computed().unwrap();

        // pooled t for these samples: sp = 2, t = -8 / (2 * sqrt(2/3))
        let t: f64 = -8.0 / (2.0 * (2.0_f64 / 3.0).sqrt());
        assert!((anova.f - t * t).abs() < 1e-9);
        assert!((anova.df_between - 1.0).abs() < f64::EPSILON);
        assert!((anova.df_within - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sum_of_squares_partitions_total() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 3.0, 4.0, 5.0];
        let c = [10.0, 11.0];
        let anova = one_way_anova(&[&a, &b, &c]);
        let anova = anova.as_computed().unwrap();

        let all: Vec<f64> = [&a[..], &b[..], &c[..]].concat();
        let grand_mean = all.iter().sum::<f64>() / all.len() as f64;
        let ss_total: f64 = all.iter().map(|v| (v - grand_mean).powi(2)).sum();
        assert!((anova.ss_between + anova.ss_within - ss_total).abs() < 1e-9);
    }

    #[test]
    fn identical_groups_give_f_zero() {
        let g = [1.0, 2.0, 3.0];
        let anova = one_way_anova(&[&g, &g, &g]);
        let anova = anova.as_computed().unwrap();
        assert!(anova.f.abs() < 1e-12);
        assert!((anova.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_group_is_insufficient() {
        let g = [1.0, 2.0];
        let result = one_way_anova(&[&g]);
        assert!(matches!(
            result.skip_reason(),
            Some(SkipReason::InsufficientData(_))
        ));
    }

    #[test]
    fn empty_group_is_insufficient() {
        let a = [1.0, 2.0];
        let b: [f64; 0] = [];
        let result = one_way_anova(&[&a, &b]);
        assert!(matches!(
            result.skip_reason(),
            Some(SkipReason::InsufficientData(_))
        ));
    }

    #[test]
    fn all_singletons_have_no_residual_df() {
        let a = [1.0];
        let b = [2.0];
        let result = one_way_anova(&[&a, &b]);
        assert!(matches!(
            result.skip_reason(),
            Some(SkipReason::InsufficientData(_))
        ));
    }

    #[test]
    fn constant_groups_are_degenerate() {
        let a = [3.0, 3.0, 3.0];
        let b = [5.0, 5.0];
        let result = one_way_anova(&[&a, &b]);
        assert!(matches!(
            result.skip_reason(),
            Some(SkipReason::Degenerate(_))
        ));
    }
}
