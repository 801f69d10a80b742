//! Two-way factorial analysis of variance with interaction
//!
//! Explicit sum-of-squares decomposition over observations cross-classified
//! by two categorical factors:
//!
//! ```text
//! SS_total = SS_A + SS_B + SS_A×B + SS_error
//! df:        a−1    b−1   (a−1)(b−1)  N−ab
//! ```
//!
//! Degeneracy policy:
//! - fewer than 2 levels on either factor, or no residual degrees of freedom
//!   (N ≤ ab, e.g. every cell a singleton): insufficient data;
//! - any empty cell: the interaction is inestimable, reported with the
//!   offending cell named — cells are never silently dropped;
//! - zero error mean square: degenerate.
//!
//! Unbalanced (unequal cell sizes) designs are computed with weighted
//! marginal and cell means and flagged `unbalanced`; exact SS additivity is
//! guaranteed only for balanced inputs, and a small negative interaction SS
//! arising from unbalance is clamped to zero.

use crate::describe::mean;
use crate::outcome::{Analysis, SkipReason};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::collections::BTreeMap;

/// One observation cross-classified by two factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Level of factor A
    pub a: String,
    /// Level of factor B
    pub b: String,
    /// Measured value
    pub value: f64,
}

impl Observation {
    /// Create a new cross-classified observation.
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>, value: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            value,
        }
    }
}

/// One tested effect (main effect or interaction) of the decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaEffect {
    /// Effect label (factor name or "A×B")
    pub label: String,
    /// Sum of squares attributed to the effect
    pub ss: f64,
    /// Degrees of freedom of the effect
    pub df: f64,
    /// F statistic (effect MS over error MS)
    pub f: f64,
    /// p-value against the F(df, df_error) distribution
    pub p_value: f64,
}

/// Result of a two-way factorial ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoWayAnova {
    /// Main effect of factor A
    pub factor_a: AnovaEffect,
    /// Main effect of factor B
    pub factor_b: AnovaEffect,
    /// A×B interaction effect
    pub interaction: AnovaEffect,
    /// Residual sum of squares
    pub ss_error: f64,
    /// Residual degrees of freedom, N−ab
    pub df_error: f64,
    /// Total sum of squares about the grand mean
    pub ss_total: f64,
    /// True when cell sizes are unequal; SS additivity is then approximate
    pub unbalanced: bool,
}

/// Two-way factorial ANOVA with interaction.
///
/// `label_a` and `label_b` name the factors in the returned effects (the
/// interaction is labeled `"{label_a}×{label_b}"`).
#[must_use]
pub fn two_way_anova(
    label_a: &str,
    label_b: &str,
    observations: &[Observation],
) -> Analysis<TwoWayAnova> {
    let levels_a = distinct_levels(observations, |o| o.a.as_str());
    let levels_b = distinct_levels(observations, |o| o.b.as_str());

    if levels_a.len() < 2 || levels_b.len() < 2 {
        return Analysis::Skipped(SkipReason::InsufficientData(format!(
            "need at least 2 levels per factor, got {} level(s) of {label_a} and {} of {label_b}",
            levels_a.len(),
            levels_b.len()
        )));
    }

    let mut cells: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    for obs in observations {
        cells
            .entry((obs.a.as_str(), obs.b.as_str()))
            .or_default()
            .push(obs.value);
    }

    // Every cell of the a×b cross must be populated or the interaction term
    // has no estimate for that combination
    for la in &levels_a {
        for lb in &levels_b {
            if !cells.contains_key(&(la.as_str(), lb.as_str())) {
                return Analysis::Skipped(SkipReason::Inestimable(format!(
                    "empty cell ({label_a}={la}, {label_b}={lb}); interaction is inestimable"
                )));
            }
        }
    }

    let n_total = observations.len();
    let cell_count = levels_a.len() * levels_b.len();
    if n_total <= cell_count {
        return Analysis::Skipped(SkipReason::InsufficientData(format!(
            "no residual degrees of freedom ({n_total} observations across {cell_count} cells)"
        )));
    }

    let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
    let grand_mean = mean(&values).unwrap_or(0.0);
    let ss_total: f64 = values.iter().map(|v| (v - grand_mean).powi(2)).sum();

    let ss_a = marginal_ss(observations, grand_mean, |o| o.a.as_str());
    let ss_b = marginal_ss(observations, grand_mean, |o| o.b.as_str());

    let mut ss_cells = 0.0;
    let mut ss_error = 0.0;
    for group in cells.values() {
        let cell_mean = mean(group).unwrap_or(0.0);
        #[allow(clippy::cast_precision_loss)]
        let weight = group.len() as f64;
        ss_cells += weight * (cell_mean - grand_mean).powi(2);
        ss_error += group.iter().map(|v| (v - cell_mean).powi(2)).sum::<f64>();
    }

    // Exact in the balanced case; unbalance can push the subtraction slightly
    // negative, which carries no information
    let ss_interaction = (ss_cells - ss_a - ss_b).max(0.0);

    let first_size = cells.values().next().map_or(0, Vec::len);
    let unbalanced = cells.values().any(|g| g.len() != first_size);

    #[allow(clippy::cast_precision_loss)]
    let df_a = (levels_a.len() - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    let df_b = (levels_b.len() - 1) as f64;
    let df_interaction = df_a * df_b;
    #[allow(clippy::cast_precision_loss)]
    let df_error = (n_total - cell_count) as f64;

    let ms_error = ss_error / df_error;
    if ms_error == 0.0 {
        return Analysis::Skipped(SkipReason::Degenerate(
            "zero error mean square (no within-cell variation)".to_string(),
        ));
    }

    let effect = |label: String, ss: f64, df: f64| -> Option<AnovaEffect> {
        let f = (ss / df) / ms_error;
        let p_value = FisherSnedecor::new(df, df_error)
            .ok()
            .map(|dist| (1.0 - dist.cdf(f)).clamp(0.0, 1.0))?;
        Some(AnovaEffect {
            label,
            ss,
            df,
            f,
            p_value,
        })
    };

    let (Some(factor_a), Some(factor_b), Some(interaction)) = (
        effect(label_a.to_string(), ss_a, df_a),
        effect(label_b.to_string(), ss_b, df_b),
        effect(format!("{label_a}×{label_b}"), ss_interaction, df_interaction),
    ) else {
        return Analysis::Skipped(SkipReason::Degenerate(
            "F-distribution undefined for effect degrees of freedom".to_string(),
        ));
    };

    Analysis::Computed(TwoWayAnova {
        factor_a,
        factor_b,
        interaction,
        ss_error,
        df_error,
        ss_total,
        unbalanced,
    })
}

fn distinct_levels<'a, F>(observations: &'a [Observation], level: F) -> Vec<String>
where
    F: Fn(&'a Observation) -> &'a str,
{
    let mut levels: Vec<String> = observations
        .iter()
        .map(|o| level(o).to_string())
        .collect();
    levels.sort_unstable();
    levels.dedup();
    levels
}

fn marginal_ss<'a, F>(observations: &'a [Observation], grand_mean: f64, level: F) -> f64
where
    F: Fn(&'a Observation) -> &'a str,
{
    let mut margins: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        margins.entry(level(obs)).or_default().push(obs.value);
    }
    margins
        .values()
        .map(|group| {
            let margin_mean = mean(group).unwrap_or(0.0);
            #[allow(clippy::cast_precision_loss)]
            let weight = group.len() as f64;
            weight * (margin_mean - grand_mean).powi(2)
        })
        .sum()
}
