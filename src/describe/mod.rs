//! Descriptive Statistics Engine
//!
//! Per-condition count, mean, sample standard deviation, and completion rate.
//! "No data" is always explicit: an empty group has `None` mean, a singleton
//! group has `None` standard deviation (undefined, not zero), and a
//! completion rate only exists where sessions exist. `NaN` never enters a
//! summary.

use crate::aggregate::{session_group_key, Factor, GroupKey, GroupedMeasurements};
use crate::record::SessionRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    Some(values.iter().sum::<f64>() / n)
}

/// Bessel-corrected (divisor n−1) sample standard deviation.
///
/// `None` for fewer than 2 observations: the dispersion of a singleton group
/// is undefined, and callers must treat it as insufficient data for
/// variance-based tests rather than as zero spread.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Bessel-corrected sample variance, `None` for fewer than 2 observations.
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    #[allow(clippy::cast_precision_loss)]
    let divisor = (values.len() - 1) as f64;
    Some(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / divisor)
}

/// Per-condition summary: n, mean, standard deviation, completion rate.
///
/// `n >= 0` always; when `n == 0` the mean and standard deviation are `None`,
/// never silently coerced to zero. The completion rate is only present for
/// summaries derived from session-state data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionSummary {
    /// Number of observations in the condition
    pub n: usize,
    /// Arithmetic mean, absent when there is no data
    pub mean: Option<f64>,
    /// Sample standard deviation (n−1), absent for n < 2
    pub std_dev: Option<f64>,
    /// Fraction of sessions with a complete terminal state, absent for
    /// summaries not derived from session data
    pub completion_rate: Option<f64>,
}

impl ConditionSummary {
    /// Summarize a set of measurements (no completion rate).
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        Self {
            n: values.len(),
            mean: mean(values),
            std_dev: sample_std_dev(values),
            completion_rate: None,
        }
    }

    /// Attach a completion rate computed from session-state data.
    #[must_use]
    pub const fn with_completion_rate(mut self, rate: Option<f64>) -> Self {
        self.completion_rate = rate;
        self
    }
}

/// Summarize every group of a [`GroupedMeasurements`].
#[must_use]
pub fn summarize_groups(grouped: &GroupedMeasurements) -> BTreeMap<GroupKey, ConditionSummary> {
    grouped
        .groups()
        .iter()
        .map(|(key, values)| (key.clone(), ConditionSummary::of(values)))
        .collect()
}

/// Fraction of sessions whose terminal state is complete, `None` when the
/// slice is empty.
#[must_use]
pub fn completion_rate(sessions: &[&SessionRecord]) -> Option<f64> {
    if sessions.is_empty() {
        return None;
    }
    let completed = sessions.iter().filter(|s| s.state().is_complete()).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = completed as f64 / sessions.len() as f64;
    Some(rate)
}

/// Partition sessions by the given factors. Session factor columns are
/// mandatory, so every record lands in exactly one group.
#[must_use]
pub fn group_sessions<'a>(
    sessions: &'a [SessionRecord],
    factors: &[Factor],
) -> BTreeMap<GroupKey, Vec<&'a SessionRecord>> {
    let mut groups: BTreeMap<GroupKey, Vec<&SessionRecord>> = BTreeMap::new();
    for session in sessions {
        groups
            .entry(session_group_key(session, factors))
            .or_default()
            .push(session);
    }
    groups
}

/// Completion rate per factor combination.
#[must_use]
pub fn completion_by(
    sessions: &[SessionRecord],
    factors: &[Factor],
) -> BTreeMap<GroupKey, f64> {
    group_sessions(sessions, factors)
        .into_iter()
        .filter_map(|(key, group)| completion_rate(&group).map(|rate| (key, rate)))
        .collect()
}
