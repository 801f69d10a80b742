//! Unit Aggregator
//!
//! Converts raw per-action records into per-unit measurements grouped by one
//! or more categorical factors. Grouping is an explicit partition: every input
//! record either contributes to exactly one group or is counted as excluded,
//! so `contributed + excluded == input length` always holds.
//!
//! Ordering is deterministic (`BTreeMap`) so two runs over the same input
//! produce identical output.

use crate::record::{ActionRecord, SessionRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A categorical independent variable of the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    /// Interaction mode (individual vs team)
    Mode,
    /// Model identifier
    Model,
    /// Story template identifier
    Template,
}

impl Factor {
    /// Column name of this factor in the export tables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Model => "model",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered tuple of factor values identifying one experimental condition.
///
/// Keys order lexicographically, which makes grouped output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    /// Build a key from factor values in grouping order.
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// The factor values, in grouping order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl Serialize for GroupKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

/// Per-group numeric measurements plus the count of records that could not
/// contribute to any group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedMeasurements {
    groups: BTreeMap<GroupKey, Vec<f64>>,
    excluded: usize,
}

impl GroupedMeasurements {
    /// All groups in key order.
    #[must_use]
    pub const fn groups(&self) -> &BTreeMap<GroupKey, Vec<f64>> {
        &self.groups
    }

    /// Measurements for one group, empty if the group does not exist.
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> &[f64] {
        self.groups.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of input records that contributed no measurement
    /// (missing factor value, or no measurable attribute).
    #[must_use]
    pub const fn excluded(&self) -> usize {
        self.excluded
    }

    /// Total number of measurements across all groups.
    #[must_use]
    pub fn measurement_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

fn action_factor_value(record: &ActionRecord, factor: Factor) -> Option<String> {
    match factor {
        Factor::Mode => record.mode().map(|m| m.as_str().to_string()),
        Factor::Model => record.model().map(str::to_string),
        Factor::Template => record.template().map(str::to_string),
    }
    // Empty strings in the export mean "value absent"
    .filter(|value| !value.is_empty())
}

fn action_group_key(record: &ActionRecord, factors: &[Factor]) -> Option<GroupKey> {
    factors
        .iter()
        .map(|&factor| action_factor_value(record, factor))
        .collect::<Option<Vec<_>>>()
        .map(GroupKey::new)
}

/// Group key for a session record. Session factor columns are mandatory, so
/// this cannot fail.
#[must_use]
pub fn session_group_key(record: &SessionRecord, factors: &[Factor]) -> GroupKey {
    GroupKey::new(
        factors
            .iter()
            .map(|factor| match factor {
                Factor::Mode => record.mode().as_str().to_string(),
                Factor::Model => record.model().to_string(),
                Factor::Template => record.template().to_string(),
            })
            .collect(),
    )
}

/// Count actions per unit within each factor combination.
///
/// Produces one measurement per (unit, factor-combination): the number of
/// actions that unit logged under that combination. Records missing any
/// requested factor are excluded and counted.
#[must_use]
pub fn count_per_unit(actions: &[ActionRecord], factors: &[Factor]) -> GroupedMeasurements {
    let mut per_unit: BTreeMap<(GroupKey, String), f64> = BTreeMap::new();
    let mut excluded = 0usize;

    for record in actions {
        match action_group_key(record, factors) {
            Some(key) => {
                *per_unit
                    .entry((key, record.unit_id().to_string()))
                    .or_insert(0.0) += 1.0;
            }
            None => excluded += 1,
        }
    }

    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for ((key, _unit), count) in per_unit {
        groups.entry(key).or_default().push(count);
    }

    GroupedMeasurements { groups, excluded }
}

/// Measure one attribute per record within each factor combination.
///
/// The measurement rule returns `None` for records with no measurable
/// attribute (e.g. absent or empty reasoning text); those records are
/// excluded and counted alongside records missing a factor value.
#[must_use]
pub fn measure_per_record<F>(
    actions: &[ActionRecord],
    factors: &[Factor],
    measure: F,
) -> GroupedMeasurements
where
    F: Fn(&ActionRecord) -> Option<f64>,
{
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    let mut excluded = 0usize;

    for record in actions {
        match (action_group_key(record, factors), measure(record)) {
            (Some(key), Some(value)) => groups.entry(key).or_default().push(value),
            _ => excluded += 1,
        }
    }

    GroupedMeasurements { groups, excluded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Mode;

    fn action(unit: &str, mode: Option<Mode>, model: Option<&str>) -> ActionRecord {
        ActionRecord::new(unit, mode, model, Some("t1"))
    }

    #[test]
    fn counts_actions_per_unit_and_mode() {
        let actions = vec![
            action("u1", Some(Mode::Individual), Some("a")),
            action("u1", Some(Mode::Individual), Some("a")),
            action("u2", Some(Mode::Team), Some("a")),
        ];

        let grouped = count_per_unit(&actions, &[Factor::Mode]);
        assert_eq!(grouped.get(&GroupKey::from("individual")), &[2.0]);
        assert_eq!(grouped.get(&GroupKey::from("team")), &[1.0]);
        assert_eq!(grouped.excluded(), 0);
    }

    #[test]
    fn missing_factor_is_excluded_not_fatal() {
        let actions = vec![
            action("u1", Some(Mode::Individual), Some("a")),
            action("u2", None, Some("a")),
        ];

        let grouped = count_per_unit(&actions, &[Factor::Mode]);
        assert_eq!(grouped.measurement_count(), 1);
        assert_eq!(grouped.excluded(), 1);
    }

    #[test]
    fn count_partition_covers_every_record() {
        let actions = vec![
            action("u1", Some(Mode::Individual), Some("a")),
            action("u1", Some(Mode::Individual), Some("a")),
            action("u2", None, Some("a")),
            action("u3", Some(Mode::Team), None),
        ];

        let grouped = count_per_unit(&actions, &[Factor::Mode, Factor::Model]);
        let contributed: f64 = grouped.groups().values().flatten().sum();
        #[allow(clippy::cast_precision_loss)]
        let total = actions.len() as f64;
        assert!((contributed + grouped.excluded() as f64 - total).abs() < f64::EPSILON);
    }

    #[test]
    fn one_measurement_per_unit_per_key() {
        let actions = vec![
            action("u1", Some(Mode::Individual), Some("a")),
            action("u1", Some(Mode::Individual), Some("a")),
            action("u1", Some(Mode::Individual), Some("b")),
        ];

        let grouped = count_per_unit(&actions, &[Factor::Mode, Factor::Model]);
        // u1 appears once under (individual, a) and once under (individual, b)
        let key_a = GroupKey::new(vec!["individual".into(), "a".into()]);
        let key_b = GroupKey::new(vec!["individual".into(), "b".into()]);
        assert_eq!(grouped.get(&key_a), &[2.0]);
        assert_eq!(grouped.get(&key_b), &[1.0]);
    }

    #[test]
    fn measure_per_record_applies_rule_and_counts_unmeasurable() {
        let actions = vec![
            action("u1", Some(Mode::Individual), Some("a")).with_reasoning("abcd"),
            action("u1", Some(Mode::Individual), Some("a")),
            action("u2", None, Some("a")).with_reasoning("xyz"),
        ];

        let grouped = measure_per_record(&actions, &[Factor::Mode], |a| {
            #[allow(clippy::cast_precision_loss)]
            let len = a.reasoning_len() as f64;
            (len > 0.0).then_some(len)
        });

        assert_eq!(grouped.get(&GroupKey::from("individual")), &[4.0]);
        // one record without reasoning, one without mode
        assert_eq!(grouped.excluded(), 2);
    }
}
