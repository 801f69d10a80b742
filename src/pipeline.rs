//! Analysis pipeline
//!
//! One synchronous pass over the in-memory tables: aggregation → descriptive
//! statistics → hypothesis tests, collected into an [`AnalysisReport`]. The
//! statistical content of the report is a pure function of the input records;
//! running the pipeline twice on identical input yields identical statistics.
//!
//! The run always completes: analyses that cannot be computed are carried in
//! the report as skipped, with their reasons.

use crate::aggregate::{count_per_unit, measure_per_record, Factor, GroupKey};
use crate::describe::{completion_by, summarize_groups, ConditionSummary};
use crate::hypothesis::{
    one_way_anova, two_way_anova, welch_t_test, Observation, OneWayAnova, TwoWayAnova, WelchTest,
};
use crate::outcome::Analysis;
use crate::record::{ActionRecord, Mode, SessionRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Headline counts for the whole study.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    /// Number of sessions in the export
    pub total_sessions: usize,
    /// Sessions with a complete terminal state
    pub completed_sessions: usize,
    /// Sessions excluded from the study
    pub excluded_sessions: usize,
    /// Overall completion rate, absent when there are no sessions
    pub completion_rate: Option<f64>,
    /// Number of action records in the export
    pub total_actions: usize,
}

/// Records excluded per aggregation (missing factor values, unmeasurable
/// attributes). These are data-quality counts, not errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExclusionCounts {
    /// Action-count aggregation grouped by mode
    pub action_counts_by_mode: usize,
    /// Action-count aggregation grouped by model
    pub action_counts_by_model: usize,
    /// Action-count aggregation grouped by mode × model
    pub action_counts_by_mode_model: usize,
    /// Action-count aggregation grouped by mode × model × template
    pub action_counts_by_condition: usize,
    /// Reasoning-length aggregation (zero-length and missing reasoning
    /// contribute no measurement)
    pub reasoning_lengths_by_mode: usize,
}

/// Rows skipped while loading the input tables (unknown mode/state values).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InputQuality {
    /// Session rows skipped by the loader
    pub session_rows_skipped: usize,
    /// Action rows skipped by the loader
    pub action_rows_skipped: usize,
}

/// One row of the results summary table (model × mode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsRow {
    /// Model identifier
    pub model: String,
    /// Interaction mode
    pub mode: Mode,
    /// Units with measured action counts in this cell
    pub n: usize,
    /// Mean actions per session, absent when no data
    pub mean: Option<f64>,
    /// Sample standard deviation, absent for n < 2
    pub std_dev: Option<f64>,
    /// Session completion rate for this cell, absent when no sessions
    pub completion_rate: Option<f64>,
}

/// Full output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// When this report was generated
    pub generated_at: DateTime<Utc>,
    /// Headline counts
    pub headline: Headline,
    /// Rows skipped at load time (set by the caller that loaded the tables)
    pub input: InputQuality,
    /// Per-aggregation exclusion counts
    pub exclusions: ExclusionCounts,
    /// Action-count summaries by mode, with per-mode completion rates
    pub by_mode: BTreeMap<String, ConditionSummary>,
    /// Action-count summaries by model, with per-model completion rates
    pub by_model: BTreeMap<String, ConditionSummary>,
    /// Action-count summaries by mode × model × template
    pub by_condition: BTreeMap<String, ConditionSummary>,
    /// Reasoning-length summaries by mode
    pub reasoning_by_mode: BTreeMap<String, ConditionSummary>,
    /// Mode effect on per-unit action counts (Welch)
    pub mode_effect_actions: Analysis<WelchTest>,
    /// Mode effect on reasoning length (Welch)
    pub mode_effect_reasoning: Analysis<WelchTest>,
    /// Model effect on per-unit action counts (one-way ANOVA)
    pub model_effect: Analysis<OneWayAnova>,
    /// Mode × model factorial ANOVA on per-unit action counts
    pub mode_model_anova: Analysis<TwoWayAnova>,
    /// Results summary rows (model × mode)
    pub results_table: Vec<ResultsRow>,
}

impl AnalysisReport {
    /// Attach loader row-skip counts to the report.
    #[must_use]
    pub fn with_input_quality(mut self, input: InputQuality) -> Self {
        self.input = input;
        self
    }
}

fn merge_completion(
    summaries: &mut BTreeMap<String, ConditionSummary>,
    completion: &BTreeMap<GroupKey, f64>,
) {
    for (key, rate) in completion {
        summaries
            .entry(key.to_string())
            .and_modify(|summary| summary.completion_rate = Some(*rate))
            .or_insert_with(|| ConditionSummary::of(&[]).with_completion_rate(Some(*rate)));
    }
}

fn stringify_keys(
    summaries: BTreeMap<GroupKey, ConditionSummary>,
) -> BTreeMap<String, ConditionSummary> {
    summaries
        .into_iter()
        .map(|(key, summary)| (key.to_string(), summary))
        .collect()
}

fn log_outcome<T>(name: &str, outcome: &Analysis<T>) {
    match outcome.skip_reason() {
        None => info!(analysis = name, "computed"),
        Some(reason) => warn!(analysis = name, %reason, "skipped"),
    }
}

/// Run the full analysis over loaded tables.
///
/// Pure with respect to its inputs (the `generated_at` timestamp aside):
/// aggregation, descriptive statistics, and hypothesis tests, in one pass.
#[must_use]
pub fn run(sessions: &[SessionRecord], actions: &[ActionRecord]) -> AnalysisReport {
    info!(
        sessions = sessions.len(),
        actions = actions.len(),
        "starting analysis"
    );

    let headline = headline(sessions, actions);

    // Per-unit action counts under the groupings the report needs
    let counts_by_mode = count_per_unit(actions, &[Factor::Mode]);
    let counts_by_model = count_per_unit(actions, &[Factor::Model]);
    let counts_by_mode_model = count_per_unit(actions, &[Factor::Mode, Factor::Model]);
    let counts_by_condition =
        count_per_unit(actions, &[Factor::Mode, Factor::Model, Factor::Template]);

    // Reasoning length per action, zero-length and missing dropped
    let reasoning_by_mode_grouped = measure_per_record(actions, &[Factor::Mode], |action| {
        #[allow(clippy::cast_precision_loss)]
        let len = action.reasoning_len() as f64;
        (len > 0.0).then_some(len)
    });

    let exclusions = ExclusionCounts {
        action_counts_by_mode: counts_by_mode.excluded(),
        action_counts_by_model: counts_by_model.excluded(),
        action_counts_by_mode_model: counts_by_mode_model.excluded(),
        action_counts_by_condition: counts_by_condition.excluded(),
        reasoning_lengths_by_mode: reasoning_by_mode_grouped.excluded(),
    };

    // Condition summaries, with completion rates merged in from the sessions
    let mut by_mode = stringify_keys(summarize_groups(&counts_by_mode));
    merge_completion(&mut by_mode, &completion_by(sessions, &[Factor::Mode]));

    let mut by_model = stringify_keys(summarize_groups(&counts_by_model));
    merge_completion(&mut by_model, &completion_by(sessions, &[Factor::Model]));

    let mut by_condition = stringify_keys(summarize_groups(&counts_by_condition));
    merge_completion(
        &mut by_condition,
        &completion_by(sessions, &[Factor::Mode, Factor::Model, Factor::Template]),
    );

    let reasoning_by_mode = stringify_keys(summarize_groups(&reasoning_by_mode_grouped));

    // Hypothesis tests
    let individual = counts_by_mode.get(&GroupKey::from(Mode::Individual.as_str()));
    let team = counts_by_mode.get(&GroupKey::from(Mode::Team.as_str()));
    let mode_effect_actions = welch_t_test(individual, team);
    log_outcome("mode effect on action count", &mode_effect_actions);

    let reasoning_individual =
        reasoning_by_mode_grouped.get(&GroupKey::from(Mode::Individual.as_str()));
    let reasoning_team = reasoning_by_mode_grouped.get(&GroupKey::from(Mode::Team.as_str()));
    let mode_effect_reasoning = welch_t_test(reasoning_individual, reasoning_team);
    log_outcome("mode effect on reasoning length", &mode_effect_reasoning);

    let model_groups: Vec<&[f64]> = counts_by_model
        .groups()
        .values()
        .map(Vec::as_slice)
        .collect();
    let model_effect = one_way_anova(&model_groups);
    log_outcome("model effect on action count", &model_effect);

    let crossed: Vec<Observation> = counts_by_mode_model
        .groups()
        .iter()
        .flat_map(|(key, values)| {
            let (mode, model) = (key.values()[0].clone(), key.values()[1].clone());
            values
                .iter()
                .map(move |&value| Observation::new(mode.clone(), model.clone(), value))
        })
        .collect();
    let mode_model_anova = two_way_anova("mode", "model", &crossed);
    log_outcome("mode × model interaction", &mode_model_anova);

    let results_table = results_table(sessions, &counts_by_mode_model);

    AnalysisReport {
        generated_at: Utc::now(),
        headline,
        input: InputQuality::default(),
        exclusions,
        by_mode,
        by_model,
        by_condition,
        reasoning_by_mode,
        mode_effect_actions,
        mode_effect_reasoning,
        model_effect,
        mode_model_anova,
        results_table,
    }
}

fn headline(sessions: &[SessionRecord], actions: &[ActionRecord]) -> Headline {
    let completed_sessions = sessions
        .iter()
        .filter(|s| s.state().is_complete())
        .count();
    let excluded_sessions = sessions
        .iter()
        .filter(|s| s.state().is_excluded())
        .count();
    #[allow(clippy::cast_precision_loss)]
    let completion_rate = (!sessions.is_empty())
        .then(|| completed_sessions as f64 / sessions.len() as f64);

    Headline {
        total_sessions: sessions.len(),
        completed_sessions,
        excluded_sessions,
        completion_rate,
        total_actions: actions.len(),
    }
}

fn results_table(
    sessions: &[SessionRecord],
    counts_by_mode_model: &crate::aggregate::GroupedMeasurements,
) -> Vec<ResultsRow> {
    let models: BTreeSet<String> = sessions
        .iter()
        .map(|s| s.model().to_string())
        .chain(
            counts_by_mode_model
                .groups()
                .keys()
                .map(|key| key.values()[1].clone()),
        )
        .collect();

    let mut rows = Vec::new();
    for model in &models {
        for mode in Mode::all() {
            let key = GroupKey::new(vec![mode.as_str().to_string(), model.clone()]);
            let summary = ConditionSummary::of(counts_by_mode_model.get(&key));

            let cell_sessions: Vec<&SessionRecord> = sessions
                .iter()
                .filter(|s| s.mode() == mode && s.model() == model)
                .collect();
            let completion_rate = crate::describe::completion_rate(&cell_sessions);

            rows.push(ResultsRow {
                model: model.clone(),
                mode,
                n: summary.n,
                mean: summary.mean,
                std_dev: summary.std_dev,
                completion_rate,
            });
        }
    }
    rows
}
