//! Plain-text report rendering

use super::{fmt_opt, fmt_rate, ALPHA};
use crate::describe::ConditionSummary;
use crate::hypothesis::{OneWayAnova, TwoWayAnova, WelchTest};
use crate::outcome::Analysis;
use crate::pipeline::AnalysisReport;
use std::collections::BTreeMap;
use std::fmt::Write;

const RULE: &str = "============================================================";

fn significance(p_value: f64) -> &'static str {
    if p_value < ALPHA {
        "SIGNIFICANT"
    } else {
        "NOT SIGNIFICANT"
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{RULE}\n{title}\n{RULE}");
}

fn summary_lines(out: &mut String, summaries: &BTreeMap<String, ConditionSummary>) {
    for (key, summary) in summaries {
        let _ = writeln!(
            out,
            "  {key}: n={}, mean={}, std={}, completion={}",
            summary.n,
            fmt_opt(summary.mean, 2),
            fmt_opt(summary.std_dev, 2),
            fmt_rate(summary.completion_rate),
        );
    }
}

fn welch_lines(out: &mut String, label: &str, outcome: &Analysis<WelchTest>) {
    match outcome {
        Analysis::Computed(test) => {
            let _ = writeln!(out, "  Welch's t = {:.3} (df = {:.1})", test.t, test.df);
            let _ = writeln!(out, "  p-value = {:.4}", test.p_value);
            match &test.effect {
                Analysis::Computed(effect) => {
                    let _ = writeln!(
                        out,
                        "  Cohen's d = {:.3} ({})",
                        effect.d,
                        effect.magnitude()
                    );
                }
                Analysis::Skipped(reason) => {
                    let _ = writeln!(out, "  Cohen's d unavailable ({reason})");
                }
            }
            let _ = writeln!(
                out,
                "  Result: {} at α={ALPHA}",
                significance(test.p_value)
            );
        }
        Analysis::Skipped(reason) => {
            let _ = writeln!(out, "  {label} skipped: {reason}");
        }
    }
}

fn oneway_lines(out: &mut String, outcome: &Analysis<OneWayAnova>) {
    match outcome {
        Analysis::Computed(anova) => {
            let _ = writeln!(
                out,
                "  F({:.0}, {:.0}) = {:.3}",
                anova.df_between, anova.df_within, anova.f
            );
            let _ = writeln!(out, "  p-value = {:.4}", anova.p_value);
            let _ = writeln!(
                out,
                "  Result: {} at α={ALPHA}",
                significance(anova.p_value)
            );
        }
        Analysis::Skipped(reason) => {
            let _ = writeln!(out, "  One-way ANOVA skipped: {reason}");
        }
    }
}

fn twoway_lines(out: &mut String, outcome: &Analysis<TwoWayAnova>) {
    match outcome {
        Analysis::Computed(anova) => {
            for effect in [&anova.factor_a, &anova.factor_b, &anova.interaction] {
                let _ = writeln!(
                    out,
                    "  {}: SS={:.2}, df={:.0}, F={:.3}, p={:.4} ({})",
                    effect.label,
                    effect.ss,
                    effect.df,
                    effect.f,
                    effect.p_value,
                    significance(effect.p_value),
                );
            }
            let _ = writeln!(
                out,
                "  error: SS={:.2}, df={:.0}",
                anova.ss_error, anova.df_error
            );
            if anova.unbalanced {
                let _ = writeln!(out, "  note: unbalanced cell sizes");
            }
        }
        Analysis::Skipped(reason) => {
            let _ = writeln!(out, "  Two-way ANOVA skipped: {reason}");
        }
    }
}

/// Render the full analysis report as a sectioned plain-text summary.
#[must_use]
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();

    section(&mut out, "DESCRIPTIVE STATISTICS");
    let headline = &report.headline;
    let _ = writeln!(
        out,
        "\nOverall: {} sessions, {} completed ({}), {} excluded; {} actions",
        headline.total_sessions,
        headline.completed_sessions,
        fmt_rate(headline.completion_rate),
        headline.excluded_sessions,
        headline.total_actions,
    );
    if report.input.session_rows_skipped + report.input.action_rows_skipped > 0 {
        let _ = writeln!(
            out,
            "Skipped at load: {} session rows, {} action rows",
            report.input.session_rows_skipped, report.input.action_rows_skipped,
        );
    }

    let _ = writeln!(out, "\n--- By Mode ---");
    summary_lines(&mut out, &report.by_mode);
    let _ = writeln!(out, "\n--- By Model ---");
    summary_lines(&mut out, &report.by_model);

    section(&mut out, "HYPOTHESIS TEST: Mode Effect on Action Count");
    welch_lines(&mut out, "Mode comparison", &report.mode_effect_actions);

    section(&mut out, "REASONING LENGTH ANALYSIS");
    summary_lines(&mut out, &report.reasoning_by_mode);
    welch_lines(&mut out, "Reasoning comparison", &report.mode_effect_reasoning);
    // Verbosity ratio between modes, when both means exist
    if let (Some(team), Some(individual)) = (
        report
            .reasoning_by_mode
            .get("team")
            .and_then(|s| s.mean),
        report
            .reasoning_by_mode
            .get("individual")
            .and_then(|s| s.mean),
    ) {
        if individual > 0.0 {
            let _ = writeln!(
                out,
                "  Ratio: team reasoning is {:.1}x individual length",
                team / individual
            );
        }
    }

    section(&mut out, "ANOVA: Model Effect on Action Count");
    oneway_lines(&mut out, &report.model_effect);

    section(&mut out, "TWO-WAY ANOVA: Mode × Model");
    twoway_lines(&mut out, &report.mode_model_anova);

    section(&mut out, "RESULTS SUMMARY");
    for row in &report.results_table {
        let _ = writeln!(
            out,
            "  {} / {}: n={}, actions={}±{}, completion={}",
            row.model,
            row.mode,
            row.n,
            fmt_opt(row.mean, 1),
            fmt_opt(row.std_dev, 1),
            fmt_rate(row.completion_rate),
        );
    }

    out
}
