//! LaTeX results-table rendering

use crate::pipeline::AnalysisReport;
use crate::record::Mode;
use std::fmt::Write;

fn model_label(model: &str) -> String {
    // "llama3.2:3b" -> "llama32 3b": colon separates, dots confuse LaTeX-side
    // column tooling downstream
    model.replace(':', " ").replace('.', "")
}

const fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Individual => "Ind.",
        Mode::Team => "Team",
    }
}

/// Render the results summary as a booktabs LaTeX table.
#[must_use]
pub fn render_latex_table(report: &AnalysisReport) -> String {
    let mut out = String::from(
        "\\begin{table}[h]\n\
         \\centering\n\
         \\caption{Pilot Study Results by Model and Mode}\n\
         \\label{tab:pilot-results}\n\
         \\begin{tabular}{llccc}\n\
         \\toprule\n\
         Model & Mode & N & Actions (M$\\pm$SD) & Completion \\\\\n\
         \\midrule\n",
    );

    for row in &report.results_table {
        let mean = row.mean.map_or_else(|| "--".to_string(), |m| format!("{m:.1}"));
        let std_dev = row
            .std_dev
            .map_or_else(|| "--".to_string(), |s| format!("{s:.1}"));
        let completion = row
            .completion_rate
            .map_or_else(|| "--".to_string(), |r| format!("{:.0}\\%", r * 100.0));
        let _ = writeln!(
            out,
            "{} & {} & {} & {}$\\pm${} & {} \\\\",
            model_label(&row.model),
            mode_label(row.mode),
            row.n,
            mean,
            std_dev,
            completion,
        );
    }

    out.push_str("\\bottomrule\n\\end{tabular}\n\\end{table}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline;
    use crate::record::{ActionRecord, SessionRecord, SessionState};

    #[test]
    fn renders_rows_for_each_cell() {
        let sessions = vec![
            SessionRecord::new("u1", Mode::Individual, "llama3.2:3b", "t", SessionState::Complete),
            SessionRecord::new("u2", Mode::Team, "llama3.2:3b", "t", SessionState::Excluded),
        ];
        let actions = vec![
            ActionRecord::new("u1", Some(Mode::Individual), Some("llama3.2:3b"), Some("t")),
            ActionRecord::new("u2", Some(Mode::Team), Some("llama3.2:3b"), Some("t")),
        ];
        let report = pipeline::run(&sessions, &actions);
        let latex = render_latex_table(&report);

        assert!(latex.contains("\\toprule"));
        assert!(latex.contains("llama32 3b & Ind."));
        assert!(latex.contains("llama32 3b & Team"));
        assert!(latex.contains("0\\%"));
        assert!(latex.ends_with("\\end{table}\n"));
    }

    #[test]
    fn missing_statistics_render_as_dashes() {
        let sessions = vec![SessionRecord::new(
            "u1",
            Mode::Individual,
            "m",
            "t",
            SessionState::Complete,
        )];
        let report = pipeline::run(&sessions, &[]);
        let latex = render_latex_table(&report);
        // the team row for model m has no measurements
        assert!(latex.contains("m & Team & 0 & --$\\pm$-- & --"));
    }
}
