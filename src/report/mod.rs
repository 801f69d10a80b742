//! Report Sink
//!
//! Turns an [`crate::pipeline::AnalysisReport`] into human-facing artifacts:
//! a sectioned plain-text summary and a LaTeX results table. Formatting only —
//! every number here was computed by the core, and significance labeling
//! against α = 0.05 is a presentation choice made in this layer.

mod latex;
mod text;

pub use latex::render_latex_table;
pub use text::render_text;

/// Presentation significance threshold. The core never consumes this; it only
/// exposes p-values.
pub const ALPHA: f64 = 0.05;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.precision$}"))
}

fn fmt_rate(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{:.1}%", v * 100.0))
}
