//! Command-line entry point: load the export tables, run the analysis, and
//! emit the report artifacts.

use anyhow::{Context, Result};
use clap::Parser;
use ensayo::pipeline::{self, InputQuality};
use ensayo::report::{render_latex_table, render_text};
use ensayo::table::{load_actions, load_sessions};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ensayo", version, about = "Factorial pilot-study analysis")]
struct Args {
    /// Path to the session table (CSV)
    #[arg(long, default_value = "data/sessions.csv")]
    sessions: PathBuf,

    /// Path to the action table (CSV)
    #[arg(long, default_value = "data/actions.csv")]
    actions: PathBuf,

    /// Where to write the JSON report
    #[arg(long, default_value = "out/report.json")]
    output: PathBuf,

    /// Also write a LaTeX results table here
    #[arg(long)]
    latex: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let sessions = load_sessions(&args.sessions)?;
    let actions = load_actions(&args.actions)?;
    info!(
        sessions = sessions.records.len(),
        actions = actions.records.len(),
        "tables loaded"
    );

    let report = pipeline::run(&sessions.records, &actions.records).with_input_quality(
        InputQuality {
            session_rows_skipped: sessions.skipped,
            action_rows_skipped: actions.skipped,
        },
    );

    print!("{}", render_text(&report));

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {parent:?}"))?;
    }
    fs::write(&args.output, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("failed to write report to {:?}", args.output))?;
    info!(path = %args.output.display(), "report written");

    if let Some(latex_path) = &args.latex {
        if let Some(parent) = latex_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {parent:?}"))?;
        }
        fs::write(latex_path, render_latex_table(&report))
            .with_context(|| format!("failed to write LaTeX table to {latex_path:?}"))?;
        info!(path = %latex_path.display(), "LaTeX table written");
    }

    Ok(())
}
