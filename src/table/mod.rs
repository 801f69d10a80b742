//! Table ingestion (CSV)
//!
//! Loads the session and action export tables. This layer is an external
//! collaborator of the statistics core: it produces immutable record vectors
//! and has no decision logic of its own.
//!
//! An absent or unreadable table is fatal and names the table. A row that
//! parses as CSV but carries an unknown mode/state value is a data-quality
//! condition: the row is skipped, counted, and reported.

use crate::error::{Error, Result};
use crate::record::{ActionRecord, Mode, SessionRecord, SessionState};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::warn;

/// A loaded table: parsed records plus the count of skipped rows.
#[derive(Debug, Clone)]
pub struct TableLoad<T> {
    /// Successfully parsed records
    pub records: Vec<T>,
    /// Rows skipped for data-quality reasons (unknown mode/state values)
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct RawSessionRow {
    unit_id: String,
    mode: String,
    model: String,
    template: String,
    state: String,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawActionRow {
    unit_id: String,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

fn open_table(table: &'static str, path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| Error::MissingInput {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

/// Load the session table.
///
/// # Errors
///
/// Returns [`Error::MissingInput`] if the file cannot be opened and
/// [`Error::Table`] if it cannot be read as CSV.
pub fn load_sessions<P: AsRef<Path>>(path: P) -> Result<TableLoad<SessionRecord>> {
    const TABLE: &str = "sessions";
    let mut reader = open_table(TABLE, path.as_ref())?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<RawSessionRow>() {
        let row = row.map_err(|source| Error::Table {
            table: TABLE,
            source,
        })?;
        match (Mode::parse(&row.mode), SessionState::parse(&row.state)) {
            (Some(mode), Some(state)) => {
                let mut record =
                    SessionRecord::new(row.unit_id, mode, row.model, row.template, state);
                if let Some(started_at) = row.started_at {
                    record = record.with_started_at(started_at);
                }
                records.push(record);
            }
            _ => {
                warn!(
                    unit_id = %row.unit_id,
                    mode = %row.mode,
                    state = %row.state,
                    "skipping session row with unknown mode or state"
                );
                skipped += 1;
            }
        }
    }

    Ok(TableLoad { records, skipped })
}

/// Load the action table.
///
/// Factor columns may be empty per row; empty values become `None` and the
/// aggregator excludes such records per grouping. An unknown (non-empty,
/// unparseable) mode value skips the row.
///
/// # Errors
///
/// Returns [`Error::MissingInput`] if the file cannot be opened and
/// [`Error::Table`] if it cannot be read as CSV.
pub fn load_actions<P: AsRef<Path>>(path: P) -> Result<TableLoad<ActionRecord>> {
    const TABLE: &str = "actions";
    let mut reader = open_table(TABLE, path.as_ref())?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<RawActionRow>() {
        let row = row.map_err(|source| Error::Table {
            table: TABLE,
            source,
        })?;

        let mode = match row.mode.as_deref().filter(|m| !m.is_empty()) {
            Some(raw) => match Mode::parse(raw) {
                Some(mode) => Some(mode),
                None => {
                    warn!(unit_id = %row.unit_id, mode = raw, "skipping action row with unknown mode");
                    skipped += 1;
                    continue;
                }
            },
            None => None,
        };

        let mut record = ActionRecord::new(
            row.unit_id,
            mode,
            row.model.filter(|m| !m.is_empty()),
            row.template.filter(|t| !t.is_empty()),
        );
        if let Some(reasoning) = row.reasoning.filter(|r| !r.is_empty()) {
            record = record.with_reasoning(reasoning);
        }
        records.push(record);
    }

    Ok(TableLoad { records, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_session_rows() {
        let path = write_temp(
            "ensayo_sessions_ok.csv",
            "unit_id,mode,model,template,state\n\
             u1,individual,llama3.2:3b,mystery,COMPLETE\n\
             u2,team,llama3.2:3b,mystery,EXCLUDED\n",
        );
        let load = load_sessions(&path).unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped, 0);
        assert_eq!(load.records[0].unit_id(), "u1");
        assert!(load.records[1].state().is_excluded());
    }

    #[test]
    fn unknown_state_is_skipped_and_counted() {
        let path = write_temp(
            "ensayo_sessions_bad_state.csv",
            "unit_id,mode,model,template,state\n\
             u1,individual,m,t,COMPLETE\n\
             u2,individual,m,t,EXPLODED\n",
        );
        let load = load_sessions(&path).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.skipped, 1);
    }

    #[test]
    fn missing_table_is_fatal_and_named() {
        let err = load_sessions("/nonexistent/ensayo-sessions.csv").unwrap_err();
        match err {
            Error::MissingInput { table, .. } => assert_eq!(table, "sessions"),
            other => panic!("expected MissingInput, got {other}"),
        }
    }

    #[test]
    fn empty_action_factors_become_none() {
        let path = write_temp(
            "ensayo_actions_empty.csv",
            "unit_id,mode,model,template,reasoning\n\
             u1,individual,m,t,because\n\
             u2,,m,t,\n",
        );
        let load = load_actions(&path).unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped, 0);
        assert_eq!(load.records[1].mode(), None);
        assert_eq!(load.records[1].reasoning(), None);
        assert_eq!(load.records[0].reasoning(), Some("because"));
    }
}
