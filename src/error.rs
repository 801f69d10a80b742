//! Error types for ensayo
//!
//! Only fatal conditions live here: a study cannot be analyzed without its
//! input tables. Recoverable statistical conditions (insufficient data,
//! degenerate variances, inestimable cells) are values carried inside
//! [`crate::outcome::Analysis`], so a partial report can always be produced.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Ensayo error types
#[derive(Error, Debug)]
pub enum Error {
    /// A required input table is absent or cannot be opened
    #[error("missing input table '{table}' at {path}: {source}")]
    MissingInput {
        /// Logical table name (e.g. "sessions", "actions")
        table: &'static str,
        /// Path that was attempted
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// A required input table opened but could not be read as CSV
    #[error("failed to read table '{table}': {source}")]
    Table {
        /// Logical table name
        table: &'static str,
        /// Underlying CSV failure
        #[source]
        source: csv::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error("report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
