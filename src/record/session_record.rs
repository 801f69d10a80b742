//! Session Record - one study session (unit) and its terminal state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction mode under study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Direct single-agent generation
    Individual,
    /// Orchestrated multi-agent (critic + revise) generation
    Team,
}

impl Mode {
    /// The lowercase wire value used in the export tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Team => "team",
        }
    }

    /// Parse the lowercase wire value. Unknown values are a data-quality
    /// condition for the caller to count, not a fatal failure.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "individual" => Some(Self::Individual),
            "team" => Some(Self::Team),
            _ => None,
        }
    }

    /// Both modes, in table order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Individual, Self::Team]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Session ran to completion
    Complete,
    /// Session excluded from analysis (protocol violation, timeout, ...)
    Excluded,
    /// Session still running at export time
    InProgress,
    /// Session abandoned before completion
    Abandoned,
}

impl SessionState {
    /// Parse the upper-case wire value used in the export tables.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "COMPLETE" => Some(Self::Complete),
            "EXCLUDED" => Some(Self::Excluded),
            "IN_PROGRESS" => Some(Self::InProgress),
            "ABANDONED" => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// True for sessions that count toward completion rates.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// True for sessions excluded from the study.
    #[must_use]
    pub const fn is_excluded(self) -> bool {
        matches!(self, Self::Excluded)
    }
}

/// Session Record represents one completed or incomplete run of the study.
///
/// One record per unit (session/participant). The session table is the source
/// of per-condition completion statistics; per-action metrics come from
/// [`super::ActionRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    unit_id: String,
    mode: Mode,
    model: String,
    template: String,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a new session record.
    #[must_use]
    pub fn new(
        unit_id: impl Into<String>,
        mode: Mode,
        model: impl Into<String>,
        template: impl Into<String>,
        state: SessionState,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            mode,
            model: model.into(),
            template: template.into(),
            state,
            started_at: None,
        }
    }

    /// Attach the session start timestamp (present in newer exports).
    #[must_use]
    pub const fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Get the unit (session/participant) identifier.
    #[must_use]
    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    /// Get the interaction mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the story template identifier.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Get the terminal state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Get the session start timestamp, if the export carried one.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}
