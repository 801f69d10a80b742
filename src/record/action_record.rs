//! Action Record - one event logged during a session

use super::Mode;
use serde::{Deserialize, Serialize};

/// Action Record represents a single logged event during a session.
///
/// Factor fields are optional at the record level: an export row may lack a
/// mode, model, or template value. Such records are excluded from any
/// aggregation that groups by the missing factor, and the exclusion is
/// counted rather than failing the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRecord {
    unit_id: String,
    mode: Option<Mode>,
    model: Option<String>,
    template: Option<String>,
    reasoning: Option<String>,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(
        unit_id: impl Into<String>,
        mode: Option<Mode>,
        model: Option<impl Into<String>>,
        template: Option<impl Into<String>>,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            mode,
            model: model.map(Into::into),
            template: template.map(Into::into),
            reasoning: None,
        }
    }

    /// Attach the free-text reasoning content for this action.
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Get the unit (session/participant) identifier.
    #[must_use]
    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    /// Get the interaction mode, if present.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Get the model identifier, if present.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Get the story template identifier, if present.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Get the reasoning content, if present.
    #[must_use]
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// Length of the reasoning content in characters (0 when absent).
    #[must_use]
    pub fn reasoning_len(&self) -> usize {
        self.reasoning.as_ref().map_or(0, |text| text.chars().count())
    }
}
