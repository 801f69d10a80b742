//! Study Records
//!
//! This module provides the data structures for a factorial study export.
//!
//! ## Schema Overview
//!
//! ```text
//! SessionRecord (1 per unit)  — mode, model, template, terminal state
//! ActionRecord  (N per unit)  — mode, model, template, reasoning text
//! ```
//!
//! Records are immutable once ingested: the aggregation and statistics layers
//! only ever read them.
//!
//! ## Usage
//!
//! ```rust
//! use ensayo::record::{ActionRecord, Mode, SessionRecord, SessionState};
//!
//! let session = SessionRecord::new(
//!     "p-014",
//!     Mode::Team,
//!     "qwen2.5vl:7b",
//!     "jade_dragon_mystery",
//!     SessionState::Complete,
//! );
//! assert!(session.state().is_complete());
//!
//! let action = ActionRecord::new(
//!     "p-014",
//!     Some(Mode::Team),
//!     Some("qwen2.5vl:7b"),
//!     Some("jade_dragon_mystery"),
//! )
//! .with_reasoning("the butler had no motive");
//! assert_eq!(action.reasoning_len(), 24);
//! ```

mod action_record;
mod session_record;

pub use action_record::ActionRecord;
pub use session_record::{Mode, SessionRecord, SessionState};
