//! # Ensayo: Factorial Experiment Analysis Engine
//!
//! Ensayo analyzes results from factorial human/agent studies: it aggregates
//! per-action records into per-unit metrics, computes descriptive statistics
//! per experimental condition, and runs the frequentist hypothesis tests a
//! pilot-study report needs (Welch two-sample comparison, one-way ANOVA,
//! two-way factorial ANOVA with interaction, Cohen's d).
//!
//! ## Design Principles
//!
//! - **Pure core**: every statistical operation is a side-effect-free function
//!   of already-aggregated numeric groups.
//! - **Degeneracy is data**: insufficient observations, zero pooled variance,
//!   and inestimable interaction cells are reported as [`outcome::SkipReason`]
//!   values inside the result, never thrown. A run always completes and says
//!   which analyses were skipped and why.
//! - **Computation/presentation split**: the core returns structured records;
//!   [`report`] turns them into human-facing artifacts.
//!
//! ## Example Usage
//!
//! ```rust
//! use ensayo::pipeline;
//! use ensayo::record::{ActionRecord, Mode, SessionRecord, SessionState};
//!
//! let sessions = vec![
//!     SessionRecord::new("s1", Mode::Individual, "llama3.2:3b", "mystery", SessionState::Complete),
//!     SessionRecord::new("s2", Mode::Team, "llama3.2:3b", "mystery", SessionState::Complete),
//! ];
//! let actions = vec![
//!     ActionRecord::new("s1", Some(Mode::Individual), Some("llama3.2:3b"), Some("mystery"))
//!         .with_reasoning("short"),
//!     ActionRecord::new("s2", Some(Mode::Team), Some("llama3.2:3b"), Some("mystery"))
//!         .with_reasoning("much longer deliberation"),
//! ];
//!
//! let report = pipeline::run(&sessions, &actions);
//! assert_eq!(report.headline.total_sessions, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod describe;
pub mod effect;
pub mod error;
pub mod hypothesis;
pub mod outcome;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod table;

pub use error::{Error, Result};
