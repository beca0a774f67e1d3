//! Cascading validation for SkillForge
//!
//! Watches successive revisions of a skill document, raises typed issues when
//! tools, intents, scenarios or the policy change, and prunes issues once the
//! document no longer exhibits the condition that raised them.

pub mod changes;
pub mod engine;
pub mod error;
pub mod ids;
pub mod models;
pub mod persistence;
pub mod relevance;
pub mod rules;

pub use changes::{Change, ChangeDetector};
pub use engine::{CascadeConfig, CascadeEngine, RevisionOutcome};
pub use error::CascadeError;
pub use ids::{Clock, IdGenerator, ManualClock, SequentialIdGenerator, SystemClock, UuidIdGenerator};
pub use models::{Issue, IssueCategory, IssueSeverity, IssueStatus, RelevanceCheck, TriggeredBy};
pub use persistence::{CallbackSink, DebouncedPersister, IssueSink, DEFAULT_DEBOUNCE};
