//! Skill validation for SkillForge
//!
//! Structural rules over skill documents, a narrow auto-fix table applied in a
//! single pass, section-scoped checks for editors, and cross-skill solution
//! validation with best-effort LLM quality scoring.

pub mod autofix;
pub mod error;
pub mod pipeline;
pub mod quality;
pub mod section;
pub mod solution;
pub mod structural;

pub use autofix::{AutoFix, AutoFixer};
pub use error::{ErrorCode, QualityError, Severity, UnknownSection, ValidationError};
pub use pipeline::{SkillPipeline, SkillValidation};
pub use quality::{
    assess, DisabledQualityScorer, LlmQualityScorer, QualityConfig, QualityOutcome,
    QualityReport, QualityScorer,
};
pub use section::{Section, SectionReport, SectionValidator};
pub use solution::{
    ChannelRoute, ConnectorBindings, Grant, Handoff, SecurityContract, Solution,
    SolutionReport, SolutionSkill, SolutionSummary, SolutionValidator,
};
pub use structural::{StructuralValidator, ValidationReport};
