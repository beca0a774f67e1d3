//! Skill validation pipeline
//!
//! Stages: expand (when sections are missing) → validate → one auto-fix pass
//! → re-validate. The outcome always reflects the final validation state.

use serde::Serialize;
use skillforge_skills::{ExpansionEngine, SkillDocument};
use tracing::{debug, info};

use crate::autofix::{AutoFix, AutoFixer};
use crate::error::ValidationError;
use crate::structural::StructuralValidator;

/// Final state of a skill after the pipeline ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillValidation {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    /// Paths synthesized by the expansion stage, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_fields: Option<Vec<String>>,
    /// Fixes applied by the auto-fix stage, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_fixes: Option<Vec<AutoFix>>,
    /// Document the final validation ran against
    #[serde(skip)]
    pub skill: SkillDocument,
}

/// Stateless expand → validate → fix → re-validate sequence
pub struct SkillPipeline;

impl SkillPipeline {
    /// Run every stage against one document
    pub fn run(skill: &SkillDocument) -> SkillValidation {
        let (mut current, expanded_fields) = if ExpansionEngine::needs_expansion(skill) {
            let expansion = ExpansionEngine::expand(skill);
            debug!(
                skill = %skill.id,
                fields = expansion.expanded_fields.len(),
                "Pipeline expanded skill"
            );
            (expansion.skill, Some(expansion.expanded_fields))
        } else {
            (skill.clone(), None)
        };

        let mut report = StructuralValidator::validate(&current);
        let mut auto_fixes = None;

        if !report.valid {
            let (fixed, fixes) = AutoFixer::apply(&current, &report.errors);
            if !fixes.is_empty() {
                debug!(skill = %skill.id, fixes = fixes.len(), "Pipeline applied auto-fixes");
                current = fixed;
                report = StructuralValidator::validate(&current);
            }
            auto_fixes = Some(fixes);
        }

        info!(
            skill = %skill.id,
            valid = report.valid,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validated skill"
        );

        SkillValidation {
            valid: report.valid,
            errors: report.errors,
            warnings: report.warnings,
            expanded_fields,
            auto_fixes,
            skill: current,
        }
    }
}
