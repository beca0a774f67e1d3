//! Section-scoped checks for incremental editor feedback
//!
//! Lightweight and independent from the full pipeline: no expansion, no
//! auto-fix, plain-text errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skillforge_skills::SkillDocument;

use crate::error::UnknownSection;

/// Minimum length of a meaningful problem statement
pub const MIN_PROBLEM_STATEMENT_CHARS: usize = 10;

/// Sections that can be checked on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Problem,
    Tools,
    Guardrails,
    Intents,
    Role,
}

impl Section {
    /// Every checkable section, in display order
    pub const ALL: [Section; 5] = [
        Section::Problem,
        Section::Tools,
        Section::Guardrails,
        Section::Intents,
        Section::Role,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Problem => "problem",
            Section::Tools => "tools",
            Section::Guardrails => "guardrails",
            Section::Intents => "intents",
            Section::Role => "role",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Result of a section check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section: Section,
    pub valid: bool,
    pub errors: Vec<String>,
    pub message: String,
}

/// Runs one section's checks against a (possibly partial) document
pub struct SectionValidator;

impl SectionValidator {
    pub fn validate(skill: &SkillDocument, section: Section) -> SectionReport {
        let errors = match section {
            Section::Problem => Self::check_problem(skill),
            Section::Tools => Self::check_tools(skill),
            Section::Guardrails => Self::check_guardrails(skill),
            Section::Intents => Self::check_intents(skill),
            Section::Role => Self::check_role(skill),
        };

        let message = match errors.len() {
            0 => format!("Section {} looks good", section),
            1 => format!("Section {} has 1 issue", section),
            n => format!("Section {} has {} issues", section, n),
        };

        SectionReport {
            section,
            valid: errors.is_empty(),
            errors,
            message,
        }
    }

    fn check_problem(skill: &SkillDocument) -> Vec<String> {
        match skill.problem_statement().map(str::trim) {
            None | Some("") => vec!["Problem statement is required".to_string()],
            Some(statement) if statement.chars().count() < MIN_PROBLEM_STATEMENT_CHARS => vec![format!(
                "Problem statement must be at least {} characters",
                MIN_PROBLEM_STATEMENT_CHARS
            )],
            Some(_) => Vec::new(),
        }
    }

    fn check_tools(skill: &SkillDocument) -> Vec<String> {
        if skill.tools.is_empty() {
            return vec!["At least one tool is required".to_string()];
        }

        let mut errors = Vec::new();
        for (idx, tool) in skill.tools.iter().enumerate() {
            if tool.name.trim().is_empty() {
                errors.push(format!("Tool {} needs a name", idx + 1));
            }
            if tool.description_or_empty().trim().is_empty() {
                errors.push(format!("Tool {} needs a description", idx + 1));
            }
        }
        errors
    }

    fn check_guardrails(skill: &SkillDocument) -> Vec<String> {
        let Some(guardrails) = skill.guardrails() else {
            return vec!["Guardrails are required".to_string()];
        };

        let mut errors = Vec::new();
        if guardrails
            .never
            .iter()
            .chain(&guardrails.always)
            .any(|rule| rule.trim().is_empty())
        {
            errors.push("Guardrail rules cannot be empty".to_string());
        }
        errors
    }

    fn check_intents(skill: &SkillDocument) -> Vec<String> {
        let supported = skill.supported_intents();
        if supported.is_empty() {
            return vec!["At least one supported intent is required".to_string()];
        }

        let mut errors = Vec::new();
        for (idx, intent) in supported.iter().enumerate() {
            if intent.id.trim().is_empty() {
                errors.push(format!("Intent {} needs an id", idx + 1));
            } else if intent.examples.is_empty() {
                errors.push(format!("Intent {} needs at least one example", intent.id));
            }
        }
        errors
    }

    fn check_role(skill: &SkillDocument) -> Vec<String> {
        let Some(role) = &skill.role else {
            return vec!["Role is required".to_string()];
        };

        let mut errors = Vec::new();
        if role.name.trim().is_empty() {
            errors.push("Role needs a name".to_string());
        }
        if role.persona.as_deref().map_or(true, |p| p.trim().is_empty()) {
            errors.push("Role needs a persona".to_string());
        }
        errors
    }
}
