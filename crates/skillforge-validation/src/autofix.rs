//! Pattern-matched auto-fixes for structural errors
//!
//! Each rule matches an error by path (regex) and code, then mutates a copy of
//! the document. The fixer makes exactly one pass; errors that no rule matches,
//! or whose fix cannot be applied, are left for the caller.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use skillforge_skills::{
    Guardrails, Policy, Problem, ProblemSection, SkillDocument, ToolOutput, ToolSecurity,
};
use tracing::debug;

use crate::error::{ErrorCode, ValidationError};

/// Record of one applied fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFix {
    /// Message of the error that was fixed
    pub error: String,
    /// Path that was repaired
    pub path: String,
    /// What the fix did
    pub fix: String,
}

type ApplyFn = fn(&mut SkillDocument, &Captures<'_>) -> Option<String>;

struct FixRule {
    pattern: Regex,
    code: ErrorCode,
    apply: ApplyFn,
}

impl FixRule {
    fn new(pattern: &str, code: ErrorCode, apply: ApplyFn) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("auto-fix patterns are valid regexes"),
            code,
            apply,
        }
    }
}

static RULES: Lazy<Vec<FixRule>> = Lazy::new(|| {
    vec![
        FixRule::new(r"^problem$", ErrorCode::Required, fix_problem),
        FixRule::new(r"^tools\[(\d+)\]\.security$", ErrorCode::Required, fix_tool_security),
        FixRule::new(r"^policy\.guardrails$", ErrorCode::Required, fix_guardrails),
        FixRule::new(r"^tools\[(\d+)\]\.output$", ErrorCode::Required, fix_tool_output),
        FixRule::new(
            r"^tools\[(\d+)\]\.inputs\[(\d+)\]\.description$",
            ErrorCode::Required,
            fix_input_description,
        ),
    ]
});

fn index(caps: &Captures<'_>, group: usize) -> Option<usize> {
    caps.get(group)?.as_str().parse().ok()
}

fn fix_problem(skill: &mut SkillDocument, _: &Captures<'_>) -> Option<String> {
    let description = skill.description.clone().filter(|d| !d.trim().is_empty())?;
    skill.problem = Some(ProblemSection::Detailed(Problem {
        statement: description.clone(),
        context: Some(description),
        goals: Some(Vec::new()),
        extra: Map::new(),
    }));
    Some("Synthesized problem from skill description".to_string())
}

fn fix_tool_security(skill: &mut SkillDocument, caps: &Captures<'_>) -> Option<String> {
    let tool = skill.tools.get_mut(index(caps, 1)?)?;
    tool.security = Some(ToolSecurity {
        classification: Some("public".to_string()),
        extra: Map::new(),
    });
    Some(format!("Set security classification of {} to public", tool.name))
}

fn fix_guardrails(skill: &mut SkillDocument, _: &Captures<'_>) -> Option<String> {
    skill.policy.get_or_insert_with(Policy::default).guardrails = Some(Guardrails::default());
    Some("Added empty guardrails".to_string())
}

fn fix_tool_output(skill: &mut SkillDocument, caps: &Captures<'_>) -> Option<String> {
    let tool = skill.tools.get_mut(index(caps, 1)?)?;
    tool.output = Some(ToolOutput {
        output_type: Some("object".to_string()),
        description: Some("Result".to_string()),
        extra: Map::new(),
    });
    Some(format!("Added generic object output to {}", tool.name))
}

fn fix_input_description(skill: &mut SkillDocument, caps: &Captures<'_>) -> Option<String> {
    let tool = skill.tools.get_mut(index(caps, 1)?)?;
    let input = tool.inputs.get_mut(index(caps, 2)?)?;
    if input.name.trim().is_empty() {
        return None;
    }
    let description = describe_input(&input.name);
    input.description = Some(description.clone());
    Some(format!("Described input {} as \"{}\"", input.name, description))
}

/// `patient_name` → `Patient name`
fn describe_input(name: &str) -> String {
    let words = name.replace(['_', '-'], " ");
    let mut chars = words.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Applies the fixed rule table once
pub struct AutoFixer;

impl AutoFixer {
    /// Try to repair each error; returns the fixed copy and the fixes applied
    pub fn apply(skill: &SkillDocument, errors: &[ValidationError]) -> (SkillDocument, Vec<AutoFix>) {
        let mut fixed = skill.clone();
        let mut fixes = Vec::new();

        for error in errors {
            let Some((rule, caps)) = RULES.iter().find_map(|rule| {
                if rule.code != error.code {
                    return None;
                }
                rule.pattern.captures(&error.path).map(|caps| (rule, caps))
            }) else {
                continue;
            };

            match (rule.apply)(&mut fixed, &caps) {
                Some(fix) => {
                    debug!(path = %error.path, fix = %fix, "Applied auto-fix");
                    fixes.push(AutoFix {
                        error: error.message.clone(),
                        path: error.path.clone(),
                        fix,
                    });
                }
                None => debug!(path = %error.path, "Auto-fix rule matched but could not apply"),
            }
        }

        (fixed, fixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skill() -> SkillDocument {
        serde_json::from_value(json!({
            "id": "clinic",
            "name": "Clinic",
            "description": "Helps patients book visits",
            "tools": [{
                "name": "clinic.appointments.create",
                "description": "Create",
                "inputs": [{"name": "patient_name", "type": "string", "required": true}]
            }]
        }))
        .unwrap()
    }

    fn required(path: &str) -> ValidationError {
        ValidationError::error(path, ErrorCode::Required, format!("{} missing", path))
    }

    #[test]
    fn test_problem_synthesized_from_description() {
        let (fixed, fixes) = AutoFixer::apply(&skill(), &[required("problem")]);

        assert_eq!(fixes.len(), 1);
        assert_eq!(fixed.problem_statement(), Some("Helps patients book visits"));
    }

    #[test]
    fn test_problem_without_description_is_left_alone() {
        let mut original = skill();
        original.description = None;

        let (fixed, fixes) = AutoFixer::apply(&original, &[required("problem")]);
        assert!(fixes.is_empty());
        assert!(fixed.problem.is_none());
    }

    #[test]
    fn test_tool_fixes() {
        let errors = vec![
            required("tools[0].security"),
            required("tools[0].output"),
            required("tools[0].inputs[0].description"),
            required("policy.guardrails"),
        ];
        let (fixed, fixes) = AutoFixer::apply(&skill(), &errors);

        assert_eq!(fixes.len(), 4);
        let tool = &fixed.tools[0];
        assert_eq!(
            tool.security.as_ref().unwrap().classification.as_deref(),
            Some("public")
        );
        assert_eq!(
            tool.output.as_ref().unwrap().output_type.as_deref(),
            Some("object")
        );
        assert_eq!(tool.inputs[0].description.as_deref(), Some("Patient name"));
        assert!(fixed.guardrails().is_some());
    }

    #[test]
    fn test_unmatched_errors_are_skipped() {
        let errors = vec![
            required("name"),
            ValidationError::error("policy.guardrails", ErrorCode::Duplicate, "odd"),
            required("tools[7].security"),
        ];
        let (fixed, fixes) = AutoFixer::apply(&skill(), &errors);

        assert!(fixes.is_empty());
        assert_eq!(fixed, skill());
    }
}
