//! Structural validation for skill documents
//!
//! Rule-based checks of required fields and internal references. No LLM
//! judgement is involved; the same document always yields the same findings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use skillforge_skills::{ScenarioStep, SkillDocument, StepKind};

use crate::error::{ErrorCode, Severity, ValidationError};

/// Outcome of validating one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when there are no errors (warnings do not count)
    pub valid: bool,
    /// Blocking findings
    pub errors: Vec<ValidationError>,
    /// Advisory findings
    pub warnings: Vec<ValidationError>,
}

impl ValidationReport {
    /// Build a report from mixed findings
    pub fn from_findings(findings: Vec<ValidationError>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) = findings
            .into_iter()
            .partition(|finding| finding.severity == Severity::Error);
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validates skill structure and internal referential consistency
pub struct StructuralValidator;

impl StructuralValidator {
    /// Validate a skill - runs all structural checks
    pub fn validate(skill: &SkillDocument) -> ValidationReport {
        let mut findings = Vec::new();

        Self::validate_identity(skill, &mut findings);
        Self::validate_tools(skill, &mut findings);
        Self::validate_intents(skill, &mut findings);
        Self::validate_policy(skill, &mut findings);
        Self::validate_scenarios(skill, &mut findings);
        Self::validate_role(skill, &mut findings);
        Self::validate_engine(skill, &mut findings);
        Self::validate_access_policy(skill, &mut findings);

        ValidationReport::from_findings(findings)
    }

    fn validate_identity(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        if skill.id.trim().is_empty() {
            findings.push(ValidationError::error(
                "id",
                ErrorCode::Required,
                "Skill id is required and cannot be empty",
            ));
        }

        if skill.name.trim().is_empty() {
            findings.push(ValidationError::error(
                "name",
                ErrorCode::Required,
                "Skill name is required and cannot be empty",
            ));
        }

        match &skill.problem {
            None => findings.push(ValidationError::error(
                "problem",
                ErrorCode::Required,
                "Problem statement is required",
            )),
            Some(problem) if problem.statement().trim().is_empty() => {
                findings.push(ValidationError::error(
                    "problem.statement",
                    ErrorCode::Required,
                    "Problem statement cannot be empty",
                ))
            }
            Some(_) => {}
        }
    }

    fn validate_tools(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        if skill.tools.is_empty() {
            findings.push(ValidationError::error(
                "tools",
                ErrorCode::MinItems,
                "At least one tool is required",
            ));
            return;
        }

        let mut seen = HashSet::new();
        for (idx, tool) in skill.tools.iter().enumerate() {
            let path = format!("tools[{}]", idx);
            let label = if tool.name.is_empty() {
                format!("#{}", idx + 1)
            } else {
                tool.name.clone()
            };

            if tool.name.trim().is_empty() {
                findings.push(ValidationError::error(
                    format!("{}.name", path),
                    ErrorCode::Required,
                    format!("Tool {} has no name", label),
                ));
            } else {
                if !seen.insert(tool.name.as_str()) {
                    findings.push(ValidationError::error(
                        format!("{}.name", path),
                        ErrorCode::Duplicate,
                        format!("Tool {} is declared more than once", label),
                    ));
                }
                if !tool.name.contains('.') {
                    findings.push(ValidationError::warning(
                        format!("{}.name", path),
                        ErrorCode::InvalidFormat,
                        format!("Tool {} should use a dotted name like domain.resource.action", label),
                    ));
                }
            }

            if tool.description_or_empty().trim().is_empty() {
                findings.push(ValidationError::error(
                    format!("{}.description", path),
                    ErrorCode::Required,
                    format!("Tool {} has no description", label),
                ));
            }

            if tool.output.is_none() {
                findings.push(ValidationError::error(
                    format!("{}.output", path),
                    ErrorCode::Required,
                    format!("Tool {} has no output definition", label),
                ));
            }

            if tool
                .security
                .as_ref()
                .and_then(|security| security.classification.as_deref())
                .map_or(true, str::is_empty)
            {
                findings.push(ValidationError::error(
                    format!("{}.security", path),
                    ErrorCode::Required,
                    format!("Tool {} has no security classification", label),
                ));
            }

            for (input_idx, input) in tool.inputs.iter().enumerate() {
                let input_path = format!("{}.inputs[{}]", path, input_idx);
                if input.name.trim().is_empty() {
                    findings.push(ValidationError::error(
                        format!("{}.name", input_path),
                        ErrorCode::Required,
                        format!("Input {} of tool {} has no name", input_idx + 1, label),
                    ));
                }
                if input.description.as_deref().map_or(true, |d| d.trim().is_empty()) {
                    findings.push(ValidationError::error(
                        format!("{}.description", input_path),
                        ErrorCode::Required,
                        format!("Input '{}' of tool {} has no description", input.name, label),
                    ));
                }
            }

            if !tool.has_mock_examples() {
                findings.push(ValidationError::warning(
                    format!("{}.mock", path),
                    ErrorCode::Required,
                    format!("Tool {} has no mock examples", label),
                ));
            }
        }
    }

    fn validate_intents(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        let Some(intents) = &skill.intents else { return };

        let mut seen = HashSet::new();
        for (idx, intent) in intents.supported.iter().enumerate() {
            let path = format!("intents.supported[{}]", idx);
            if intent.id.trim().is_empty() {
                findings.push(ValidationError::error(
                    format!("{}.id", path),
                    ErrorCode::Required,
                    format!("Intent {} has no id", idx + 1),
                ));
                continue;
            }
            if !seen.insert(intent.id.as_str()) {
                findings.push(ValidationError::error(
                    format!("{}.id", path),
                    ErrorCode::Duplicate,
                    format!("Intent {} is declared more than once", intent.id),
                ));
            }
            if intent.examples.is_empty() {
                findings.push(ValidationError::warning(
                    format!("{}.examples", path),
                    ErrorCode::MinItems,
                    format!("Intent {} has no example phrases", intent.id),
                ));
            }
        }

        if let Some(thresholds) = &intents.thresholds {
            let in_unit = |v: f64| (0.0..=1.0).contains(&v);
            let (accept, clarify, reject) =
                (thresholds.accept(), thresholds.clarify(), thresholds.reject());
            if !(in_unit(accept) && in_unit(clarify) && in_unit(reject))
                || accept < clarify
                || clarify < reject
            {
                findings.push(ValidationError::error(
                    "intents.thresholds",
                    ErrorCode::OutOfRange,
                    "Thresholds must lie in [0, 1] with accept >= clarify >= reject",
                ));
            }
        }
    }

    fn validate_policy(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        if skill.guardrails().is_none() {
            findings.push(ValidationError::error(
                "policy.guardrails",
                ErrorCode::Required,
                "Policy guardrails are required",
            ));
        }

        let intent_ids: HashSet<&str> = skill
            .supported_intents()
            .iter()
            .map(|intent| intent.id.as_str())
            .collect();

        for (idx, workflow) in skill.workflows().iter().enumerate() {
            let path = format!("policy.workflows[{}]", idx);
            if !workflow.intent.is_empty() && !intent_ids.contains(workflow.intent.as_str()) {
                findings.push(ValidationError::error(
                    format!("{}.intent", path),
                    ErrorCode::UnknownReference,
                    format!(
                        "Workflow {} references unknown intent {}",
                        workflow.id, workflow.intent
                    ),
                ));
            }
            for (step_idx, step) in workflow.steps.iter().enumerate() {
                if skill.tool(&step.tool).is_none() {
                    findings.push(ValidationError::error(
                        format!("{}.steps[{}].tool", path, step_idx),
                        ErrorCode::UnknownReference,
                        format!("Workflow {} references unknown tool {}", workflow.id, step.tool),
                    ));
                }
            }
        }
    }

    fn validate_scenarios(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        if skill.scenario_list().is_empty() {
            findings.push(ValidationError::warning(
                "scenarios",
                ErrorCode::MinItems,
                "No scenarios describe how the skill is used",
            ));
            return;
        }

        for (idx, scenario) in skill.scenario_list().iter().enumerate() {
            for (step_idx, step) in scenario.steps.iter().enumerate() {
                if let ScenarioStep::Unrecognized(_) = step {
                    findings.push(ValidationError::warning(
                        format!("scenarios[{}].steps[{}]", idx, step_idx),
                        ErrorCode::InvalidFormat,
                        format!(
                            "Step {} of scenario {} is neither text nor a typed step",
                            step_idx + 1,
                            scenario.key()
                        ),
                    ));
                    continue;
                }
                if step.kind() != Some(StepKind::ToolCall) {
                    continue;
                }
                if let Some(tool) = step.tool() {
                    if skill.tool(tool).is_none() {
                        findings.push(ValidationError::warning(
                            format!("scenarios[{}].steps[{}].tool", idx, step_idx),
                            ErrorCode::UnknownReference,
                            format!("Scenario {} calls unknown tool {}", scenario.key(), tool),
                        ));
                    }
                }
            }
        }
    }

    fn validate_role(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        let Some(role) = &skill.role else { return };

        if role.name.trim().is_empty() {
            findings.push(ValidationError::error(
                "role.name",
                ErrorCode::Required,
                "Role name cannot be empty",
            ));
        }
        if role.persona.as_deref().map_or(true, |p| p.trim().is_empty()) {
            findings.push(ValidationError::warning(
                "role.persona",
                ErrorCode::Required,
                "Role has no persona",
            ));
        }
    }

    fn validate_engine(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        let Some(temperature) = skill.engine.as_ref().and_then(|e| e.get("temperature")) else {
            return;
        };

        match temperature.as_f64() {
            Some(value) if (0.0..=2.0).contains(&value) => {}
            Some(value) => findings.push(ValidationError::error(
                "engine.temperature",
                ErrorCode::OutOfRange,
                format!("Temperature {} is outside [0, 2]", value),
            )),
            None => findings.push(ValidationError::error(
                "engine.temperature",
                ErrorCode::InvalidFormat,
                "Temperature must be a number",
            )),
        }
    }

    fn validate_access_policy(skill: &SkillDocument, findings: &mut Vec<ValidationError>) {
        let Some(rules) = skill
            .access_policy
            .as_ref()
            .and_then(|policy| policy.get("rules"))
            .and_then(Value::as_array)
        else {
            return;
        };

        for (idx, rule) in rules.iter().enumerate() {
            let tools = rule.get("tools").and_then(Value::as_array);
            for name in tools.into_iter().flatten().filter_map(Value::as_str) {
                if name != "*" && skill.tool(name).is_none() {
                    findings.push(ValidationError::warning(
                        format!("access_policy.rules[{}].tools", idx),
                        ErrorCode::UnknownReference,
                        format!("Access rule names unknown tool {}", name),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skillforge_skills::ExpansionEngine;

    fn complete_skill() -> SkillDocument {
        let minimal: SkillDocument = serde_json::from_value(json!({
            "id": "clinic",
            "name": "Clinic",
            "problem": "Patients cannot book appointments online",
            "tools": [{
                "name": "clinic.appointments.create",
                "description": "Create an appointment",
                "inputs": [{"name": "date", "type": "string", "required": true, "description": "Date"}],
                "output": {"type": "object", "description": "Appointment"}
            }],
            "policy": {"guardrails": {"never": [], "always": []}}
        }))
        .unwrap();
        ExpansionEngine::expand(&minimal).skill
    }

    fn paths(findings: &[ValidationError]) -> Vec<&str> {
        findings.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_expanded_skill_is_valid() {
        let report = StructuralValidator::validate(&complete_skill());
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_problem_and_guardrails() {
        let mut skill = complete_skill();
        skill.problem = None;
        skill.policy.as_mut().unwrap().guardrails = None;

        let report = StructuralValidator::validate(&skill);
        assert!(!report.valid);
        assert_eq!(paths(&report.errors), vec!["problem", "policy.guardrails"]);
        assert!(report.errors.iter().all(|e| e.code == ErrorCode::Required));
    }

    #[test]
    fn test_tool_field_errors() {
        let mut skill = complete_skill();
        skill.tools[0].output = None;
        skill.tools[0].security = None;
        skill.tools[0].inputs[0].description = None;

        let report = StructuralValidator::validate(&skill);
        assert_eq!(
            paths(&report.errors),
            vec![
                "tools[0].output",
                "tools[0].security",
                "tools[0].inputs[0].description"
            ]
        );
    }

    #[test]
    fn test_no_tools_is_min_items() {
        let mut skill = complete_skill();
        skill.tools.clear();

        let report = StructuralValidator::validate(&skill);
        assert!(report
            .errors
            .iter()
            .any(|e| e.path == "tools" && e.code == ErrorCode::MinItems));
    }

    #[test]
    fn test_workflow_references_are_checked() {
        let mut skill = complete_skill();
        let workflows = skill.policy.as_mut().unwrap().workflows.as_mut().unwrap();
        workflows[0].steps[0].tool = "clinic.ghost.run".to_string();
        workflows[0].intent = "ghost".to_string();

        let report = StructuralValidator::validate(&skill);
        let codes: Vec<ErrorCode> = report.errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::UnknownReference, ErrorCode::UnknownReference]);
    }

    #[test]
    fn test_thresholds_and_temperature_ranges() {
        let mut skill = complete_skill();
        skill.intents.as_mut().unwrap().thresholds =
            Some(skillforge_skills::Thresholds::new(0.5, 0.7, 0.2));
        skill.engine = Some(json!({"temperature": 3.5}));

        let report = StructuralValidator::validate(&skill);
        assert_eq!(paths(&report.errors), vec!["intents.thresholds", "engine.temperature"]);
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut skill = complete_skill();
        skill.tools[0].mock = None;
        skill.access_policy = Some(json!({"rules": [{"tools": ["nope"], "effect": "deny"}]}));

        let report = StructuralValidator::validate(&skill);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_malformed_steps_and_partial_thresholds_are_findings() {
        let mut value = complete_skill().to_value().unwrap();
        value["scenarios"][0]["steps"] = json!([
            "User asks to book",
            {"type": "handoff", "to": "billing"},
            {"type": "tool_call", "tool": "clinic.ghost.run"}
        ]);
        value["intents"]["thresholds"] = json!({"clarify": 0.95});
        let skill = SkillDocument::from_value(value).unwrap();

        let report = StructuralValidator::validate(&skill);
        assert_eq!(paths(&report.errors), vec!["intents.thresholds"]);
        assert_eq!(
            paths(&report.warnings),
            vec!["scenarios[0].steps[1]", "scenarios[0].steps[2].tool"]
        );
    }
}
