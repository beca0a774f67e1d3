//! Rule table: one function per change type, each yielding issue drafts

use skillforge_skills::{Guardrails, Intent, Policy, Scenario, SkillDocument, Tool};

use crate::changes::Change;
use crate::models::{IssueCategory, IssueSeverity, RelevanceCheck};

/// Words in scenario text that imply a tool call
pub const ACTION_KEYWORDS: [&str; 9] = [
    "lookup", "search", "get", "create", "update", "delete", "send", "check", "verify",
];

/// Title of the informational guardrail-count issue
pub const GUARDRAILS_UPDATED_TITLE: &str = "Policy guardrails updated";

/// Issue content before id, timestamps and trigger are stamped on
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDraft {
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    pub title: String,
    pub context: String,
    pub chat_prompt: String,
    pub related_ids: Vec<String>,
    pub check: RelevanceCheck,
}

/// Issues raised by one change against the current document
pub fn issues_for(change: &Change, current: &SkillDocument) -> Vec<IssueDraft> {
    match change {
        Change::ScenarioAdded { scenario } => scenario_added(scenario, current),
        Change::IntentAdded { intent } => intent_added(intent),
        Change::IntentModified { intent, previous } => intent_modified(intent, previous),
        Change::ToolAdded { tool } => tool_added(tool),
        Change::ToolModified { tool, previous } => tool_modified(tool, previous),
        Change::PolicyModified { policy, previous } => {
            policy_modified(policy.as_ref(), previous.as_ref(), current)
        }
    }
}

/// Action keywords in `text` that no tool name contains
pub fn unmatched_keywords(text: &str, tools: &[Tool]) -> Vec<String> {
    let text = text.to_lowercase();
    ACTION_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .filter(|keyword| {
            !tools
                .iter()
                .any(|tool| tool.name.to_lowercase().contains(*keyword))
        })
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Whether a `never` rule names the tool
pub fn rule_names_tool(rule: &str, tool_name: &str) -> bool {
    !tool_name.is_empty() && rule.to_lowercase().contains(&tool_name.to_lowercase())
}

fn scenario_added(scenario: &Scenario, current: &SkillDocument) -> Vec<IssueDraft> {
    let key = scenario.key().to_string();
    let mut drafts = vec![IssueDraft {
        severity: IssueSeverity::Warning,
        category: IssueCategory::Scenarios,
        title: format!("Review intents for scenario \"{}\"", key),
        context: format!(
            "Scenario \"{}\" was added. Its user messages may not be covered by the supported intents.",
            key
        ),
        chat_prompt: format!(
            "I added the scenario \"{}\". Check whether the supported intents cover it and suggest new intents or examples if needed.",
            key
        ),
        related_ids: vec![key.clone()],
        check: RelevanceCheck::ScenarioIntentReview {
            scenario: key.clone(),
        },
    }];

    let keywords = unmatched_keywords(&scenario.text(), &current.tools);
    if !keywords.is_empty() {
        drafts.push(IssueDraft {
            severity: IssueSeverity::Suggestion,
            category: IssueCategory::Tools,
            title: format!("Scenario \"{}\" may need new tools", key),
            context: format!(
                "The scenario mentions {} but no tool name matches.",
                keywords.join(", ")
            ),
            chat_prompt: format!(
                "The scenario \"{}\" mentions actions ({}) that no existing tool covers. Which tools should I add?",
                key,
                keywords.join(", ")
            ),
            related_ids: vec![key.clone()],
            check: RelevanceCheck::ScenarioNeedsTools {
                scenario: key,
                keywords,
            },
        });
    }

    drafts
}

fn intent_added(intent: &Intent) -> Vec<IssueDraft> {
    if !intent.examples.is_empty() {
        return Vec::new();
    }

    vec![IssueDraft {
        severity: IssueSeverity::Warning,
        category: IssueCategory::Intents,
        title: format!("Intent \"{}\" needs examples", intent.id),
        context: "Intents without example phrases cannot be recognised reliably.".to_string(),
        chat_prompt: format!(
            "Suggest five example user phrases for the intent \"{}\".",
            intent.id
        ),
        related_ids: vec![intent.id.clone()],
        check: RelevanceCheck::IntentMissingExamples {
            intent: intent.id.clone(),
        },
    }]
}

fn intent_modified(intent: &Intent, previous: &Intent) -> Vec<IssueDraft> {
    if intent.description == previous.description {
        return Vec::new();
    }

    vec![IssueDraft {
        severity: IssueSeverity::Suggestion,
        category: IssueCategory::Intents,
        title: format!("Review examples for intent \"{}\"", intent.id),
        context: "The intent description changed; its examples may no longer match.".to_string(),
        chat_prompt: format!(
            "The description of intent \"{}\" changed to \"{}\". Are its examples still accurate?",
            intent.id,
            intent.description.as_deref().unwrap_or_default()
        ),
        related_ids: vec![intent.id.clone()],
        check: RelevanceCheck::IntentExamplesReview {
            intent: intent.id.clone(),
            examples: intent.examples.clone(),
        },
    }]
}

fn tool_added(tool: &Tool) -> Vec<IssueDraft> {
    let mut drafts = Vec::new();

    if !tool.has_policy() {
        drafts.push(IssueDraft {
            severity: IssueSeverity::Blocker,
            category: IssueCategory::Tools,
            title: format!("Tool \"{}\" missing policy", tool.name),
            context: "Every tool needs a policy describing when it may be called.".to_string(),
            chat_prompt: format!(
                "Help me define a policy for the tool \"{}\": when may it be used and does it need approval?",
                tool.name
            ),
            related_ids: vec![tool.name.clone()],
            check: RelevanceCheck::ToolMissingPolicy {
                tool: tool.name.clone(),
            },
        });
    }

    if !tool.has_mock_examples() {
        drafts.push(IssueDraft {
            severity: IssueSeverity::Suggestion,
            category: IssueCategory::Tools,
            title: format!("Add mock data for tool \"{}\"", tool.name),
            context: "Mock examples let the skill be tested without the real service.".to_string(),
            chat_prompt: format!(
                "Generate realistic mock input/output examples for the tool \"{}\".",
                tool.name
            ),
            related_ids: vec![tool.name.clone()],
            check: RelevanceCheck::ToolMissingMocks {
                tool: tool.name.clone(),
            },
        });
    }

    drafts
}

fn tool_modified(tool: &Tool, previous: &Tool) -> Vec<IssueDraft> {
    if tool.inputs == previous.inputs {
        return Vec::new();
    }

    vec![IssueDraft {
        severity: IssueSeverity::Warning,
        category: IssueCategory::Tools,
        title: format!("Update mocks for tool \"{}\"", tool.name),
        context: "The tool inputs changed; existing mock examples may use the old inputs.".to_string(),
        chat_prompt: format!(
            "The inputs of tool \"{}\" changed. Update its mock examples to match.",
            tool.name
        ),
        related_ids: vec![tool.name.clone()],
        check: RelevanceCheck::ToolMocksStale {
            tool: tool.name.clone(),
            mock: tool.mock.as_ref().and_then(|mock| serde_json::to_value(mock).ok()),
        },
    }]
}

fn policy_modified(
    policy: Option<&Policy>,
    previous: Option<&Policy>,
    current: &SkillDocument,
) -> Vec<IssueDraft> {
    let guardrails = policy.and_then(|p| p.guardrails.as_ref());
    let previous_guardrails = previous.and_then(|p| p.guardrails.as_ref());
    let mut drafts = Vec::new();

    for rule in guardrails.map(|g| g.never.as_slice()).unwrap_or_default() {
        for tool in current.tools.iter().filter(|tool| rule_names_tool(rule, &tool.name)) {
            drafts.push(IssueDraft {
                severity: IssueSeverity::Warning,
                category: IssueCategory::Policy,
                title: format!("Policy may conflict with tool \"{}\"", tool.name),
                context: format!("The guardrail \"{}\" forbids something the tool does.", rule),
                chat_prompt: format!(
                    "The guardrail \"{}\" mentions the tool \"{}\". Should the tool be restricted or the rule reworded?",
                    rule, tool.name
                ),
                related_ids: vec![tool.name.clone()],
                check: RelevanceCheck::PolicyToolConflict {
                    rule: rule.clone(),
                    tool: tool.name.clone(),
                },
            });
        }
    }

    if counts(guardrails) != counts(previous_guardrails) {
        drafts.push(IssueDraft {
            severity: IssueSeverity::Info,
            category: IssueCategory::Policy,
            title: GUARDRAILS_UPDATED_TITLE.to_string(),
            context: "Guardrail rules were added or removed.".to_string(),
            chat_prompt: "Summarise how the updated guardrails change the skill's behaviour."
                .to_string(),
            related_ids: Vec::new(),
            check: RelevanceCheck::GuardrailsUpdated,
        });
    }

    drafts
}

fn counts(guardrails: Option<&Guardrails>) -> (usize, usize) {
    guardrails.map_or((0, 0), |g| (g.never.len(), g.always.len()))
}

fn quoted<'a>(title: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    title
        .strip_prefix(prefix)?
        .strip_suffix(suffix)
        .filter(|inner| !inner.is_empty())
}

/// Rebuild the check of an issue stored without one, from its title.
///
/// Snapshots the check compares against (examples, mock, rule) are taken from
/// `skill`, the revision the issue was loaded with. Unknown titles yield `None`.
pub fn infer_check(title: &str, skill: &SkillDocument) -> Option<RelevanceCheck> {
    if title == GUARDRAILS_UPDATED_TITLE {
        return Some(RelevanceCheck::GuardrailsUpdated);
    }
    if let Some(key) = quoted(title, "Review intents for scenario \"", "\"") {
        return Some(RelevanceCheck::ScenarioIntentReview {
            scenario: key.to_string(),
        });
    }
    if let Some(key) = quoted(title, "Scenario \"", "\" may need new tools") {
        return Some(RelevanceCheck::ScenarioNeedsTools {
            scenario: key.to_string(),
            keywords: skill
                .scenario_list()
                .iter()
                .find(|scenario| scenario.key() == key)
                .map(|scenario| unmatched_keywords(&scenario.text(), &skill.tools))
                .unwrap_or_default(),
        });
    }
    if let Some(id) = quoted(title, "Intent \"", "\" needs examples") {
        return Some(RelevanceCheck::IntentMissingExamples {
            intent: id.to_string(),
        });
    }
    if let Some(id) = quoted(title, "Review examples for intent \"", "\"") {
        return Some(RelevanceCheck::IntentExamplesReview {
            intent: id.to_string(),
            examples: skill
                .intent(id)
                .map(|intent| intent.examples.clone())
                .unwrap_or_default(),
        });
    }
    if let Some(name) = quoted(title, "Tool \"", "\" missing policy") {
        return Some(RelevanceCheck::ToolMissingPolicy {
            tool: name.to_string(),
        });
    }
    if let Some(name) = quoted(title, "Add mock data for tool \"", "\"") {
        return Some(RelevanceCheck::ToolMissingMocks {
            tool: name.to_string(),
        });
    }
    if let Some(name) = quoted(title, "Update mocks for tool \"", "\"") {
        return Some(RelevanceCheck::ToolMocksStale {
            tool: name.to_string(),
            mock: skill
                .tool(name)
                .and_then(|tool| tool.mock.as_ref())
                .and_then(|mock| serde_json::to_value(mock).ok()),
        });
    }
    if let Some(name) = quoted(title, "Policy may conflict with tool \"", "\"") {
        let rule = skill
            .guardrails()
            .and_then(|g| g.never.iter().find(|rule| rule_names_tool(rule, name)))
            .cloned()
            .unwrap_or_default();
        return Some(RelevanceCheck::PolicyToolConflict {
            rule,
            tool: name.to_string(),
        });
    }
    None
}
