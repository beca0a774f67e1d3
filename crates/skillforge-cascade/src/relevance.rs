//! Relevance sweep: drop issues whose triggering condition no longer holds

use chrono::{DateTime, Duration, Utc};
use skillforge_skills::SkillDocument;

use crate::models::{Issue, IssueStatus, RelevanceCheck};
use crate::rules::{rule_names_tool, unmatched_keywords};

/// Default age after which `guardrails_updated` info issues expire
pub const GUARDRAILS_INFO_TTL_SECS: i64 = 60 * 60;

impl RelevanceCheck {
    /// Whether the condition still holds against the current document
    pub fn holds(&self, skill: &SkillDocument) -> bool {
        match self {
            RelevanceCheck::ToolMissingPolicy { tool } => {
                skill.tool(tool).map_or(false, |t| !t.has_policy())
            }
            RelevanceCheck::ToolMissingMocks { tool } => {
                skill.tool(tool).map_or(false, |t| !t.has_mock_examples())
            }
            RelevanceCheck::ToolMocksStale { tool, mock } => skill.tool(tool).map_or(false, |t| {
                let current = t.mock.as_ref().and_then(|m| serde_json::to_value(m).ok());
                &current == mock
            }),
            RelevanceCheck::IntentMissingExamples { intent } => {
                skill.intent(intent).map_or(false, |i| i.examples.is_empty())
            }
            RelevanceCheck::IntentExamplesReview { intent, examples } => {
                skill.intent(intent).map_or(false, |i| &i.examples == examples)
            }
            RelevanceCheck::ScenarioIntentReview { scenario } => {
                skill.scenario_list().iter().any(|s| s.key() == scenario)
            }
            RelevanceCheck::ScenarioNeedsTools { scenario, .. } => skill
                .scenario_list()
                .iter()
                .find(|s| s.key() == scenario)
                .map_or(false, |s| !unmatched_keywords(&s.text(), &skill.tools).is_empty()),
            RelevanceCheck::PolicyToolConflict { rule, tool } => {
                skill.tool(tool).is_some()
                    && skill.guardrails().map_or(false, |g| {
                        g.never.iter().any(|r| r == rule && rule_names_tool(r, tool))
                    })
            }
            RelevanceCheck::GuardrailsUpdated => true,
        }
    }

    /// Age limit, for checks that expire
    pub fn ttl(&self, info_ttl: Duration) -> Option<Duration> {
        match self {
            RelevanceCheck::GuardrailsUpdated => Some(info_ttl),
            _ => None,
        }
    }
}

/// Whether the sweep keeps an issue
pub fn is_relevant(
    issue: &Issue,
    skill: &SkillDocument,
    now: DateTime<Utc>,
    info_ttl: Duration,
) -> bool {
    if issue.status == IssueStatus::Dismissed {
        return true;
    }
    let Some(check) = &issue.check else {
        return true;
    };
    if let Some(ttl) = check.ttl(info_ttl) {
        if now - issue.created_at > ttl {
            return false;
        }
    }
    check.holds(skill)
}

/// Remove irrelevant issues in place; returns how many were dropped
pub fn sweep(
    issues: &mut Vec<Issue>,
    skill: &SkillDocument,
    now: DateTime<Utc>,
    info_ttl: Duration,
) -> usize {
    let before = issues.len();
    issues.retain(|issue| is_relevant(issue, skill, now, info_ttl));
    before - issues.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> SkillDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tool_policy_check() {
        let check = RelevanceCheck::ToolMissingPolicy {
            tool: "a.b.c".to_string(),
        };
        assert!(check.holds(&doc(json!({"tools": [{"name": "a.b.c"}]}))));
        assert!(check.holds(&doc(json!({"tools": [{"name": "a.b.c", "policy": {}}]}))));
        assert!(!check.holds(&doc(json!({"tools": [{"name": "a.b.c", "policy": {"allowed": "always"}}]}))));
        // Tool removed
        assert!(!check.holds(&doc(json!({"tools": []}))));
    }

    #[test]
    fn test_examples_review_holds_until_examples_change() {
        let check = RelevanceCheck::IntentExamplesReview {
            intent: "book".to_string(),
            examples: vec!["Book me".to_string()],
        };
        let unchanged = doc(json!({"intents": {"supported": [{"id": "book", "examples": ["Book me"]}]}}));
        let changed = doc(json!({"intents": {"supported": [{"id": "book", "examples": ["Book a visit"]}]}}));

        assert!(check.holds(&unchanged));
        assert!(!check.holds(&changed));
    }

    #[test]
    fn test_policy_conflict_until_rule_reworded() {
        let check = RelevanceCheck::PolicyToolConflict {
            rule: "Never refund twice".to_string(),
            tool: "refund".to_string(),
        };
        let conflicting = doc(json!({
            "tools": [{"name": "refund"}],
            "policy": {"guardrails": {"never": ["Never refund twice"]}}
        }));
        let reworded = doc(json!({
            "tools": [{"name": "refund"}],
            "policy": {"guardrails": {"never": ["Never pay out twice"]}}
        }));

        assert!(check.holds(&conflicting));
        assert!(!check.holds(&reworded));
    }

    #[test]
    fn test_guardrails_info_only_expires() {
        let check = RelevanceCheck::GuardrailsUpdated;
        assert!(check.holds(&SkillDocument::default()));
        assert_eq!(check.ttl(Duration::hours(1)), Some(Duration::hours(1)));
        assert_eq!(
            RelevanceCheck::ScenarioIntentReview {
                scenario: "s".to_string()
            }
            .ttl(Duration::hours(1)),
            None
        );
    }
}
