//! Issue model
//!
//! Issues are stored on the skill document under `cascading_issues` using the
//! camelCase field names the editor expects.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How urgent an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Prevents export
    Blocker,
    Warning,
    Suggestion,
    Info,
}

/// Document area an issue concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Intents,
    Tools,
    Policy,
    Scenarios,
    Engine,
}

/// Issue lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    New,
    Reviewing,
    /// Terminal
    Resolved,
    /// Terminal, user action; never pruned
    Dismissed,
}

impl IssueStatus {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, IssueStatus::Resolved | IssueStatus::Dismissed)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            IssueStatus::New => "new",
            IssueStatus::Reviewing => "reviewing",
            IssueStatus::Resolved => "resolved",
            IssueStatus::Dismissed => "dismissed",
        };
        f.write_str(status)
    }
}

/// Change that raised an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredBy {
    /// Change kind, e.g. `tool_added`
    #[serde(rename = "type")]
    pub change_type: String,
    /// Id of the changed item
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Condition an issue stands for, re-evaluated against every revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelevanceCheck {
    /// Tool still has no policy
    ToolMissingPolicy { tool: String },
    /// Tool still has no mock examples
    ToolMissingMocks { tool: String },
    /// Tool inputs changed; holds until the mock changes
    ToolMocksStale {
        tool: String,
        #[serde(default)]
        mock: Option<serde_json::Value>,
    },
    /// Intent still has no examples
    IntentMissingExamples { intent: String },
    /// Intent description changed; holds until the examples change
    IntentExamplesReview { intent: String, examples: Vec<String> },
    /// Holds while the scenario exists
    ScenarioIntentReview { scenario: String },
    /// Holds while some action keyword matches no tool name
    ScenarioNeedsTools { scenario: String, keywords: Vec<String> },
    /// Holds while the `never` rule still names the tool
    PolicyToolConflict { rule: String, tool: String },
    /// Informational; expires with age
    GuardrailsUpdated,
}

/// Validation issue raised by a detected change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    pub title: String,
    pub context: String,
    /// Remediation prompt handed to the chat assistant
    pub chat_prompt: String,
    pub triggered_by: TriggeredBy,
    #[serde(default)]
    pub related_ids: Vec<String>,
    pub status: IssueStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Absent on issues stored by older editors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<RelevanceCheck>,
}

impl Issue {
    /// Neither resolved nor dismissed
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_wire_format() {
        let issue = Issue {
            id: "issue-1".to_string(),
            severity: IssueSeverity::Blocker,
            category: IssueCategory::Tools,
            title: "Tool \"a.b.c\" missing policy".to_string(),
            context: String::new(),
            chat_prompt: String::new(),
            triggered_by: TriggeredBy {
                change_type: "tool_added".to_string(),
                id: "a.b.c".to_string(),
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
            },
            related_ids: vec!["a.b.c".to_string()],
            status: IssueStatus::New,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            resolved_at: None,
            check: Some(RelevanceCheck::ToolMissingPolicy {
                tool: "a.b.c".to_string(),
            }),
        };

        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["chatPrompt"], json!(""));
        assert_eq!(value["triggeredBy"]["type"], json!("tool_added"));
        assert_eq!(value["relatedIds"], json!(["a.b.c"]));
        assert_eq!(value["severity"], json!("blocker"));
        assert_eq!(value["check"], json!({"kind": "tool_missing_policy", "tool": "a.b.c"}));
        assert!(value.get("resolvedAt").is_none());

        let back: Issue = serde_json::from_value(value).unwrap();
        assert_eq!(back, issue);
    }

    #[test]
    fn test_legacy_issue_without_check() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "old-1",
            "severity": "warning",
            "category": "intents",
            "title": "Intent \"x\" needs examples",
            "context": "",
            "chatPrompt": "",
            "triggeredBy": {"type": "intent_added", "id": "x", "timestamp": "2024-01-01T00:00:00Z"},
            "status": "reviewing",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(issue.check.is_none());
        assert!(issue.related_ids.is_empty());
        assert!(issue.is_active());
    }
}
