//! Shallow change detection between consecutive document revisions
//!
//! Only single-item additions (array grew by exactly one, last element) and
//! content modifications of existing intents, tools and the policy object are
//! detected. Reordering, bulk edits and removals produce no change.

use serde_json::Value;
use skillforge_skills::{Intent, Policy, Scenario, SkillDocument, Tool};

/// Edit detected between two revisions. Lives for one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    ScenarioAdded {
        scenario: Scenario,
    },
    IntentAdded {
        intent: Intent,
    },
    IntentModified {
        intent: Intent,
        previous: Intent,
    },
    ToolAdded {
        tool: Tool,
    },
    ToolModified {
        tool: Tool,
        previous: Tool,
    },
    PolicyModified {
        policy: Option<Policy>,
        previous: Option<Policy>,
    },
}

impl Change {
    /// Wire name of the change type
    pub fn kind(&self) -> &'static str {
        match self {
            Change::ScenarioAdded { .. } => "scenario_added",
            Change::IntentAdded { .. } => "intent_added",
            Change::IntentModified { .. } => "intent_modified",
            Change::ToolAdded { .. } => "tool_added",
            Change::ToolModified { .. } => "tool_modified",
            Change::PolicyModified { .. } => "policy_modified",
        }
    }

    /// Id of the changed item
    pub fn id(&self) -> &str {
        match self {
            Change::ScenarioAdded { scenario } => scenario.key(),
            Change::IntentAdded { intent } | Change::IntentModified { intent, .. } => &intent.id,
            Change::ToolAdded { tool } | Change::ToolModified { tool, .. } => &tool.name,
            Change::PolicyModified { .. } => "policy",
        }
    }
}

/// Detects changes between two revisions
pub struct ChangeDetector;

impl ChangeDetector {
    pub fn detect(old: &SkillDocument, new: &SkillDocument) -> Vec<Change> {
        let mut changes = Vec::new();

        // Scenarios
        if let Some(scenario) = appended(old.scenario_list(), new.scenario_list()) {
            changes.push(Change::ScenarioAdded {
                scenario: scenario.clone(),
            });
        }

        // Intents
        let (old_intents, new_intents) = (old.supported_intents(), new.supported_intents());
        let added_intent = appended(old_intents, new_intents);
        if let Some(intent) = added_intent {
            changes.push(Change::IntentAdded {
                intent: intent.clone(),
            });
        }
        for intent in new_intents {
            if added_intent.map_or(false, |added| std::ptr::eq(added, intent)) {
                continue;
            }
            let Some(previous) = old_intents.iter().find(|i| i.id == intent.id) else {
                continue;
            };
            if serialized(previous) != serialized(intent) {
                changes.push(Change::IntentModified {
                    intent: intent.clone(),
                    previous: previous.clone(),
                });
            }
        }

        // Tools
        let added_tool = appended(&old.tools, &new.tools);
        if let Some(tool) = added_tool {
            changes.push(Change::ToolAdded { tool: tool.clone() });
        }
        for tool in &new.tools {
            if added_tool.map_or(false, |added| std::ptr::eq(added, tool)) {
                continue;
            }
            let Some(previous) = old.tools.iter().find(|t| t.name == tool.name) else {
                continue;
            };
            if serialized(previous) != serialized(tool) {
                changes.push(Change::ToolModified {
                    tool: tool.clone(),
                    previous: previous.clone(),
                });
            }
        }

        // Policy
        if serialized(&old.policy) != serialized(&new.policy) {
            changes.push(Change::PolicyModified {
                policy: new.policy.clone(),
                previous: old.policy.clone(),
            });
        }

        changes
    }
}

fn appended<'a, T>(old: &[T], new: &'a [T]) -> Option<&'a T> {
    if new.len() == old.len() + 1 {
        new.last()
    } else {
        None
    }
}

fn serialized<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> SkillDocument {
        serde_json::from_value(value).unwrap()
    }

    fn base() -> Value {
        json!({
            "id": "clinic",
            "tools": [{"name": "clinic.appointments.create", "description": "Create"}],
            "intents": {"supported": [{"id": "create_appointment", "description": "Book"}]},
            "policy": {"guardrails": {"never": [], "always": []}},
            "scenarios": [{"id": "s1", "name": "Booking", "steps": []}]
        })
    }

    fn kinds(changes: &[Change]) -> Vec<&str> {
        changes.iter().map(Change::kind).collect()
    }

    #[test]
    fn test_identical_revisions_have_no_changes() {
        assert!(ChangeDetector::detect(&doc(base()), &doc(base())).is_empty());
    }

    #[test]
    fn test_single_additions() {
        let mut next = base();
        next["tools"].as_array_mut().unwrap().push(json!({"name": "clinic.doctors.list"}));
        next["scenarios"].as_array_mut().unwrap().push(json!({"id": "s2", "name": "Lookup"}));
        next["intents"]["supported"].as_array_mut().unwrap().push(json!({"id": "list_doctors"}));

        let changes = ChangeDetector::detect(&doc(base()), &doc(next));
        assert_eq!(kinds(&changes), vec!["scenario_added", "intent_added", "tool_added"]);
        assert_eq!(changes[2].id(), "clinic.doctors.list");
        assert_eq!(changes[0].id(), "s2");
    }

    #[test]
    fn test_bulk_additions_and_removals_are_invisible() {
        let mut next = base();
        next["tools"] = json!([
            {"name": "clinic.appointments.create", "description": "Create"},
            {"name": "a.b.c"},
            {"name": "d.e.f"}
        ]);
        next["scenarios"] = json!([]);

        assert!(ChangeDetector::detect(&doc(base()), &doc(next)).is_empty());
    }

    #[test]
    fn test_modifications() {
        let mut next = base();
        next["tools"][0]["description"] = json!("Create a new appointment");
        next["intents"]["supported"][0]["description"] = json!("Book a visit");
        next["policy"]["guardrails"]["never"] = json!(["Share records"]);

        let changes = ChangeDetector::detect(&doc(base()), &doc(next));
        assert_eq!(kinds(&changes), vec!["intent_modified", "tool_modified", "policy_modified"]);
        assert_eq!(changes[2].id(), "policy");
    }
}
