//! Skill document data models
//!
//! Every caller-authored section keeps an `extra` map so keys this crate does
//! not model survive a decode/expand/encode cycle untouched. Optional keys are
//! `Option` or skipped when empty, so encoding never adds a key the author
//! did not write.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, SkillError};

/// Declarative definition of one agent skill
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SkillDocument {
    /// Skill identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Free-form description, used as a fallback for a missing problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Problem statement (string shorthand or detailed object)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemSection>,

    /// Tools the skill may call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    /// Supported intents and classification settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<Intents>,

    /// Guardrails, workflows, approvals and escalation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Policy>,

    /// Example conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<Scenario>>,

    /// Agent persona
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Runtime engine configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<Value>,

    /// Tool access rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_policy: Option<Value>,

    /// Output filters applied by the runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_filters: Option<Value>,

    /// Activation triggers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Value>,

    /// Connectors backing the tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectors: Option<Vec<Value>>,

    /// Persisted cascading-validation issues (schema owned by the cascade engine)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascading_issues: Option<Value>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Problem section: either a bare statement or the detailed form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProblemSection {
    /// String shorthand
    Statement(String),
    /// Detailed object
    Detailed(Problem),
}

/// Detailed problem description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Problem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProblemSection {
    /// Problem statement regardless of the representation
    pub fn statement(&self) -> &str {
        match self {
            ProblemSection::Statement(statement) => statement,
            ProblemSection::Detailed(problem) => &problem.statement,
        }
    }

    /// Goals, when the detailed form declares them
    pub fn goals(&self) -> &[String] {
        match self {
            ProblemSection::Statement(_) => &[],
            ProblemSection::Detailed(problem) => problem.goals.as_deref().unwrap_or(&[]),
        }
    }
}

/// A callable tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Dotted name, e.g. `clinic.appointments.create`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<ToolInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ToolOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ToolSource>,
    /// Execution policy; shape owned by the runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock: Option<ToolMock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<ToolSecurity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tool {
    /// Whether the tool carries a non-empty policy object
    pub fn has_policy(&self) -> bool {
        matches!(&self.policy, Some(Value::Object(map)) if !map.is_empty())
    }

    /// Whether the tool has at least one mock example
    pub fn has_mock_examples(&self) -> bool {
        self.mock
            .as_ref()
            .map(|mock| !mock.examples.is_empty())
            .unwrap_or(false)
    }

    /// Description, or an empty string
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Tool input parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolInput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolInput {
    /// Absent `required` means optional
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Tool output shape
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolOutput {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Backing connector binding
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolSource {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_tool: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Mock behaviour used while the real connector is unavailable
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolMock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<MockExample>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One canned input/output pair
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MockExample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data classification of a tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolSecurity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Intent section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Intents {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported: Vec<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_domain: Option<OutOfDomain>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user intent the skill recognises
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Intent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<Entity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Entity extracted from a user message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_from: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Intent confidence thresholds; a missing bound falls back to its default
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarify: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject: Option<f64>,
}

impl Thresholds {
    pub const DEFAULT_ACCEPT: f64 = 0.85;
    pub const DEFAULT_CLARIFY: f64 = 0.6;
    pub const DEFAULT_REJECT: f64 = 0.4;

    pub fn new(accept: f64, clarify: f64, reject: f64) -> Self {
        Self {
            accept: Some(accept),
            clarify: Some(clarify),
            reject: Some(reject),
        }
    }

    pub fn accept(&self) -> f64 {
        self.accept.unwrap_or(Self::DEFAULT_ACCEPT)
    }

    pub fn clarify(&self) -> f64 {
        self.clarify.unwrap_or(Self::DEFAULT_CLARIFY)
    }

    pub fn reject(&self) -> f64 {
        self.reject.unwrap_or(Self::DEFAULT_REJECT)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ACCEPT, Self::DEFAULT_CLARIFY, Self::DEFAULT_REJECT)
    }
}

/// Handling of requests outside the skill's domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutOfDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggest_domains: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for OutOfDomain {
    fn default() -> Self {
        Self {
            action: Some("redirect".to_string()),
            message: Some("This request is outside my capabilities.".to_string()),
            suggest_domains: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Policy section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardrails: Option<Guardrails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Vec<Workflow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approvals: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hard behavioural rules
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Guardrails {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub never: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub always: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ordered tool sequence bound to an intent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub intent: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<WorkflowStep>,
    /// `warn` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_deviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Single workflow step
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowStep {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Example conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ScenarioStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_outcome: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Scenario {
    /// Stable key: the id when present, the name otherwise
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }

    /// All human-readable text of the scenario, space separated
    pub fn text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];
        parts.extend(self.description.as_deref());
        for step in &self.steps {
            parts.extend(step.content());
        }
        parts.extend(self.expected_outcome.as_deref());
        parts.join(" ")
    }
}

/// Scenario step kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    UserMessage,
    ToolCall,
    AgentResponse,
}

/// Single scenario step
///
/// Authors write steps either as plain narrative lines or as typed objects.
/// Anything else decodes as [`ScenarioStep::Unrecognized`] and is left to
/// structural validation to report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScenarioStep {
    Text(String),
    Typed(TypedStep),
    Unrecognized(Value),
}

/// Step with an explicit kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypedStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScenarioStep {
    pub fn typed(kind: StepKind, content: impl Into<String>, tool: Option<String>) -> Self {
        ScenarioStep::Typed(TypedStep {
            kind,
            content: Some(content.into()),
            tool,
            extra: Map::new(),
        })
    }

    /// Declared kind; plain text steps have none
    pub fn kind(&self) -> Option<StepKind> {
        match self {
            ScenarioStep::Typed(step) => Some(step.kind),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            ScenarioStep::Text(text) => Some(text),
            ScenarioStep::Typed(step) => step.content.as_deref(),
            ScenarioStep::Unrecognized(_) => None,
        }
    }

    pub fn tool(&self) -> Option<&str> {
        match self {
            ScenarioStep::Typed(step) => step.tool.as_deref(),
            _ => None,
        }
    }
}

/// Agent persona
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Role {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limitations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_style: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SkillDocument {
    /// Decode a document from an arbitrary JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(SkillError::not_an_object(&value));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Encode the document back to JSON
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Find a tool by name
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Supported intents, empty when the section is absent
    pub fn supported_intents(&self) -> &[Intent] {
        self.intents
            .as_ref()
            .map(|intents| intents.supported.as_slice())
            .unwrap_or(&[])
    }

    /// Find an intent by id
    pub fn intent(&self, id: &str) -> Option<&Intent> {
        self.supported_intents().iter().find(|intent| intent.id == id)
    }

    /// Scenarios, empty when absent
    pub fn scenario_list(&self) -> &[Scenario] {
        self.scenarios.as_deref().unwrap_or(&[])
    }

    /// Guardrails, if declared
    pub fn guardrails(&self) -> Option<&Guardrails> {
        self.policy.as_ref().and_then(|policy| policy.guardrails.as_ref())
    }

    /// Workflows, empty when absent
    pub fn workflows(&self) -> &[Workflow] {
        self.policy
            .as_ref()
            .and_then(|policy| policy.workflows.as_deref())
            .unwrap_or(&[])
    }

    /// Problem statement, if any
    pub fn problem_statement(&self) -> Option<&str> {
        self.problem
            .as_ref()
            .map(ProblemSection::statement)
            .filter(|statement| !statement.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_problem_accepts_string_shorthand() {
        let doc: SkillDocument = serde_json::from_value(json!({
            "id": "clinic",
            "problem": "Patients cannot book appointments online"
        }))
        .unwrap();

        assert_eq!(
            doc.problem_statement(),
            Some("Patients cannot book appointments online")
        );
        assert!(matches!(doc.problem, Some(ProblemSection::Statement(_))));
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let input = json!({
            "id": "clinic",
            "name": "Clinic",
            "x_owner": "ops",
            "tools": [{"name": "clinic.doctors.list", "x_rate_limit": 5}]
        });

        let doc = SkillDocument::from_value(input).unwrap();
        let output = doc.to_value().unwrap();

        assert_eq!(output["x_owner"], "ops");
        assert_eq!(output["tools"][0]["x_rate_limit"], 5);
    }

    #[test]
    fn test_supplied_sections_encode_verbatim() {
        let input = json!({
            "id": "fleet",
            "tools": [{
                "name": "fleet.vehicles.get",
                "inputs": [{"name": "vehicle_id", "type": "string"}],
                "output": {"description": "Vehicle"},
                "mock": {"enabled": true, "examples": [{"output": {"id": "v1"}}]}
            }],
            "intents": {
                "supported": [{
                    "id": "get_vehicle",
                    "examples": ["Where is truck 7?"],
                    "entities": [{"name": "vehicle_id"}]
                }],
                "thresholds": {"accept": 0.9},
                "out_of_domain": {"action": "refuse"}
            },
            "policy": {
                "guardrails": {"never": ["Share driver phone numbers"]},
                "workflows": [{"id": "wf_get", "intent": "get_vehicle", "steps": [{"tool": "fleet.vehicles.get"}]}]
            },
            "scenarios": [{"name": "Lookup", "steps": ["User asks for a truck", {"type": "tool_call", "tool": "fleet.vehicles.get"}]}],
            "role": {"name": "Dispatcher"}
        });

        let doc = SkillDocument::from_value(input.clone()).unwrap();
        assert_eq!(doc.to_value().unwrap(), input);
    }

    #[test]
    fn test_loose_shapes_decode() {
        let doc = SkillDocument::from_value(json!({
            "intents": {
                "supported": [{"id": "track", "entities": [{"name": "plate", "type": "string"}]}],
                "thresholds": {"clarify": 0.5}
            },
            "scenarios": [{
                "id": "s1",
                "steps": ["User asks for a truck", {"type": "agent_response", "content": "Here it is"}, {"type": "system"}, 7]
            }]
        }))
        .unwrap();

        let thresholds = doc.intents.as_ref().unwrap().thresholds.unwrap();
        assert_eq!(thresholds.accept(), Thresholds::DEFAULT_ACCEPT);
        assert_eq!(thresholds.clarify(), 0.5);

        let steps = &doc.scenario_list()[0].steps;
        assert_eq!(steps[0].content(), Some("User asks for a truck"));
        assert_eq!(steps[1].kind(), Some(StepKind::AgentResponse));
        assert!(matches!(steps[2], ScenarioStep::Unrecognized(_)));
        assert!(matches!(steps[3], ScenarioStep::Unrecognized(_)));
        assert!(doc.scenario_list()[0].text().contains("Here it is"));
    }

    #[test]
    fn test_has_policy_requires_non_empty_object() {
        let mut tool = Tool {
            name: "a.b.c".to_string(),
            ..Default::default()
        };
        assert!(!tool.has_policy());

        tool.policy = Some(json!({}));
        assert!(!tool.has_policy());

        tool.policy = Some(json!({"allowed": "always"}));
        assert!(tool.has_policy());
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = SkillDocument::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_scenario_key_falls_back_to_name() {
        let scenario = Scenario {
            name: "Book a visit".to_string(),
            ..Default::default()
        };
        assert_eq!(scenario.key(), "Book a visit");
    }
}
