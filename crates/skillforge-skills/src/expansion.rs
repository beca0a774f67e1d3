//! Expansion engine
//!
//! Turns a minimal skill document (id, name, problem, tools) into a complete
//! one. Sections the caller supplied are never touched; only absent or
//! explicitly empty sections are synthesized, and each synthesized field is
//! reported by its dotted path.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::derivation::{
    build_mock, derive_connection_id, derive_intent_id, derive_mcp_tool, derive_tool_id,
    extract_entities, generate_examples,
};
use crate::models::{
    Intent, Intents, OutOfDomain, Policy, Problem, ProblemSection, Role, Scenario, ScenarioStep,
    SkillDocument, StepKind, Thresholds, Tool, ToolSecurity, ToolSource, Workflow, WorkflowStep,
};

/// Model used when a document carries no engine section
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Output of one expansion
#[derive(Debug, Clone, Serialize)]
pub struct Expansion {
    /// The completed document
    pub skill: SkillDocument,
    /// Dotted paths of every synthesized field
    pub expanded_fields: Vec<String>,
}

/// Fills in everything a minimal skill document omits
pub struct ExpansionEngine;

impl ExpansionEngine {
    /// Expand a document. Deterministic and idempotent.
    pub fn expand(minimal: &SkillDocument) -> Expansion {
        let mut skill = minimal.clone();
        let mut fields = Vec::new();

        Self::expand_problem(&mut skill, &mut fields);
        Self::expand_tools(&mut skill, &mut fields);
        Self::expand_intents(&mut skill, &mut fields);
        Self::expand_workflows(&mut skill, &mut fields);
        Self::expand_scenarios(&mut skill, &mut fields);
        Self::expand_role(&mut skill, &mut fields);

        if skill.engine.as_ref().map_or(true, is_blank) {
            skill.engine = Some(default_engine());
            fields.push("engine".to_string());
        }

        if skill.access_policy.as_ref().map_or(true, is_blank) {
            skill.access_policy = Some(json!({"rules": [{"tools": ["*"], "effect": "allow"}]}));
            fields.push("access_policy".to_string());
        }

        Self::expand_connectors(&mut skill, &mut fields);

        debug!(
            skill = %skill.id,
            expanded = fields.len(),
            "Expanded skill document"
        );

        Expansion {
            skill,
            expanded_fields: fields,
        }
    }

    /// Whether the skill pipeline should expand a document before validating it
    pub fn needs_expansion(skill: &SkillDocument) -> bool {
        skill.supported_intents().is_empty()
            || skill.scenario_list().is_empty()
            || skill.role.is_none()
    }

    fn expand_problem(skill: &mut SkillDocument, fields: &mut Vec<String>) {
        let goals = derive_goals(&skill.tools);

        match skill.problem.take() {
            None => {}
            Some(ProblemSection::Statement(statement)) => {
                skill.problem = Some(ProblemSection::Detailed(Problem {
                    context: Some(statement.clone()),
                    statement,
                    goals: Some(goals),
                    extra: Map::new(),
                }));
                fields.push("problem".to_string());
            }
            Some(ProblemSection::Detailed(mut problem)) => {
                // Nothing to copy from an empty statement
                if !problem.statement.is_empty()
                    && problem.context.as_deref().map_or(true, str::is_empty)
                {
                    problem.context = Some(problem.statement.clone());
                    fields.push("problem.context".to_string());
                }
                if problem.goals.as_ref().map_or(true, Vec::is_empty) && !goals.is_empty() {
                    problem.goals = Some(goals);
                    fields.push("problem.goals".to_string());
                }
                skill.problem = Some(ProblemSection::Detailed(problem));
            }
        }
    }

    fn expand_tools(skill: &mut SkillDocument, fields: &mut Vec<String>) {
        let skill_id = skill.id.clone();

        for (idx, tool) in skill.tools.iter_mut().enumerate() {
            if tool.name.is_empty() {
                continue;
            }

            if tool.id.as_deref().map_or(true, str::is_empty) {
                tool.id = Some(derive_tool_id(&tool.name));
                fields.push(format!("tools[{}].id", idx));
            }

            if tool.source.is_none() {
                tool.source = Some(ToolSource {
                    source_type: Some("mcp".to_string()),
                    connection_id: Some(derive_connection_id(&tool.name, &skill_id)),
                    mcp_tool: Some(derive_mcp_tool(&tool.name)),
                    extra: Map::new(),
                });
                fields.push(format!("tools[{}].source", idx));
            }

            if tool.policy.as_ref().map_or(true, is_blank) {
                tool.policy = Some(json!({"allowed": "always"}));
                fields.push(format!("tools[{}].policy", idx));
            }

            if tool.mock.is_none() {
                tool.mock = Some(build_mock(tool));
                fields.push(format!("tools[{}].mock", idx));
            }

            if tool.security.is_none() {
                tool.security = Some(ToolSecurity {
                    classification: Some("public".to_string()),
                    extra: Map::new(),
                });
                fields.push(format!("tools[{}].security", idx));
            }
        }
    }

    fn expand_intents(skill: &mut SkillDocument, fields: &mut Vec<String>) {
        let generated = intents_from_tools(&skill.tools);

        match skill.intents.as_mut() {
            None => {
                skill.intents = Some(Intents {
                    supported: generated,
                    thresholds: Some(Thresholds::default()),
                    out_of_domain: Some(OutOfDomain::default()),
                    extra: Map::new(),
                });
                fields.push("intents".to_string());
            }
            Some(intents) => {
                if intents.supported.is_empty() && !generated.is_empty() {
                    intents.supported = generated;
                    fields.push("intents.supported".to_string());
                }
                if intents.thresholds.is_none() {
                    intents.thresholds = Some(Thresholds::default());
                    fields.push("intents.thresholds".to_string());
                }
                if intents.out_of_domain.is_none() {
                    intents.out_of_domain = Some(OutOfDomain::default());
                    fields.push("intents.out_of_domain".to_string());
                }
            }
        }
    }

    /// One single-step workflow per intent; no multi-tool composition.
    fn expand_workflows(skill: &mut SkillDocument, fields: &mut Vec<String>) {
        if !skill.workflows().is_empty() {
            return;
        }

        let workflows: Vec<Workflow> = skill
            .supported_intents()
            .iter()
            .filter_map(|intent| {
                let tool = skill
                    .tools
                    .iter()
                    .find(|tool| !tool.name.is_empty() && derive_intent_id(&tool.name) == intent.id)?;
                Some(Workflow {
                    id: format!("wf_{}", intent.id),
                    name: Some(format!("{} workflow", humanize(&intent.id))),
                    intent: intent.id.clone(),
                    steps: vec![WorkflowStep {
                        tool: tool.name.clone(),
                        description: tool.description.clone(),
                        extra: Map::new(),
                    }],
                    on_deviation: Some("warn".to_string()),
                    required: Some(false),
                    extra: Map::new(),
                })
            })
            .collect();

        if workflows.is_empty() {
            return;
        }

        skill.policy.get_or_insert_with(Policy::default).workflows = Some(workflows);
        fields.push("policy.workflows".to_string());
    }

    fn expand_scenarios(skill: &mut SkillDocument, fields: &mut Vec<String>) {
        if !skill.scenario_list().is_empty() {
            return;
        }

        let scenarios: Vec<Scenario> = skill
            .supported_intents()
            .iter()
            .map(|intent| scenario_for_intent(intent, skill.workflows()))
            .collect();

        if scenarios.is_empty() {
            return;
        }

        skill.scenarios = Some(scenarios);
        fields.push("scenarios".to_string());
    }

    fn expand_role(skill: &mut SkillDocument, fields: &mut Vec<String>) {
        if skill.role.is_some() {
            return;
        }

        let display_name = if skill.name.is_empty() { &skill.id } else { &skill.name };
        let statement = skill
            .problem_statement()
            .or(skill.description.as_deref())
            .unwrap_or(display_name.as_str())
            .to_string();

        let capabilities: Vec<&str> = skill
            .tools
            .iter()
            .filter_map(|tool| tool.description.as_deref())
            .filter(|description| !description.is_empty())
            .collect();

        let mut persona = format!("You are the {} assistant. {}", display_name, statement);
        if !capabilities.is_empty() {
            persona.push_str(&format!(" You can: {}.", capabilities.join("; ")));
        }

        let goals = match skill.problem.as_ref().map(ProblemSection::goals) {
            Some(goals) if !goals.is_empty() => goals.to_vec(),
            _ => vec![statement.clone()],
        };

        let limitations = skill
            .guardrails()
            .map(|guardrails| {
                guardrails
                    .never
                    .iter()
                    .map(|rule| format!("Cannot {}", lowercase_first(rule)))
                    .collect()
            })
            .unwrap_or_default();

        skill.role = Some(Role {
            name: format!("{} Assistant", display_name),
            persona: Some(persona),
            goals,
            limitations,
            communication_style: Some("Professional, concise and helpful".to_string()),
            extra: Map::new(),
        });
        fields.push("role".to_string());
    }

    fn expand_connectors(skill: &mut SkillDocument, fields: &mut Vec<String>) {
        if skill.connectors.as_ref().map_or(false, |c| !c.is_empty()) {
            return;
        }

        let mut order: Vec<String> = Vec::new();
        let mut tools_by_connection: Vec<Vec<String>> = Vec::new();
        for tool in &skill.tools {
            let Some(source) = &tool.source else { continue };
            let Some(connection_id) = &source.connection_id else { continue };
            let remote = source
                .mcp_tool
                .clone()
                .unwrap_or_else(|| derive_mcp_tool(&tool.name));
            match order.iter().position(|id| id == connection_id) {
                Some(pos) => tools_by_connection[pos].push(remote),
                None => {
                    order.push(connection_id.clone());
                    tools_by_connection.push(vec![remote]);
                }
            }
        }

        if order.is_empty() {
            return;
        }

        let connectors = order
            .into_iter()
            .zip(tools_by_connection)
            .map(|(id, tools)| json!({"id": id, "name": id, "type": "mcp", "tools": tools}))
            .collect();

        skill.connectors = Some(connectors);
        fields.push("connectors".to_string());
    }
}

/// Convenience wrapper around [`ExpansionEngine::expand`]
pub fn expand(minimal: &SkillDocument) -> Expansion {
    ExpansionEngine::expand(minimal)
}

/// Engine configuration applied when a document has none
pub fn default_engine() -> Value {
    json!({
        "model": DEFAULT_MODEL,
        "temperature": 0.3,
        "rv2": {
            "max_iterations": 10,
            "iteration_timeout_ms": 30000,
            "allow_parallel_tools": false,
            "on_max_iterations": "fail"
        },
        "hlr": {
            "enabled": true,
            "critic": {"enabled": false},
            "reflection": {"enabled": false}
        },
        "autonomy": {"level": "autonomous"}
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn derive_goals(tools: &[Tool]) -> Vec<String> {
    tools
        .iter()
        .take(4)
        .filter_map(|tool| tool.description.as_deref())
        .filter(|description| !description.is_empty())
        .map(|description| format!("Enable {}", description))
        .collect()
}

fn intents_from_tools(tools: &[Tool]) -> Vec<Intent> {
    let mut seen = HashSet::new();
    tools
        .iter()
        .filter(|tool| !tool.name.is_empty())
        .filter_map(|tool| {
            let id = derive_intent_id(&tool.name);
            if !seen.insert(id.clone()) {
                return None;
            }
            Some(Intent {
                examples: generate_examples(&id),
                entities: extract_entities(&tool.inputs),
                description: tool.description.clone(),
                id,
                extra: Map::new(),
            })
        })
        .collect()
}

fn scenario_for_intent(intent: &Intent, workflows: &[Workflow]) -> Scenario {
    let phrase = intent.id.replace('_', " ");
    let utterance = intent
        .examples
        .first()
        .cloned()
        .unwrap_or_else(|| format!("I want to {}", phrase));

    let mut steps = vec![ScenarioStep::typed(StepKind::UserMessage, utterance, None)];

    if let Some(workflow) = workflows.iter().find(|workflow| workflow.intent == intent.id) {
        steps.extend(workflow.steps.iter().map(|step| {
            ScenarioStep::typed(
                StepKind::ToolCall,
                format!("Agent calls {}", step.tool),
                Some(step.tool.clone()),
            )
        }));
    }

    steps.push(ScenarioStep::typed(
        StepKind::AgentResponse,
        "Agent presents results",
        None,
    ));

    Scenario {
        id: format!("scenario_{}", intent.id),
        name: humanize(&intent.id),
        description: intent.description.clone(),
        intent: Some(intent.id.clone()),
        steps,
        expected_outcome: Some(format!("The user is able to {} successfully.", phrase)),
        extra: Map::new(),
    }
}

fn humanize(id: &str) -> String {
    let phrase = id.replace('_', " ");
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
