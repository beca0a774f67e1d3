//! Derivation heuristics
//!
//! Pure functions that turn a tool's name, description and inputs into the
//! pieces the expansion engine needs: intent ids, example phrases, entities,
//! sample values and example outputs. Nothing here performs I/O or keeps
//! state; identical input always yields identical output.

use serde_json::{json, Map, Value};

use crate::models::{Entity, MockExample, Tool, ToolInput, ToolMock};

fn segments(tool_name: &str) -> Vec<&str> {
    tool_name.split('.').collect()
}

fn singularize(resource: &str) -> &str {
    if resource.ends_with('s') && !resource.ends_with("ss") {
        &resource[..resource.len() - 1]
    } else {
        resource
    }
}

/// Derive an intent id from a dotted tool name.
///
/// `clinic.appointments.create` becomes `create_appointment`,
/// `clinic.doctors.list` becomes `list_doctors` and
/// `clinic.doctors.availability` becomes `check_doctor_availability`.
/// Names with fewer than three segments yield their last segment.
pub fn derive_intent_id(tool_name: &str) -> String {
    let parts = segments(tool_name);
    if parts.len() < 3 {
        return parts.last().copied().unwrap_or_default().to_string();
    }

    let resource = parts[parts.len() - 2];
    let action = parts[parts.len() - 1];
    let singular = singularize(resource);

    match action {
        "list" => format!("list_{}", resource),
        "availability" => format!("check_{}_availability", singular),
        _ => format!("{}_{}", action, singular),
    }
}

/// Remote tool identifier on the backing connector (`fleet.vehicle.get` → `vehicle.get`)
pub fn derive_mcp_tool(tool_name: &str) -> String {
    let parts = segments(tool_name);
    if parts.len() >= 3 {
        parts[1..].join(".")
    } else {
        tool_name.to_string()
    }
}

/// Stable tool id (`clinic.appointments.create` → `tool-appointments-create`)
pub fn derive_tool_id(tool_name: &str) -> String {
    let parts = segments(tool_name);
    let rest = if parts.len() >= 3 { &parts[1..] } else { &parts[..] };
    format!("tool-{}", rest.join("-"))
}

/// Connector id serving a tool: the namespace segment, or the skill id for short names
pub fn derive_connection_id(tool_name: &str, skill_id: &str) -> String {
    let parts = segments(tool_name);
    if parts.len() >= 3 {
        format!("{}-mcp", parts[0])
    } else {
        format!("{}-mcp", skill_id)
    }
}

/// Three fixed example utterances for an intent
pub fn generate_examples(intent_id: &str) -> Vec<String> {
    let phrase = intent_id.replace('_', " ");
    vec![
        format!("I want to {}", phrase),
        format!("Can you help me {}?", phrase),
        format!("Please {}", phrase),
    ]
}

/// Entities for every required input.
///
/// Extraction from free text can fail, so entities are never marked required.
pub fn extract_entities(inputs: &[ToolInput]) -> Vec<Entity> {
    inputs
        .iter()
        .filter(|input| input.is_required())
        .map(|input| Entity {
            name: input.name.clone(),
            entity_type: Some(input.input_type.clone().unwrap_or_else(|| "string".to_string())),
            required: Some(false),
            extract_from: Some("message".to_string()),
            extra: Map::new(),
        })
        .collect()
}

/// Plausible sample value for an input, chosen by name and type keywords.
///
/// Rules are checked in a fixed order and the first match wins.
pub fn generate_sample_value(input: &ToolInput) -> Value {
    let name = input.name.to_lowercase();
    let ty = input.input_type.as_deref().unwrap_or("string").to_lowercase();
    let has = |keyword: &str| name.contains(keyword);

    if has("date") || ty == "date" {
        json!("2024-03-15")
    } else if has("time") || ty == "time" {
        json!("10:00")
    } else if has("email") {
        json!("user@example.com")
    } else if has("phone") {
        json!("+1-555-0100")
    } else if has("patient") && has("name") {
        json!("Jane Doe")
    } else if has("doctor") && has("name") {
        json!("Dr. Smith")
    } else if has("name") {
        json!("John Smith")
    } else if has("status") {
        json!("active")
    } else if has("category") || has("type") {
        json!("general")
    } else if names_identifier(&input.name) {
        json!("12345")
    } else if has("description") || has("notes") || has("reason") {
        json!("Sample description")
    } else if has("address") {
        json!("123 Main St")
    } else if has("url") || has("link") {
        json!("https://example.com")
    } else if has("query") || has("search") || has("keyword") {
        json!("search term")
    } else if ty == "number" || ty == "integer" {
        json!(1)
    } else if ty == "boolean" {
        json!(true)
    } else {
        json!("example")
    }
}

/// `id`, `patient_id`, `patient-id` or `patientId`; not `paid` or `valid`
fn names_identifier(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower == "id"
        || lower.ends_with("_id")
        || lower.ends_with("-id")
        || (name.ends_with("Id") && name.len() > 2)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Example output for a tool, chosen by keywords in its descriptions
pub fn derive_example_output(tool: &Tool) -> Value {
    let mut text = tool.description_or_empty().to_lowercase();
    if let Some(description) = tool.output.as_ref().and_then(|o| o.description.as_deref()) {
        text.push(' ');
        text.push_str(&description.to_lowercase());
    }

    if contains_any(&text, &["list", "search"]) {
        json!({"items": [], "total": 0, "page": 1, "page_size": 20})
    } else if contains_any(&text, &["cancel", "delete", "remove"]) {
        json!({"success": true, "message": "Operation completed successfully"})
    } else if contains_any(&text, &["create", "book", "add"]) {
        json!({"id": "new-001", "status": "created"})
    } else if contains_any(&text, &["update", "reschedule", "modify"]) {
        json!({"id": "existing-001", "status": "updated"})
    } else {
        json!({"success": true, "data": {}})
    }
}

/// Mock configuration with a single example built from sample values
pub fn build_mock(tool: &Tool) -> ToolMock {
    let input: Map<String, Value> = tool
        .inputs
        .iter()
        .map(|input| (input.name.clone(), generate_sample_value(input)))
        .collect();

    ToolMock {
        enabled: Some(true),
        mode: Some("examples".to_string()),
        examples: vec![MockExample {
            input: Some(input),
            output: Some(derive_example_output(tool)),
            extra: Map::new(),
        }],
        extra: Map::new(),
    }
}
