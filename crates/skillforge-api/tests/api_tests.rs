//! HTTP API tests driven through the router with `oneshot`

use std::io::Write;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use skillforge_api::{ApiServer, AppConfig, AppState, ConfigManager};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(AppConfig::default()).unwrap();
    ApiServer::with_state(state).router()
}

async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn clinic_skill() -> Value {
    json!({
        "id": "clinic",
        "name": "Clinic",
        "description": "Helps patients book and manage clinic appointments",
        "tools": [{
            "name": "clinic.appointments.create",
            "description": "Create an appointment",
            "inputs": [{"name": "date", "type": "string", "required": true, "description": "Date"}],
            "output": {"type": "object", "description": "Appointment"}
        }]
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["service"], json!("skillforge-validator"));
}

// ============================================================================
// Skill and section validation
// ============================================================================

#[tokio::test]
async fn test_validate_skill_auto_fixes_in_one_pass() {
    let (status, body) = send("POST", "/validate/skill", Some(json!({"skill": clinic_skill()}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["auto_fixes"].as_array().unwrap().len(), 2);
    assert!(body["expanded_fields"]
        .as_array()
        .unwrap()
        .contains(&json!("intents")));
}

#[tokio::test]
async fn test_validate_skill_requires_skill() {
    let (status, body) = send("POST", "/validate/skill", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"]["message"].as_str().unwrap().contains("skill"));
}

#[tokio::test]
async fn test_validate_section() {
    let (status, body) = send(
        "POST",
        "/validate/section",
        Some(json!({"skill": {"problem": "short"}, "section": "problem"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["section"], json!("problem"));
    assert_eq!(body["valid"], json!(false));
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_validate_section_rejects_unknown_section() {
    let (status, body) = send(
        "POST",
        "/validate/section",
        Some(json!({"skill": {}, "section": "engine"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], json!("unknown_section"));
}

// ============================================================================
// Solution validation
// ============================================================================

#[tokio::test]
async fn test_validate_solution_reports_missing_skill_and_degraded_quality() {
    let (status, body) = send(
        "POST",
        "/validate/solution",
        Some(json!({
            "solution": {
                "id": "suite",
                "skills": ["clinic"],
                "grants": [{"key": "verified", "issued_by": ["nonexistent-skill"], "consumed_by": ["clinic"]}]
            },
            "skills": [clinic_skill()]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(false));
    assert!(body["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("nonexistent-skill"));
    assert_eq!(body["summary"]["skills"], json!(1));
    assert!(body["quality"]["error"].is_string());
    assert!(body["quality"]["note"].is_string());
}

#[tokio::test]
async fn test_validate_solution_requires_solution_and_skills() {
    let (status, _) = send("POST", "/validate/solution", Some(json!({"skills": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send("POST", "/validate/solution", Some(json!({"solution": {}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrongly_typed_body_is_a_bad_request() {
    let (status, body) = send(
        "POST",
        "/validate/solution",
        Some(json!({"solution": {}, "skills": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["type"], "bad_request");
    assert!(body["error"]["message"].is_string());

    let (status, body) = send(
        "POST",
        "/validate/section",
        Some(json!({"section": 5, "skill": clinic_skill()})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "bad_request");
}

// ============================================================================
// Cascading issues
// ============================================================================

#[tokio::test]
async fn test_cascade_issues_for_added_tool() {
    let previous = json!({"id": "clinic", "tools": []});
    let current = json!({"id": "clinic", "tools": [{"name": "clinic.billing.charge"}]});

    let (status, body) = send(
        "POST",
        "/cascade/issues",
        Some(json!({"previous": previous, "skill": current})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Tool \"clinic.billing.charge\" missing policy"));
    assert_eq!(body["raised"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_overrides_defaults() {
    let mut config = AppConfig::default();
    config.server.port = 9100;
    config.quality.timeout_secs = 3;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(toml::to_string(&config).unwrap().as_bytes())
        .unwrap();

    let loaded = ConfigManager::with_path(file.path().to_path_buf())
        .load()
        .unwrap();
    assert_eq!(loaded.server.port, 9100);
    assert_eq!(loaded.quality.timeout_secs, 3);
}
