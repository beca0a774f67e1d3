//! API request and response models
//!
//! Documents travel as raw JSON and are decoded in the handlers so a missing
//! field can be reported as a 400 with a precise message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use skillforge_cascade::Issue;
use skillforge_validation::{
    AutoFix, QualityOutcome, SkillValidation, SolutionReport, SolutionSummary, ValidationError,
};
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    /// Service name
    pub service: String,
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
}

/// Body of `POST /validate/skill`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateSkillRequest {
    /// Skill document
    #[schema(value_type = Option<Object>)]
    pub skill: Option<Value>,
}

/// Final state after expand → validate → auto-fix → re-validate
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidateSkillResponse {
    pub ok: bool,
    pub valid: bool,
    #[schema(value_type = Vec<Object>)]
    pub errors: Vec<ValidationError>,
    #[schema(value_type = Vec<Object>)]
    pub warnings: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub auto_fixes: Option<Vec<AutoFix>>,
}

impl From<SkillValidation> for ValidateSkillResponse {
    fn from(outcome: SkillValidation) -> Self {
        Self {
            ok: true,
            valid: outcome.valid,
            errors: outcome.errors,
            warnings: outcome.warnings,
            expanded_fields: outcome.expanded_fields,
            auto_fixes: outcome.auto_fixes,
        }
    }
}

/// Body of `POST /validate/section`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateSectionRequest {
    /// Partial skill document
    #[schema(value_type = Option<Object>)]
    pub skill: Option<Value>,
    /// One of problem, tools, guardrails, intents, role
    pub section: Option<String>,
}

/// Section check result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateSectionResponse {
    pub ok: bool,
    pub section: String,
    pub valid: bool,
    pub errors: Vec<String>,
    pub message: String,
}

/// Body of `POST /validate/solution`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateSolutionRequest {
    #[schema(value_type = Option<Object>)]
    pub solution: Option<Value>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub skills: Option<Vec<Value>>,
    /// Configured connectors
    #[schema(value_type = Option<Vec<Object>>)]
    pub connectors: Option<Vec<Value>>,
    /// Available MCP servers
    #[schema(value_type = Option<Object>)]
    pub mcp_store: Option<Value>,
}

/// Solution validation result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidateSolutionResponse {
    pub ok: bool,
    pub valid: bool,
    #[schema(value_type = Vec<Object>)]
    pub errors: Vec<ValidationError>,
    #[schema(value_type = Vec<Object>)]
    pub warnings: Vec<ValidationError>,
    #[schema(value_type = Object)]
    pub summary: SolutionSummary,
    /// Quality report, or `{error, note}` when scoring failed
    #[schema(value_type = Object)]
    pub quality: QualityOutcome,
}

impl From<SolutionReport> for ValidateSolutionResponse {
    fn from(report: SolutionReport) -> Self {
        Self {
            ok: true,
            valid: report.valid,
            errors: report.errors,
            warnings: report.warnings,
            summary: report.summary,
            quality: report.quality,
        }
    }
}

/// Body of `POST /cascade/issues`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CascadeIssuesRequest {
    /// Previous revision; its `cascading_issues` seed the issue set
    #[schema(value_type = Option<Object>)]
    pub previous: Option<Value>,
    /// Current revision
    #[schema(value_type = Option<Object>)]
    pub skill: Option<Value>,
}

/// Issue set after evaluating the current revision
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CascadeIssuesResponse {
    pub ok: bool,
    #[schema(value_type = Vec<Object>)]
    pub issues: Vec<Issue>,
    /// Ids raised by this revision
    pub raised: Vec<String>,
    /// Issues pruned by the relevance sweep
    pub pruned: usize,
}
