//! Skill, section and solution validation endpoints

use axum::{extract::State, Json};
use skillforge_skills::SkillDocument;
use skillforge_validation::{ConnectorBindings, Section, SectionValidator, SkillPipeline, Solution};

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    models::{
        ValidateSectionRequest, ValidateSectionResponse, ValidateSkillRequest,
        ValidateSkillResponse, ValidateSolutionRequest, ValidateSolutionResponse,
    },
    state::AppState,
};

/// Expand, validate, auto-fix once and re-validate a skill
#[utoipa::path(
    post,
    path = "/validate/skill",
    request_body = ValidateSkillRequest,
    responses(
        (status = 200, description = "Final validation state", body = ValidateSkillResponse),
        (status = 400, description = "Missing or malformed skill")
    )
)]
pub async fn validate_skill(
    ApiJson(request): ApiJson<ValidateSkillRequest>,
) -> ApiResult<Json<ValidateSkillResponse>> {
    let skill = SkillDocument::from_value(request.skill.ok_or_else(|| ApiError::missing("skill"))?)?;
    let outcome = SkillPipeline::run(&skill);
    Ok(Json(outcome.into()))
}

/// Lightweight check of one section
#[utoipa::path(
    post,
    path = "/validate/section",
    request_body = ValidateSectionRequest,
    responses(
        (status = 200, description = "Section check result", body = ValidateSectionResponse),
        (status = 400, description = "Unknown section or missing skill")
    )
)]
pub async fn validate_section(
    ApiJson(request): ApiJson<ValidateSectionRequest>,
) -> ApiResult<Json<ValidateSectionResponse>> {
    let section: Section = request
        .section
        .as_deref()
        .ok_or_else(|| ApiError::missing("section"))?
        .parse()?;
    let skill = SkillDocument::from_value(request.skill.ok_or_else(|| ApiError::missing("skill"))?)?;

    let report = SectionValidator::validate(&skill, section);
    Ok(Json(ValidateSectionResponse {
        ok: true,
        section: report.section.to_string(),
        valid: report.valid,
        errors: report.errors,
        message: report.message,
    }))
}

/// Cross-skill referential checks plus best-effort quality scoring
#[utoipa::path(
    post,
    path = "/validate/solution",
    request_body = ValidateSolutionRequest,
    responses(
        (status = 200, description = "Solution validation result", body = ValidateSolutionResponse),
        (status = 400, description = "Missing solution or skills")
    )
)]
pub async fn validate_solution(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ValidateSolutionRequest>,
) -> ApiResult<Json<ValidateSolutionResponse>> {
    let solution = request.solution.ok_or_else(|| ApiError::missing("solution"))?;
    let skills = request.skills.ok_or_else(|| ApiError::missing("skills"))?;

    let solution: Solution = serde_json::from_value(solution)
        .map_err(|e| ApiError::BadRequest(format!("Invalid solution: {}", e)))?;
    let skills = skills
        .into_iter()
        .map(SkillDocument::from_value)
        .collect::<Result<Vec<_>, _>>()?;
    let bindings = ConnectorBindings {
        connectors: request.connectors,
        mcp_store: request.mcp_store,
    };

    let report = state
        .solution_validator
        .validate(&solution, &skills, &bindings)
        .await;
    Ok(Json(report.into()))
}
