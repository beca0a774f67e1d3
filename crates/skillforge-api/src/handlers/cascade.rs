//! Server-side evaluation of cascading issues for one revision

use axum::{extract::State, Json};
use skillforge_cascade::CascadeEngine;
use skillforge_skills::SkillDocument;

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    models::{CascadeIssuesRequest, CascadeIssuesResponse},
    state::AppState,
};

/// Hydrate issues from the previous revision and apply the current one
#[utoipa::path(
    post,
    path = "/cascade/issues",
    request_body = CascadeIssuesRequest,
    responses(
        (status = 200, description = "Issue set after the revision", body = CascadeIssuesResponse),
        (status = 400, description = "Missing skill or malformed stored issues")
    )
)]
pub async fn evaluate_issues(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CascadeIssuesRequest>,
) -> ApiResult<Json<CascadeIssuesResponse>> {
    let current = SkillDocument::from_value(request.skill.ok_or_else(|| ApiError::missing("skill"))?)?;
    let previous = match request.previous {
        Some(previous) => SkillDocument::from_value(previous)?,
        None => current.clone(),
    };

    let mut engine = CascadeEngine::new().with_config(&state.config.cascade);
    engine.hydrate(&previous)?;
    let outcome = engine.on_revision(&current);

    Ok(Json(CascadeIssuesResponse {
        ok: true,
        issues: engine.issues().to_vec(),
        raised: outcome.raised,
        pruned: outcome.pruned,
    }))
}
