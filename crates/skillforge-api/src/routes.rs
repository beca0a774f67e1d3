//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers::{cascade, health, validation},
    state::AppState,
};

/// API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Validation pipeline
        .route("/validate/skill", post(validation::validate_skill))
        .route("/validate/section", post(validation::validate_section))
        .route("/validate/solution", post(validation::validate_solution))
        // Cascading issues
        .route("/cascade/issues", post(cascade::evaluate_issues))
        // CORS
        .layer(CorsLayer::permissive())
}

/// Swagger UI routes
pub fn swagger_routes() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Combined routes
pub fn all_routes() -> Router<AppState> {
    api_routes().merge(swagger_routes())
}

/// OpenAPI document
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        validation::validate_skill,
        validation::validate_section,
        validation::validate_solution,
        cascade::evaluate_issues,
    ),
    components(schemas(
        crate::models::HealthResponse,
        crate::models::ValidateSkillRequest,
        crate::models::ValidateSkillResponse,
        crate::models::ValidateSectionRequest,
        crate::models::ValidateSectionResponse,
        crate::models::ValidateSolutionRequest,
        crate::models::ValidateSolutionResponse,
        crate::models::CascadeIssuesRequest,
        crate::models::CascadeIssuesResponse,
    )),
    info(
        title = "SkillForge API",
        version = "1.0.0",
        description = "Skill expansion, structural validation and cascading issue evaluation"
    )
)]
pub struct ApiDoc;
