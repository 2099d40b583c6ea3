use axum::http::StatusCode;
use axum::response::Json;
use common::{
    ApiResponse, AtRiskStage, CurvePoint, DailyProgressPoint, ErrorResponse, MonthlyAmount,
    ParetoRow, PortfolioKpis, ProgressVariance, ProjectSummaryRow, ProjectionPoint,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::webhook::WebhookNotifier;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Best-effort intake notification sink
    pub notifier: WebhookNotifier,
}

/// Query parameters for analytics endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScopeQuery {
    /// Restrict the computation to one project; omit for all projects
    pub project_id: Option<i32>,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Error type returned by handlers: a status code plus a body that
/// names the offending fields for validation failures.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn validation_error(message: impl Into<String>, fields: Vec<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::validation(message, fields)),
    )
}

pub fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("not_found", format!("{what} not found"))),
    )
}

pub fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(
            "internal",
            "The operation could not be completed",
        )),
    )
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::projects::create_project,
        crate::handlers::projects::get_projects,
        crate::handlers::projects::get_project,
        crate::handlers::projects::update_project,
        crate::handlers::projects::delete_project,
        crate::handlers::stages::create_stage,
        crate::handlers::stages::get_project_stages,
        crate::handlers::stages::get_stage,
        crate::handlers::stages::update_stage,
        crate::handlers::stages::delete_stage,
        crate::handlers::stages::get_stage_snapshots,
        crate::handlers::expenses::create_expense,
        crate::handlers::expenses::get_expenses,
        crate::handlers::expenses::get_project_expenses,
        crate::handlers::expenses::update_expense,
        crate::handlers::expenses::delete_expense,
        crate::handlers::barters::create_barter,
        crate::handlers::barters::get_barters,
        crate::handlers::barters::get_project_barters,
        crate::handlers::barters::update_barter,
        crate::handlers::barters::delete_barter,
        crate::handlers::intake::create_intake,
        crate::handlers::intake::get_intake_submissions,
        crate::handlers::intake::set_intake_rating,
        crate::handlers::analytics::get_kpis,
        crate::handlers::analytics::get_summary,
        crate::handlers::analytics::get_curve,
        crate::handlers::analytics::get_pareto,
        crate::handlers::analytics::get_risk,
        crate::handlers::analytics::get_progress,
        crate::handlers::analytics::get_projection,
        crate::handlers::analytics::get_project_budget,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ScopeQuery,
            ApiResponse<PortfolioKpis>,
            ApiResponse<Vec<ProjectSummaryRow>>,
            ApiResponse<Vec<CurvePoint>>,
            ApiResponse<Vec<ParetoRow>>,
            ApiResponse<Vec<DailyProgressPoint>>,
            ApiResponse<Vec<ProjectionPoint>>,
            ApiResponse<Vec<MonthlyAmount>>,
            MonthlyAmount,
            CurvePoint,
            AtRiskStage,
            ProgressVariance,
            ParetoRow,
            DailyProgressPoint,
            ProjectSummaryRow,
            PortfolioKpis,
            ProjectionPoint,
            crate::handlers::projects::CreateProjectRequest,
            crate::handlers::projects::UpdateProjectRequest,
            crate::handlers::projects::ProjectResponse,
            crate::handlers::stages::CreateStageRequest,
            crate::handlers::stages::UpdateStageRequest,
            crate::handlers::stages::StageResponse,
            crate::handlers::stages::SnapshotResponse,
            crate::handlers::expenses::CreateExpenseRequest,
            crate::handlers::expenses::UpdateExpenseRequest,
            crate::handlers::expenses::ExpenseResponse,
            crate::handlers::barters::CreateBarterRequest,
            crate::handlers::barters::UpdateBarterRequest,
            crate::handlers::barters::BarterResponse,
            crate::handlers::intake::CreateIntakeRequest,
            crate::handlers::intake::SetRatingRequest,
            crate::handlers::intake::IntakeResponse,
            crate::handlers::analytics::RiskReport,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "projects", description = "Project CRUD endpoints"),
        (name = "stages", description = "Schedule stage CRUD endpoints"),
        (name = "expenses", description = "Expense CRUD endpoints"),
        (name = "barters", description = "Barter entry CRUD endpoints"),
        (name = "intake", description = "Customer intake form endpoints"),
        (name = "analytics", description = "Aggregated dashboard endpoints"),
    ),
    info(
        title = "EngManager API",
        description = "Construction and real-estate management API - projects, schedules, finances and intake",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
