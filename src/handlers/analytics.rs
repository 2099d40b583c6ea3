use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use common::{
    ApiResponse, AtRiskStage, CurvePoint, DailyProgressPoint, ErrorResponse, MonthlyAmount,
    ParetoRow, PortfolioKpis, ProjectSummaryRow, ProjectionPoint,
};
use model::entities::{barter_entry, expense, progress_snapshot, project, schedule_stage};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::schemas::{internal_error, not_found, ApiError, AppState, ScopeQuery};

/// At-risk stage listing plus the aggregate exposure
#[derive(Debug, Serialize, ToSchema)]
pub struct RiskReport {
    pub stages: Vec<AtRiskStage>,
    pub total_exposure: Decimal,
}

fn db_error(context: &str, e: DbErr) -> ApiError {
    error!("Failed to load {}: {}", context, e);
    internal_error()
}

async fn load_projects(state: &AppState, project_id: Option<i32>) -> Result<Vec<project::Model>, ApiError> {
    let mut query = project::Entity::find();
    if let Some(id) = project_id {
        query = query.filter(project::Column::Id.eq(id));
    }
    query
        .all(&state.db)
        .await
        .map_err(|e| db_error("projects", e))
}

async fn load_stages(
    state: &AppState,
    project_id: Option<i32>,
) -> Result<Vec<schedule_stage::Model>, ApiError> {
    let mut query = schedule_stage::Entity::find();
    if let Some(id) = project_id {
        query = query.filter(schedule_stage::Column::ProjectId.eq(id));
    }
    query
        .all(&state.db)
        .await
        .map_err(|e| db_error("schedule stages", e))
}

async fn load_expenses(
    state: &AppState,
    project_id: Option<i32>,
) -> Result<Vec<expense::Model>, ApiError> {
    let mut query = expense::Entity::find();
    if let Some(id) = project_id {
        query = query.filter(expense::Column::ProjectId.eq(id));
    }
    query
        .all(&state.db)
        .await
        .map_err(|e| db_error("expenses", e))
}

async fn load_barters(
    state: &AppState,
    project_id: Option<i32>,
) -> Result<Vec<barter_entry::Model>, ApiError> {
    let mut query = barter_entry::Entity::find();
    if let Some(id) = project_id {
        query = query.filter(barter_entry::Column::ProjectId.eq(id));
    }
    query
        .all(&state.db)
        .await
        .map_err(|e| db_error("barter entries", e))
}

async fn load_snapshots(state: &AppState) -> Result<Vec<progress_snapshot::Model>, ApiError> {
    progress_snapshot::Entity::find()
        .all(&state.db)
        .await
        .map_err(|e| db_error("progress snapshots", e))
}

/// Portfolio headline numbers, optionally scoped to one project
#[utoipa::path(
    get,
    path = "/api/v1/analytics/kpis",
    tag = "analytics",
    params(
        ("project_id" = Option<i32>, Query, description = "Restrict to one project"),
    ),
    responses(
        (status = 200, description = "KPIs computed successfully", body = ApiResponse<PortfolioKpis>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_kpis(
    Query(scope): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PortfolioKpis>>, ApiError> {
    let stages = load_stages(&state, scope.project_id).await?;
    let expenses = load_expenses(&state, scope.project_id).await?;
    let barters = load_barters(&state, scope.project_id).await?;

    let today = chrono::Utc::now().date_naive();
    let kpis = compute::summary::portfolio_kpis(&stages, &expenses, &barters, today);

    Ok(Json(ApiResponse {
        data: kpis,
        message: "KPIs computed successfully".to_string(),
        success: true,
    }))
}

/// Per-project financial summary table
#[utoipa::path(
    get,
    path = "/api/v1/analytics/summary",
    tag = "analytics",
    params(
        ("project_id" = Option<i32>, Query, description = "Restrict to one project"),
    ),
    responses(
        (status = 200, description = "Summary computed successfully", body = ApiResponse<Vec<ProjectSummaryRow>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_summary(
    Query(scope): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProjectSummaryRow>>>, ApiError> {
    let projects = load_projects(&state, scope.project_id).await?;
    let stages = load_stages(&state, scope.project_id).await?;
    let expenses = load_expenses(&state, scope.project_id).await?;
    let barters = load_barters(&state, scope.project_id).await?;

    let rows = compute::summary::project_summaries(&projects, &stages, &expenses, &barters);

    Ok(Json(ApiResponse {
        data: rows,
        message: "Summary computed successfully".to_string(),
        success: true,
    }))
}

/// Curve-S rows: monthly and cumulative budget vs actual spend
#[utoipa::path(
    get,
    path = "/api/v1/analytics/curve",
    tag = "analytics",
    params(
        ("project_id" = Option<i32>, Query, description = "Restrict to one project"),
    ),
    responses(
        (status = 200, description = "Curve computed successfully", body = ApiResponse<Vec<CurvePoint>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_curve(
    Query(scope): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CurvePoint>>>, ApiError> {
    let stages = load_stages(&state, scope.project_id).await?;
    let expenses = load_expenses(&state, scope.project_id).await?;
    let barters = load_barters(&state, scope.project_id).await?;

    let budget = compute::budget::project_budget(&stages);
    let actual = compute::curve::actual_spend_series(&expenses, &barters);
    let curve = compute::curve::build_curve(&budget, &actual);

    Ok(Json(ApiResponse {
        data: curve,
        message: "Curve computed successfully".to_string(),
        success: true,
    }))
}

/// Pareto/ABC breakdown of paid costs (top five plus "Other")
#[utoipa::path(
    get,
    path = "/api/v1/analytics/pareto",
    tag = "analytics",
    params(
        ("project_id" = Option<i32>, Query, description = "Restrict to one project"),
    ),
    responses(
        (status = 200, description = "Pareto computed successfully", body = ApiResponse<Vec<ParetoRow>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_pareto(
    Query(scope): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ParetoRow>>>, ApiError> {
    let expenses = load_expenses(&state, scope.project_id).await?;
    let barters = load_barters(&state, scope.project_id).await?;

    let totals = compute::pareto::paid_expense_totals(&expenses, &barters);
    let rows = compute::pareto::classify(totals);

    Ok(Json(ApiResponse {
        data: rows,
        message: "Pareto computed successfully".to_string(),
        success: true,
    }))
}

/// Stages past their deadline with the value still exposed
#[utoipa::path(
    get,
    path = "/api/v1/analytics/risk",
    tag = "analytics",
    params(
        ("project_id" = Option<i32>, Query, description = "Restrict to one project"),
    ),
    responses(
        (status = 200, description = "Risk report computed successfully", body = ApiResponse<RiskReport>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_risk(
    Query(scope): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RiskReport>>, ApiError> {
    let projects = load_projects(&state, scope.project_id).await?;
    let stages = load_stages(&state, scope.project_id).await?;

    let today = chrono::Utc::now().date_naive();
    let at_risk = compute::risk::at_risk_stages(&stages, &projects, today);
    let total_exposure = compute::risk::risk_exposure(&stages, today);

    Ok(Json(ApiResponse {
        data: RiskReport {
            stages: at_risk,
            total_exposure,
        },
        message: "Risk report computed successfully".to_string(),
        success: true,
    }))
}

/// Daily mean physical progress per project, from the snapshot journal
#[utoipa::path(
    get,
    path = "/api/v1/analytics/progress",
    tag = "analytics",
    params(
        ("project_id" = Option<i32>, Query, description = "Restrict to one project"),
    ),
    responses(
        (status = 200, description = "Progress series computed successfully", body = ApiResponse<Vec<DailyProgressPoint>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_progress(
    Query(scope): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DailyProgressPoint>>>, ApiError> {
    let projects = load_projects(&state, scope.project_id).await?;
    let stages = load_stages(&state, scope.project_id).await?;
    // Snapshots are joined through the scoped stages, so out-of-scope
    // rows fall away inside the reducer.
    let snapshots = load_snapshots(&state).await?;

    let points = compute::progress::daily_progress(&snapshots, &stages, &projects);

    Ok(Json(ApiResponse {
        data: points,
        message: "Progress series computed successfully".to_string(),
        success: true,
    }))
}

/// Projected future monthly outflow per project
#[utoipa::path(
    get,
    path = "/api/v1/analytics/projection",
    tag = "analytics",
    params(
        ("project_id" = Option<i32>, Query, description = "Restrict to one project"),
    ),
    responses(
        (status = 200, description = "Projection computed successfully", body = ApiResponse<Vec<ProjectionPoint>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_projection(
    Query(scope): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProjectionPoint>>>, ApiError> {
    let projects = load_projects(&state, scope.project_id).await?;
    let stages = load_stages(&state, scope.project_id).await?;

    let today = chrono::Utc::now().date_naive();
    let points = compute::projection::future_outflow(&stages, &projects, today);

    Ok(Json(ApiResponse {
        data: points,
        message: "Projection computed successfully".to_string(),
        success: true,
    }))
}

/// Pro-rata monthly budget for one project's stages
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/budget",
    tag = "analytics",
    params(
        ("project_id" = i32, Path, description = "Project ID"),
    ),
    responses(
        (status = 200, description = "Budget computed successfully", body = ApiResponse<Vec<MonthlyAmount>>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project_budget(
    Path(project_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthlyAmount>>>, ApiError> {
    match project::Entity::find_by_id(project_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(not_found("Project")),
        Err(e) => return Err(db_error("project", e)),
    }

    let stages = load_stages(&state, Some(project_id)).await?;
    let budget = compute::budget::project_budget(&stages);

    Ok(Json(ApiResponse {
        data: budget,
        message: "Budget computed successfully".to_string(),
        success: true,
    }))
}
