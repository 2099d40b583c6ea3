use crate::handlers::{
    analytics::{
        get_curve, get_kpis, get_pareto, get_progress, get_project_budget, get_projection,
        get_risk, get_summary,
    },
    barters::{create_barter, delete_barter, get_barters, get_project_barters, update_barter},
    expenses::{
        create_expense, delete_expense, get_expenses, get_project_expenses, update_expense,
    },
    health::health_check,
    intake::{create_intake, get_intake_submissions, set_intake_rating},
    projects::{create_project, delete_project, get_project, get_projects, update_project},
    stages::{
        create_stage, delete_stage, get_project_stages, get_stage, get_stage_snapshots,
        update_stage,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Project CRUD routes
        .route("/api/v1/projects", post(create_project))
        .route("/api/v1/projects", get(get_projects))
        .route("/api/v1/projects/:project_id", get(get_project))
        .route("/api/v1/projects/:project_id", put(update_project))
        .route("/api/v1/projects/:project_id", delete(delete_project))
        // Schedule stage CRUD routes
        .route("/api/v1/stages", post(create_stage))
        .route("/api/v1/stages/:stage_id", get(get_stage))
        .route("/api/v1/stages/:stage_id", put(update_stage))
        .route("/api/v1/stages/:stage_id", delete(delete_stage))
        .route("/api/v1/stages/:stage_id/snapshots", get(get_stage_snapshots))
        .route("/api/v1/projects/:project_id/stages", get(get_project_stages))
        // Expense CRUD routes
        .route("/api/v1/expenses", post(create_expense))
        .route("/api/v1/expenses", get(get_expenses))
        .route("/api/v1/expenses/:expense_id", put(update_expense))
        .route("/api/v1/expenses/:expense_id", delete(delete_expense))
        .route("/api/v1/projects/:project_id/expenses", get(get_project_expenses))
        // Barter entry CRUD routes
        .route("/api/v1/barters", post(create_barter))
        .route("/api/v1/barters", get(get_barters))
        .route("/api/v1/barters/:barter_id", put(update_barter))
        .route("/api/v1/barters/:barter_id", delete(delete_barter))
        .route("/api/v1/projects/:project_id/barters", get(get_project_barters))
        // Intake form routes
        .route("/api/v1/intake", post(create_intake))
        .route("/api/v1/intake", get(get_intake_submissions))
        .route("/api/v1/intake/:submission_id/rating", put(set_intake_rating))
        // Analytics routes
        .route("/api/v1/analytics/kpis", get(get_kpis))
        .route("/api/v1/analytics/summary", get(get_summary))
        .route("/api/v1/analytics/curve", get(get_curve))
        .route("/api/v1/analytics/pareto", get(get_pareto))
        .route("/api/v1/analytics/risk", get(get_risk))
        .route("/api/v1/analytics/progress", get(get_progress))
        .route("/api/v1/analytics/projection", get(get_projection))
        .route("/api/v1/projects/:project_id/budget", get(get_project_budget))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
