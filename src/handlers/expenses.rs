use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{ApiResponse, ErrorResponse};
use model::entities::expense::{ExpenseCategory, ExpenseStatus};
use model::entities::{expense, project};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{internal_error, not_found, validation_error, ApiError, AppState};

/// Request body for creating a new expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateExpenseRequest {
    /// Parent project ID
    pub project_id: i32,
    /// Cost category, e.g. "Diesel" or "Labor"
    pub category: String,
    /// Free-form description
    pub description: Option<String>,
    /// Expense value
    pub value: Decimal,
    /// Payment (or due) date
    pub paid_on: NaiveDate,
    /// "Paid" (default) or "Pending"
    pub status: Option<String>,
}

/// Request body for updating an expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateExpenseRequest {
    pub project_id: Option<i32>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub value: Option<Decimal>,
    pub paid_on: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Expense response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: i32,
    pub project_id: i32,
    pub category: String,
    pub description: String,
    pub value: Decimal,
    pub paid_on: NaiveDate,
    pub status: String,
}

impl From<expense::Model> for ExpenseResponse {
    fn from(model: expense::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            category: model.category.to_value(),
            description: model.description,
            value: model.value,
            paid_on: model.paid_on,
            status: model.status.to_value(),
        }
    }
}

fn parse_category(value: &str) -> Result<ExpenseCategory, ApiError> {
    ExpenseCategory::try_from_value(&value.to_string()).map_err(|_| {
        validation_error(
            format!("unknown expense category: {value}"),
            vec!["category".to_string()],
        )
    })
}

fn parse_status(value: &str) -> Result<ExpenseStatus, ApiError> {
    ExpenseStatus::try_from_value(&value.to_string()).map_err(|_| {
        validation_error(
            format!("unknown expense status: {value}"),
            vec!["status".to_string()],
        )
    })
}

async fn check_project_exists(state: &AppState, project_id: i32) -> Result<(), ApiError> {
    match project::Entity::find_by_id(project_id).one(&state.db).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => {
            warn!("Project with ID {} not found", project_id);
            Err(not_found("Project"))
        }
        Err(db_error) => {
            error!("Failed to lookup project {}: {}", project_id, db_error);
            Err(internal_error())
        }
    }
}

/// Create a new expense
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    tag = "expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created successfully", body = ApiResponse<ExpenseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExpenseResponse>>), ApiError> {
    trace!("Entering create_expense function");

    let category = parse_category(&request.category)?;
    let status = match &request.status {
        Some(value) => parse_status(value)?,
        None => ExpenseStatus::Paid,
    };
    check_project_exists(&state, request.project_id).await?;

    let new_expense = expense::ActiveModel {
        project_id: Set(request.project_id),
        category: Set(category),
        description: Set(request.description.clone().unwrap_or_default()),
        value: Set(request.value),
        paid_on: Set(request.paid_on),
        status: Set(status),
        ..Default::default()
    };

    match new_expense.insert(&state.db).await {
        Ok(expense_model) => {
            info!(
                "Expense created successfully with ID: {} for project {}",
                expense_model.id, expense_model.project_id
            );
            let response = ApiResponse {
                data: ExpenseResponse::from(expense_model),
                message: "Expense created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create expense: {}", db_error);
            Err(internal_error())
        }
    }
}

/// Get all expenses
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    tag = "expenses",
    responses(
        (status = 200, description = "Expenses retrieved successfully", body = ApiResponse<Vec<ExpenseResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_expenses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExpenseResponse>>>, ApiError> {
    match expense::Entity::find()
        .order_by_desc(expense::Column::PaidOn)
        .all(&state.db)
        .await
    {
        Ok(expenses) => {
            debug!("Retrieved {} expenses from database", expenses.len());
            let response = ApiResponse {
                data: expenses.into_iter().map(ExpenseResponse::from).collect(),
                message: "Expenses retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve expenses: {}", db_error);
            Err(internal_error())
        }
    }
}

/// Get all expenses of a project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/expenses",
    tag = "expenses",
    params(
        ("project_id" = i32, Path, description = "Project ID"),
    ),
    responses(
        (status = 200, description = "Expenses retrieved successfully", body = ApiResponse<Vec<ExpenseResponse>>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project_expenses(
    Path(project_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExpenseResponse>>>, ApiError> {
    check_project_exists(&state, project_id).await?;

    match expense::Entity::find()
        .filter(expense::Column::ProjectId.eq(project_id))
        .order_by_desc(expense::Column::PaidOn)
        .all(&state.db)
        .await
    {
        Ok(expenses) => {
            let response = ApiResponse {
                data: expenses.into_iter().map(ExpenseResponse::from).collect(),
                message: "Expenses retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve expenses for project {}: {}", project_id, db_error);
            Err(internal_error())
        }
    }
}

/// Update an expense
#[utoipa::path(
    put,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated successfully", body = ApiResponse<ExpenseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<ApiResponse<ExpenseResponse>>, ApiError> {
    trace!("Entering update_expense function for expense_id: {}", expense_id);

    let existing = match expense::Entity::find_by_id(expense_id).one(&state.db).await {
        Ok(Some(expense_model)) => expense_model,
        Ok(None) => {
            warn!("Expense with ID {} not found for update", expense_id);
            return Err(not_found("Expense"));
        }
        Err(db_error) => {
            error!("Failed to lookup expense with ID {}: {}", expense_id, db_error);
            return Err(internal_error());
        }
    };

    if let Some(project_id) = request.project_id {
        check_project_exists(&state, project_id).await?;
    }

    let mut expense_active: expense::ActiveModel = existing.into();

    if let Some(project_id) = request.project_id {
        expense_active.project_id = Set(project_id);
    }
    if let Some(category) = &request.category {
        expense_active.category = Set(parse_category(category)?);
    }
    if let Some(description) = request.description {
        expense_active.description = Set(description);
    }
    if let Some(value) = request.value {
        expense_active.value = Set(value);
    }
    if let Some(paid_on) = request.paid_on {
        expense_active.paid_on = Set(paid_on);
    }
    if let Some(status) = &request.status {
        expense_active.status = Set(parse_status(status)?);
    }

    match expense_active.update(&state.db).await {
        Ok(updated) => {
            info!("Expense with ID {} updated successfully", expense_id);
            let response = ApiResponse {
                data: ExpenseResponse::from(updated),
                message: "Expense updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update expense with ID {}: {}", expense_id, db_error);
            Err(internal_error())
        }
    }
}

/// Delete an expense
#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    responses(
        (status = 200, description = "Expense deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match expense::Entity::delete_by_id(expense_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Expense with ID {} deleted successfully", expense_id);
                let response = ApiResponse {
                    data: format!("Expense {} deleted", expense_id),
                    message: "Expense deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                Err(not_found("Expense"))
            }
        }
        Err(db_error) => {
            error!("Failed to delete expense with ID {}: {}", expense_id, db_error);
            Err(internal_error())
        }
    }
}
