use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{ApiResponse, ErrorResponse};
use compute::validate;
use model::entities::schedule_stage::{StageCategory, StageStatus};
use model::entities::{progress_snapshot, project, schedule_stage};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{internal_error, not_found, validation_error, ApiError, AppState};

/// Request body for creating a new schedule stage
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateStageRequest {
    /// Parent project ID
    pub project_id: i32,
    /// Construction phase, e.g. "Paving" or "Drainage"
    pub category: String,
    /// Stage start date
    pub start_date: NaiveDate,
    /// Stage end date (must not precede the start date)
    pub end_date: NaiveDate,
    /// Contracted value for this stage
    pub estimated_value: Decimal,
    /// Completion percentage, 0-100 (default: 0)
    pub percent_complete: Option<i32>,
    /// Stage status, e.g. "Planned" (default) or "InProgress"
    pub status: Option<String>,
}

/// Request body for updating a schedule stage
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateStageRequest {
    /// Construction phase
    pub category: Option<String>,
    /// Stage start date
    pub start_date: Option<NaiveDate>,
    /// Stage end date
    pub end_date: Option<NaiveDate>,
    /// Contracted value for this stage
    pub estimated_value: Option<Decimal>,
    /// Completion percentage, 0-100; setting it appends a progress snapshot
    pub percent_complete: Option<i32>,
    /// Stage status
    pub status: Option<String>,
}

/// Schedule stage response model
#[derive(Debug, Serialize, ToSchema)]
pub struct StageResponse {
    pub id: i32,
    pub project_id: i32,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimated_value: Decimal,
    pub percent_complete: i32,
    pub status: String,
}

impl From<schedule_stage::Model> for StageResponse {
    fn from(model: schedule_stage::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            category: model.category.to_value(),
            start_date: model.start_date,
            end_date: model.end_date,
            estimated_value: model.estimated_value,
            percent_complete: model.percent_complete,
            status: model.status.to_value(),
        }
    }
}

/// Progress snapshot response model
#[derive(Debug, Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub id: i32,
    pub stage_id: i32,
    pub recorded_on: NaiveDate,
    pub percent: i32,
}

impl From<progress_snapshot::Model> for SnapshotResponse {
    fn from(model: progress_snapshot::Model) -> Self {
        Self {
            id: model.id,
            stage_id: model.stage_id,
            recorded_on: model.recorded_on,
            percent: model.percent,
        }
    }
}

fn parse_category(value: &str) -> Result<StageCategory, ApiError> {
    StageCategory::try_from_value(&value.to_string()).map_err(|_| {
        validation_error(
            format!("unknown stage category: {value}"),
            vec!["category".to_string()],
        )
    })
}

fn parse_status(value: &str) -> Result<StageStatus, ApiError> {
    StageStatus::try_from_value(&value.to_string()).map_err(|_| {
        validation_error(
            format!("unknown stage status: {value}"),
            vec!["status".to_string()],
        )
    })
}

fn check_percent(percent: i32) -> Result<(), ApiError> {
    validate::percent(percent).map_err(|e| {
        warn!("Rejecting stage percentage: {}", e);
        validation_error(e.to_string(), vec!["percent_complete".to_string()])
    })
}

fn check_window(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    validate::stage_window(start, end).map_err(|e| {
        warn!("Rejecting stage date window: {}", e);
        validation_error(
            e.to_string(),
            vec!["start_date".to_string(), "end_date".to_string()],
        )
    })
}

/// Create a new schedule stage and journal its initial percentage
#[utoipa::path(
    post,
    path = "/api/v1/stages",
    tag = "stages",
    request_body = CreateStageRequest,
    responses(
        (status = 201, description = "Stage created successfully", body = ApiResponse<StageResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_stage(
    State(state): State<AppState>,
    Json(request): Json<CreateStageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StageResponse>>), ApiError> {
    trace!("Entering create_stage function");

    let category = parse_category(&request.category)?;
    let status = match &request.status {
        Some(value) => parse_status(value)?,
        None => StageStatus::Planned,
    };
    let percent = request.percent_complete.unwrap_or(0);
    check_percent(percent)?;
    check_window(request.start_date, request.end_date)?;

    // The parent must exist; a dangling stage is a client error.
    match project::Entity::find_by_id(request.project_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Project with ID {} not found for new stage", request.project_id);
            return Err(not_found("Project"));
        }
        Err(db_error) => {
            error!("Failed to lookup project {}: {}", request.project_id, db_error);
            return Err(internal_error());
        }
    }

    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to open transaction: {}", db_error);
            return Err(internal_error());
        }
    };

    let new_stage = schedule_stage::ActiveModel {
        project_id: Set(request.project_id),
        category: Set(category),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        estimated_value: Set(request.estimated_value),
        percent_complete: Set(percent),
        status: Set(status),
        ..Default::default()
    };

    let stage_model = match new_stage.insert(&txn).await {
        Ok(stage_model) => stage_model,
        Err(db_error) => {
            error!("Failed to create stage: {}", db_error);
            return Err(internal_error());
        }
    };

    let snapshot = progress_snapshot::ActiveModel {
        stage_id: Set(stage_model.id),
        recorded_on: Set(chrono::Utc::now().date_naive()),
        percent: Set(percent),
        ..Default::default()
    };
    if let Err(db_error) = snapshot.insert(&txn).await {
        error!("Failed to journal stage progress: {}", db_error);
        return Err(internal_error());
    }

    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit stage creation: {}", db_error);
        return Err(internal_error());
    }

    info!(
        "Stage created successfully with ID: {} for project {}",
        stage_model.id, stage_model.project_id
    );
    let response = ApiResponse {
        data: StageResponse::from(stage_model),
        message: "Stage created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all stages of a project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/stages",
    tag = "stages",
    params(
        ("project_id" = i32, Path, description = "Project ID"),
    ),
    responses(
        (status = 200, description = "Stages retrieved successfully", body = ApiResponse<Vec<StageResponse>>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project_stages(
    Path(project_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StageResponse>>>, ApiError> {
    trace!("Entering get_project_stages for project_id: {}", project_id);

    match project::Entity::find_by_id(project_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(not_found("Project")),
        Err(db_error) => {
            error!("Failed to lookup project {}: {}", project_id, db_error);
            return Err(internal_error());
        }
    }

    match schedule_stage::Entity::find()
        .filter(schedule_stage::Column::ProjectId.eq(project_id))
        .order_by_asc(schedule_stage::Column::StartDate)
        .all(&state.db)
        .await
    {
        Ok(stages) => {
            debug!("Retrieved {} stages for project {}", stages.len(), project_id);
            let response = ApiResponse {
                data: stages.into_iter().map(StageResponse::from).collect(),
                message: "Stages retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve stages for project {}: {}", project_id, db_error);
            Err(internal_error())
        }
    }
}

/// Get a specific stage by ID
#[utoipa::path(
    get,
    path = "/api/v1/stages/{stage_id}",
    tag = "stages",
    params(
        ("stage_id" = i32, Path, description = "Stage ID"),
    ),
    responses(
        (status = 200, description = "Stage retrieved successfully", body = ApiResponse<StageResponse>),
        (status = 404, description = "Stage not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_stage(
    Path(stage_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StageResponse>>, ApiError> {
    match schedule_stage::Entity::find_by_id(stage_id).one(&state.db).await {
        Ok(Some(stage_model)) => {
            let response = ApiResponse {
                data: StageResponse::from(stage_model),
                message: "Stage retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => Err(not_found("Stage")),
        Err(db_error) => {
            error!("Failed to retrieve stage with ID {}: {}", stage_id, db_error);
            Err(internal_error())
        }
    }
}

/// Update a stage; a new percentage is journaled as a progress snapshot
#[utoipa::path(
    put,
    path = "/api/v1/stages/{stage_id}",
    tag = "stages",
    params(
        ("stage_id" = i32, Path, description = "Stage ID"),
    ),
    request_body = UpdateStageRequest,
    responses(
        (status = 200, description = "Stage updated successfully", body = ApiResponse<StageResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Stage not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_stage(
    Path(stage_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateStageRequest>,
) -> Result<Json<ApiResponse<StageResponse>>, ApiError> {
    trace!("Entering update_stage function for stage_id: {}", stage_id);

    let existing = match schedule_stage::Entity::find_by_id(stage_id).one(&state.db).await {
        Ok(Some(stage_model)) => stage_model,
        Ok(None) => {
            warn!("Stage with ID {} not found for update", stage_id);
            return Err(not_found("Stage"));
        }
        Err(db_error) => {
            error!("Failed to lookup stage with ID {}: {}", stage_id, db_error);
            return Err(internal_error());
        }
    };

    // Validate the window and percentage the row will end up with.
    let final_start = request.start_date.unwrap_or(existing.start_date);
    let final_end = request.end_date.unwrap_or(existing.end_date);
    check_window(final_start, final_end)?;
    if let Some(percent) = request.percent_complete {
        check_percent(percent)?;
    }

    let mut stage_active: schedule_stage::ActiveModel = existing.into();

    if let Some(category) = &request.category {
        stage_active.category = Set(parse_category(category)?);
    }
    if let Some(status) = &request.status {
        stage_active.status = Set(parse_status(status)?);
    }
    if let Some(start_date) = request.start_date {
        stage_active.start_date = Set(start_date);
    }
    if let Some(end_date) = request.end_date {
        stage_active.end_date = Set(end_date);
    }
    if let Some(estimated_value) = request.estimated_value {
        stage_active.estimated_value = Set(estimated_value);
    }
    if let Some(percent) = request.percent_complete {
        debug!("Updating stage {} percentage to {}", stage_id, percent);
        stage_active.percent_complete = Set(percent);
    }

    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to open transaction: {}", db_error);
            return Err(internal_error());
        }
    };

    let updated = match stage_active.update(&txn).await {
        Ok(updated) => updated,
        Err(db_error) => {
            error!("Failed to update stage with ID {}: {}", stage_id, db_error);
            return Err(internal_error());
        }
    };

    if let Some(percent) = request.percent_complete {
        let snapshot = progress_snapshot::ActiveModel {
            stage_id: Set(stage_id),
            recorded_on: Set(chrono::Utc::now().date_naive()),
            percent: Set(percent),
            ..Default::default()
        };
        if let Err(db_error) = snapshot.insert(&txn).await {
            error!("Failed to journal stage progress: {}", db_error);
            return Err(internal_error());
        }
    }

    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit stage update: {}", db_error);
        return Err(internal_error());
    }

    info!("Stage with ID {} updated successfully", stage_id);
    let response = ApiResponse {
        data: StageResponse::from(updated),
        message: "Stage updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a stage and, by cascade, its progress snapshots
#[utoipa::path(
    delete,
    path = "/api/v1/stages/{stage_id}",
    tag = "stages",
    params(
        ("stage_id" = i32, Path, description = "Stage ID"),
    ),
    responses(
        (status = 200, description = "Stage deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Stage not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_stage(
    Path(stage_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match schedule_stage::Entity::delete_by_id(stage_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Stage with ID {} deleted successfully", stage_id);
                let response = ApiResponse {
                    data: format!("Stage {} deleted", stage_id),
                    message: "Stage deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                Err(not_found("Stage"))
            }
        }
        Err(db_error) => {
            error!("Failed to delete stage with ID {}: {}", stage_id, db_error);
            Err(internal_error())
        }
    }
}

/// Get the progress history of a stage
#[utoipa::path(
    get,
    path = "/api/v1/stages/{stage_id}/snapshots",
    tag = "stages",
    params(
        ("stage_id" = i32, Path, description = "Stage ID"),
    ),
    responses(
        (status = 200, description = "Snapshots retrieved successfully", body = ApiResponse<Vec<SnapshotResponse>>),
        (status = 404, description = "Stage not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_stage_snapshots(
    Path(stage_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SnapshotResponse>>>, ApiError> {
    match schedule_stage::Entity::find_by_id(stage_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(not_found("Stage")),
        Err(db_error) => {
            error!("Failed to lookup stage with ID {}: {}", stage_id, db_error);
            return Err(internal_error());
        }
    }

    match progress_snapshot::Entity::find()
        .filter(progress_snapshot::Column::StageId.eq(stage_id))
        .order_by_asc(progress_snapshot::Column::RecordedOn)
        .all(&state.db)
        .await
    {
        Ok(snapshots) => {
            let response = ApiResponse {
                data: snapshots.into_iter().map(SnapshotResponse::from).collect(),
                message: "Snapshots retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve snapshots for stage {}: {}", stage_id, db_error);
            Err(internal_error())
        }
    }
}
