use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{ApiResponse, ErrorResponse};
use model::entities::{barter_entry, project};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{internal_error, not_found, ApiError, AppState};

/// Request body for creating a new barter entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateBarterRequest {
    /// Parent project ID
    pub project_id: i32,
    /// What was bartered
    pub description: Option<String>,
    /// Value credited toward the contract balance
    pub value: Decimal,
    /// Trade date
    pub traded_on: NaiveDate,
}

/// Request body for updating a barter entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateBarterRequest {
    pub project_id: Option<i32>,
    pub description: Option<String>,
    pub value: Option<Decimal>,
    pub traded_on: Option<NaiveDate>,
}

/// Barter entry response model
#[derive(Debug, Serialize, ToSchema)]
pub struct BarterResponse {
    pub id: i32,
    pub project_id: i32,
    pub description: String,
    pub value: Decimal,
    pub traded_on: NaiveDate,
}

impl From<barter_entry::Model> for BarterResponse {
    fn from(model: barter_entry::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            description: model.description,
            value: model.value,
            traded_on: model.traded_on,
        }
    }
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

/// Create a new barter entry
#[utoipa::path(
    post,
    path = "/api/v1/barters",
    tag = "barters",
    request_body = CreateBarterRequest,
    responses(
        (status = 201, description = "Barter entry created successfully", body = ApiResponse<BarterResponse>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_barter(
    State(state): State<AppState>,
    Json(request): Json<CreateBarterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BarterResponse>>), ApiError> {
    trace!("Entering create_barter function");

    check_project_exists(&state, request.project_id).await?;

    let new_barter = barter_entry::ActiveModel {
        project_id: Set(request.project_id),
        description: Set(request.description.clone().unwrap_or_default()),
        value: Set(request.value),
        traded_on: Set(request.traded_on),
        ..Default::default()
    };

    match new_barter.insert(&state.db).await {
        Ok(barter_model) => {
            info!(
                "Barter entry created successfully with ID: {} for project {}",
                barter_model.id, barter_model.project_id
            );
            let response = ApiResponse {
                data: BarterResponse::from(barter_model),
                message: "Barter entry created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create barter entry: {}", db_error);
            Err(internal_error())
        }
    }
}

/// Get all barter entries
#[utoipa::path(
    get,
    path = "/api/v1/barters",
    tag = "barters",
    responses(
        (status = 200, description = "Barter entries retrieved successfully", body = ApiResponse<Vec<BarterResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_barters(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BarterResponse>>>, ApiError> {
    match barter_entry::Entity::find()
        .order_by_desc(barter_entry::Column::TradedOn)
        .all(&state.db)
        .await
    {
        Ok(barters) => {
            debug!("Retrieved {} barter entries from database", barters.len());
            let response = ApiResponse {
                data: barters.into_iter().map(BarterResponse::from).collect(),
                message: "Barter entries retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve barter entries: {}", db_error);
            Err(internal_error())
        }
    }
}

/// Get all barter entries of a project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/barters",
    tag = "barters",
    params(
        ("project_id" = i32, Path, description = "Project ID"),
    ),
    responses(
        (status = 200, description = "Barter entries retrieved successfully", body = ApiResponse<Vec<BarterResponse>>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project_barters(
    Path(project_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BarterResponse>>>, ApiError> {
    check_project_exists(&state, project_id).await?;

    match barter_entry::Entity::find()
        .filter(barter_entry::Column::ProjectId.eq(project_id))
        .order_by_desc(barter_entry::Column::TradedOn)
        .all(&state.db)
        .await
    {
        Ok(barters) => {
            let response = ApiResponse {
                data: barters.into_iter().map(BarterResponse::from).collect(),
                message: "Barter entries retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve barter entries for project {}: {}", project_id, db_error);
            Err(internal_error())
        }
    }
}

/// Update a barter entry
#[utoipa::path(
    put,
    path = "/api/v1/barters/{barter_id}",
    tag = "barters",
    params(
        ("barter_id" = i32, Path, description = "Barter entry ID"),
    ),
    request_body = UpdateBarterRequest,
    responses(
        (status = 200, description = "Barter entry updated successfully", body = ApiResponse<BarterResponse>),
        (status = 404, description = "Barter entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_barter(
    Path(barter_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateBarterRequest>,
) -> Result<Json<ApiResponse<BarterResponse>>, ApiError> {
    trace!("Entering update_barter function for barter_id: {}", barter_id);

    let existing = match barter_entry::Entity::find_by_id(barter_id).one(&state.db).await {
        Ok(Some(barter_model)) => barter_model,
        Ok(None) => {
            warn!("Barter entry with ID {} not found for update", barter_id);
            return Err(not_found("Barter entry"));
        }
        Err(db_error) => {
            error!("Failed to lookup barter entry with ID {}: {}", barter_id, db_error);
            return Err(internal_error());
        }
    };

    if let Some(project_id) = request.project_id {
        check_project_exists(&state, project_id).await?;
    }

    let mut barter_active: barter_entry::ActiveModel = existing.into();

    if let Some(project_id) = request.project_id {
        barter_active.project_id = Set(project_id);
    }
    if let Some(description) = request.description {
        barter_active.description = Set(description);
    }
    if let Some(value) = request.value {
        barter_active.value = Set(value);
    }
    if let Some(traded_on) = request.traded_on {
        barter_active.traded_on = Set(traded_on);
    }

    match barter_active.update(&state.db).await {
        Ok(updated) => {
            info!("Barter entry with ID {} updated successfully", barter_id);
            let response = ApiResponse {
                data: BarterResponse::from(updated),
                message: "Barter entry updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update barter entry with ID {}: {}", barter_id, db_error);
            Err(internal_error())
        }
    }
}

/// Delete a barter entry
#[utoipa::path(
    delete,
    path = "/api/v1/barters/{barter_id}",
    tag = "barters",
    params(
        ("barter_id" = i32, Path, description = "Barter entry ID"),
    ),
    responses(
        (status = 200, description = "Barter entry deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Barter entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_barter(
    Path(barter_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match barter_entry::Entity::delete_by_id(barter_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Barter entry with ID {} deleted successfully", barter_id);
                let response = ApiResponse {
                    data: format!("Barter entry {} deleted", barter_id),
                    message: "Barter entry deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                Err(not_found("Barter entry"))
            }
        }
        Err(db_error) => {
            error!("Failed to delete barter entry with ID {}: {}", barter_id, db_error);
            Err(internal_error())
        }
    }
}
