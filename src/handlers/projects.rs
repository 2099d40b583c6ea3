use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::{ApiResponse, ErrorResponse};
use model::entities::project;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{internal_error, not_found, validation_error, ApiError, AppState};

/// Request body for creating a new project
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateProjectRequest {
    /// Project name
    pub name: String,
    /// Executing company (defaults to "Own")
    pub company: Option<String>,
}

/// Request body for updating a project
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateProjectRequest {
    /// Project name
    pub name: Option<String>,
    /// Executing company
    pub company: Option<String>,
}

/// Project response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    pub company: String,
}

impl From<project::Model> for ProjectResponse {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            company: model.company,
        }
    }
}

/// Create a new project
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = ApiResponse<ProjectResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectResponse>>), ApiError> {
    trace!("Entering create_project function");

    if request.name.trim().is_empty() {
        warn!("Rejecting project creation with empty name");
        return Err(validation_error(
            "name must not be empty",
            vec!["name".to_string()],
        ));
    }

    let new_project = project::ActiveModel {
        name: Set(request.name.clone()),
        company: Set(request.company.clone().unwrap_or_else(|| "Own".to_string())),
        ..Default::default()
    };

    match new_project.insert(&state.db).await {
        Ok(project_model) => {
            info!(
                "Project created successfully with ID: {}, name: {}",
                project_model.id, project_model.name
            );
            let response = ApiResponse {
                data: ProjectResponse::from(project_model),
                message: "Project created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create project '{}': {}", request.name, db_error);
            Err(internal_error())
        }
    }
}

/// Get all projects
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Projects retrieved successfully", body = ApiResponse<Vec<ProjectResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_projects(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProjectResponse>>>, ApiError> {
    trace!("Entering get_projects function");

    match project::Entity::find().all(&state.db).await {
        Ok(projects) => {
            debug!("Retrieved {} projects from database", projects.len());
            let response = ApiResponse {
                data: projects.into_iter().map(ProjectResponse::from).collect(),
                message: "Projects retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve projects from database: {}", db_error);
            Err(internal_error())
        }
    }
}

/// Get a specific project by ID
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}",
    tag = "projects",
    params(
        ("project_id" = i32, Path, description = "Project ID"),
    ),
    responses(
        (status = 200, description = "Project retrieved successfully", body = ApiResponse<ProjectResponse>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project(
    Path(project_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    trace!("Entering get_project function for project_id: {}", project_id);

    match project::Entity::find_by_id(project_id).one(&state.db).await {
        Ok(Some(project_model)) => {
            let response = ApiResponse {
                data: ProjectResponse::from(project_model),
                message: "Project retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Project with ID {} not found", project_id);
            Err(not_found("Project"))
        }
        Err(db_error) => {
            error!("Failed to retrieve project with ID {}: {}", project_id, db_error);
            Err(internal_error())
        }
    }
}

/// Update a project
#[utoipa::path(
    put,
    path = "/api/v1/projects/{project_id}",
    tag = "projects",
    params(
        ("project_id" = i32, Path, description = "Project ID"),
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = ApiResponse<ProjectResponse>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_project(
    Path(project_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    trace!("Entering update_project function for project_id: {}", project_id);

    let existing = match project::Entity::find_by_id(project_id).one(&state.db).await {
        Ok(Some(project_model)) => project_model,
        Ok(None) => {
            warn!("Project with ID {} not found for update", project_id);
            return Err(not_found("Project"));
        }
        Err(db_error) => {
            error!("Failed to lookup project with ID {}: {}", project_id, db_error);
            return Err(internal_error());
        }
    };

    let mut project_active: project::ActiveModel = existing.into();

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(validation_error(
                "name must not be empty",
                vec!["name".to_string()],
            ));
        }
        debug!("Updating project name to: {}", name);
        project_active.name = Set(name);
    }
    if let Some(company) = request.company {
        debug!("Updating project company to: {}", company);
        project_active.company = Set(company);
    }

    match project_active.update(&state.db).await {
        Ok(updated) => {
            info!("Project with ID {} updated successfully", project_id);
            let response = ApiResponse {
                data: ProjectResponse::from(updated),
                message: "Project updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update project with ID {}: {}", project_id, db_error);
            Err(internal_error())
        }
    }
}

/// Delete a project and, by cascade, its stages, snapshots, expenses
/// and barter entries
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}",
    tag = "projects",
    params(
        ("project_id" = i32, Path, description = "Project ID"),
    ),
    responses(
        (status = 200, description = "Project deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_project(
    Path(project_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_project function for project_id: {}", project_id);

    match project::Entity::delete_by_id(project_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Project with ID {} deleted successfully", project_id);
                let response = ApiResponse {
                    data: format!("Project {} deleted", project_id),
                    message: "Project deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Project with ID {} not found for deletion", project_id);
                Err(not_found("Project"))
            }
        }
        Err(db_error) => {
            error!("Failed to delete project with ID {}: {}", project_id, db_error);
            Err(internal_error())
        }
    }
}
