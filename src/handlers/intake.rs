use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::{ApiResponse, ErrorResponse};
use model::entities::intake_submission;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{internal_error, not_found, validation_error, ApiError, AppState};
use crate::webhook::IntakeNotification;

/// Request body for submitting the customer intake form
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateIntakeRequest {
    /// Prospect name
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Prospect phone; accepted with formatting, normalized to +55 digits
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub city: Option<String>,
    /// Development the prospect asked about
    pub development: Option<String>,
    /// Sales agent who handled the visit; only kept when `was_assisted`
    pub agent_name: Option<String>,
    #[serde(default)]
    pub was_assisted: bool,
    #[serde(default)]
    pub visited_sales_office: bool,
    #[serde(default)]
    pub consent_to_contact: bool,
    pub interest_level: Option<String>,
    #[serde(default)]
    pub purchased_before: bool,
    pub media_source: Option<String>,
}

/// Request body for the later satisfaction rating
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetRatingRequest {
    /// Rating from 0 to 10
    pub rating: i32,
}

/// Intake submission response model
#[derive(Debug, Serialize, ToSchema)]
pub struct IntakeResponse {
    pub id: i32,
    pub submitted_at: chrono::DateTime<chrono::FixedOffset>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: Option<String>,
    pub development: Option<String>,
    pub agent_name: Option<String>,
    pub was_assisted: bool,
    pub visited_sales_office: bool,
    pub consent_to_contact: bool,
    pub interest_level: Option<String>,
    pub purchased_before: bool,
    pub media_source: Option<String>,
    pub rating: i32,
}

impl From<intake_submission::Model> for IntakeResponse {
    fn from(model: intake_submission::Model) -> Self {
        Self {
            id: model.id,
            submitted_at: model.submitted_at,
            name: model.name,
            phone: model.phone,
            email: model.email,
            city: model.city,
            development: model.development,
            agent_name: model.agent_name,
            was_assisted: model.was_assisted,
            visited_sales_office: model.visited_sales_office,
            consent_to_contact: model.consent_to_contact,
            interest_level: model.interest_level,
            purchased_before: model.purchased_before,
            media_source: model.media_source,
            rating: model.rating,
        }
    }
}

/// Normalizes a Brazilian phone number to "+55" plus its digits.
/// Returns `None` unless 10 or 11 digits remain after stripping
/// formatting.
fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if (10..=11).contains(&digits.len()) {
        Some(format!("+55{digits}"))
    } else {
        None
    }
}

/// Submit the customer intake form. The record is persisted in full;
/// a small subset is forwarded to the automation webhook best-effort.
#[utoipa::path(
    post,
    path = "/api/v1/intake",
    tag = "intake",
    request_body = CreateIntakeRequest,
    responses(
        (status = 201, description = "Submission saved", body = ApiResponse<IntakeResponse>),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_intake(
    State(state): State<AppState>,
    Json(request): Json<CreateIntakeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IntakeResponse>>), ApiError> {
    trace!("Entering create_intake function");

    if let Err(errors) = request.validate() {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        warn!("Rejecting intake submission, invalid fields: {:?}", fields);
        return Err(validation_error("invalid intake submission", fields));
    }

    let Some(phone) = normalize_phone(&request.phone) else {
        warn!("Rejecting intake submission with malformed phone");
        return Err(validation_error(
            "phone must contain 10 or 11 digits",
            vec!["phone".to_string()],
        ));
    };

    // The agent field only means something when a visit actually
    // happened.
    let agent_name = if request.was_assisted {
        request.agent_name.clone()
    } else {
        None
    };

    let submission = intake_submission::ActiveModel {
        submitted_at: Set(chrono::Utc::now().fixed_offset()),
        name: Set(request.name.clone()),
        phone: Set(phone),
        email: Set(request.email.clone()),
        city: Set(request.city.clone()),
        development: Set(request.development.clone()),
        agent_name: Set(agent_name),
        was_assisted: Set(request.was_assisted),
        visited_sales_office: Set(request.visited_sales_office),
        consent_to_contact: Set(request.consent_to_contact),
        interest_level: Set(request.interest_level.clone()),
        purchased_before: Set(request.purchased_before),
        media_source: Set(request.media_source.clone()),
        rating: Set(0),
        ..Default::default()
    };

    let saved = match submission.insert(&state.db).await {
        Ok(saved) => saved,
        Err(db_error) => {
            error!("Failed to save intake submission: {}", db_error);
            return Err(internal_error());
        }
    };

    info!("Intake submission saved with ID: {}", saved.id);

    // Best-effort notification; failures never reach the submitter.
    state.notifier.notify(IntakeNotification {
        ticket_id: saved.id,
        name: saved.name.clone(),
        phone: saved.phone.clone(),
        agent_name: saved.agent_name.clone(),
        city: saved.city.clone(),
        timestamp: saved.submitted_at.to_rfc3339(),
    });

    let response = ApiResponse {
        data: IntakeResponse::from(saved),
        message: "Submission saved".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List intake submissions, newest first
#[utoipa::path(
    get,
    path = "/api/v1/intake",
    tag = "intake",
    responses(
        (status = 200, description = "Submissions retrieved successfully", body = ApiResponse<Vec<IntakeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_intake_submissions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<IntakeResponse>>>, ApiError> {
    match intake_submission::Entity::find()
        .order_by_desc(intake_submission::Column::SubmittedAt)
        .all(&state.db)
        .await
    {
        Ok(submissions) => {
            debug!("Retrieved {} intake submissions", submissions.len());
            let response = ApiResponse {
                data: submissions.into_iter().map(IntakeResponse::from).collect(),
                message: "Submissions retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve intake submissions: {}", db_error);
            Err(internal_error())
        }
    }
}

/// Record the satisfaction rating sent back through the follow-up link
#[utoipa::path(
    put,
    path = "/api/v1/intake/{submission_id}/rating",
    tag = "intake",
    params(
        ("submission_id" = i32, Path, description = "Intake submission ID"),
    ),
    request_body = SetRatingRequest,
    responses(
        (status = 200, description = "Rating recorded", body = ApiResponse<IntakeResponse>),
        (status = 400, description = "Invalid rating", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn set_intake_rating(
    Path(submission_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<SetRatingRequest>,
) -> Result<Json<ApiResponse<IntakeResponse>>, ApiError> {
    trace!("Entering set_intake_rating for submission_id: {}", submission_id);

    if !(0..=10).contains(&request.rating) {
        return Err(validation_error(
            "rating must be between 0 and 10",
            vec!["rating".to_string()],
        ));
    }

    let existing = match intake_submission::Entity::find_by_id(submission_id)
        .one(&state.db)
        .await
    {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            warn!("Intake submission with ID {} not found", submission_id);
            return Err(not_found("Intake submission"));
        }
        Err(db_error) => {
            error!("Failed to lookup intake submission {}: {}", submission_id, db_error);
            return Err(internal_error());
        }
    };

    let mut submission_active: intake_submission::ActiveModel = existing.into();
    submission_active.rating = Set(request.rating);

    match submission_active.update(&state.db).await {
        Ok(updated) => {
            info!(
                "Rating {} recorded for intake submission {}",
                request.rating, submission_id
            );
            let response = ApiResponse {
                data: IntakeResponse::from(updated),
                message: "Rating recorded".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to record rating for submission {}: {}", submission_id, db_error);
            Err(internal_error())
        }
    }
}
