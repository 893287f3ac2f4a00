//! Task creation endpoint.
//!
//! Validates the inbound payload, resolves the owning tenant from the
//! referenced application, and persists a new follow-up task. Validation is
//! local and synchronous; the store is only reached once the payload is
//! known-good, so a bad request costs no round-trips.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::store::{NewTask, TaskStatus, TaskType};

use super::routes::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Inbound payload. Fields are optional so presence is checked explicitly
/// instead of failing at deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub success: bool,
    pub task_id: String,
}

/// Failure responses of the task endpoint, one variant per contract row.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid task_type. Must be one of: {0}")]
    InvalidTaskType(String),

    #[error("due_at must be a valid date in the future")]
    DueAtNotFuture,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Failed to create task")]
    CreateFailed(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields
            | Self::InvalidTaskType(_)
            | Self::DueAtNotFuture
            | Self::CreateFailed(_) => StatusCode::BAD_REQUEST,
            Self::ApplicationNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            // The store's own message rides along for insert failures.
            Self::CreateFailed(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/tasks - Create a follow-up task against an application.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CreateTaskResponse>, ApiError> {
    // A body that fails to decode is an unexpected error, not a validation
    // failure; only well-formed JSON reaches the field checks.
    let req: CreateTaskRequest = serde_json::from_slice(&body).map_err(|_| ApiError::Internal)?;

    let payload = validate(req, Utc::now())?;

    // Lookup transport failures are reported the same as a missing row.
    let app = match state.store.application(&payload.application_id).await {
        Ok(Some(app)) => app,
        Ok(None) => return Err(ApiError::ApplicationNotFound),
        Err(e) => {
            tracing::warn!("Application lookup failed: {}", e);
            return Err(ApiError::ApplicationNotFound);
        }
    };

    let task = NewTask {
        tenant_id: app.tenant_id,
        related_id: payload.application_id,
        task_type: payload.task_type,
        due_at: payload.due_at,
        title: format!("{} task for application", payload.task_type),
        status: TaskStatus::Open,
    };

    let created = state.store.insert_task(&task).await.map_err(|e| {
        tracing::error!("Task insert failed: {}", e);
        ApiError::CreateFailed(e.to_string())
    })?;

    tracing::info!(
        "Created task {} for application {}",
        created.id,
        created.related_id
    );

    Ok(Json(CreateTaskResponse {
        success: true,
        task_id: created.id,
    }))
}

/// Fallback for non-POST methods on the task route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// A payload that passed every local check, ready to persist.
#[derive(Debug, PartialEq)]
struct ValidPayload {
    application_id: String,
    task_type: TaskType,
    due_at: String,
}

/// Run the local validation pipeline, short-circuiting on the first failure.
///
/// `now` is the instant the future-date rule is evaluated against; it is a
/// parameter so tests are not racing the clock.
fn validate(req: CreateTaskRequest, now: DateTime<Utc>) -> Result<ValidPayload, ApiError> {
    let (application_id, task_type, due_at) = match (
        req.application_id.filter(|s| !s.is_empty()),
        req.task_type.filter(|s| !s.is_empty()),
        req.due_at.filter(|s| !s.is_empty()),
    ) {
        (Some(a), Some(t), Some(d)) => (a, t, d),
        _ => return Err(ApiError::MissingFields),
    };

    let task_type = TaskType::parse(&task_type)
        .ok_or_else(|| ApiError::InvalidTaskType(TaskType::allowed_list()))?;

    let due = DateTime::parse_from_rfc3339(&due_at).map_err(|_| ApiError::DueAtNotFuture)?;
    if due.with_timezone(&Utc) <= now {
        return Err(ApiError::DueAtNotFuture);
    }

    Ok(ValidPayload {
        application_id,
        task_type,
        due_at,
    })
}
