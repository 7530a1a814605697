use crate::api::AppState;
use crate::api::schemas::messages::{CreateMessageRequest, MessageResponse, UpdateMessageRequest};
use crate::domain::outcome::Outcome;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Location of a single message, as served by `get_message`.
#[must_use]
pub fn message_location(organization_id: Uuid, id: Uuid) -> String {
    format!("/api/v1/organizations/{organization_id}/messages/{id}")
}

fn decode_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(request)| request).map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

fn decode_path<T>(path: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    path.map(|Path(params)| params).map_err(|e| AppError::BadRequest(format!("Invalid path: {e}")))
}

/// Any variant an endpoint does not expect is a server-side bug.
fn unexpected<T>(operation: &'static str, outcome: &Outcome<T>) -> AppError {
    tracing::error!(operation, outcome = outcome.name(), "Unexpected message outcome");
    AppError::Internal
}

/// Lists all messages of an organization.
///
/// # Errors
/// Returns `AppError::Validation` if the organization id is nil.
pub async fn list_messages(
    State(state): State<AppState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse> {
    let organization_id = decode_path(path)?;

    match state.message_service.get_all_messages(organization_id).await? {
        Outcome::Created(messages) => {
            Ok(Json(messages.into_iter().map(MessageResponse::from).collect::<Vec<_>>()))
        }
        Outcome::ValidationError(errors) => Err(AppError::Validation(errors)),
        other => Err(unexpected("list_messages", &other)),
    }
}

/// Fetches one message.
///
/// # Errors
/// Returns `AppError::NotFound` if the message does not exist in the organization.
/// Returns `AppError::Validation` if either id is nil.
pub async fn get_message(
    State(state): State<AppState>,
    path: std::result::Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<impl IntoResponse> {
    let (organization_id, id) = decode_path(path)?;

    match state.message_service.get_message(organization_id, id).await? {
        Outcome::Created(message) => Ok(Json(MessageResponse::from(message))),
        Outcome::NotFound(msg) => Err(AppError::NotFound(msg)),
        Outcome::ValidationError(errors) => Err(AppError::Validation(errors)),
        other => Err(unexpected("get_message", &other)),
    }
}

/// Creates a message and points `Location` at it.
///
/// # Errors
/// Returns `AppError::Validation` if any field is invalid.
/// Returns `AppError::Conflict` if the title is already used in the organization.
pub async fn create_message(
    State(state): State<AppState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
    body: std::result::Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<Response> {
    let organization_id = decode_path(path)?;
    let request = decode_body(body)?;

    match state.message_service.create_message(organization_id, request).await? {
        Outcome::Created(message) => {
            let location = message_location(message.organization_id, message.id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(MessageResponse::from(message)))
                .into_response())
        }
        Outcome::ValidationError(errors) => Err(AppError::Validation(errors)),
        Outcome::Conflict(msg) => Err(AppError::Conflict(msg)),
        other => Err(unexpected("create_message", &other)),
    }
}

/// Updates an active message.
///
/// # Errors
/// Returns `AppError::NotFound` if the message does not exist in the organization.
/// Returns `AppError::Validation` if a field is invalid or the message is inactive.
/// Returns `AppError::Internal` for any other outcome, including a title conflict.
pub async fn update_message(
    State(state): State<AppState>,
    path: std::result::Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: std::result::Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let (organization_id, id) = decode_path(path)?;
    let request = decode_body(body)?;

    match state.message_service.update_message(organization_id, id, request).await? {
        Outcome::Updated => Ok(StatusCode::NO_CONTENT),
        Outcome::NotFound(msg) => Err(AppError::NotFound(msg)),
        Outcome::ValidationError(errors) => Err(AppError::Validation(errors)),
        other => Err(unexpected("update_message", &other)),
    }
}

/// Deletes an active message.
///
/// # Errors
/// Returns `AppError::NotFound` if the message does not exist in the organization.
/// Returns `AppError::Validation` if the message is inactive.
pub async fn delete_message(
    State(state): State<AppState>,
    path: std::result::Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<StatusCode> {
    let (organization_id, id) = decode_path(path)?;

    match state.message_service.delete_message(organization_id, id).await? {
        Outcome::Deleted => Ok(StatusCode::NO_CONTENT),
        Outcome::NotFound(msg) => Err(AppError::NotFound(msg)),
        Outcome::ValidationError(errors) => Err(AppError::Validation(errors)),
        other => Err(unexpected("delete_message", &other)),
    }
}
