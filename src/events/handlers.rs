/**
 * Event Handlers
 *
 * HTTP handlers for the protected event routes. Every handler here runs
 * behind the session gate, so a `CurrentUser` is always present.
 *
 * # Routes
 *
 * - `GET /events` - list all events
 * - `GET /events/{id}` - fetch one event
 * - `POST /createEvent` - multipart form with an optional image upload
 * - `PUT /events/{id}` - replace an event's fields
 * - `DELETE /events/{id}` - remove an event
 *
 * Creating an event publishes an `EventCreated` occurrence to the
 * notification pipeline strictly after the repository write returns, so
 * the confirmation email never races a failed write. The response does
 * not wait for the email.
 */

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, StoreError};
use crate::events::repository::{EventChanges, EventRecord, NewEvent};
use crate::middleware::auth::CurrentUser;
use crate::notify::pipeline::EventCreated;
use crate::server::state::AppState;

/// List all events, oldest first.
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventRecord>>, AppError> {
    let events = state.events.list().await?;
    Ok(Json(events))
}

/// Fetch a single event by id.
///
/// # Errors
///
/// * `400 Bad Request` - If no event has that id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventRecord>, AppError> {
    let event = state
        .events
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no event with id {}", id)))?;
    Ok(Json(event))
}

/// Create an event from a multipart form.
///
/// Expected fields: `eventName`, `eventDateTime` (RFC 3339),
/// `eventLocation`, `eventDescription`, and an optional `image` file. The
/// image is written under the uploads directory and referenced from the
/// stored record.
///
/// # Returns
///
/// `201 Created` with the stored record. A confirmation email to the
/// creator is dispatched asynchronously after the write succeeds.
///
/// # Errors
///
/// * `400 Bad Request` - If a required field is missing or malformed
/// * `500 Internal Server Error` - If the store or the image write fails
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(creator): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<EventRecord>), AppError> {
    let mut name: Option<String> = None;
    let mut date_time: Option<DateTime<Utc>> = None;
    let mut location: Option<String> = None;
    let mut description = String::new();
    let mut image_ref: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation("form", e.to_string()))?
    {
        match field.name() {
            Some("eventName") => name = Some(read_text(field).await?),
            Some("eventDateTime") => {
                let raw = read_text(field).await?;
                let parsed = raw.parse::<DateTime<Utc>>().map_err(|_| {
                    AppError::validation("eventDateTime", "expected an RFC 3339 date-time")
                })?;
                date_time = Some(parsed);
            }
            Some("eventLocation") => location = Some(read_text(field).await?),
            Some("eventDescription") => description = read_text(field).await?,
            Some("image") => image_ref = Some(store_image(&state, field).await?),
            other => {
                tracing::debug!("ignoring unexpected form field: {:?}", other);
            }
        }
    }

    let name = require_field(name, "eventName")?;
    let date_time = require_field(date_time, "eventDateTime")?;
    let location = require_field(location, "eventLocation")?;

    let record = state
        .events
        .create(NewEvent {
            name,
            date_time,
            location,
            description,
            image_ref,
            creator_id: creator.id,
        })
        .await?;

    tracing::info!("event '{}' created by {}", record.name, creator.username);

    // The write is durable at this point; hand the occurrence to the
    // notification worker and answer without waiting for the email.
    state.notifications.publish(EventCreated {
        creator_email: creator.email,
        creator_username: creator.username,
        event_name: record.name.clone(),
        event_date_time: record.date_time,
        event_location: record.location.clone(),
    });

    Ok((StatusCode::CREATED, Json(record)))
}

/// Replace an event's fields.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventChanges>,
) -> Result<StatusCode, AppError> {
    match state.events.update(id, changes).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound) => Err(AppError::NotFound(format!("no event with id {}", id))),
        Err(e) => Err(e.into()),
    }
}

/// Delete an event.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read a text form field.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation("form", e.to_string()))
}

/// Write an uploaded image under the uploads directory.
///
/// The stored name is a fresh UUID plus the upload's extension, so client
/// file names never reach the filesystem.
async fn store_image(
    state: &AppState,
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, AppError> {
    let extension = field
        .file_name()
        .and_then(|n| std::path::Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::validation("image", e.to_string()))?;

    let file_name = format!("{}{}", Uuid::new_v4(), extension);
    let path = state.uploads_dir.join(&file_name);

    tokio::fs::create_dir_all(&state.uploads_dir)
        .await
        .map_err(|e| AppError::Internal(format!("could not create uploads dir: {}", e)))?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("could not store image: {}", e)))?;

    Ok(format!("/uploads/{}", file_name))
}

fn require_field<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::validation(field, "missing required field"))
}
