use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::access::require_owned_record;
use crate::server::dto::{
    AddMistakeRequest, MistakeCreatedResponse, OkResponse, UpdateCommentRequest,
};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::types::{MistakeKind, NewMistake};

/// Marks a mistake noticed during playback, as opposed to the recording-time
/// markers supplied when the take is saved.
pub async fn add_error(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i64>,
    Json(req): Json<AddMistakeRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let record = require_owned_record(store, auth.user.id, record_id)?;

    let Some(time) = req.time else {
        return Err(ApiError::bad_request("Error time is required"));
    };

    let mistake = store
        .create_mistake(&NewMistake {
            record_id: record.id,
            time_secs: time / 1000.0,
            kind: MistakeKind::Playback,
        })
        .api_err("Failed to save mistake")?;

    Ok::<_, ApiError>(Json(MistakeCreatedResponse {
        success: true,
        mistake_id: mistake.id,
    }))
}

pub async fn update_error_comment(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i64>,
    Json(req): Json<UpdateCommentRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let record = require_owned_record(store, auth.user.id, record_id)?;

    let Some(time) = req.time else {
        return Err(ApiError::bad_request("Error time is required"));
    };

    // Addressed by exact stored timestamp; the client echoes back the same
    // millisecond value it was served, so the division reproduces the stored
    // seconds bit-for-bit.
    let mistake = store
        .find_mistake_by_time(record.id, time / 1000.0)
        .api_err("Failed to look up mistake")?
        .or_not_found("Mistake not found")?;

    // An empty comment is stored as "", not NULL.
    let comment = req.comment.as_deref().unwrap_or_default().trim();

    store
        .update_mistake_comment(mistake.id, comment)
        .api_err("Failed to update comment")?;

    Ok::<_, ApiError>(Json(OkResponse::new()))
}

pub async fn delete_mistake(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let mistake = store
        .get_mistake(id)
        .api_err("Failed to get mistake")?
        .or_not_found("Mistake not found")?;

    let record = store
        .get_record(mistake.record_id)
        .api_err("Failed to get record")?
        .or_not_found("Record not found")?;

    if record.user_id != auth.user.id {
        return Err(ApiError::forbidden("Access denied"));
    }

    store
        .delete_mistake(mistake.id)
        .api_err("Failed to delete mistake")?;

    Ok::<_, ApiError>(Json(OkResponse::new()))
}
