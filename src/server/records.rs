use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireUser;
use crate::media::{MediaError, audio_file_name, decode_audio_payload, encode_audio_payload};
use crate::server::AppState;
use crate::server::access::require_owned_record;
use crate::server::dto::{
    CreateRecordRequest, MistakeEntry, OkResponse, RecordCreatedResponse, RecordResponse,
    RenameRecordRequest, RenamedResponse,
};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_record_name;
use crate::types::{MistakeKind, NewRecord, TRASH_FOLDER};

pub async fn create_record(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRecordRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let user = &auth.user;

    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    let audio = req.audio.as_deref().unwrap_or_default();
    let folder_id = req.folder.unwrap_or(0);

    let Some(duration) = req.duration else {
        return Err(ApiError::bad_request("Missing required fields"));
    };
    if name.is_empty() || folder_id == 0 || audio.is_empty() {
        return Err(ApiError::bad_request("Missing required fields"));
    }

    // A single 404 covers both a missing folder and someone else's folder.
    let folder = match store
        .get_folder(folder_id)
        .api_err("Failed to get folder")?
    {
        Some(folder) if folder.user_id == user.id => folder,
        _ => return Err(ApiError::not_found("Folder not found or access denied")),
    };

    let audio_bytes = decode_audio_payload(audio).map_err(|e| {
        tracing::warn!("Rejected audio payload: {e}");
        ApiError::bad_request(e.to_string())
    })?;

    let file_name = audio_file_name(name, user.id, Utc::now().timestamp());
    state.media.write(&file_name, &audio_bytes).await.map_err(|e| {
        tracing::error!("Failed to store audio file {file_name}: {e}");
        ApiError::internal("Failed to store audio file")
    })?;

    let error_times_secs: Vec<f64> = req.errors.iter().map(|t| t / 1000.0).collect();

    let record = store
        .create_record(
            &NewRecord {
                user_id: user.id,
                folder_id: folder.id,
                name: name.to_string(),
                length_secs: duration / 1000.0,
                audio_file: file_name,
            },
            &error_times_secs,
        )
        .api_err("Failed to save record")?;

    Ok::<_, ApiError>(Json(RecordCreatedResponse {
        success: true,
        record_id: record.id,
    }))
}

/// Playback payload. Unauthenticated: anyone holding a record id can fetch
/// its audio and markers.
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let record = store
        .get_record(id)
        .api_err("Failed to get record")?
        .or_not_found("Record not found")?;

    let file_name = record
        .audio_file
        .as_deref()
        .or_not_found("Audio file not found")?;

    let audio_bytes = match state.media.read(file_name).await {
        Ok(bytes) => bytes,
        Err(MediaError::NotFound) => return Err(ApiError::not_found("Audio file not found")),
        Err(e) => {
            tracing::error!("Failed to read audio file {file_name}: {e}");
            return Err(ApiError::internal("Failed to read audio file"));
        }
    };

    let mistakes = store
        .list_record_mistakes(record.id)
        .api_err("Failed to list mistakes")?;

    let mut errors = Vec::new();
    let mut playback_errors = Vec::new();
    for mistake in mistakes {
        let entry = MistakeEntry {
            time: mistake.time_of_mistake.unwrap_or(0.0) * 1000.0,
            comment: mistake.comment,
        };
        match mistake.kind {
            Some(MistakeKind::Recording) => errors.push(entry),
            Some(MistakeKind::Playback) => playback_errors.push(entry),
            None => {}
        }
    }

    Ok::<_, ApiError>(Json(RecordResponse {
        id: record.id,
        name: record.name.clone(),
        folder: record.folder_id,
        audio: encode_audio_payload(&audio_bytes),
        duration: record.length_secs.unwrap_or(0.0) * 1000.0,
        errors,
        playback_errors,
    }))
}

pub async fn rename_record(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<RenameRecordRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let record = require_owned_record(store, auth.user.id, id)?;
    let name = validate_record_name(req.name.as_deref())?;

    // The audio file keeps its original name; only the display name changes.
    store
        .rename_record(record.id, &name)
        .api_err("Failed to rename record")?;

    Ok::<_, ApiError>(Json(RenamedResponse {
        success: true,
        name,
    }))
}

pub async fn trash_record(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let user = &auth.user;

    let record = require_owned_record(store, user.id, id)?;

    let trash = store
        .get_folder_by_name(user.id, TRASH_FOLDER)
        .api_err("Failed to look up trash folder")?
        .or_not_found("Trash folder not found")?;

    store
        .move_record_to_trash(record.id, trash.id)
        .api_err("Failed to move record to trash")?;

    Ok::<_, ApiError>(Json(OkResponse::new()))
}

pub async fn delete_record(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let user = &auth.user;

    let record = require_owned_record(store, user.id, id)?;

    let trash = store
        .get_folder_by_name(user.id, TRASH_FOLDER)
        .api_err("Failed to look up trash folder")?;

    let in_trash = trash.is_some_and(|t| t.id == record.folder_id);
    if !in_trash {
        return Err(ApiError::bad_request(
            "Record must be in Trash before permanent deletion",
        ));
    }

    if let Some(file_name) = &record.audio_file {
        match state.media.delete(file_name).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Audio file {file_name} already missing during delete");
            }
            Err(e) => {
                tracing::error!("Failed to delete audio file {file_name}: {e}");
                return Err(ApiError::internal("Failed to delete audio file"));
            }
        }
    }

    store
        .delete_record(record.id)
        .api_err("Failed to delete record")?;

    Ok::<_, ApiError>(Json(OkResponse::new()))
}
