use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::error::Result;
use crate::server::AppState;
use crate::server::access::require_owned_folder;
use crate::server::dto::{
    CreateFolderRequest, FolderCreatedResponse, FolderDeletedResponse, FolderSummary,
    FoldersInitResponse, RecordSummary, RenameFolderRequest, RenamedResponse,
};
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation::validate_folder_name;
use crate::store::Store;
use crate::types::{DRAFTS_FOLDER, TRASH_FOLDER};

/// Makes sure the user's reserved folders exist, returning the names that had
/// to be created. Idempotent; called at registration and from the init
/// endpoint.
pub fn ensure_system_folders(store: &dyn Store, user_id: i64) -> Result<Vec<String>> {
    let mut created = Vec::new();

    for name in [DRAFTS_FOLDER, TRASH_FOLDER] {
        if store.get_folder_by_name(user_id, name)?.is_none() {
            store.create_folder(user_id, name)?;
            created.push(name.to_string());
        }
    }

    Ok(created)
}

pub async fn list_folders(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let folders = state
        .store
        .list_folders(auth.user.id)
        .api_err("Failed to list folders")?;

    let response: Vec<FolderSummary> = folders
        .into_iter()
        .map(|f| FolderSummary {
            id: f.id,
            name: f.name,
        })
        .collect();

    Ok::<_, ApiError>(Json(response))
}

pub async fn create_folder(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFolderRequest>,
) -> impl IntoResponse {
    let name = validate_folder_name(req.name.as_deref())?;

    let folder = state
        .store
        .create_folder(auth.user.id, &name)
        .api_err("Failed to create folder")?;

    Ok::<_, ApiError>(Json(FolderCreatedResponse {
        success: true,
        folder_id: folder.id,
    }))
}

pub async fn init_folders(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let created = ensure_system_folders(state.store.as_ref(), auth.user.id)
        .api_err("Failed to create folders")?;

    Ok::<_, ApiError>(Json(FoldersInitResponse {
        success: true,
        created,
    }))
}

pub async fn rename_folder(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<RenameFolderRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let folder = require_owned_folder(store, auth.user.id, id)?;
    let name = validate_folder_name(req.name.as_deref())?;

    // Reserved names are not protected here; renaming "Trash" away is allowed
    // and leaves the account without a trash until one is recreated.
    store
        .rename_folder(folder.id, &name)
        .api_err("Failed to rename folder")?;

    Ok::<_, ApiError>(Json(RenamedResponse {
        success: true,
        name,
    }))
}

pub async fn delete_folder(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let user = &auth.user;

    let folder = require_owned_folder(store, user.id, id)?;

    if folder.name == DRAFTS_FOLDER || folder.name == TRASH_FOLDER {
        return Err(ApiError::bad_request("Cannot delete system folders"));
    }

    let record_count = store
        .count_folder_records(folder.id)
        .api_err("Failed to count folder records")?;

    if record_count == 0 {
        store
            .delete_folder(folder.id)
            .api_err("Failed to delete folder")?;

        return Ok::<_, ApiError>(Json(FolderDeletedResponse {
            success: true,
            moved_files: 0,
        }));
    }

    let trash = match store
        .get_folder_by_name(user.id, TRASH_FOLDER)
        .api_err("Failed to look up trash folder")?
    {
        Some(trash) => trash,
        None => store
            .create_folder(user.id, TRASH_FOLDER)
            .api_err("Failed to create trash folder")?,
    };

    let moved_files = store
        .delete_folder_moving_records(folder.id, trash.id)
        .api_err("Failed to delete folder")?;

    Ok::<_, ApiError>(Json(FolderDeletedResponse {
        success: true,
        moved_files,
    }))
}

pub async fn list_folder_records(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let folder = require_owned_folder(store, auth.user.id, id)?;

    let records = store
        .list_folder_records(folder.id)
        .api_err("Failed to list records")?;

    let response: Vec<RecordSummary> = records
        .into_iter()
        .map(|r| RecordSummary {
            id: r.id,
            name: r.name,
            duration: r.length_secs.unwrap_or(0.0) * 1000.0,
            trash: r.trash,
            created_at: r.created_at,
        })
        .collect();

    Ok::<_, ApiError>(Json(response))
}
