use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::store::Store;
use crate::types::{Folder, Record};

/// Loads a folder and checks the caller owns it: 404 if absent, 403 if owned
/// by someone else.
pub fn require_owned_folder(
    store: &dyn Store,
    user_id: i64,
    folder_id: i64,
) -> Result<Folder, ApiError> {
    let folder = store
        .get_folder(folder_id)
        .api_err("Failed to get folder")?
        .or_not_found("Folder not found")?;

    if folder.user_id != user_id {
        return Err(ApiError::forbidden("Access denied"));
    }

    Ok(folder)
}

/// Loads a record and checks the caller owns it: 404 if absent, 403 if owned
/// by someone else.
pub fn require_owned_record(
    store: &dyn Store,
    user_id: i64,
    record_id: i64,
) -> Result<Record, ApiError> {
    let record = store
        .get_record(record_id)
        .api_err("Failed to get record")?
        .or_not_found("Record not found")?;

    if record.user_id != user_id {
        return Err(ApiError::forbidden("Access denied"));
    }

    Ok(record)
}
