use crate::server::response::ApiError;

const MAX_FOLDER_NAME_LEN: usize = 100;
const MAX_RECORD_NAME_LEN: usize = 255;
const MIN_LOGIN_LEN: usize = 4;
const MAX_LOGIN_LEN: usize = 50;

fn validate_name(name: Option<&str>, entity: &str, max_len: usize) -> Result<String, String> {
    let trimmed = name.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Err(format!("{entity} name is required"));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("{entity} name cannot exceed {max_len} characters"));
    }
    Ok(trimmed.to_string())
}

/// Validates a folder name and returns the trimmed value.
pub fn validate_folder_name(name: Option<&str>) -> Result<String, ApiError> {
    validate_name(name, "Folder", MAX_FOLDER_NAME_LEN).map_err(ApiError::bad_request)
}

/// Validates a record name and returns the trimmed value.
pub fn validate_record_name(name: Option<&str>) -> Result<String, ApiError> {
    validate_name(name, "Record", MAX_RECORD_NAME_LEN).map_err(ApiError::bad_request)
}

/// Validates a login and returns the trimmed value.
pub fn validate_login(login: &str) -> Result<String, ApiError> {
    let trimmed = login.trim();
    let len = trimmed.chars().count();
    if len < MIN_LOGIN_LEN || len > MAX_LOGIN_LEN {
        return Err(ApiError::bad_request(format!(
            "Login must be between {MIN_LOGIN_LEN} and {MAX_LOGIN_LEN} characters"
        )));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ApiError::bad_request("Login cannot contain spaces"));
    }
    Ok(trimmed.to_string())
}
