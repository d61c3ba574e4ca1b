use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::User;

// Request bodies. Every field the client may omit is an Option so the
// handlers can answer 400 with a real message instead of a rejection.

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameFolderRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateRecordRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub folder: Option<i64>,
    #[serde(default)]
    pub audio: Option<String>,
    /// Recording length in milliseconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Recording-time mistake timestamps in milliseconds.
    #[serde(default)]
    pub errors: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameRecordRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddMistakeRequest {
    /// Mistake timestamp in milliseconds.
    #[serde(default)]
    pub time: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
}

// Response bodies.

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            login: user.login.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub success: bool,
}

impl OkResponse {
    #[must_use]
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct FolderSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct FolderCreatedResponse {
    pub success: bool,
    pub folder_id: i64,
}

#[derive(Debug, Serialize)]
pub struct FoldersInitResponse {
    pub success: bool,
    pub created: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RenamedResponse {
    pub success: bool,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct FolderDeletedResponse {
    pub success: bool,
    pub moved_files: usize,
}

#[derive(Debug, Serialize)]
pub struct RecordCreatedResponse {
    pub success: bool,
    pub record_id: i64,
}

#[derive(Debug, Serialize)]
pub struct RecordSummary {
    pub id: i64,
    pub name: String,
    /// Milliseconds, matching the playback payload.
    pub duration: f64,
    pub trash: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MistakeEntry {
    /// Milliseconds on the wire; the store keeps seconds.
    pub time: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: i64,
    pub name: String,
    pub folder: i64,
    pub audio: String,
    pub duration: f64,
    pub errors: Vec<MistakeEntry>,
    #[serde(rename = "playbackErrors")]
    pub playback_errors: Vec<MistakeEntry>,
}

#[derive(Debug, Serialize)]
pub struct MistakeCreatedResponse {
    pub success: bool,
    pub mistake_id: i64,
}
