use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved per-user folder created at registration; default home for new takes.
pub const DRAFTS_FOLDER: &str = "Drafts";

/// Reserved per-user folder; records are moved here on soft-delete and may
/// only be permanently deleted from here.
pub const TRASH_FOLDER: &str = "Trash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for user creation; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password_hash: String,
}

/// A bearer-token login session. The raw token is only ever shown once;
/// at rest we keep an Argon2id hash plus a short lookup prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One saved audio take. `trash` marks soft-deleted records; `audio_file` is
/// the file name inside the uploads directory (never a full path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub user_id: i64,
    pub folder_id: i64,
    pub name: String,
    pub trash: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for record creation; the store assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub user_id: i64,
    pub folder_id: i64,
    pub name: String,
    pub length_secs: f64,
    pub audio_file: String,
}

/// Whether a mistake was flagged while recording the take or while playing
/// it back. Stored as 1 and 2 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeKind {
    Recording,
    Playback,
}

impl MistakeKind {
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            MistakeKind::Recording => 1,
            MistakeKind::Playback => 2,
        }
    }

    #[must_use]
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(MistakeKind::Recording),
            2 => Some(MistakeKind::Playback),
            _ => None,
        }
    }
}

/// A timestamped annotation on a record. Comment and time are optional at
/// the schema level; API-created mistakes always carry a time and kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mistake {
    pub id: i64,
    pub record_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_mistake: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MistakeKind>,
}

/// Input for mistake creation; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMistake {
    pub record_id: i64,
    pub time_secs: f64,
    pub kind: MistakeKind,
}
