mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Implementations expose transactional CRUD; domain rules (reserved folder
/// names, trash gating, ownership checks) live with the callers. Operations
/// that touch several rows commit or roll back as a unit.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, new: &NewUser) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_login(&self, login: &str) -> Result<Option<User>>;
    fn update_user_profile(&self, id: i64, first_name: &str, last_name: &str) -> Result<()>;
    fn update_user_password(&self, id: i64, password_hash: &str) -> Result<()>;

    // Session operations
    fn create_session(&self, session: &Session) -> Result<()>;
    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>>;
    fn delete_session(&self, id: &str) -> Result<bool>;
    fn delete_user_sessions_except(&self, user_id: i64, keep_id: &str) -> Result<usize>;
    fn update_session_last_used(&self, id: &str) -> Result<()>;

    // Folder operations
    fn create_folder(&self, user_id: i64, name: &str) -> Result<Folder>;
    fn get_folder(&self, id: i64) -> Result<Option<Folder>>;
    fn get_folder_by_name(&self, user_id: i64, name: &str) -> Result<Option<Folder>>;
    fn list_folders(&self, user_id: i64) -> Result<Vec<Folder>>;
    fn rename_folder(&self, id: i64, name: &str) -> Result<()>;
    fn count_folder_records(&self, id: i64) -> Result<i64>;
    fn delete_folder(&self, id: i64) -> Result<bool>;
    /// Reassigns every record in the folder to `trash_folder_id`, then
    /// deletes the folder row, in one transaction. Returns the number of
    /// records moved.
    fn delete_folder_moving_records(&self, id: i64, trash_folder_id: i64) -> Result<usize>;

    // Record operations
    /// Inserts the record plus one recording-time mistake per entry of
    /// `error_times_secs`, in one transaction.
    fn create_record(&self, new: &NewRecord, error_times_secs: &[f64]) -> Result<Record>;
    fn get_record(&self, id: i64) -> Result<Option<Record>>;
    fn list_folder_records(&self, folder_id: i64) -> Result<Vec<Record>>;
    fn rename_record(&self, id: i64, name: &str) -> Result<()>;
    fn move_record_to_trash(&self, id: i64, trash_folder_id: i64) -> Result<()>;
    fn delete_record(&self, id: i64) -> Result<bool>;

    // Mistake operations
    fn create_mistake(&self, new: &NewMistake) -> Result<Mistake>;
    fn get_mistake(&self, id: i64) -> Result<Option<Mistake>>;
    fn list_record_mistakes(&self, record_id: i64) -> Result<Vec<Mistake>>;
    fn find_mistake_by_time(&self, record_id: i64, time_secs: f64) -> Result<Option<Mistake>>;
    fn update_mistake_comment(&self, id: i64, comment: &str) -> Result<()>;
    fn delete_mistake(&self, id: i64) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
