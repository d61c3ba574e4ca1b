use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        login: row.get(3)?,
        password_hash: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn folder_from_row(row: &Row<'_>) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        user_id: row.get(1)?,
        folder_id: row.get(2)?,
        name: row.get(3)?,
        trash: row.get(4)?,
        length_secs: row.get(5)?,
        audio_file: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn mistake_from_row(row: &Row<'_>) -> rusqlite::Result<Mistake> {
    Ok(Mistake {
        id: row.get(0)?,
        record_id: row.get(1)?,
        comment: row.get(2)?,
        time_of_mistake: row.get(3)?,
        kind: row.get::<_, Option<i64>>(4)?.and_then(MistakeKind::from_i64),
    })
}

const USER_COLUMNS: &str = "id, first_name, last_name, login, password_hash, created_at, updated_at";
const FOLDER_COLUMNS: &str = "id, user_id, name, created_at";
const RECORD_COLUMNS: &str =
    "id, user_id, folder_id, name, trash, length_secs, audio_file, created_at";
const MISTAKE_COLUMNS: &str = "id, record_id, comment, time_of_mistake, kind";

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, new: &NewUser) -> Result<User> {
        let now = Utc::now();
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO users (first_name, last_name, login, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.first_name,
                new.last_name,
                new.login,
                new.password_hash,
                format_datetime(&now),
                format_datetime(&now),
            ],
        );

        match result {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                first_name: new.first_name.clone(),
                last_name: new.last_name.clone(),
                login: new.login.clone(),
                password_hash: new.password_hash.clone(),
                created_at: now,
                updated_at: now,
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::Conflict("login already taken".to_string()))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE login = ?1"),
            params![login],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_user_profile(&self, id: i64, first_name: &str, last_name: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET first_name = ?1, last_name = ?2, updated_at = ?3 WHERE id = ?4",
            params![first_name, last_name, format_datetime(&Utc::now()), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn update_user_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
            params![password_hash, format_datetime(&Utc::now()), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Session operations

    fn create_session(&self, session: &Session) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO sessions (id, token_hash, token_lookup, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.id,
                session.token_hash,
                session.token_lookup,
                session.user_id,
                format_datetime(&session.created_at),
                session.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::SessionLookupCollision)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at
             FROM sessions WHERE token_lookup = ?1",
            params![lookup],
            |row| {
                Ok(Session {
                    id: row.get(0)?,
                    token_hash: row.get(1)?,
                    token_lookup: row.get(2)?,
                    user_id: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                    expires_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
                    last_used_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_session(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn delete_user_sessions_except(&self, user_id: i64, keep_id: &str) -> Result<usize> {
        let rows = self.conn().execute(
            "DELETE FROM sessions WHERE user_id = ?1 AND id != ?2",
            params![user_id, keep_id],
        )?;
        Ok(rows)
    }

    fn update_session_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE sessions SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    // Folder operations

    fn create_folder(&self, user_id: i64, name: &str) -> Result<Folder> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO folders (user_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, name, format_datetime(&now)],
        )?;

        Ok(Folder {
            id: conn.last_insert_rowid(),
            user_id,
            name: name.to_string(),
            created_at: now,
        })
    }

    fn get_folder(&self, id: i64) -> Result<Option<Folder>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ?1"),
            params![id],
            folder_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_folder_by_name(&self, user_id: i64, name: &str) -> Result<Option<Folder>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {FOLDER_COLUMNS} FROM folders
                 WHERE user_id = ?1 AND name = ?2 ORDER BY id LIMIT 1"
            ),
            params![user_id, name],
            folder_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_folders(&self, user_id: i64) -> Result<Vec<Folder>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE user_id = ?1 ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![user_id], folder_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn rename_folder(&self, id: i64, name: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE folders SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn count_folder_records(&self, id: i64) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM records WHERE folder_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(Error::from)
    }

    fn delete_folder(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM folders WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn delete_folder_moving_records(&self, id: i64, trash_folder_id: i64) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let moved = tx.execute(
            "UPDATE records SET folder_id = ?1 WHERE folder_id = ?2",
            params![trash_folder_id, id],
        )?;
        tx.execute("DELETE FROM folders WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(moved)
    }

    // Record operations

    fn create_record(&self, new: &NewRecord, error_times_secs: &[f64]) -> Result<Record> {
        let now = Utc::now();
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO records (user_id, folder_id, name, trash, length_secs, audio_file, created_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6)",
            params![
                new.user_id,
                new.folder_id,
                new.name,
                new.length_secs,
                new.audio_file,
                format_datetime(&now),
            ],
        )?;
        let id = tx.last_insert_rowid();

        for time_secs in error_times_secs {
            tx.execute(
                "INSERT INTO mistakes (record_id, time_of_mistake, kind) VALUES (?1, ?2, ?3)",
                params![id, time_secs, MistakeKind::Recording.as_i64()],
            )?;
        }

        tx.commit()?;

        Ok(Record {
            id,
            user_id: new.user_id,
            folder_id: new.folder_id,
            name: new.name.clone(),
            trash: false,
            length_secs: Some(new.length_secs),
            audio_file: Some(new.audio_file.clone()),
            created_at: now,
        })
    }

    fn get_record(&self, id: i64) -> Result<Option<Record>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
            params![id],
            record_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_folder_records(&self, folder_id: i64) -> Result<Vec<Record>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records
             WHERE folder_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map(params![folder_id], record_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn rename_record(&self, id: i64, name: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE records SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn move_record_to_trash(&self, id: i64, trash_folder_id: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE records SET folder_id = ?1, trash = 1 WHERE id = ?2",
            params![trash_folder_id, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_record(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM records WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Mistake operations

    fn create_mistake(&self, new: &NewMistake) -> Result<Mistake> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO mistakes (record_id, time_of_mistake, kind) VALUES (?1, ?2, ?3)",
            params![new.record_id, new.time_secs, new.kind.as_i64()],
        )?;

        Ok(Mistake {
            id: conn.last_insert_rowid(),
            record_id: new.record_id,
            comment: None,
            time_of_mistake: Some(new.time_secs),
            kind: Some(new.kind),
        })
    }

    fn get_mistake(&self, id: i64) -> Result<Option<Mistake>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {MISTAKE_COLUMNS} FROM mistakes WHERE id = ?1"),
            params![id],
            mistake_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_record_mistakes(&self, record_id: i64) -> Result<Vec<Mistake>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {MISTAKE_COLUMNS} FROM mistakes
             WHERE record_id = ?1 ORDER BY time_of_mistake, id"
        ))?;

        let rows = stmt.query_map(params![record_id], mistake_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn find_mistake_by_time(&self, record_id: i64, time_secs: f64) -> Result<Option<Mistake>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {MISTAKE_COLUMNS} FROM mistakes
                 WHERE record_id = ?1 AND time_of_mistake = ?2 ORDER BY id LIMIT 1"
            ),
            params![record_id, time_secs],
            mistake_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_mistake_comment(&self, id: i64, comment: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE mistakes SET comment = ?1 WHERE id = ?2",
            params![comment, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_mistake(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM mistakes WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
