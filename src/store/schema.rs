pub const SCHEMA: &str = r#"
-- Users own everything below; never deleted in normal operation
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    login TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,      -- argon2id PHC string with embedded salt
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Login sessions; the raw bearer token is never stored
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,         -- argon2id hash of the full token
    token_lookup TEXT NOT NULL,       -- short prefix for indexed lookup
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,                  -- NULL = never
    last_used_at TEXT
);

-- Folders group records; two names per user are reserved ("Drafts", "Trash").
-- The at-most-one invariant for reserved names is enforced at call sites,
-- not by a constraint.
CREATE TABLE IF NOT EXISTS folders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Audio takes. folder_id deliberately has no ON DELETE action: folder
-- deletion must migrate records into Trash before removing the folder row.
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    folder_id INTEGER NOT NULL REFERENCES folders(id),
    name TEXT NOT NULL,
    trash INTEGER NOT NULL DEFAULT 0,
    length_secs REAL,                 -- duration in seconds
    audio_file TEXT,                  -- file name inside the uploads dir
    created_at TEXT DEFAULT (datetime('now'))
);

-- Timestamped annotations; removed together with their record
CREATE TABLE IF NOT EXISTS mistakes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id INTEGER NOT NULL REFERENCES records(id) ON DELETE CASCADE,
    comment TEXT,
    time_of_mistake REAL,             -- seconds from the start of the take
    kind INTEGER                      -- 1 = recording-time, 2 = playback-time
);

-- Create indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_lookup ON sessions(token_lookup);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_folders_user ON folders(user_id);
CREATE INDEX IF NOT EXISTS idx_records_folder ON records(folder_id);
CREATE INDEX IF NOT EXISTS idx_records_user ON records(user_id);
CREATE INDEX IF NOT EXISTS idx_mistakes_record ON mistakes(record_id);
"#;
