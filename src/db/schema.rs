//! Database schema for anonboard.
//!
//! Every statement is idempotent and runs each time the database is opened.

/// Schema statements, executed in order.
pub const SCHEMA: &[&str] = &[
    // One row per provisioned board namespace
    r#"
CREATE TABLE IF NOT EXISTS boards (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_on  INTEGER NOT NULL            -- unix millis
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS threads (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    id              TEXT NOT NULL UNIQUE,   -- uuid
    board_id        INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    text            TEXT NOT NULL,
    created_on      INTEGER NOT NULL,
    bumped_on       INTEGER NOT NULL,
    reported        INTEGER NOT NULL DEFAULT 0,
    delete_password TEXT NOT NULL,          -- Argon2 PHC string
    replycount      INTEGER NOT NULL DEFAULT 0
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_threads_board_bump ON threads(board_id, bumped_on DESC, seq DESC)",
    // Replies keep their insertion order through seq
    r#"
CREATE TABLE IF NOT EXISTS replies (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    id              TEXT NOT NULL UNIQUE,
    thread_id       TEXT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
    text            TEXT NOT NULL,
    created_on      INTEGER NOT NULL,
    reported        INTEGER NOT NULL DEFAULT 0,
    delete_password TEXT NOT NULL
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_replies_thread ON replies(thread_id, seq)",
];
