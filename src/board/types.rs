//! Board, thread and reply models for anonboard.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::config::BoardsConfig;
use crate::{BoardError, Result};

/// Maximum length for a board name (in characters).
pub const MAX_BOARD_NAME_LENGTH: usize = 32;

/// Maximum length for thread and reply text (in characters).
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum length for a delete password (in characters).
pub const MAX_DELETE_PASSWORD_LENGTH: usize = 128;

/// Text that replaces a reply's body once it has been deleted.
pub const TOMBSTONE: &str = "[deleted]";

/// A validated board name.
///
/// Board names come straight from the URL, so only `[A-Za-z0-9_-]` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardName(String);

impl BoardName {
    /// Parse and validate a board name.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() || name.len() > MAX_BOARD_NAME_LENGTH {
            return Err(BoardError::Validation(format!(
                "board name must be 1 to {MAX_BOARD_NAME_LENGTH} characters"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(BoardError::Validation(
                "board name may only contain letters, digits, '_' and '-'".to_string(),
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rules deciding which board namespaces may exist.
#[derive(Debug, Clone, Default)]
pub struct BoardPolicy {
    allowed: HashSet<String>,
    max_boards: u32,
}

impl BoardPolicy {
    /// Create a policy. An empty allow-list accepts every valid name;
    /// `max_boards == 0` means no cap.
    pub fn new(allowed: impl IntoIterator<Item = String>, max_boards: u32) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            max_boards,
        }
    }

    /// Build the policy from configuration.
    pub fn from_config(config: &BoardsConfig) -> Self {
        Self::new(config.allowed.iter().cloned(), config.max_boards)
    }

    /// Validate a raw board name against the sanitization rule and the allow-list.
    pub fn check(&self, name: &str) -> Result<BoardName> {
        let board = BoardName::parse(name)?;
        if !self.allowed.is_empty() && !self.allowed.contains(board.as_str()) {
            return Err(BoardError::Validation(format!("unknown board: {board}")));
        }
        Ok(board)
    }

    /// Maximum number of boards that may be provisioned (0 = unlimited).
    pub fn max_boards(&self) -> u32 {
        self.max_boards
    }
}

/// A reply embedded in a thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Unique reply ID.
    pub id: Uuid,
    /// Reply body, or [`TOMBSTONE`] once deleted.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Argon2 hash of the delete password.
    pub delete_password: String,
    /// Whether the reply has been reported.
    pub reported: bool,
}

impl Reply {
    /// Whether this reply has been deleted.
    pub fn is_tombstoned(&self) -> bool {
        self.text == TOMBSTONE
    }
}

/// A top-level thread with its replies.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    /// Unique thread ID.
    pub id: Uuid,
    /// Opening post text.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Sort timestamp, moved forward by every new reply.
    pub bumped_on: DateTime<Utc>,
    /// Whether the thread has been reported.
    pub reported: bool,
    /// Argon2 hash of the delete password.
    pub delete_password: String,
    /// Replies in insertion order. Listing queries may hold only the newest few.
    pub replies: Vec<Reply>,
    /// Total number of replies ever added.
    pub replycount: i64,
}

/// Data for creating a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// Opening post text.
    pub text: String,
    /// Already-hashed delete password.
    pub delete_password: String,
}

impl NewThread {
    /// Create a new thread from text and a password hash.
    pub fn new(text: impl Into<String>, delete_password: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delete_password: delete_password.into(),
        }
    }
}

/// Data for creating a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    /// Reply text.
    pub text: String,
    /// Already-hashed delete password.
    pub delete_password: String,
}

impl NewReply {
    /// Create a new reply from text and a password hash.
    pub fn new(text: impl Into<String>, delete_password: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delete_password: delete_password.into(),
        }
    }
}

/// Check thread or reply text.
///
/// Text must not be blank, must not contain control characters other than
/// line breaks and tabs, and is limited to [`MAX_TEXT_LENGTH`] characters.
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(BoardError::Validation("text is required".to_string()));
    }
    if text
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(BoardError::Validation(
            "text must not contain control characters".to_string(),
        ));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(BoardError::Validation(format!(
            "text must be at most {MAX_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Check a plaintext delete password given at posting time.
pub fn validate_delete_password(password: &str) -> Result<()> {
    let length = password.chars().count();
    if length == 0 || length > MAX_DELETE_PASSWORD_LENGTH {
        return Err(BoardError::Validation(format!(
            "delete_password must be 1 to {MAX_DELETE_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Parse a thread or reply ID from request input.
///
/// Malformed IDs are reported as missing `entity`, the same as unknown ones.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| BoardError::NotFound(entity.to_string()))
}

/// Current time in the store's resolution (milliseconds).
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a stored millisecond timestamp back into a `DateTime`.
pub(crate) fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| BoardError::Database(format!("invalid timestamp: {ms}")))
}

/// Convert a stored UUID string back into a `Uuid`.
pub(crate) fn stored_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| BoardError::Database(format!("invalid stored id: {raw}")))
}
