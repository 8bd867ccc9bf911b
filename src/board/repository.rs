//! Board namespace repository for anonboard.
//!
//! Boards are created implicitly the first time a thread is posted to them.

use super::types::{now_millis, BoardName};
use crate::db::DbPool;
use crate::{BoardError, Result};

/// Repository for board namespaces.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Look up a board's row ID by name.
    pub async fn find_id(&self, name: &BoardName) -> Result<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM boards WHERE name = ?")
            .bind(name.as_str())
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;
        Ok(id)
    }

    /// Return the board's ID, creating the board if it doesn't exist yet.
    ///
    /// New boards are refused once `max_boards` exist (0 = unlimited).
    /// The insert and the cap check are a single statement, so concurrent
    /// first posts to the same board agree on one row.
    pub async fn provision(&self, name: &BoardName, max_boards: u32) -> Result<i64> {
        sqlx::query(
            "INSERT INTO boards (name, created_on)
             SELECT ?, ? WHERE ? = 0 OR (SELECT COUNT(*) FROM boards) < ?
             ON CONFLICT(name) DO NOTHING",
        )
        .bind(name.as_str())
        .bind(now_millis())
        .bind(max_boards)
        .bind(max_boards)
        .execute(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        self.find_id(name)
            .await?
            .ok_or_else(|| BoardError::Validation("board limit reached".to_string()))
    }

    /// Count provisioned boards.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards")
            .fetch_one(self.pool)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;
        Ok(count)
    }
}
