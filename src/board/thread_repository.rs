//! Thread repository for anonboard.
//!
//! Threads are stored one row per thread; their replies live in the
//! `replies` table and are attached when a thread is loaded.

use uuid::Uuid;

use super::reply_repository::ReplyRepository;
use super::types::{from_millis, now_millis, stored_uuid, NewThread, Thread};
use crate::db::DbPool;
use crate::{BoardError, Result};

/// Repository for thread CRUD operations.
pub struct ThreadRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ThreadRepository<'a> {
    /// Create a new ThreadRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new thread on a board.
    ///
    /// `created_on` and `bumped_on` are set to the same instant.
    pub async fn create(&self, board_id: i64, new_thread: &NewThread) -> Result<Thread> {
        let now = now_millis();
        let thread = Thread {
            id: Uuid::new_v4(),
            text: new_thread.text.clone(),
            created_on: from_millis(now)?,
            bumped_on: from_millis(now)?,
            reported: false,
            delete_password: new_thread.delete_password.clone(),
            replies: Vec::new(),
            replycount: 0,
        };

        sqlx::query(
            "INSERT INTO threads (id, board_id, text, created_on, bumped_on, reported, delete_password, replycount)
             VALUES (?, ?, ?, ?, ?, 0, ?, 0)",
        )
        .bind(thread.id.to_string())
        .bind(board_id)
        .bind(&thread.text)
        .bind(now)
        .bind(now)
        .bind(&thread.delete_password)
        .execute(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        Ok(thread)
    }

    /// Get a board's thread by ID with all of its replies.
    pub async fn get(&self, board_id: i64, id: Uuid) -> Result<Option<Thread>> {
        let row: Option<ThreadRow> = sqlx::query_as(
            "SELECT id, text, created_on, bumped_on, reported, delete_password, replycount
             FROM threads WHERE board_id = ? AND id = ?",
        )
        .bind(board_id)
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut thread = row.into_thread()?;
        thread.replies = ReplyRepository::new(self.pool).list_for_thread(id).await?;
        Ok(Some(thread))
    }

    /// Check whether a thread exists on a board.
    pub async fn exists(&self, board_id: i64, id: Uuid) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM threads WHERE board_id = ? AND id = ?)",
        )
        .bind(board_id)
        .bind(id.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;
        Ok(exists.0)
    }

    /// Get a thread's stored delete-password hash.
    pub async fn password_hash(&self, board_id: i64, id: Uuid) -> Result<Option<String>> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT delete_password FROM threads WHERE board_id = ? AND id = ?")
                .bind(board_id)
                .bind(id.to_string())
                .fetch_optional(self.pool)
                .await
                .map_err(|e| BoardError::Database(e.to_string()))?;
        Ok(hash)
    }

    /// List the most recently bumped threads of a board.
    ///
    /// Threads are ordered by `bumped_on` descending, ties broken by newest
    /// insertion. Each thread carries only its newest `reply_limit` replies.
    pub async fn list_recent(
        &self,
        board_id: i64,
        limit: i64,
        reply_limit: i64,
    ) -> Result<Vec<Thread>> {
        let rows: Vec<ThreadRow> = sqlx::query_as(
            "SELECT id, text, created_on, bumped_on, reported, delete_password, replycount
             FROM threads WHERE board_id = ?
             ORDER BY bumped_on DESC, seq DESC
             LIMIT ?",
        )
        .bind(board_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        let replies = ReplyRepository::new(self.pool);
        let mut threads = Vec::with_capacity(rows.len());
        for row in rows {
            let mut thread = row.into_thread()?;
            thread.replies = replies.list_recent(thread.id, reply_limit).await?;
            threads.push(thread);
        }
        Ok(threads)
    }

    /// Flag a thread as reported. Returns false if the thread doesn't exist.
    pub async fn report(&self, board_id: i64, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE threads SET reported = 1 WHERE board_id = ? AND id = ?")
            .bind(board_id)
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a thread and its replies. Returns false if the thread doesn't exist.
    pub async fn delete(&self, board_id: i64, id: Uuid) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;

        let result = sqlx::query("DELETE FROM threads WHERE board_id = ? AND id = ?")
            .bind(board_id)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;

        if result.rows_affected() > 0 {
            sqlx::query("DELETE FROM replies WHERE thread_id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| BoardError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Internal struct for mapping database rows to Thread.
#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: String,
    text: String,
    created_on: i64,
    bumped_on: i64,
    reported: bool,
    delete_password: String,
    replycount: i64,
}

impl ThreadRow {
    fn into_thread(self) -> Result<Thread> {
        Ok(Thread {
            id: stored_uuid(&self.id)?,
            text: self.text,
            created_on: from_millis(self.created_on)?,
            bumped_on: from_millis(self.bumped_on)?,
            reported: self.reported,
            delete_password: self.delete_password,
            replies: Vec::new(),
            replycount: self.replycount,
        })
    }
}
