//! Reply repository for anonboard.

use uuid::Uuid;

use super::types::{from_millis, now_millis, stored_uuid, NewReply, Reply, TOMBSTONE};
use crate::db::DbPool;
use crate::{BoardError, Result};

/// Repository for replies embedded in threads.
pub struct ReplyRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ReplyRepository<'a> {
    /// Create a new ReplyRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Append a reply to a thread.
    ///
    /// The reply insert, the replycount increment and the bump happen in one
    /// transaction. Returns `NotFound("thread")` if the board has no such thread.
    pub async fn append(
        &self,
        board_id: i64,
        thread_id: Uuid,
        new_reply: &NewReply,
    ) -> Result<Reply> {
        let reply = Reply {
            id: Uuid::new_v4(),
            text: new_reply.text.clone(),
            created_on: from_millis(now_millis())?,
            delete_password: new_reply.delete_password.clone(),
            reported: false,
        };
        let created_ms = reply.created_on.timestamp_millis();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;

        let updated = sqlx::query(
            "UPDATE threads SET replycount = replycount + 1, bumped_on = MAX(bumped_on, ?)
             WHERE board_id = ? AND id = ?",
        )
        .bind(created_ms)
        .bind(board_id)
        .bind(thread_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        if updated.rows_affected() == 0 {
            return Err(BoardError::NotFound("thread".to_string()));
        }

        sqlx::query(
            "INSERT INTO replies (id, thread_id, text, created_on, reported, delete_password)
             VALUES (?, ?, ?, ?, 0, ?)",
        )
        .bind(reply.id.to_string())
        .bind(thread_id.to_string())
        .bind(&reply.text)
        .bind(created_ms)
        .bind(&reply.delete_password)
        .execute(&mut *tx)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;

        Ok(reply)
    }

    /// Get a reply by thread and reply ID.
    pub async fn find(&self, thread_id: Uuid, reply_id: Uuid) -> Result<Option<Reply>> {
        let row: Option<ReplyRow> = sqlx::query_as(
            "SELECT id, text, created_on, reported, delete_password
             FROM replies WHERE thread_id = ? AND id = ?",
        )
        .bind(thread_id.to_string())
        .bind(reply_id.to_string())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        row.map(ReplyRow::into_reply).transpose()
    }

    /// List every reply of a thread in insertion order.
    pub async fn list_for_thread(&self, thread_id: Uuid) -> Result<Vec<Reply>> {
        let rows: Vec<ReplyRow> = sqlx::query_as(
            "SELECT id, text, created_on, reported, delete_password
             FROM replies WHERE thread_id = ? ORDER BY seq",
        )
        .bind(thread_id.to_string())
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        rows.into_iter().map(ReplyRow::into_reply).collect()
    }

    /// List the newest `limit` replies of a thread, still in insertion order.
    pub async fn list_recent(&self, thread_id: Uuid, limit: i64) -> Result<Vec<Reply>> {
        let rows: Vec<ReplyRow> = sqlx::query_as(
            "SELECT id, text, created_on, reported, delete_password
             FROM replies WHERE thread_id = ? ORDER BY seq DESC LIMIT ?",
        )
        .bind(thread_id.to_string())
        .bind(limit)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardError::Database(e.to_string()))?;

        let mut replies = rows
            .into_iter()
            .map(ReplyRow::into_reply)
            .collect::<Result<Vec<_>>>()?;
        replies.reverse();
        Ok(replies)
    }

    /// Flag a reply as reported. Returns false if no such reply exists in the thread.
    pub async fn report(&self, thread_id: Uuid, reply_id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE replies SET reported = 1 WHERE thread_id = ? AND id = ?")
            .bind(thread_id.to_string())
            .bind(reply_id.to_string())
            .execute(self.pool)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a reply's text with the tombstone. Returns false if no such reply exists.
    pub async fn tombstone(&self, thread_id: Uuid, reply_id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE replies SET text = ? WHERE thread_id = ? AND id = ?")
            .bind(TOMBSTONE)
            .bind(thread_id.to_string())
            .bind(reply_id.to_string())
            .execute(self.pool)
            .await
            .map_err(|e| BoardError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Internal struct for mapping database rows to Reply.
#[derive(sqlx::FromRow)]
struct ReplyRow {
    id: String,
    text: String,
    created_on: i64,
    reported: bool,
    delete_password: String,
}

impl ReplyRow {
    fn into_reply(self) -> Result<Reply> {
        Ok(Reply {
            id: stored_uuid(&self.id)?,
            text: self.text,
            created_on: from_millis(self.created_on)?,
            delete_password: self.delete_password,
            reported: self.reported,
        })
    }
}
