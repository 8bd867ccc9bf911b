//! Board service for anonboard.
//!
//! This module provides the thread and reply operations behind the HTTP
//! routes: input validation, board resolution, delete-password hashing and
//! the moderation rules for reports and deletion.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::reply_repository::ReplyRepository;
use super::repository::BoardRepository;
use super::thread_repository::ThreadRepository;
use super::types::{
    parse_id, validate_delete_password, validate_text, BoardPolicy, NewReply, NewThread, Reply,
    Thread,
};
use crate::auth::PasswordGuard;
use crate::config::Config;
use crate::db::Database;
use crate::{BoardError, Result};

/// Number of threads returned by a board listing.
pub const THREAD_LIST_LIMIT: i64 = 10;

/// Number of replies previewed per thread in a board listing.
pub const REPLY_PREVIEW_LIMIT: i64 = 3;

/// Result of a password-gated delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The password matched and the content was removed.
    Deleted,
    /// The password did not match; nothing changed.
    IncorrectPassword,
}

/// Service for thread and reply operations.
#[derive(Clone)]
pub struct BoardService {
    db: Database,
    guard: PasswordGuard,
    policy: BoardPolicy,
    store_timeout: Duration,
}

impl BoardService {
    /// Create a new BoardService.
    pub fn new(
        db: Database,
        guard: PasswordGuard,
        policy: BoardPolicy,
        store_timeout: Duration,
    ) -> Self {
        Self {
            db,
            guard,
            policy,
            store_timeout,
        }
    }

    /// Create a BoardService from configuration.
    pub fn from_config(db: Database, config: &Config) -> Result<Self> {
        let guard = PasswordGuard::new(&config.password)?;
        Ok(Self::new(
            db,
            guard,
            BoardPolicy::from_config(&config.boards),
            Duration::from_millis(config.boards.store_timeout_ms),
        ))
    }

    /// Run a store call under the configured timeout.
    async fn store<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Store call exceeded {:?}", self.store_timeout);
                Err(BoardError::Timeout("store call".to_string()))
            }
        }
    }

    /// Resolve an existing board's ID. Unknown boards have no threads.
    async fn board_id(&self, board: &str) -> Result<Option<i64>> {
        let name = self.policy.check(board)?;
        self.store(BoardRepository::new(self.db.pool()).find_id(&name))
            .await
    }

    /// Resolve a board and a thread ID, failing with `NotFound("thread")`
    /// if either is unknown or the ID is malformed.
    async fn existing_thread(&self, board: &str, thread_id: &str) -> Result<(i64, Uuid)> {
        let id = parse_id(thread_id, "thread")?;
        let board_id = self
            .board_id(board)
            .await?
            .ok_or_else(|| BoardError::NotFound("thread".to_string()))?;

        let exists = self
            .store(ThreadRepository::new(self.db.pool()).exists(board_id, id))
            .await?;
        if !exists {
            return Err(BoardError::NotFound("thread".to_string()));
        }
        Ok((board_id, id))
    }

    /// Start a new thread on a board, creating the board on first use.
    pub async fn create_thread(&self, board: &str, text: &str, password: &str) -> Result<Thread> {
        validate_text(text)?;
        validate_delete_password(password)?;
        let name = self.policy.check(board)?;

        let hash = self.guard.hash(password).await?;

        let boards = BoardRepository::new(self.db.pool());
        let board_id = self
            .store(boards.provision(&name, self.policy.max_boards()))
            .await?;

        let new_thread = NewThread::new(text, hash);
        let thread = self
            .store(ThreadRepository::new(self.db.pool()).create(board_id, &new_thread))
            .await?;

        info!("Thread {} created on /{}/", thread.id, name);
        Ok(thread)
    }

    /// List the most recently bumped threads of a board, each with a
    /// preview of its newest replies.
    pub async fn list_threads(&self, board: &str) -> Result<Vec<Thread>> {
        let Some(board_id) = self.board_id(board).await? else {
            return Ok(Vec::new());
        };
        self.store(ThreadRepository::new(self.db.pool()).list_recent(
            board_id,
            THREAD_LIST_LIMIT,
            REPLY_PREVIEW_LIMIT,
        ))
        .await
    }

    /// Flag a thread as reported. No password is required.
    pub async fn report_thread(&self, board: &str, thread_id: &str) -> Result<()> {
        let id = parse_id(thread_id, "thread")?;
        let board_id = self
            .board_id(board)
            .await?
            .ok_or_else(|| BoardError::NotFound("thread".to_string()))?;

        let reported = self
            .store(ThreadRepository::new(self.db.pool()).report(board_id, id))
            .await?;
        if !reported {
            return Err(BoardError::NotFound("thread".to_string()));
        }

        info!("Thread {} reported on /{}/", id, board);
        Ok(())
    }

    /// Delete a thread and its replies if the password matches.
    pub async fn delete_thread(
        &self,
        board: &str,
        thread_id: &str,
        password: &str,
    ) -> Result<DeleteOutcome> {
        let id = parse_id(thread_id, "thread")?;
        let board_id = self
            .board_id(board)
            .await?
            .ok_or_else(|| BoardError::NotFound("thread".to_string()))?;

        let threads = ThreadRepository::new(self.db.pool());
        let hash = self
            .store(threads.password_hash(board_id, id))
            .await?
            .ok_or_else(|| BoardError::NotFound("thread".to_string()))?;

        if !self.guard.verify(password, &hash).await? {
            info!("Incorrect password for thread {} on /{}/", id, board);
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        // A concurrent delete with the same password may have won
        if !self.store(threads.delete(board_id, id)).await? {
            return Err(BoardError::NotFound("thread".to_string()));
        }

        info!("Thread {} deleted from /{}/", id, board);
        Ok(DeleteOutcome::Deleted)
    }

    /// Add a reply to a thread, bumping it.
    pub async fn add_reply(
        &self,
        board: &str,
        thread_id: &str,
        text: &str,
        password: &str,
    ) -> Result<Reply> {
        validate_text(text)?;
        validate_delete_password(password)?;
        let (board_id, id) = self.existing_thread(board, thread_id).await?;

        let hash = self.guard.hash(password).await?;

        let new_reply = NewReply::new(text, hash);
        let reply = self
            .store(ReplyRepository::new(self.db.pool()).append(board_id, id, &new_reply))
            .await?;

        debug!("Reply {} added to thread {}", reply.id, id);
        Ok(reply)
    }

    /// Get a thread with all of its replies.
    pub async fn get_thread(&self, board: &str, thread_id: &str) -> Result<Thread> {
        let id = parse_id(thread_id, "thread")?;
        let board_id = self
            .board_id(board)
            .await?
            .ok_or_else(|| BoardError::NotFound("thread".to_string()))?;

        self.store(ThreadRepository::new(self.db.pool()).get(board_id, id))
            .await?
            .ok_or_else(|| BoardError::NotFound("thread".to_string()))
    }

    /// Flag a reply as reported. No password is required.
    pub async fn report_reply(&self, board: &str, thread_id: &str, reply_id: &str) -> Result<()> {
        let (_, thread) = self.existing_thread(board, thread_id).await?;
        let reply = parse_id(reply_id, "reply")?;

        let reported = self
            .store(ReplyRepository::new(self.db.pool()).report(thread, reply))
            .await?;
        if !reported {
            return Err(BoardError::NotFound("reply".to_string()));
        }

        info!("Reply {} in thread {} reported", reply, thread);
        Ok(())
    }

    /// Replace a reply's text with the tombstone if the password matches.
    ///
    /// The reply stays in the thread, so reply counts don't change.
    pub async fn delete_reply(
        &self,
        board: &str,
        thread_id: &str,
        reply_id: &str,
        password: &str,
    ) -> Result<DeleteOutcome> {
        let (_, thread) = self.existing_thread(board, thread_id).await?;
        let reply_id = parse_id(reply_id, "reply")?;

        let replies = ReplyRepository::new(self.db.pool());
        let reply = self
            .store(replies.find(thread, reply_id))
            .await?
            .ok_or_else(|| BoardError::NotFound("reply".to_string()))?;

        if !self.guard.verify(password, &reply.delete_password).await? {
            info!("Incorrect password for reply {} in thread {}", reply_id, thread);
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        if !self.store(replies.tombstone(thread, reply_id)).await? {
            return Err(BoardError::NotFound("reply".to_string()));
        }

        info!("Reply {} in thread {} deleted", reply_id, thread);
        Ok(DeleteOutcome::Deleted)
    }
}
