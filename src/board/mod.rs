//! Board module for anonboard.
//!
//! This module provides the anonymous board itself:
//! - Board namespaces, provisioned on first post and bounded by policy
//! - Threads and their embedded replies
//! - Reporting and password-gated deletion

mod reply_repository;
mod repository;
mod service;
mod thread_repository;
mod types;

pub use reply_repository::ReplyRepository;
pub use repository::BoardRepository;
pub use service::{BoardService, DeleteOutcome, REPLY_PREVIEW_LIMIT, THREAD_LIST_LIMIT};
pub use thread_repository::ThreadRepository;
pub use types::{
    parse_id, validate_delete_password, validate_text, BoardName, BoardPolicy, NewReply,
    NewThread, Reply, Thread, MAX_BOARD_NAME_LENGTH, MAX_DELETE_PASSWORD_LENGTH, MAX_TEXT_LENGTH,
    TOMBSTONE,
};
