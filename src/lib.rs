//! anonboard - Anonymous message board API
//!
//! Threads and replies grouped into boards, with reporting and deletion
//! gated by a per-post password.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{hash_password, verify_password, PasswordError, PasswordGuard};
pub use board::{BoardService, DeleteOutcome, Reply, Thread};
pub use config::Config;
pub use db::Database;
pub use error::{BoardError, Result};
