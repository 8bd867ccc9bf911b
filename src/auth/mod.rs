//! Authentication module for anonboard.
//!
//! Posts are anonymous; the only credential is the per-post delete password.

mod password;

pub use password::{hash_password, verify_password, PasswordError, PasswordGuard};
