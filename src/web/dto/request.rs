//! Request DTOs for the board API.
//!
//! Every field defaults to empty so a missing field is reported by
//! validation instead of as a malformed body.

use serde::Deserialize;
use validator::Validate;

use super::validation::{delete_password_length, new_delete_password, post_text};

/// New thread request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    /// Opening post text.
    #[serde(default)]
    #[validate(custom(function = "post_text"))]
    pub text: String,
    /// Password needed to delete the thread later.
    #[serde(default)]
    #[validate(custom(function = "new_delete_password"))]
    pub delete_password: String,
}

/// Thread report request.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportThreadRequest {
    /// Thread to report. `report_id` is accepted as an alias.
    #[serde(default, alias = "report_id")]
    pub thread_id: String,
}

/// Thread deletion request.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteThreadRequest {
    /// Thread to delete.
    #[serde(default)]
    pub thread_id: String,
    /// Delete password given when the thread was created.
    #[serde(default)]
    #[validate(custom(function = "delete_password_length"))]
    pub delete_password: String,
}

/// New reply request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReplyRequest {
    /// Thread to reply to.
    #[serde(default)]
    pub thread_id: String,
    /// Reply text.
    #[serde(default)]
    #[validate(custom(function = "post_text"))]
    pub text: String,
    /// Password needed to delete the reply later.
    #[serde(default)]
    #[validate(custom(function = "new_delete_password"))]
    pub delete_password: String,
}

/// Query string for fetching a whole thread.
#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    /// Thread to fetch.
    pub thread_id: Option<String>,
}

/// Reply report request.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportReplyRequest {
    /// Thread containing the reply.
    #[serde(default)]
    pub thread_id: String,
    /// Reply to report.
    #[serde(default)]
    pub reply_id: String,
}

/// Reply deletion request.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteReplyRequest {
    /// Thread containing the reply.
    #[serde(default)]
    pub thread_id: String,
    /// Reply to delete.
    #[serde(default)]
    pub reply_id: String,
    /// Delete password given when the reply was posted.
    #[serde(default)]
    #[validate(custom(function = "delete_password_length"))]
    pub delete_password: String,
}
