//! Response DTOs for the board API.
//!
//! Views never carry `reported` or `delete_password`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::board::{Reply, Thread};

/// Public view of a reply.
#[derive(Debug, Serialize)]
pub struct ReplyView {
    /// Reply ID.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Reply text (or the tombstone).
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
}

impl From<Reply> for ReplyView {
    fn from(reply: Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text,
            created_on: reply.created_on,
        }
    }
}

/// Public view of a thread.
#[derive(Debug, Serialize)]
pub struct ThreadView {
    /// Thread ID.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Opening post text.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last bump timestamp.
    pub bumped_on: DateTime<Utc>,
    /// Replies, see [`ThreadView::summary`] and [`ThreadView::full`] for order.
    pub replies: Vec<ReplyView>,
    /// Total number of replies.
    pub replycount: i64,
}

impl ThreadView {
    /// Board listing view: the reply preview, newest first.
    pub fn summary(thread: Thread) -> Self {
        let mut view = Self::full(thread);
        view.replies.reverse();
        view
    }

    /// Thread page view: every reply in posting order.
    pub fn full(thread: Thread) -> Self {
        Self {
            id: thread.id,
            text: thread.text,
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies: thread.replies.into_iter().map(ReplyView::from).collect(),
            replycount: thread.replycount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn reply(text: &str) -> Reply {
        Reply {
            id: Uuid::new_v4(),
            text: text.to_string(),
            created_on: Utc::now(),
            delete_password: "$argon2id$secret".to_string(),
            reported: true,
        }
    }

    fn thread(replies: Vec<Reply>) -> Thread {
        let now = Utc::now();
        Thread {
            id: Uuid::new_v4(),
            text: "Test".to_string(),
            created_on: now,
            bumped_on: now,
            reported: true,
            delete_password: "$argon2id$secret".to_string(),
            replycount: replies.len() as i64,
            replies,
        }
    }

    #[test]
    fn test_hidden_fields_not_serialized() {
        let view = ThreadView::full(thread(vec![reply("a")]));
        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("_id").is_some());
        assert!(json.get("id").is_none());
        assert!(json.get("reported").is_none());
        assert!(json.get("delete_password").is_none());

        let first = &json["replies"][0];
        assert!(first.get("_id").is_some());
        assert!(first.get("reported").is_none());
        assert!(first.get("delete_password").is_none());
    }

    #[test]
    fn test_summary_is_newest_first() {
        let view = ThreadView::summary(thread(vec![reply("a"), reply("b"), reply("c")]));
        let texts: Vec<_> = view.replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_full_keeps_posting_order() {
        let view = ThreadView::full(thread(vec![reply("a"), reply("b")]));
        let texts: Vec<_> = view.replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_timestamps_are_rfc3339() {
        let view = ThreadView::full(thread(Vec::new()));
        let json = serde_json::to_value(&view).unwrap();
        let created = json["created_on"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created).is_ok());
        assert_eq!(json["replycount"], Value::from(0));
    }
}
