//! Wire format: `{task_id, query|text, type, priority, metadata}`,
//! transport headers `x-retry-count`, `x-task-id`, `x-priority`,
//! `x-sent-timestamp`, persistent delivery mode.
//!
//! Follows `backend/messaging/producer.py`'s `Message` dataclass and
//! `_publish` header construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unit of work as it travels over the broker. Internally tagged so the
/// `query`/`text` field name tracks the message kind even though both
/// variants share everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkMessage {
    Single {
        task_id: String,
        query: String,
        priority: u8,
        #[serde(default)]
        metadata: Value,
    },
    Batch {
        task_id: String,
        text: String,
        priority: u8,
        #[serde(default)]
        metadata: Value,
    },
}

impl WorkMessage {
    pub fn task_id(&self) -> &str {
        match self {
            WorkMessage::Single { task_id, .. } => task_id,
            WorkMessage::Batch { task_id, .. } => task_id,
        }
    }

    pub fn priority(&self) -> u8 {
        match self {
            WorkMessage::Single { priority, .. } => *priority,
            WorkMessage::Batch { priority, .. } => *priority,
        }
    }
}
