//! Saved playback queue, one per user
//!
//! The queue is persisted as a single comma separated string of identifier
//! tokens. Each entry decodes on its own: a token that no longer decodes
//! (typically a reference to something since deleted) is dropped without
//! affecting the rest of the queue.

use super::UserId;
use crate::specid::SpecId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ITEM_SEPARATOR: &str = ",";

/// A user's saved play queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayQueue {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: UserId,
    /// Token of the entry being played
    pub current: String,
    /// Position within `current`, in milliseconds
    pub position: i64,
    /// Client that wrote the queue last (display only)
    pub changed_by: String,
    /// Serialized item tokens
    pub items: String,
}

impl PlayQueue {
    /// Empty queue for `user_id`
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: 0,
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
            user_id,
            current: String::new(),
            position: 0,
            changed_by: String::new(),
            items: String::new(),
        }
    }

    /// Decoded current entry, `None` if absent or malformed
    #[must_use]
    pub fn current_sid(&self) -> Option<SpecId> {
        SpecId::decode(&self.current).ok()
    }

    pub fn set_current(&mut self, current: Option<SpecId>) {
        self.current = current.map(|sid| sid.encode()).unwrap_or_default();
    }

    /// Decoded items in stored order
    #[must_use]
    pub fn get_items(&self) -> Vec<SpecId> {
        split_ids(&self.items)
    }

    pub fn set_items(&mut self, items: &[SpecId]) {
        self.items = join_ids(items);
    }
}

/// Decode a serialized queue, skipping entries that do not decode
#[must_use]
pub fn split_ids(serialized: &str) -> Vec<SpecId> {
    if serialized.is_empty() {
        return Vec::new();
    }
    serialized
        .split(ITEM_SEPARATOR)
        .filter_map(|token| match SpecId::decode(token) {
            Ok(sid) => Some(sid),
            Err(err) => {
                tracing::warn!(%token, error = %err, "Dropping undecodable queue entry");
                None
            }
        })
        .collect()
}

/// Serialize a queue
#[must_use]
pub fn join_ids(items: &[SpecId]) -> String {
    items
        .iter()
        .map(SpecId::encode)
        .collect::<Vec<_>>()
        .join(ITEM_SEPARATOR)
}
