//! Bookmarks (resume positions)

use super::UserId;
use crate::specid::SpecId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved position within any playable entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub user_id: UserId,
    /// Position in milliseconds
    pub position: i64,
    pub comment: String,
    /// Referenced entity, stored as kind name plus id
    pub entry: SpecId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
