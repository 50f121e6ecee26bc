//! Play history types

use super::{AlbumId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated plays of one album by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub id: i64,
    pub user_id: UserId,
    pub album_id: AlbumId,
    /// Time of the most recent play
    pub time: DateTime<Utc>,
    pub count: i64,
    /// Accumulated listening length in seconds
    pub length: i64,
}
