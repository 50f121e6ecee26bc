//! Per-client transcode preferences

use super::UserId;
use serde::{Deserialize, Serialize};

/// Transcode profile a user picked for one client application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodePreference {
    pub user_id: UserId,
    pub client: String,
    pub profile: String,
}
