/// User domain type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub name: String,
    /// Opaque credential string, never logged
    #[serde(skip_serializing)]
    pub password: String,
    pub lastfm_session: Option<String>,
    pub listenbrainz_url: Option<String>,
    pub listenbrainz_token: Option<String>,
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Vec<u8>>,
}

/// Data for creating a new user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub password: String,
    pub is_admin: bool,
}

/// Data for updating a user (only provided fields change)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub password: Option<String>,
    pub listenbrainz_url: Option<String>,
    pub listenbrainz_token: Option<String>,
    pub is_admin: Option<bool>,
    pub avatar: Option<Vec<u8>>,
}
