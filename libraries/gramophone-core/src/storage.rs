//! Storage traits consumed by the protocol layer

use crate::error::Result;
use crate::specid::SpecId;
use crate::types::{AnnotationTarget, Bookmark, PlayQueue, Rating, TranscodePreference, UserId};
use async_trait::async_trait;

/// Global key/value settings
///
/// Both operations are idempotent: setting the same key twice leaves a
/// single row holding the last value.
#[async_trait]
pub trait SettingStore: Send + Sync {
    /// Get a setting, [`crate::Error::NotFound`] if it was never set
    async fn get_setting(&self, key: &str) -> Result<String>;

    /// Insert or replace a setting
    async fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}

/// Per-user state, scoped to the user the context was created for
#[async_trait]
pub trait StorageContext: SettingStore {
    /// Get the current user ID
    fn user_id(&self) -> UserId;

    // ========================================================================
    // Play queue
    // ========================================================================

    /// Saved play queue, `None` if the user never saved one
    async fn get_play_queue(&self) -> Result<Option<PlayQueue>>;

    /// Replace the saved play queue (last writer wins)
    async fn save_play_queue(
        &self,
        items: &[SpecId],
        current: Option<SpecId>,
        position: i64,
        changed_by: &str,
    ) -> Result<PlayQueue>;

    // ========================================================================
    // Stars & ratings
    // ========================================================================

    async fn star(&self, target: AnnotationTarget) -> Result<()>;

    async fn unstar(&self, target: AnnotationTarget) -> Result<()>;

    /// Set or clear (`None`) the user's rating, refreshing the target's average
    async fn rate(&self, target: AnnotationTarget, rating: Option<Rating>) -> Result<()>;

    // ========================================================================
    // Bookmarks
    // ========================================================================

    async fn get_bookmarks(&self) -> Result<Vec<Bookmark>>;

    async fn save_bookmark(&self, entry: SpecId, position: i64, comment: &str) -> Result<Bookmark>;

    async fn delete_bookmark(&self, entry: SpecId) -> Result<()>;

    // ========================================================================
    // Transcoding
    // ========================================================================

    async fn get_transcode_preference(&self, client: &str) -> Result<Option<TranscodePreference>>;

    async fn set_transcode_preference(&self, client: &str, profile: &str) -> Result<()>;
}
