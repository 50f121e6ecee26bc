use crate::{bookmarks, play_queues, ratings, settings, stars, transcode_preferences};
use async_trait::async_trait;
use gramophone_core::storage::{SettingStore, StorageContext};
use gramophone_core::types::{AnnotationTarget, Bookmark, PlayQueue, Rating, TranscodePreference, UserId};
use gramophone_core::{Result, SpecId};
use sqlx::SqlitePool;

/// `SQLite` backed storage scoped to one user
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
    user_id: UserId,
}

impl LocalStorageContext {
    #[must_use]
    pub fn new(pool: SqlitePool, user_id: UserId) -> Self {
        Self { pool, user_id }
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SettingStore for LocalStorageContext {
    async fn get_setting(&self, key: &str) -> Result<String> {
        settings::get_setting(&self.pool, key).await
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        settings::set_setting(&self.pool, key, value).await
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    // Play queue
    async fn get_play_queue(&self) -> Result<Option<PlayQueue>> {
        play_queues::find(&self.pool, self.user_id).await
    }

    async fn save_play_queue(
        &self,
        items: &[SpecId],
        current: Option<SpecId>,
        position: i64,
        changed_by: &str,
    ) -> Result<PlayQueue> {
        play_queues::save(&self.pool, self.user_id, items, current, position, changed_by).await
    }

    // Stars & ratings
    async fn star(&self, target: AnnotationTarget) -> Result<()> {
        stars::star(&self.pool, self.user_id, target).await.map(|_| ())
    }

    async fn unstar(&self, target: AnnotationTarget) -> Result<()> {
        stars::unstar(&self.pool, self.user_id, target).await.map(|_| ())
    }

    async fn rate(&self, target: AnnotationTarget, rating: Option<Rating>) -> Result<()> {
        match rating {
            Some(rating) => ratings::set(&self.pool, self.user_id, target, i64::from(rating.get()))
                .await
                .map(|_| ()),
            None => ratings::clear(&self.pool, self.user_id, target).await.map(|_| ()),
        }
    }

    // Bookmarks
    async fn get_bookmarks(&self) -> Result<Vec<Bookmark>> {
        bookmarks::get_by_user(&self.pool, self.user_id).await
    }

    async fn save_bookmark(&self, entry: SpecId, position: i64, comment: &str) -> Result<Bookmark> {
        bookmarks::save(&self.pool, self.user_id, entry, position, comment).await
    }

    async fn delete_bookmark(&self, entry: SpecId) -> Result<()> {
        bookmarks::delete(&self.pool, self.user_id, entry).await.map(|_| ())
    }

    // Transcoding
    async fn get_transcode_preference(&self, client: &str) -> Result<Option<TranscodePreference>> {
        transcode_preferences::get(&self.pool, self.user_id, client).await
    }

    async fn set_transcode_preference(&self, client: &str, profile: &str) -> Result<()> {
        transcode_preferences::set(&self.pool, self.user_id, client, profile).await
    }
}
