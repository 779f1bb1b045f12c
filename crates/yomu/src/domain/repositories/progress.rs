use async_trait::async_trait;

use crate::domain::{entities::progress::ReadingProgress, repositories::store::StorageError};

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn get_progress(&self, chapter_id: &str)
    -> Result<Option<ReadingProgress>, StorageError>;

    async fn save_progress(
        &self,
        chapter_id: &str,
        progress: &ReadingProgress,
    ) -> Result<(), StorageError>;

    async fn delete_progress(&self, chapter_id: &str) -> Result<(), StorageError>;
}
