use async_trait::async_trait;

use crate::domain::repositories::store::StorageError;

#[async_trait]
pub trait ChapterPagesRepository: Send + Sync {
    async fn get_chapter_pages(&self, chapter_id: &str)
    -> Result<Option<Vec<String>>, StorageError>;

    /// Replaces the whole page list of a chapter
    async fn save_chapter_pages(
        &self,
        chapter_id: &str,
        pages: &[String],
    ) -> Result<(), StorageError>;

    async fn delete_chapter_pages(&self, chapter_id: &str) -> Result<(), StorageError>;
}
