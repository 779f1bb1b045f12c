use async_trait::async_trait;
use yomu_lib::models::{ChapterInfo, LibraryEntry};

use crate::domain::{entities::selection::ChapterOrder, repositories::store::StorageError};

/// What the user picked last: the manga, the chapter and the chapter order
/// the reader was entered with.
#[async_trait]
pub trait SelectionRepository: Send + Sync {
    async fn get_selected_manga(&self) -> Result<Option<LibraryEntry>, StorageError>;

    async fn set_selected_manga(&self, manga: &LibraryEntry) -> Result<(), StorageError>;

    async fn get_selected_chapter(&self) -> Result<Option<ChapterInfo>, StorageError>;

    async fn set_selected_chapter(&self, chapter: &ChapterInfo) -> Result<(), StorageError>;

    async fn get_chapter_order(&self) -> Result<Option<ChapterOrder>, StorageError>;

    async fn set_chapter_order(&self, order: &ChapterOrder) -> Result<(), StorageError>;

    /// Moves the selection to `chapter` at `index` of the stored order in a
    /// single write
    async fn set_current_chapter(
        &self,
        chapter: &ChapterInfo,
        index: usize,
    ) -> Result<(), StorageError>;
}
