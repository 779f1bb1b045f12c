use async_trait::async_trait;

use crate::domain::repositories::{
    chapter_pages::ChapterPagesRepository,
    store::{KeyValueStore, StorageError, StorageKey},
};

#[derive(Clone)]
pub struct ChapterPagesRepositoryImpl<S>
where
    S: KeyValueStore,
{
    store: S,
}

impl<S> ChapterPagesRepositoryImpl<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> ChapterPagesRepository for ChapterPagesRepositoryImpl<S>
where
    S: KeyValueStore,
{
    async fn get_chapter_pages(
        &self,
        chapter_id: &str,
    ) -> Result<Option<Vec<String>>, StorageError> {
        let Some(raw) = self
            .store
            .get(&StorageKey::ChapterPages(chapter_id).to_string())
            .await?
        else {
            return Ok(None);
        };

        let pages: Vec<String> = serde_json::from_str(&raw)?;
        Ok(Some(pages).filter(|pages| !pages.is_empty()))
    }

    async fn save_chapter_pages(
        &self,
        chapter_id: &str,
        pages: &[String],
    ) -> Result<(), StorageError> {
        if pages.is_empty() {
            return Err(StorageError::Other(format!(
                "refusing to cache an empty page list for chapter {chapter_id}"
            )));
        }

        let raw = serde_json::to_string(pages)?;
        self.store
            .set(&StorageKey::ChapterPages(chapter_id).to_string(), &raw)
            .await
    }

    async fn delete_chapter_pages(&self, chapter_id: &str) -> Result<(), StorageError> {
        self.store
            .remove(&StorageKey::ChapterPages(chapter_id).to_string())
            .await
    }
}
