use std::{collections::HashSet, sync::Arc};

use thiserror::Error;
use yomu_lib::{models::PageQuality, traits::Catalog};

use crate::domain::{
    entities::progress::ReadingProgress,
    repositories::{
        chapter_pages::ChapterPagesRepository, progress::ProgressRepository, store::StorageError,
    },
};

#[derive(Debug, Error)]
pub enum ChapterCacheError {
    #[error("catalog error: {0}")]
    Catalog(#[from] yomu_lib::error::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("chapter {0} has no pages")]
    EmptyChapter(String),
}

/// Downloaded page lists and reading progress, per chapter
pub struct ChapterCacheService<P, G>
where
    P: ChapterPagesRepository,
    G: ProgressRepository,
{
    pages_repo: P,
    progress_repo: G,
    catalog: Arc<dyn Catalog>,
    quality: PageQuality,
}

impl<P, G> ChapterCacheService<P, G>
where
    P: ChapterPagesRepository,
    G: ProgressRepository,
{
    pub fn new(
        pages_repo: P,
        progress_repo: G,
        catalog: Arc<dyn Catalog>,
        quality: PageQuality,
    ) -> Self {
        Self {
            pages_repo,
            progress_repo,
            catalog,
            quality,
        }
    }

    pub async fn is_downloaded(&self, chapter_id: &str) -> Result<bool, ChapterCacheError> {
        Ok(self.pages_repo.get_chapter_pages(chapter_id).await?.is_some())
    }

    /// Cached page list, fetched and stored on a miss
    pub async fn download(&self, chapter_id: &str) -> Result<Vec<String>, ChapterCacheError> {
        if let Some(pages) = self.pages_repo.get_chapter_pages(chapter_id).await? {
            debug!("chapter {chapter_id} served from cache");
            return Ok(pages);
        }

        self.fetch(chapter_id).await
    }

    /// Fetches again and replaces whatever was cached
    pub async fn redownload(&self, chapter_id: &str) -> Result<Vec<String>, ChapterCacheError> {
        self.fetch(chapter_id).await
    }

    async fn fetch(&self, chapter_id: &str) -> Result<Vec<String>, ChapterCacheError> {
        let pages = self.catalog.pages(chapter_id, self.quality).await?;
        if pages.is_empty() {
            return Err(ChapterCacheError::EmptyChapter(chapter_id.to_string()));
        }

        self.pages_repo.save_chapter_pages(chapter_id, &pages).await?;
        info!("downloaded chapter {chapter_id} ({} pages)", pages.len());

        Ok(pages)
    }

    pub async fn remove(&self, chapter_id: &str) -> Result<(), ChapterCacheError> {
        self.pages_repo.delete_chapter_pages(chapter_id).await?;
        self.progress_repo.delete_progress(chapter_id).await?;

        info!("removed chapter {chapter_id}");
        Ok(())
    }

    pub async fn list_downloaded(&self, chapter_ids: &[String]) -> HashSet<String> {
        let mut downloaded = HashSet::new();
        for chapter_id in chapter_ids {
            match self.pages_repo.get_chapter_pages(chapter_id).await {
                Ok(Some(_)) => {
                    downloaded.insert(chapter_id.clone());
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("treating chapter {chapter_id} as not downloaded: {e}");
                }
            }
        }

        downloaded
    }

    pub async fn progress(
        &self,
        chapter_id: &str,
    ) -> Result<Option<ReadingProgress>, ChapterCacheError> {
        Ok(self.progress_repo.get_progress(chapter_id).await?)
    }

    pub async fn save_progress(
        &self,
        chapter_id: &str,
        progress: &ReadingProgress,
    ) -> Result<(), ChapterCacheError> {
        Ok(self.progress_repo.save_progress(chapter_id, progress).await?)
    }
}
