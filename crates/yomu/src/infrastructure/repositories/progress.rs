use async_trait::async_trait;

use crate::domain::{
    entities::progress::ReadingProgress,
    repositories::{
        progress::ProgressRepository,
        store::{KeyValueStore, StorageError, StorageKey},
    },
};

#[derive(Clone)]
pub struct ProgressRepositoryImpl<S>
where
    S: KeyValueStore,
{
    store: S,
}

impl<S> ProgressRepositoryImpl<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn get_index(&self, key: StorageKey<'_>) -> Result<Option<usize>, StorageError> {
        let key = key.to_string();
        let value = self.store.get(&key).await?;

        Ok(value.and_then(|raw| match raw.trim().parse::<usize>() {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("ignoring malformed {key}={raw:?}: {e}");
                None
            }
        }))
    }
}

#[async_trait]
impl<S> ProgressRepository for ProgressRepositoryImpl<S>
where
    S: KeyValueStore,
{
    async fn get_progress(
        &self,
        chapter_id: &str,
    ) -> Result<Option<ReadingProgress>, StorageError> {
        let Some(page) = self
            .get_index(StorageKey::ReadingPosition(chapter_id))
            .await?
        else {
            return Ok(None);
        };
        let total = self.get_index(StorageKey::ReadingTotal(chapter_id)).await?;

        Ok(Some(ReadingProgress::new(page, total)))
    }

    async fn save_progress(
        &self,
        chapter_id: &str,
        progress: &ReadingProgress,
    ) -> Result<(), StorageError> {
        let mut entries = vec![(
            StorageKey::ReadingPosition(chapter_id).to_string(),
            progress.page.to_string(),
        )];
        if let Some(total) = progress.total {
            entries.push((
                StorageKey::ReadingTotal(chapter_id).to_string(),
                total.to_string(),
            ));
        }

        self.store.multi_set(&entries).await
    }

    async fn delete_progress(&self, chapter_id: &str) -> Result<(), StorageError> {
        self.store
            .multi_remove(&[
                StorageKey::ReadingPosition(chapter_id).to_string(),
                StorageKey::ReadingTotal(chapter_id).to_string(),
            ])
            .await
    }
}
