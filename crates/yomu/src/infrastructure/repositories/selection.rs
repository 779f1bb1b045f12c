use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use yomu_lib::models::{ChapterInfo, LibraryEntry};

use crate::domain::{
    entities::selection::ChapterOrder,
    repositories::{
        selection::SelectionRepository,
        store::{KeyValueStore, StorageError, StorageKey},
    },
};

#[derive(Clone)]
pub struct SelectionRepositoryImpl<S>
where
    S: KeyValueStore,
{
    store: S,
}

impl<S> SelectionRepositoryImpl<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        key: StorageKey<'_>,
    ) -> Result<Option<T>, StorageError> {
        match self.store.get(&key.to_string()).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        key: StorageKey<'_>,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&key.to_string(), &raw).await
    }
}

#[async_trait]
impl<S> SelectionRepository for SelectionRepositoryImpl<S>
where
    S: KeyValueStore,
{
    async fn get_selected_manga(&self) -> Result<Option<LibraryEntry>, StorageError> {
        self.get_json(StorageKey::SelectedManga).await
    }

    async fn set_selected_manga(&self, manga: &LibraryEntry) -> Result<(), StorageError> {
        self.set_json(StorageKey::SelectedManga, manga).await
    }

    async fn get_selected_chapter(&self) -> Result<Option<ChapterInfo>, StorageError> {
        self.get_json(StorageKey::SelectedChapter).await
    }

    async fn set_selected_chapter(&self, chapter: &ChapterInfo) -> Result<(), StorageError> {
        self.set_json(StorageKey::SelectedChapter, chapter).await
    }

    async fn get_chapter_order(&self) -> Result<Option<ChapterOrder>, StorageError> {
        let Some(chapter_ids) = self
            .get_json::<Vec<String>>(StorageKey::ChaptersOrder)
            .await?
        else {
            return Ok(None);
        };

        let current = self
            .store
            .get(&StorageKey::CurrentChapterIndex.to_string())
            .await?
            .and_then(|raw| raw.trim().parse::<usize>().ok());

        Ok(Some(ChapterOrder::new(chapter_ids, current)))
    }

    async fn set_chapter_order(&self, order: &ChapterOrder) -> Result<(), StorageError> {
        let mut entries = vec![(
            StorageKey::ChaptersOrder.to_string(),
            serde_json::to_string(&order.chapter_ids)?,
        )];

        match order.current {
            Some(current) => {
                entries.push((
                    StorageKey::CurrentChapterIndex.to_string(),
                    current.to_string(),
                ));
                self.store.multi_set(&entries).await
            }
            None => {
                self.store.multi_set(&entries).await?;
                self.store
                    .remove(&StorageKey::CurrentChapterIndex.to_string())
                    .await
            }
        }
    }

    async fn set_current_chapter(
        &self,
        chapter: &ChapterInfo,
        index: usize,
    ) -> Result<(), StorageError> {
        self.store
            .multi_set(&[
                (
                    StorageKey::SelectedChapter.to_string(),
                    serde_json::to_string(chapter)?,
                ),
                (
                    StorageKey::CurrentChapterIndex.to_string(),
                    index.to_string(),
                ),
            ])
            .await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::store::MemoryStore;

    #[tokio::test]
    async fn test_selected_manga_roundtrip() {
        let repo = SelectionRepositoryImpl::new(MemoryStore::new());
        assert_eq!(repo.get_selected_manga().await.unwrap(), None);

        let manga = LibraryEntry {
            id: "m1".to_string(),
            title: "Frieren".to_string(),
            cover_url: None,
        };
        repo.set_selected_manga(&manga).await.unwrap();

        assert_eq!(repo.get_selected_manga().await.unwrap(), Some(manga));
    }

    #[tokio::test]
    async fn test_chapter_order_is_stored_under_two_keys() {
        let store = MemoryStore::new();
        let repo = SelectionRepositoryImpl::new(store.clone());
        let order = ChapterOrder::new(vec!["c1".to_string(), "c2".to_string()], Some(1));

        repo.set_chapter_order(&order).await.unwrap();

        assert_eq!(
            store.get("chapters_order").await.unwrap().as_deref(),
            Some(r#"["c1","c2"]"#)
        );
        assert_eq!(
            store.get("current_chapter_index").await.unwrap().as_deref(),
            Some("1")
        );
        assert_eq!(repo.get_chapter_order().await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn test_set_current_chapter_moves_selection() {
        let repo = SelectionRepositoryImpl::new(MemoryStore::new());
        repo.set_chapter_order(&ChapterOrder::new(
            vec!["c1".to_string(), "c2".to_string()],
            Some(0),
        ))
        .await
        .unwrap();

        repo.set_current_chapter(&ChapterInfo::from_id("c2"), 1)
            .await
            .unwrap();

        assert_eq!(
            repo.get_selected_chapter().await.unwrap().map(|c| c.id),
            Some("c2".to_string())
        );
        assert_eq!(
            repo.get_chapter_order().await.unwrap().and_then(|o| o.current),
            Some(1)
        );
    }
}
