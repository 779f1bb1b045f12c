use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("serialize error: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("other error: {0}")]
    Other(String),
}

/// String keyed persistence shared by every screen. Values are opaque
/// strings; typed repositories own the encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    async fn multi_set(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }

        Ok(())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key).await?;
        }

        Ok(())
    }
}

/// Every key the application writes. Keys are only ever built here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey<'a> {
    AccessToken,
    RefreshToken,
    ClientId,
    ClientSecret,
    SelectedManga,
    SelectedChapter,
    ChaptersOrder,
    CurrentChapterIndex,
    ChapterPages(&'a str),
    ReadingPosition(&'a str),
    ReadingTotal(&'a str),
}

impl fmt::Display for StorageKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKey::AccessToken => write!(f, "mangadex_token"),
            StorageKey::RefreshToken => write!(f, "mangadex_refresh_token"),
            StorageKey::ClientId => write!(f, "mangadex_client_id"),
            StorageKey::ClientSecret => write!(f, "mangadex_client_secret"),
            StorageKey::SelectedManga => write!(f, "selected_manga"),
            StorageKey::SelectedChapter => write!(f, "selected_chapter"),
            StorageKey::ChaptersOrder => write!(f, "chapters_order"),
            StorageKey::CurrentChapterIndex => write!(f, "current_chapter_index"),
            StorageKey::ChapterPages(id) => write!(f, "chapter_pages_{id}"),
            StorageKey::ReadingPosition(id) => write!(f, "reading_pos_{id}"),
            StorageKey::ReadingTotal(id) => write!(f, "reading_total_{id}"),
        }
    }
}
