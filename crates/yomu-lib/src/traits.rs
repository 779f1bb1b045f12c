use async_trait::async_trait;

use crate::error::Error;
use crate::models::{ChapterInfo, ChapterQuery, ClientCredentials, LibraryEntry, PageQuality, Token};

/// Remote catalog. Implementations hold no state besides connection settings;
/// tokens are passed in and returned, persisting them is up to the caller.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn login(
        &self,
        username: &str,
        password: &str,
        credentials: &ClientCredentials,
    ) -> Result<Token, Error>;

    async fn refresh(
        &self,
        refresh_token: &str,
        credentials: &ClientCredentials,
    ) -> Result<Token, Error>;

    async fn library(&self, access_token: &str) -> Result<Vec<LibraryEntry>, Error>;

    async fn chapters(
        &self,
        manga_id: &str,
        query: &ChapterQuery,
    ) -> Result<Vec<ChapterInfo>, Error>;

    async fn pages(&self, chapter_id: &str, quality: PageQuality) -> Result<Vec<String>, Error>;
}
