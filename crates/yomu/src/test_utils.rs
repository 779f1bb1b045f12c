use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use yomu_lib::{
    error::Error,
    models::{ChapterInfo, ChapterQuery, ClientCredentials, LibraryEntry, PageQuality, Token},
    traits::Catalog,
};

use crate::{
    context::{Context, Settings},
    infrastructure::store::MemoryStore,
};

/// In memory catalog with call counters
#[derive(Default)]
pub struct MockCatalog {
    pub library: Vec<LibraryEntry>,
    pub chapters: Vec<ChapterInfo>,
    pub pages: HashMap<String, Vec<String>>,
    /// library only succeeds with this token
    pub valid_access_token: Option<String>,
    pub login_token: Option<Token>,
    /// `None` makes every refresh fail
    pub refresh_result: Option<Token>,
    pub fail_chapters: bool,
    pub page_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub library_calls: AtomicUsize,
}

impl MockCatalog {
    pub fn with_pages(mut self, chapter_id: &str, count: usize) -> Self {
        let pages = (1..=count)
            .map(|n| format!("https://cdn.example.org/data/{chapter_id}/{n}.png"))
            .collect();
        self.pages.insert(chapter_id.to_string(), pages);
        self
    }

    pub fn with_chapters(mut self, ids: &[&str]) -> Self {
        self.chapters = ids
            .iter()
            .enumerate()
            .map(|(ordinal, id)| ChapterInfo {
                number: Some(format!("{}", ordinal + 1)),
                ordinal,
                ..ChapterInfo::from_id(*id)
            })
            .collect();
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn library_calls(&self) -> usize {
        self.library_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn login(
        &self,
        username: &str,
        password: &str,
        _credentials: &ClientCredentials,
    ) -> Result<Token, Error> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(Error::Auth("username and password are required".to_string()));
        }

        self.login_token
            .clone()
            .ok_or_else(|| Error::Auth("invalid credentials".to_string()))
    }

    async fn refresh(
        &self,
        _refresh_token: &str,
        _credentials: &ClientCredentials,
    ) -> Result<Token, Error> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_result
            .clone()
            .ok_or_else(|| Error::Auth("refresh rejected".to_string()))
    }

    async fn library(&self, access_token: &str) -> Result<Vec<LibraryEntry>, Error> {
        self.library_calls.fetch_add(1, Ordering::SeqCst);
        match &self.valid_access_token {
            Some(valid) if valid == access_token => Ok(self.library.clone()),
            _ => Err(Error::Unauthorized),
        }
    }

    async fn chapters(
        &self,
        manga_id: &str,
        _query: &ChapterQuery,
    ) -> Result<Vec<ChapterInfo>, Error> {
        if self.fail_chapters {
            return Err(Error::Http {
                status: Some(503),
                message: format!("feed of {manga_id} unavailable"),
            });
        }

        Ok(self.chapters.clone())
    }

    async fn pages(&self, chapter_id: &str, _quality: PageQuality) -> Result<Vec<String>, Error> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(chapter_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("chapter {chapter_id}")))
    }
}

pub fn library_entry(id: &str, title: &str) -> LibraryEntry {
    LibraryEntry {
        id: id.to_string(),
        title: title.to_string(),
        cover_url: None,
    }
}

pub fn token(access: &str, refresh: Option<&str>) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_in: Some(900),
    }
}

/// Context over a fresh memory store, returning the store for inspection
pub fn context(catalog: Arc<MockCatalog>) -> (Arc<Context<MemoryStore>>, MemoryStore) {
    let store = MemoryStore::new();
    let ctx = Context::new(store.clone(), catalog, Settings::default());
    (ctx, store)
}
