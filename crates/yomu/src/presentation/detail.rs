use std::sync::Arc;

use thiserror::Error;
use yomu_lib::models::{ChapterInfo, LibraryEntry};

use crate::{
    context::Context,
    domain::{
        entities::{progress::ReadingProgress, selection::ChapterOrder},
        repositories::{
            selection::SelectionRepository,
            store::{KeyValueStore, StorageError},
        },
        services::chapter_cache::ChapterCacheError,
    },
    presentation::Route,
};

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("chapter {0} is already downloading")]
    DownloadInProgress(String),
    #[error(transparent)]
    Cache(#[from] ChapterCacheError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRow {
    pub chapter: ChapterInfo,
    pub downloaded: bool,
    pub progress: Option<ReadingProgress>,
    pub error: Option<String>,
}

impl ChapterRow {
    pub fn display_label(&self) -> String {
        display_label(&self.chapter)
    }
}

pub fn display_label(chapter: &ChapterInfo) -> String {
    let number = chapter.number.as_deref().filter(|n| !n.is_empty());
    let title = chapter.title.as_deref().filter(|t| !t.is_empty());

    match (number, title) {
        (Some(number), Some(title)) => format!("Chapter {number} - {title}"),
        (Some(number), None) => format!("Chapter {number}"),
        (None, Some(title)) => title.to_string(),
        (None, None) => "Chapter".to_string(),
    }
}

pub struct DetailScreen<S>
where
    S: KeyValueStore + Clone,
{
    ctx: Arc<Context<S>>,
    manga: Option<LibraryEntry>,
    rows: Vec<ChapterRow>,
    error: Option<String>,
    downloading: Option<String>,
}

impl<S> DetailScreen<S>
where
    S: KeyValueStore + Clone,
{
    pub fn new(ctx: Arc<Context<S>>) -> Self {
        Self {
            ctx,
            manga: None,
            rows: vec![],
            error: None,
            downloading: None,
        }
    }

    pub fn manga(&self) -> Option<&LibraryEntry> {
        self.manga.as_ref()
    }

    pub fn rows(&self) -> &[ChapterRow] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Loads the selected manga's chapters with their download and progress
    pub async fn load(&mut self) -> Result<Route, DetailError> {
        self.rows.clear();
        self.error = None;

        let Some(manga) = self.ctx.selection.get_selected_manga().await? else {
            warn!("no manga selected");
            return Ok(Route::Library);
        };

        let chapters = match self
            .ctx
            .catalog
            .chapters(&manga.id, &self.ctx.settings.chapter_query)
            .await
        {
            Ok(chapters) => chapters,
            Err(e) => {
                error!("failed to load chapters of {}: {e}", manga.id);
                self.error = Some(e.to_string());
                self.manga = Some(manga);
                return Ok(Route::Detail);
            }
        };

        let ids: Vec<String> = chapters.iter().map(|c| c.id.clone()).collect();
        let downloaded = self.ctx.chapters.list_downloaded(&ids).await;

        let mut rows = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            let progress = self
                .ctx
                .chapters
                .progress(&chapter.id)
                .await
                .unwrap_or_else(|e| {
                    warn!("ignoring progress of {}: {e}", chapter.id);
                    None
                });
            rows.push(ChapterRow {
                downloaded: downloaded.contains(&chapter.id),
                chapter,
                progress,
                error: None,
            });
        }

        self.rows = rows;
        self.manga = Some(manga);

        Ok(Route::Detail)
    }

    fn row(&self, index: usize) -> Result<&ChapterRow, DetailError> {
        self.rows
            .get(index)
            .ok_or_else(|| DetailError::NotFound(format!("no chapter at {index}")))
    }

    pub async fn download(&mut self, index: usize) -> Result<(), DetailError> {
        self.fetch(index, false).await
    }

    /// Fetches the page list again, replacing a cached one
    pub async fn redownload(&mut self, index: usize) -> Result<(), DetailError> {
        self.fetch(index, true).await
    }

    /// Only one download runs at a time, others are rejected
    async fn fetch(&mut self, index: usize, replace: bool) -> Result<(), DetailError> {
        let chapter_id = self.row(index)?.chapter.id.clone();
        if let Some(current) = &self.downloading {
            return Err(DetailError::DownloadInProgress(current.clone()));
        }

        self.downloading = Some(chapter_id.clone());
        let res = if replace {
            self.ctx.chapters.redownload(&chapter_id).await
        } else {
            self.ctx.chapters.download(&chapter_id).await
        };
        self.downloading = None;

        let row = &mut self.rows[index];
        match res {
            Ok(_) => {
                row.downloaded = true;
                row.error = None;
                Ok(())
            }
            Err(e) => {
                row.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn remove(&mut self, index: usize) -> Result<(), DetailError> {
        let chapter_id = self.row(index)?.chapter.id.clone();

        let res = self.ctx.chapters.remove(&chapter_id).await;
        let row = &mut self.rows[index];
        match res {
            Ok(()) => {
                row.downloaded = false;
                row.progress = None;
                row.error = None;
                Ok(())
            }
            Err(e) => {
                row.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Captures the chapter order and selected chapter, then routes to the reader
    pub async fn open(&self, index: usize) -> Result<Route, DetailError> {
        let row = self.row(index)?;
        let order = ChapterOrder::new(
            self.rows.iter().map(|r| r.chapter.id.clone()).collect(),
            Some(index),
        );

        self.ctx.selection.set_chapter_order(&order).await?;
        self.ctx.selection.set_selected_chapter(&row.chapter).await?;

        Ok(Route::Reader)
    }

    pub fn render(&self) -> String {
        let mut out = match &self.manga {
            Some(manga) => {
                let mut header = format!("== {} ==\n", manga.title);
                if let Some(cover) = &manga.cover_url {
                    header.push_str(&format!("cover: {cover}\n"));
                }
                header
            }
            None => String::from("== Chapters ==\n"),
        };
        if let Some(e) = &self.error {
            out.push_str(&format!("error: {e}\n"));
        }
        if let Some(id) = &self.downloading {
            out.push_str(&format!("downloading {id}...\n"));
        }
        for (i, row) in self.rows.iter().enumerate() {
            let mut line = format!("{i:>3}. {}", row.display_label());
            if row.downloaded {
                line.push_str(" [downloaded]");
            }
            if let Some(progress) = &row.progress {
                line.push_str(&format!(" [page {}]", progress.page + 1));
            }
            if let Some(e) = &row.error {
                line.push_str(&format!(" (error: {e})"));
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{MockCatalog, context, library_entry};

    async fn screen(catalog: MockCatalog) -> DetailScreen<crate::infrastructure::store::MemoryStore> {
        let (ctx, _) = context(Arc::new(catalog));
        ctx.selection
            .set_selected_manga(&library_entry("m1", "Chainsaw Man"))
            .await
            .unwrap();
        DetailScreen::new(ctx)
    }

    #[test]
    fn test_display_label() {
        let mut chapter = ChapterInfo::from_id("c1");
        assert_eq!(display_label(&chapter), "Chapter");

        chapter.title = Some("Dog & Chainsaw".to_string());
        assert_eq!(display_label(&chapter), "Dog & Chainsaw");

        chapter.number = Some("1".to_string());
        assert_eq!(display_label(&chapter), "Chapter 1 - Dog & Chainsaw");

        chapter.title = Some(String::new());
        assert_eq!(display_label(&chapter), "Chapter 1");
    }

    #[tokio::test]
    async fn test_load_annotates_rows() {
        let mut screen = screen(
            MockCatalog::default()
                .with_chapters(&["c1", "c2"])
                .with_pages("c1", 3),
        )
        .await;
        screen.ctx.chapters.download("c1").await.unwrap();
        screen
            .ctx
            .chapters
            .save_progress("c1", &ReadingProgress::new(1, Some(3)))
            .await
            .unwrap();

        assert_eq!(screen.load().await.unwrap(), Route::Detail);

        assert_eq!(screen.rows().len(), 2);
        assert!(screen.rows()[0].downloaded);
        assert_eq!(screen.rows()[0].progress, Some(ReadingProgress::new(1, Some(3))));
        assert!(!screen.rows()[1].downloaded);
        assert_eq!(screen.rows()[1].progress, None);
    }

    #[tokio::test]
    async fn test_load_without_selection_goes_back() {
        let (ctx, _) = context(Arc::new(MockCatalog::default()));
        let mut screen = DetailScreen::new(ctx);

        assert_eq!(screen.load().await.unwrap(), Route::Library);
    }

    #[tokio::test]
    async fn test_feed_failure_stays_on_screen() {
        let mut screen = screen(MockCatalog {
            fail_chapters: true,
            ..Default::default()
        })
        .await;

        assert_eq!(screen.load().await.unwrap(), Route::Detail);
        assert!(screen.error().is_some());
        assert!(screen.rows().is_empty());
    }

    #[tokio::test]
    async fn test_download_and_remove() {
        let mut screen = screen(
            MockCatalog::default()
                .with_chapters(&["c1", "c2"])
                .with_pages("c1", 3),
        )
        .await;
        screen.load().await.unwrap();

        screen.download(0).await.unwrap();
        assert!(screen.rows()[0].downloaded);

        // c2 has no pages in the catalog, the failure stays on its row
        assert!(screen.download(1).await.is_err());
        assert!(screen.rows()[1].error.is_some());
        assert!(screen.rows()[0].error.is_none());

        screen.remove(0).await.unwrap();
        assert!(!screen.rows()[0].downloaded);
        assert!(!screen.ctx.chapters.is_downloaded("c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_redownload_replaces_cached_pages() {
        let catalog = Arc::new(
            MockCatalog::default()
                .with_chapters(&["c1"])
                .with_pages("c1", 2),
        );
        let (ctx, _) = context(catalog.clone());
        ctx.selection
            .set_selected_manga(&library_entry("m1", "Chainsaw Man"))
            .await
            .unwrap();
        let mut screen = DetailScreen::new(ctx);
        screen.load().await.unwrap();

        screen.download(0).await.unwrap();
        screen.download(0).await.unwrap();
        assert_eq!(catalog.page_calls(), 1);
        screen.redownload(0).await.unwrap();
        assert_eq!(catalog.page_calls(), 2);

        assert!(screen.rows()[0].downloaded);
        assert!(screen.rows()[0].error.is_none());

        screen.downloading = Some("c1".to_string());
        assert!(matches!(
            screen.redownload(0).await,
            Err(DetailError::DownloadInProgress(_))
        ));
    }

    #[tokio::test]
    async fn test_render_shows_cover() {
        let (ctx, _) = context(Arc::new(MockCatalog::default().with_chapters(&["c1"])));
        ctx.selection
            .set_selected_manga(&LibraryEntry {
                cover_url: Some("https://uploads.example.org/covers/m1/a.png.256.jpg".to_string()),
                ..library_entry("m1", "Chainsaw Man")
            })
            .await
            .unwrap();
        let mut screen = DetailScreen::new(ctx);
        screen.load().await.unwrap();

        let out = screen.render();
        assert!(out.contains("== Chainsaw Man =="));
        assert!(out.contains("cover: https://uploads.example.org/covers/m1/a.png.256.jpg"));
    }

    #[tokio::test]
    async fn test_second_download_is_rejected_while_one_runs() {
        let mut screen = screen(
            MockCatalog::default()
                .with_chapters(&["c1", "c2"])
                .with_pages("c1", 1)
                .with_pages("c2", 1),
        )
        .await;
        screen.load().await.unwrap();
        screen.downloading = Some("c1".to_string());

        let err = screen.download(1).await.unwrap_err();

        assert!(matches!(err, DetailError::DownloadInProgress(id) if id == "c1"));
        assert!(!screen.rows()[1].downloaded);
    }

    #[tokio::test]
    async fn test_open_captures_order() {
        let mut screen = screen(MockCatalog::default().with_chapters(&["c1", "c2", "c3"])).await;
        screen.load().await.unwrap();

        assert_eq!(screen.open(1).await.unwrap(), Route::Reader);

        let order = screen.ctx.selection.get_chapter_order().await.unwrap().unwrap();
        assert_eq!(order.chapter_ids, vec!["c1", "c2", "c3"]);
        assert_eq!(order.current, Some(1));
        let selected = screen.ctx.selection.get_selected_chapter().await.unwrap().unwrap();
        assert_eq!(selected.id, "c2");

        assert!(matches!(screen.open(9).await, Err(DetailError::NotFound(_))));
    }
}
