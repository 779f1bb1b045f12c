use std::{fmt, sync::Arc};

use thiserror::Error;
use yomu_lib::models::ChapterInfo;

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
};

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cannot {action} while {state}")]
    InvalidTransition { state: String, action: &'static str },
    #[error(transparent)]
    Cache(#[from] ChapterCacheError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderState {
    Loading,
    Ready,
    Advancing { from: String, to: String },
    Error(String),
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderState::Loading => write!(f, "loading"),
            ReaderState::Ready => write!(f, "ready"),
            ReaderState::Advancing { from, to } => write!(f, "advancing from {from} to {to}"),
            ReaderState::Error(e) => write!(f, "failed ({e})"),
        }
    }
}

/// Outcome of a page turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTurn {
    Page(usize),
    NextChapter { chapter_id: String, index: usize },
    EndOfOrder,
}

/// One open chapter, its page list and the current page.
///
/// Every page change is persisted as reading progress. Turning past the last
/// page moves to the next chapter of the order captured when the reader was
/// entered; at the end of that order the session stays where it is.
pub struct ReadingSession<S>
where
    S: KeyValueStore + Clone,
{
    ctx: Arc<Context<S>>,
    state: ReaderState,
    chapter: Option<ChapterInfo>,
    pages: Vec<String>,
    current_page: usize,
    order: ChapterOrder,
}

impl<S> ReadingSession<S>
where
    S: KeyValueStore + Clone,
{
    pub fn new(ctx: Arc<Context<S>>) -> Self {
        Self {
            ctx,
            state: ReaderState::Loading,
            chapter: None,
            pages: vec![],
            current_page: 0,
            order: ChapterOrder::default(),
        }
    }

    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    pub fn chapter(&self) -> Option<&ChapterInfo> {
        self.chapter.as_ref()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn page_url(&self) -> Option<&str> {
        self.pages.get(self.current_page).map(String::as_str)
    }

    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.current_page + 1, self.pages.len())
    }

    /// Opens `chapter`, or the stored selected chapter when `None`
    pub async fn open(&mut self, chapter: Option<ChapterInfo>) -> Result<(), ReaderError> {
        self.state = ReaderState::Loading;

        let chapter = match chapter {
            Some(chapter) => Some(chapter),
            None => self.ctx.selection.get_selected_chapter().await?,
        };
        let Some(chapter) = chapter else {
            self.state = ReaderState::Error("no chapter selected".to_string());
            return Err(ReaderError::NotFound("no chapter selected".to_string()));
        };

        self.order = self
            .ctx
            .selection
            .get_chapter_order()
            .await?
            .unwrap_or_default();

        match self.load(chapter).await {
            Ok(()) => {
                self.state = ReaderState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = ReaderState::Error(e.to_string());
                Err(e)
            }
        }
    }

    async fn load(&mut self, chapter: ChapterInfo) -> Result<(), ReaderError> {
        let pages = self.ctx.chapters.download(&chapter.id).await?;

        let saved = self.ctx.chapters.progress(&chapter.id).await?;
        self.current_page = match saved {
            Some(progress) if progress.page < pages.len() => progress.page,
            _ => 0,
        };

        debug!(
            "opened chapter {} at page {}/{}",
            chapter.id,
            self.current_page + 1,
            pages.len()
        );
        self.pages = pages;
        self.chapter = Some(chapter);

        Ok(())
    }

    fn ensure_ready(&self, action: &'static str) -> Result<&ChapterInfo, ReaderError> {
        match (&self.state, &self.chapter) {
            (ReaderState::Ready, Some(chapter)) => Ok(chapter),
            (state, _) => Err(ReaderError::InvalidTransition {
                state: state.to_string(),
                action,
            }),
        }
    }

    async fn persist(&self, chapter_id: &str) -> Result<(), ReaderError> {
        let progress = ReadingProgress::new(self.current_page, Some(self.pages.len()));
        self.ctx.chapters.save_progress(chapter_id, &progress).await?;

        Ok(())
    }

    /// Jumps to `page`, clamped to the chapter
    pub async fn set_page(&mut self, page: usize) -> Result<usize, ReaderError> {
        let chapter_id = self.ensure_ready("change page")?.id.clone();

        self.current_page = page.min(self.pages.len().saturating_sub(1));
        self.persist(&chapter_id).await?;

        Ok(self.current_page)
    }

    pub async fn next_page(&mut self) -> Result<PageTurn, ReaderError> {
        self.ensure_ready("turn page")?;

        let position = ReadingProgress::new(self.current_page, Some(self.pages.len()));
        if !position.is_last_page() {
            let page = self.set_page(self.current_page + 1).await?;
            Ok(PageTurn::Page(page))
        } else {
            self.advance().await
        }
    }

    pub async fn prev_page(&mut self) -> Result<PageTurn, ReaderError> {
        let page = self.set_page(self.current_page.saturating_sub(1)).await?;

        Ok(PageTurn::Page(page))
    }

    /// Moves to the chapter after the current one in the captured order
    pub async fn advance(&mut self) -> Result<PageTurn, ReaderError> {
        let chapter_id = self.ensure_ready("advance")?.id.clone();
        self.persist(&chapter_id).await?;

        let Some((index, next_id)) = self.order.next_after(&chapter_id) else {
            info!("chapter {chapter_id} is the last of the order");
            return Ok(PageTurn::EndOfOrder);
        };
        let next_id = next_id.to_string();

        self.state = ReaderState::Advancing {
            from: chapter_id,
            to: next_id.clone(),
        };

        match self.switch_to(index, &next_id).await {
            Ok(()) => {
                self.state = ReaderState::Ready;
                Ok(PageTurn::NextChapter {
                    chapter_id: next_id,
                    index,
                })
            }
            Err(e) => {
                error!("failed to advance to chapter {next_id}: {e}");
                self.state = ReaderState::Error(e.to_string());
                Err(e)
            }
        }
    }

    async fn switch_to(&mut self, index: usize, chapter_id: &str) -> Result<(), ReaderError> {
        let chapter = ChapterInfo {
            ordinal: index,
            ..ChapterInfo::from_id(chapter_id)
        };

        let pages = self.ctx.chapters.download(chapter_id).await?;

        self.ctx
            .selection
            .set_current_chapter(&chapter, index)
            .await?;
        self.order.current = Some(index);
        self.pages = pages;
        self.chapter = Some(chapter);
        self.current_page = 0;
        self.persist(chapter_id).await?;

        Ok(())
    }
}
