use std::sync::Arc;

use crate::{
    application::reader::{PageTurn, ReaderError, ReaderState, ReadingSession},
    context::Context,
    domain::repositories::store::KeyValueStore,
    presentation::{Route, detail::display_label},
};

pub struct ReaderScreen<S>
where
    S: KeyValueStore + Clone,
{
    session: ReadingSession<S>,
    notice: Option<String>,
}

impl<S> ReaderScreen<S>
where
    S: KeyValueStore + Clone,
{
    pub fn new(ctx: Arc<Context<S>>) -> Self {
        Self {
            session: ReadingSession::new(ctx),
            notice: None,
        }
    }

    pub fn session(&self) -> &ReadingSession<S> {
        &self.session
    }

    /// Opens the stored selected chapter, back to the chapter list on failure
    pub async fn open(&mut self) -> Route {
        self.notice = None;
        match self.session.open(None).await {
            Ok(()) => Route::Reader,
            Err(e @ ReaderError::NotFound(_)) => {
                warn!("{e}");
                Route::Detail
            }
            Err(e) => {
                error!("failed to open chapter: {e}");
                self.notice = Some(e.to_string());
                Route::Reader
            }
        }
    }

    pub async fn next(&mut self) -> Result<(), ReaderError> {
        let turn = self.session.next_page().await?;
        self.notice = match turn {
            PageTurn::Page(_) => None,
            PageTurn::NextChapter { chapter_id, .. } => Some(format!("moved on to {chapter_id}")),
            PageTurn::EndOfOrder => Some("last chapter reached".to_string()),
        };
        Ok(())
    }

    pub async fn prev(&mut self) -> Result<(), ReaderError> {
        self.session.prev_page().await?;
        self.notice = None;
        Ok(())
    }

    /// `page` is 1-based, as shown in the footer
    pub async fn goto(&mut self, page: usize) -> Result<(), ReaderError> {
        self.session.set_page(page.saturating_sub(1)).await?;
        self.notice = None;
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = match self.session.chapter() {
            Some(chapter) => format!("== {} ==\n", display_label(chapter)),
            None => String::from("== Reader ==\n"),
        };
        match self.session.state() {
            ReaderState::Ready => {
                if let Some(url) = self.session.page_url() {
                    out.push_str(url);
                    out.push('\n');
                }
                out.push_str(&self.session.progress_label());
                out.push('\n');
            }
            state => out.push_str(&format!("{state}\n")),
        }
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push('\n');
        }
        out
    }
}
