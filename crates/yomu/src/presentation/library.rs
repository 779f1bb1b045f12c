use std::sync::Arc;

use yomu_lib::models::LibraryEntry;

use crate::{
    context::Context,
    domain::repositories::{
        selection::SelectionRepository,
        store::{KeyValueStore, StorageError},
    },
    presentation::Route,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryState {
    Loading,
    Ready(Vec<LibraryEntry>),
    AuthError,
    Error(String),
}

pub struct LibraryScreen<S>
where
    S: KeyValueStore + Clone,
{
    ctx: Arc<Context<S>>,
    state: LibraryState,
}

impl<S> LibraryScreen<S>
where
    S: KeyValueStore + Clone,
{
    pub fn new(ctx: Arc<Context<S>>) -> Self {
        Self {
            ctx,
            state: LibraryState::Loading,
        }
    }

    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    pub async fn load(&mut self) -> Route {
        self.state = LibraryState::Loading;

        match self.ctx.session.get_library().await {
            Ok(entries) => {
                self.state = LibraryState::Ready(entries);
                Route::Library
            }
            Err(e) if e.is_auth() => {
                warn!("library rejected the session: {e}");
                if let Err(e) = self.ctx.session.logout(false).await {
                    error!("failed to clear tokens: {e}");
                }
                self.state = LibraryState::AuthError;
                Route::Login
            }
            Err(e) => {
                error!("failed to load library: {e}");
                self.state = LibraryState::Error(e.to_string());
                Route::Library
            }
        }
    }

    pub async fn refresh(&mut self) -> Route {
        self.load().await
    }

    pub async fn select(&self, index: usize) -> Result<Route, StorageError> {
        let LibraryState::Ready(entries) = &self.state else {
            return Ok(Route::Library);
        };
        let Some(entry) = entries.get(index) else {
            warn!("no library entry at {index}");
            return Ok(Route::Library);
        };

        self.ctx.selection.set_selected_manga(entry).await?;

        Ok(Route::Detail)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("== Library ==\n");
        match &self.state {
            LibraryState::Loading => out.push_str("loading...\n"),
            LibraryState::Ready(entries) if entries.is_empty() => {
                out.push_str("no followed titles\n")
            }
            LibraryState::Ready(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    out.push_str(&format!("{i:>3}. {}\n", entry.title));
                    if let Some(cover) = &entry.cover_url {
                        out.push_str(&format!("     cover: {cover}\n"));
                    }
                }
            }
            LibraryState::AuthError => out.push_str("session expired, please log in\n"),
            LibraryState::Error(e) => out.push_str(&format!("error: {e}\n")),
        }
        out
    }
}
