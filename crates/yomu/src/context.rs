use std::sync::Arc;

use yomu_lib::{
    models::{ChapterQuery, ClientCredentials, PageQuality},
    traits::Catalog,
};

use crate::{
    domain::{
        repositories::store::KeyValueStore,
        services::{chapter_cache::ChapterCacheService, session::SessionService},
    },
    infrastructure::repositories::{
        chapter_pages::ChapterPagesRepositoryImpl, progress::ProgressRepositoryImpl,
        selection::SelectionRepositoryImpl, session::SessionRepositoryImpl,
    },
};

/// User facing knobs taken from the config file
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub chapter_query: ChapterQuery,
    pub page_quality: PageQuality,
    pub credentials: Option<ClientCredentials>,
}

pub type Session<S> = SessionService<SessionRepositoryImpl<S>>;
pub type ChapterCache<S> =
    ChapterCacheService<ChapterPagesRepositoryImpl<S>, ProgressRepositoryImpl<S>>;

pub struct Context<S>
where
    S: KeyValueStore + Clone,
{
    pub session: Session<S>,
    pub chapters: ChapterCache<S>,
    pub selection: SelectionRepositoryImpl<S>,
    pub catalog: Arc<dyn Catalog>,
    pub settings: Settings,
}

impl<S> Context<S>
where
    S: KeyValueStore + Clone,
{
    pub fn new(store: S, catalog: Arc<dyn Catalog>, settings: Settings) -> Arc<Self> {
        let session = SessionService::new(
            SessionRepositoryImpl::new(store.clone()),
            catalog.clone(),
            settings.credentials.clone(),
        );
        let chapters = ChapterCacheService::new(
            ChapterPagesRepositoryImpl::new(store.clone()),
            ProgressRepositoryImpl::new(store.clone()),
            catalog.clone(),
            settings.page_quality,
        );

        Arc::new(Self {
            session,
            chapters,
            selection: SelectionRepositoryImpl::new(store),
            catalog,
            settings,
        })
    }
}
