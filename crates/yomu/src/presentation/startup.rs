use crate::{
    context::Context,
    domain::{repositories::store::KeyValueStore, services::session::SessionError},
    presentation::Route,
};

/// Checks the stored session by fetching the library once
pub async fn validate<S>(ctx: &Context<S>) -> Result<Route, SessionError>
where
    S: KeyValueStore + Clone,
{
    if !ctx.session.has_token().await? {
        info!("no stored session");
        return Ok(Route::Login);
    }

    match ctx.session.get_library().await {
        Ok(library) => {
            info!("session valid, {} followed titles", library.len());
            Ok(Route::Library)
        }
        Err(e) => {
            warn!("stored session rejected: {e}");
            ctx.session.logout(false).await?;
            Ok(Route::Login)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    use crate::{
        domain::repositories::store::KeyValueStore,
        test_utils::{MockCatalog, context, library_entry},
    };

    #[tokio::test]
    async fn test_no_token_routes_to_login() {
        let catalog = Arc::new(MockCatalog::default());
        let (ctx, _) = context(catalog.clone());

        assert_eq!(validate(&ctx).await.unwrap(), Route::Login);
        assert_eq!(catalog.library_calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_token_routes_to_library() {
        let catalog = Arc::new(MockCatalog {
            library: vec![library_entry("m1", "Dandadan")],
            valid_access_token: Some("access-1".to_string()),
            ..Default::default()
        });
        let (ctx, store) = context(catalog);
        store.set("mangadex_token", "access-1").await.unwrap();

        assert_eq!(validate(&ctx).await.unwrap(), Route::Library);
    }

    #[tokio::test]
    async fn test_rejected_token_is_cleared() {
        let catalog = Arc::new(MockCatalog::default());
        let (ctx, store) = context(catalog);
        store.set("mangadex_token", "expired").await.unwrap();
        store.set("mangadex_refresh_token", "refresh-1").await.unwrap();

        assert_eq!(validate(&ctx).await.unwrap(), Route::Login);
        assert_eq!(store.get("mangadex_token").await.unwrap(), None);
        assert_eq!(store.get("mangadex_refresh_token").await.unwrap(), None);
    }
}
