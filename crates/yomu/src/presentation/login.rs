use std::sync::Arc;

use yomu_lib::models::ClientCredentials;

use crate::{
    context::Context, domain::repositories::store::KeyValueStore, presentation::Route,
};

pub struct LoginScreen<S>
where
    S: KeyValueStore + Clone,
{
    ctx: Arc<Context<S>>,
    pub credentials: Option<ClientCredentials>,
    pub error: Option<String>,
}

impl<S> LoginScreen<S>
where
    S: KeyValueStore + Clone,
{
    pub fn new(ctx: Arc<Context<S>>) -> Self {
        Self {
            ctx,
            credentials: None,
            error: None,
        }
    }

    /// Fills the client credentials from storage or config
    pub async fn prefill(&mut self) {
        self.error = None;
        self.credentials = match self.ctx.session.credentials().await {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!("could not read stored client credentials: {e}");
                None
            }
        };
    }

    pub async fn submit(&mut self, username: &str, password: &str) -> Route {
        match self
            .ctx
            .session
            .login(username, password, self.credentials.clone())
            .await
        {
            Ok(_) => {
                self.error = None;
                Route::Library
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Route::Login
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("== Login ==\n");
        match &self.credentials {
            Some(c) => out.push_str(&format!("client: {}\n", c.client_id)),
            None => out.push_str("client: (none configured)\n"),
        }
        if let Some(e) = &self.error {
            out.push_str(&format!("error: {e}\n"));
        }
        out.push_str("login <username> <password>\n");
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        context::Settings,
        infrastructure::store::MemoryStore,
        test_utils::{MockCatalog, token},
    };

    #[tokio::test]
    async fn test_prefill_uses_configured_credentials() {
        let settings = Settings {
            credentials: Some(ClientCredentials::new("personal-client", "secret")),
            ..Default::default()
        };
        let ctx = Context::new(
            MemoryStore::new(),
            Arc::new(MockCatalog::default()),
            settings,
        );
        let mut screen = LoginScreen::new(ctx);

        screen.prefill().await;

        assert_eq!(
            screen.credentials,
            Some(ClientCredentials::new("personal-client", "secret"))
        );
    }

    #[tokio::test]
    async fn test_submit() {
        let catalog = Arc::new(MockCatalog {
            login_token: Some(token("access-1", Some("refresh-1"))),
            ..Default::default()
        });
        let ctx = Context::new(MemoryStore::new(), catalog, Settings::default());
        let mut screen = LoginScreen::new(ctx.clone());

        assert_eq!(screen.submit("reader", " ").await, Route::Login);
        assert!(screen.error.is_some());

        assert_eq!(screen.submit("reader", "hunter2").await, Route::Library);
        assert!(screen.error.is_none());
        assert!(ctx.session.has_token().await.unwrap());
    }
}
