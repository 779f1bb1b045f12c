use std::sync::Arc;

use thiserror::Error;
use yomu_lib::{
    models::{ClientCredentials, LibraryEntry, Token},
    traits::Catalog,
};

use crate::domain::repositories::{session::SessionRepository, store::StorageError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("catalog error: {0}")]
    Catalog(#[from] yomu_lib::error::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    pub fn is_auth(&self) -> bool {
        matches!(self, SessionError::Catalog(e) if e.is_auth())
    }
}

pub struct SessionService<R>
where
    R: SessionRepository,
{
    repo: R,
    catalog: Arc<dyn Catalog>,
    default_credentials: Option<ClientCredentials>,
}

impl<R> SessionService<R>
where
    R: SessionRepository,
{
    pub fn new(
        repo: R,
        catalog: Arc<dyn Catalog>,
        default_credentials: Option<ClientCredentials>,
    ) -> Self {
        Self {
            repo,
            catalog,
            default_credentials,
        }
    }

    /// Stored client credentials, falling back to the configured ones
    pub async fn credentials(&self) -> Result<Option<ClientCredentials>, SessionError> {
        let stored = self.repo.get_credentials().await?;

        Ok(stored.or_else(|| self.default_credentials.clone()))
    }

    pub async fn has_token(&self) -> Result<bool, SessionError> {
        Ok(self.repo.get_access_token().await?.is_some())
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
        credentials: Option<ClientCredentials>,
    ) -> Result<Token, SessionError> {
        let credentials = match credentials.filter(|c| !c.is_empty()) {
            Some(credentials) => Some(credentials),
            None => self.credentials().await?,
        }
        .unwrap_or_default();

        let token = self
            .catalog
            .login(username, password, &credentials)
            .await?;

        self.repo.save_token(&token).await?;
        if !credentials.is_empty() {
            self.repo.save_credentials(&credentials).await?;
        }

        Ok(token)
    }

    pub async fn refresh_token(&self) -> Result<Token, SessionError> {
        let Some(refresh_token) = self.repo.get_refresh_token().await? else {
            return Err(yomu_lib::error::Error::Auth("no refresh token stored".to_string()).into());
        };
        let credentials = self.credentials().await?.unwrap_or_default();

        let token = self
            .catalog
            .refresh(&refresh_token, &credentials)
            .await
            .map_err(|e| match e {
                e if e.is_auth() => e,
                e => yomu_lib::error::Error::Auth(format!("refresh failed: {e}")),
            })?;

        self.repo.save_token(&token).await?;

        Ok(token)
    }

    /// Followed titles, refreshing the access token first when none is stored
    pub async fn get_library(&self) -> Result<Vec<LibraryEntry>, SessionError> {
        let access_token = match self.repo.get_access_token().await? {
            Some(access_token) => access_token,
            None => {
                debug!("no access token stored, refreshing");
                self.refresh_token().await?.access_token
            }
        };

        Ok(self.catalog.library(&access_token).await?)
    }

    pub async fn logout(&self, forget_credentials: bool) -> Result<(), SessionError> {
        self.repo.clear_tokens().await?;
        if forget_credentials {
            self.repo.clear_credentials().await?;
        }

        info!("logged out");
        Ok(())
    }
}
