use async_trait::async_trait;
use yomu_lib::models::{ClientCredentials, Token};

use crate::domain::repositories::{
    session::SessionRepository,
    store::{KeyValueStore, StorageError, StorageKey},
};

#[derive(Clone)]
pub struct SessionRepositoryImpl<S>
where
    S: KeyValueStore,
{
    store: S,
}

impl<S> SessionRepositoryImpl<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn get_non_empty(&self, key: StorageKey<'_>) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(&key.to_string())
            .await?
            .filter(|value| !value.is_empty()))
    }
}

#[async_trait]
impl<S> SessionRepository for SessionRepositoryImpl<S>
where
    S: KeyValueStore,
{
    async fn get_access_token(&self) -> Result<Option<String>, StorageError> {
        self.get_non_empty(StorageKey::AccessToken).await
    }

    async fn get_refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.get_non_empty(StorageKey::RefreshToken).await
    }

    async fn get_credentials(&self) -> Result<Option<ClientCredentials>, StorageError> {
        let client_id = self.get_non_empty(StorageKey::ClientId).await?;
        let client_secret = self.get_non_empty(StorageKey::ClientSecret).await?;

        Ok(client_id.map(|client_id| ClientCredentials {
            client_id,
            client_secret: client_secret.unwrap_or_default(),
        }))
    }

    async fn save_token(&self, token: &Token) -> Result<(), StorageError> {
        let mut entries = vec![(
            StorageKey::AccessToken.to_string(),
            token.access_token.clone(),
        )];
        if let Some(refresh_token) = token.refresh_token.as_ref() {
            entries.push((StorageKey::RefreshToken.to_string(), refresh_token.clone()));
        }

        self.store.multi_set(&entries).await
    }

    async fn save_credentials(&self, credentials: &ClientCredentials) -> Result<(), StorageError> {
        self.store
            .multi_set(&[
                (
                    StorageKey::ClientId.to_string(),
                    credentials.client_id.clone(),
                ),
                (
                    StorageKey::ClientSecret.to_string(),
                    credentials.client_secret.clone(),
                ),
            ])
            .await
    }

    async fn clear_tokens(&self) -> Result<(), StorageError> {
        self.store
            .multi_remove(&[
                StorageKey::AccessToken.to_string(),
                StorageKey::RefreshToken.to_string(),
            ])
            .await
    }

    async fn clear_credentials(&self) -> Result<(), StorageError> {
        self.store
            .multi_remove(&[
                StorageKey::ClientId.to_string(),
                StorageKey::ClientSecret.to_string(),
            ])
            .await
    }
}
