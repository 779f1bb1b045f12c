use async_trait::async_trait;
use yomu_lib::models::{ClientCredentials, Token};

use crate::domain::repositories::store::StorageError;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn get_access_token(&self) -> Result<Option<String>, StorageError>;

    async fn get_refresh_token(&self) -> Result<Option<String>, StorageError>;

    async fn get_credentials(&self) -> Result<Option<ClientCredentials>, StorageError>;

    /// Stores the access token, and the refresh token when the response
    /// carried one
    async fn save_token(&self, token: &Token) -> Result<(), StorageError>;

    async fn save_credentials(&self, credentials: &ClientCredentials) -> Result<(), StorageError>;

    async fn clear_tokens(&self) -> Result<(), StorageError>;

    async fn clear_credentials(&self) -> Result<(), StorageError>;
}
