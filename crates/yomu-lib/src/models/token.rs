use serde::{Deserialize, Serialize};

/// Tokens returned by the authentication endpoint.
///
/// `refresh_token` is optional because a refresh grant may omit it, in which
/// case the previously stored one stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// OAuth2 client registered with the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.client_id.trim().is_empty()
    }
}
