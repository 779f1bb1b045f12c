use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use yomu_lib::{
    error::Error,
    models::{ChapterInfo, ChapterQuery, ClientCredentials, LibraryEntry, PageQuality, Token},
    traits::Catalog,
};

use crate::{
    API_URL, AUTH_URL, UPLOADS_URL, pages,
    response::{self, ChapterData, Collection, MangaData, TokenResponse},
};

const DEFAULT_COVER_SIZE: u32 = 256;

#[derive(Debug, Clone)]
pub struct MangaDex {
    api_url: String,
    auth_url: String,
    uploads_url: String,
    cover_size: u32,
    client: reqwest::Client,
}

fn map_http_error(e: reqwest::Error) -> Error {
    if e.status() == Some(StatusCode::UNAUTHORIZED) {
        Error::Unauthorized
    } else {
        Error::Http {
            status: e.status().map(|s| s.as_u16()),
            message: format!("{e}"),
        }
    }
}

impl MangaDex {
    pub fn new() -> Result<Self, Error> {
        Self::with_urls(API_URL, AUTH_URL, UPLOADS_URL)
    }

    pub fn with_urls(api_url: &str, auth_url: &str, uploads_url: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("yomu/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("{e}"))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.to_string(),
            uploads_url: uploads_url.trim_end_matches('/').to_string(),
            cover_size: DEFAULT_COVER_SIZE,
            client,
        })
    }

    pub fn cover_size(mut self, size: u32) -> Self {
        self.cover_size = size;
        self
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<Token, Error> {
        let res = self
            .client
            .post(&self.auth_url)
            .form(params)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("{e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("token request rejected with {status}: {body}");
            return Err(Error::Auth(format!("token request rejected with {status}")));
        }

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| Error::Auth(format!("malformed token response: {e}")))?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Auth("no access token in response".to_string()))?;

        Ok(Token {
            access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value, Error> {
        self.client
            .get(url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(map_http_error)?
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("{e}")))
    }
}

#[async_trait]
impl Catalog for MangaDex {
    async fn login(
        &self,
        username: &str,
        password: &str,
        credentials: &ClientCredentials,
    ) -> Result<Token, Error> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::Auth("username and password are required".to_string()));
        }

        let res = self
            .request_token(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .await;

        match &res {
            Ok(_) => info!("logged in as {username}"),
            Err(e) => error!(
                "login failed for {username} (password len={}, client_id={}): {e}",
                password.len(),
                credentials.client_id
            ),
        }

        res
    }

    async fn refresh(
        &self,
        refresh_token: &str,
        credentials: &ClientCredentials,
    ) -> Result<Token, Error> {
        let token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .await?;

        info!("token refreshed");
        Ok(token)
    }

    async fn library(&self, access_token: &str) -> Result<Vec<LibraryEntry>, Error> {
        let collection: Collection<MangaData> = self
            .client
            .get(format!("{}/user/follows/manga", self.api_url))
            .bearer_auth(access_token)
            .query(&[("includes[]", "cover_art"), ("limit", "100")])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(map_http_error)?
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("{e}")))?;

        Ok(response::parse_library(
            collection,
            &self.uploads_url,
            self.cover_size,
        ))
    }

    async fn chapters(
        &self,
        manga_id: &str,
        query: &ChapterQuery,
    ) -> Result<Vec<ChapterInfo>, Error> {
        let collection: Collection<ChapterData> = self
            .client
            .get(format!("{}/manga/{manga_id}/feed", self.api_url))
            .query(&[
                ("translatedLanguage[]", query.language.clone()),
                ("order[chapter]", "asc".to_string()),
                ("limit", format!("{}", query.limit)),
            ])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(map_http_error)?
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("{e}")))?;

        let chapters = response::parse_chapters(collection);
        debug!("manga {manga_id} has {} chapters", chapters.len());

        Ok(chapters)
    }

    async fn pages(&self, chapter_id: &str, quality: PageQuality) -> Result<Vec<String>, Error> {
        let chapter = self
            .get_json(&format!("{}/chapter/{chapter_id}", self.api_url))
            .await?;
        let at_home = self
            .get_json(&format!("{}/at-home/server/{chapter_id}", self.api_url))
            .await?;

        pages::resolve(&chapter, &at_home, quality).inspect_err(|e| {
            error!("chapter {chapter_id}: {e}");
        })
    }
}
