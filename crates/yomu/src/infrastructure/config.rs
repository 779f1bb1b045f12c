use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use yomu_lib::models::{ChapterQuery, ClientCredentials, PageQuality};

use crate::context::Settings;

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_uploads_url")]
    pub uploads_url: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_create_database")]
    pub create_database: bool,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_chapter_limit")]
    pub chapter_limit: usize,
    #[serde(default)]
    pub page_quality: PageQuality,
    #[serde(default = "default_cover_size")]
    pub cover_size: u32,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: yomu_home().join("config.yml"),
            api_url: default_api_url(),
            auth_url: default_auth_url(),
            uploads_url: default_uploads_url(),
            database_path: default_database_path(),
            create_database: default_create_database(),
            language: default_language(),
            chapter_limit: default_chapter_limit(),
            page_quality: PageQuality::default(),
            cover_size: default_cover_size(),
            client_id: None,
            client_secret: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("path", &self.path)
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("uploads_url", &self.uploads_url)
            .field("database_path", &self.database_path)
            .field("create_database", &self.create_database)
            .field("language", &self.language)
            .field("chapter_limit", &self.chapter_limit)
            .field("page_quality", &self.page_quality)
            .field("cover_size", &self.cover_size)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn yomu_home() -> PathBuf {
    match std::env::var("YOMU_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".yomu"),
    }
}

fn default_api_url() -> String {
    yomu_catalog::API_URL.to_string()
}

fn default_auth_url() -> String {
    yomu_catalog::AUTH_URL.to_string()
}

fn default_uploads_url() -> String {
    yomu_catalog::UPLOADS_URL.to_string()
}

fn default_database_path() -> String {
    let path = yomu_home();
    if !path.exists() {
        let _ = std::fs::create_dir_all(&path);
    }
    path.join("yomu.db").display().to_string()
}

fn default_create_database() -> bool {
    true
}

fn default_language() -> String {
    ChapterQuery::default().language
}

fn default_chapter_limit() -> usize {
    ChapterQuery::default().limit
}

fn default_cover_size() -> u32 {
    256
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => yomu_home().join("config.yml"),
        };

        match std::fs::File::open(&config_path) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }

    pub fn credentials(&self) -> Option<ClientCredentials> {
        self.client_id
            .as_ref()
            .filter(|id| !id.trim().is_empty())
            .map(|client_id| ClientCredentials {
                client_id: client_id.clone(),
                client_secret: self.client_secret.clone().unwrap_or_default(),
            })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            chapter_query: ChapterQuery {
                language: self.language.clone(),
                limit: self.chapter_limit,
            },
            page_quality: self.page_quality,
            credentials: self.credentials(),
        }
    }
}
