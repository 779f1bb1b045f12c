#[macro_use]
extern crate log;

pub mod mangadex;
pub use mangadex::MangaDex;

pub mod pages;
pub mod response;

pub const API_URL: &str = "https://api.mangadex.org";
pub const AUTH_URL: &str =
    "https://auth.mangadex.org/realms/mangadex/protocol/openid-connect/token";
pub const UPLOADS_URL: &str = "https://uploads.mangadex.org";
