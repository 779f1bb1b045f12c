use serde::{Deserialize, Serialize};

/// A chapter, as listed in a title's feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChapterInfo {
    pub id: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub pages: Option<usize>,
    /// position within the listing it was fetched with
    #[serde(default)]
    pub ordinal: usize,
}

impl ChapterInfo {
    /// Bare reference used when only the id is known, e.g. after advancing
    /// through a stored chapter order.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: None,
            title: None,
            volume: None,
            pages: None,
            ordinal: 0,
        }
    }
}
