use serde::{Deserialize, Serialize};

/// A followed title as shown in the library
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibraryEntry {
    pub id: String,
    pub title: String,
    pub cover_url: Option<String>,
}
