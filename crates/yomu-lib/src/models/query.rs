use serde::{Deserialize, Serialize};

/// Filter for a title's chapter feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChapterQuery {
    pub language: String,
    pub limit: usize,
}

impl Default for ChapterQuery {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            limit: 500,
        }
    }
}

/// Image set served by the delivery server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageQuality {
    #[default]
    Data,
    DataSaver,
}

impl PageQuality {
    pub fn path_segment(&self) -> &'static str {
        match self {
            PageQuality::Data => "data",
            PageQuality::DataSaver => "data-saver",
        }
    }
}
