use serde::Deserialize;
use serde_json::{Map, Value};
use yomu_lib::models::{ChapterInfo, LibraryEntry};

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    pub data: Option<Vec<T>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MangaAttributes {
    pub title: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MangaData {
    pub id: String,
    #[serde(default)]
    pub attributes: MangaAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl MangaData {
    /// English title if present, otherwise the first localization
    pub fn display_title(&self) -> String {
        self.attributes
            .title
            .get("en")
            .and_then(Value::as_str)
            .or_else(|| self.attributes.title.values().find_map(Value::as_str))
            .unwrap_or_default()
            .to_string()
    }

    pub fn cover_file_name(&self) -> Option<&str> {
        self.relationships
            .iter()
            .find(|r| r.kind == "cover_art")
            .and_then(|r| r.attributes.as_ref())
            .and_then(|attrs| attrs.get("fileName"))
            .and_then(Value::as_str)
    }

    pub fn into_entry(self, uploads_url: &str, cover_size: u32) -> LibraryEntry {
        let cover_url = self
            .cover_file_name()
            .map(|file_name| cover_url(uploads_url, &self.id, file_name, cover_size));
        LibraryEntry {
            title: self.display_title(),
            id: self.id,
            cover_url,
        }
    }
}

pub fn cover_url(uploads_url: &str, manga_id: &str, file_name: &str, size: u32) -> String {
    format!(
        "{}/covers/{manga_id}/{file_name}.{size}.jpg",
        uploads_url.trim_end_matches('/')
    )
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChapterAttributes {
    pub chapter: Option<String>,
    pub title: Option<Value>,
    pub volume: Option<String>,
    pub pages: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterData {
    pub id: String,
    #[serde(default)]
    pub attributes: ChapterAttributes,
}

impl ChapterData {
    pub fn into_info(self, ordinal: usize) -> ChapterInfo {
        ChapterInfo {
            id: self.id,
            number: self.attributes.chapter.filter(|n| !n.trim().is_empty()),
            title: self.attributes.title.as_ref().and_then(localized_title),
            volume: self.attributes.volume,
            pages: self.attributes.pages,
            ordinal,
        }
    }
}

/// Chapter titles come as a plain string, a language map, or a language map
/// of nested objects. For maps the longest candidate wins, it is usually the
/// full title.
pub fn localized_title(title: &Value) -> Option<String> {
    match title {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .values()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.as_str()),
                Value::Object(nested) => nested
                    .values()
                    .filter_map(Value::as_str)
                    .find(|s| !s.is_empty()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .max_by_key(|s| s.len())
            .map(str::to_string),
        _ => None,
    }
}

pub fn parse_library(
    collection: Collection<MangaData>,
    uploads_url: &str,
    cover_size: u32,
) -> Vec<LibraryEntry> {
    collection
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.into_entry(uploads_url, cover_size))
        .collect()
}

pub fn parse_chapters(collection: Collection<ChapterData>) -> Vec<ChapterInfo> {
    collection
        .data
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(ordinal, c)| c.into_info(ordinal))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_library() {
        let body = json!({
            "result": "ok",
            "data": [
                {
                    "id": "m1",
                    "attributes": { "title": { "ja-ro": "Chainsaw Man", "en": "Chainsaw Man EN" } },
                    "relationships": [
                        { "id": "a1", "type": "author" },
                        { "id": "c1", "type": "cover_art", "attributes": { "fileName": "cover.png" } }
                    ]
                },
                {
                    "id": "m2",
                    "attributes": { "title": { "ja-ro": "Dandadan", "ko": "단다단" } },
                    "relationships": []
                }
            ]
        });

        let collection: Collection<MangaData> = serde_json::from_value(body).unwrap();
        let entries = parse_library(collection, "https://uploads.mangadex.org/", 256);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Chainsaw Man EN");
        assert_eq!(
            entries[0].cover_url.as_deref(),
            Some("https://uploads.mangadex.org/covers/m1/cover.png.256.jpg")
        );
        assert_eq!(entries[1].title, "Dandadan");
        assert_eq!(entries[1].cover_url, None);
    }

    #[test]
    fn test_parse_chapters_assigns_ordinals() {
        let body = json!({
            "data": [
                { "id": "c1", "attributes": { "chapter": "1", "title": "Dog & Chainsaw", "pages": 55 } },
                { "id": "c2", "attributes": { "chapter": "2", "title": "" } },
                { "id": "c3", "attributes": { "chapter": null, "title": null } }
            ]
        });

        let collection: Collection<ChapterData> = serde_json::from_value(body).unwrap();
        let chapters = parse_chapters(collection);

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].ordinal, 0);
        assert_eq!(chapters[0].number.as_deref(), Some("1"));
        assert_eq!(chapters[0].title.as_deref(), Some("Dog & Chainsaw"));
        assert_eq!(chapters[0].pages, Some(55));
        assert_eq!(chapters[1].title, None);
        assert_eq!(chapters[2].ordinal, 2);
        assert_eq!(chapters[2].number, None);
    }

    #[test]
    fn test_parse_chapters_without_data() {
        let collection: Collection<ChapterData> =
            serde_json::from_value(json!({ "result": "ok" })).unwrap();
        assert!(parse_chapters(collection).is_empty());
    }

    #[test]
    fn test_localized_title() {
        assert_eq!(localized_title(&json!("Plain")), Some("Plain".to_string()));
        assert_eq!(
            localized_title(&json!({ "en": "Short", "pl": "A longer title" })),
            Some("A longer title".to_string())
        );
        assert_eq!(
            localized_title(&json!({ "en": { "value": "Nested" } })),
            Some("Nested".to_string())
        );
        assert_eq!(localized_title(&json!({})), None);
        assert_eq!(localized_title(&json!(42)), None);
    }
}
