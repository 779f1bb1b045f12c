use reqwest::Url;
use serde_json::Value;
use yomu_lib::{error::Error, models::PageQuality};

/// Hash plus file names for one chapter, and the image set they belong to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFiles {
    pub hash: String,
    pub files: Vec<String>,
    pub quality: PageQuality,
}

type Strategy = fn(chapter: &Value, at_home: &Value, quality: PageQuality) -> Option<PageFiles>;

/// Known layouts of the hash and file list, tried in order: the at-home
/// `chapter` object, then at-home top-level fields, then the chapter
/// metadata. The base URL is only ever taken from at-home.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("at-home chapter", from_at_home_chapter),
    ("at-home top level", from_at_home_top_level),
    ("chapter attributes", from_chapter_metadata),
];

const BASE_URL_FIELDS: &[&str] = &["baseUrl", "base_url", "baseURI", "base_uri"];

fn from_at_home_chapter(_chapter: &Value, at_home: &Value, quality: PageQuality) -> Option<PageFiles> {
    at_home
        .get("chapter")
        .and_then(|c| files_from_object(c, quality))
}

fn from_at_home_top_level(
    _chapter: &Value,
    at_home: &Value,
    quality: PageQuality,
) -> Option<PageFiles> {
    files_from_object(at_home, quality)
}

fn from_chapter_metadata(chapter: &Value, _at_home: &Value, quality: PageQuality) -> Option<PageFiles> {
    let candidates = [
        chapter.get("data").and_then(|d| d.get("attributes")),
        chapter.get("attributes"),
        chapter.get("chapter"),
        Some(chapter),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|c| files_from_object(c, quality))
}

fn files_from_object(object: &Value, quality: PageQuality) -> Option<PageFiles> {
    let hash = object
        .get("hash")
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())?;

    let (files, quality) = match quality {
        PageQuality::DataSaver => file_list(object.get("dataSaver"))
            .map(|files| (files, PageQuality::DataSaver))
            .or_else(|| file_list(object.get("data")).map(|files| (files, PageQuality::Data)))?,
        PageQuality::Data => (file_list(object.get("data"))?, PageQuality::Data),
    };

    Some(PageFiles {
        hash: hash.to_string(),
        files,
        quality,
    })
}

/// File lists are arrays, some older responses use an index-keyed object
/// which is read in numeric key order. Non-numeric keys go last.
fn file_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<&Value> = match value? {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => {
            let mut entries: Vec<(Option<usize>, &Value)> = map
                .iter()
                .map(|(key, value)| (key.parse::<usize>().ok(), value))
                .collect();
            entries.sort_by_key(|(index, _)| index.unwrap_or(usize::MAX));
            entries.into_iter().map(|(_, value)| value).collect()
        }
        _ => return None,
    };

    let files: Vec<String> = items
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    if files.is_empty() { None } else { Some(files) }
}

pub fn base_url(at_home: &Value) -> Option<&str> {
    BASE_URL_FIELDS
        .iter()
        .find_map(|field| at_home.get(*field).and_then(Value::as_str))
        .filter(|url| !url.is_empty())
}

pub fn page_files(chapter: &Value, at_home: &Value, quality: PageQuality) -> Option<PageFiles> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(chapter, at_home, quality);
        if found.is_some() {
            debug!("page files resolved from {name}");
        }
        found
    })
}

/// Build absolute page URLs as `{base}/{data|data-saver}/{hash}/{filename}`
pub fn build_page_urls(base_url: &str, files: &PageFiles) -> Result<Vec<String>, Error> {
    let base = Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| Error::InvalidResponse(format!("invalid base url {base_url}: {e}")))?;

    files
        .files
        .iter()
        .map(|file_name| -> Result<String, Error> {
            let mut url = base.clone();
            url.path_segments_mut()
                .map_err(|_| Error::InvalidResponse(format!("base url {base_url} cannot be a base")))?
                .pop_if_empty()
                .extend([files.quality.path_segment(), files.hash.as_str(), file_name.as_str()]);
            Ok(url.to_string())
        })
        .collect()
}

/// Reconcile both responses into the chapter's page URLs
pub fn resolve(chapter: &Value, at_home: &Value, quality: PageQuality) -> Result<Vec<String>, Error> {
    let base_url = base_url(at_home);
    let files = page_files(chapter, at_home, quality);

    match (base_url, files) {
        (Some(base_url), Some(files)) => build_page_urls(base_url, &files),
        (base_url, files) => {
            error!(
                "unexpected page response, base url found: {}, files found: {}",
                base_url.is_some(),
                files.is_some()
            );
            Err(Error::InvalidResponse(
                "could not resolve base url, hash and file list".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_current_at_home_shape() {
        let chapter = json!({ "result": "ok", "data": { "id": "c1", "attributes": { "pages": 2 } } });
        let at_home = json!({
            "result": "ok",
            "baseUrl": "https://cdn.example.org/",
            "chapter": {
                "hash": "abc",
                "data": ["1.png", "2.png"],
                "dataSaver": ["1.jpg", "2.jpg"]
            }
        });

        let pages = resolve(&chapter, &at_home, PageQuality::Data).unwrap();
        assert_eq!(
            pages,
            vec![
                "https://cdn.example.org/data/abc/1.png".to_string(),
                "https://cdn.example.org/data/abc/2.png".to_string(),
            ]
        );

        let pages = resolve(&chapter, &at_home, PageQuality::DataSaver).unwrap();
        assert_eq!(pages[0], "https://cdn.example.org/data-saver/abc/1.jpg");
    }

    #[test]
    fn test_data_saver_falls_back_to_data() {
        let at_home = json!({
            "base_url": "https://cdn.example.org",
            "chapter": { "hash": "abc", "data": ["1.png"] }
        });

        let pages = resolve(&json!({}), &at_home, PageQuality::DataSaver).unwrap();
        assert_eq!(pages, vec!["https://cdn.example.org/data/abc/1.png".to_string()]);
    }

    #[test]
    fn test_resolve_legacy_chapter_attributes() {
        let chapter = json!({
            "data": {
                "attributes": {
                    "hash": "legacy",
                    "data": { "0": "a.png", "1": "b.png" }
                }
            }
        });
        let at_home = json!({ "baseUrl": "https://s2.example.org//" });

        let pages = resolve(&chapter, &at_home, PageQuality::Data).unwrap();
        assert_eq!(
            pages,
            vec![
                "https://s2.example.org/data/legacy/a.png".to_string(),
                "https://s2.example.org/data/legacy/b.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_index_keyed_files_follow_numeric_order() {
        let at_home = json!({
            "baseUrl": "https://cdn.example.org",
            "chapter": {
                "hash": "abc",
                "data": { "10": "k.png", "cover": "z.png", "9": "j.png", "0": "a.png" }
            }
        });

        let pages = resolve(&json!({}), &at_home, PageQuality::Data).unwrap();
        assert_eq!(
            pages,
            vec![
                "https://cdn.example.org/data/abc/a.png".to_string(),
                "https://cdn.example.org/data/abc/j.png".to_string(),
                "https://cdn.example.org/data/abc/k.png".to_string(),
                "https://cdn.example.org/data/abc/z.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_at_home_takes_precedence_over_chapter() {
        let chapter = json!({ "attributes": { "hash": "old", "data": ["x.png"] } });
        let at_home = json!({
            "baseUrl": "https://cdn.example.org",
            "chapter": { "hash": "new", "data": ["y.png"] }
        });

        let pages = resolve(&chapter, &at_home, PageQuality::Data).unwrap();
        assert_eq!(pages, vec!["https://cdn.example.org/data/new/y.png".to_string()]);
    }

    #[test]
    fn test_file_names_are_percent_encoded() {
        let at_home = json!({
            "baseUrl": "https://cdn.example.org",
            "hash": "abc",
            "data": ["page 1.png"]
        });

        let pages = resolve(&json!({}), &at_home, PageQuality::Data).unwrap();
        assert_eq!(pages, vec!["https://cdn.example.org/data/abc/page%201.png".to_string()]);
    }

    #[test]
    fn test_missing_base_url_is_invalid_response() {
        let at_home = json!({ "chapter": { "hash": "abc", "data": ["1.png"] } });

        let res = resolve(&json!({}), &at_home, PageQuality::Data);
        assert!(matches!(res, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_missing_hash_is_invalid_response() {
        let at_home = json!({ "baseUrl": "https://cdn.example.org", "chapter": { "data": ["1.png"] } });

        let res = resolve(&json!({}), &at_home, PageQuality::Data);
        assert!(matches!(res, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_empty_file_list_is_invalid_response() {
        let at_home = json!({
            "baseUrl": "https://cdn.example.org",
            "chapter": { "hash": "abc", "data": [] }
        });

        let res = resolve(&json!({}), &at_home, PageQuality::Data);
        assert!(matches!(res, Err(Error::InvalidResponse(_))));
    }
}
