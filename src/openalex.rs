//! OpenAlex API Client
//!
//! Cursor-paginated access to the OpenAlex `/works` endpoint and parsing of raw
//! work records into [`Paper`]s.
//!
//! API notes (per OpenAlex docs):
//! - Use `mailto:email` parameter for the polite pool
//! - Cursor paging starts at `cursor=*`; each page returns `meta.next_cursor`
//! - Abstracts are delivered as an inverted index (word -> positions)

use crate::config::SearchConfig;
use crate::error::{OptionExt, ParseError, Result, SearchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// DOI URL prefix stripped from OpenAlex DOIs
const DOI_PREFIX: &str = "https://doi.org/";

/// Authors kept per paper
const MAX_AUTHORS: usize = 5;

/// Highest abstract token position accepted from an inverted index
const MAX_ABSTRACT_POSITION: i64 = 20_000;

/// Cursor value that requests the first page
pub const FIRST_CURSOR: &str = "*";

/// A parsed scholarly work.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paper {
    pub title: String,
    /// First five author display names
    pub authors: Vec<String>,
    pub year: Option<i32>,
    /// DOI without the `https://doi.org/` prefix
    pub doi: String,
    pub journal: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub cited_by_count: i64,
    #[serde(rename = "type")]
    pub work_type: String,
    pub open_access: bool,
    /// DOI URL when present, otherwise the OpenAlex id
    pub url: String,
    pub openalex_id: String,
}

impl Paper {
    /// Lower-cased `"{title} {abstract}"`, the text every keyword test runs on.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text).to_lowercase()
    }

    /// Authors joined the way the exports print them.
    pub fn authors_joined(&self) -> String {
        self.authors.join("; ")
    }
}

/// One page request against `/works`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub search: String,
    pub filter: String,
    pub per_page: u32,
    pub cursor: String,
}

/// One page of raw work records.
#[derive(Debug, Clone, Default)]
pub struct WorksPage {
    pub results: Vec<serde_json::Value>,
    pub next_cursor: Option<String>,
    /// Total hits reported by the API
    pub count: Option<i64>,
}

/// Source of cursor-paginated work records.
#[async_trait]
pub trait WorksApi: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<WorksPage>;
}

/// Filter expression restricting results to journal articles in a year range.
pub fn works_filter(start_year: i32, end_year: i32) -> String {
    format!("publication_year:{}-{},type:article", start_year, end_year)
}

/// HTTP client for the OpenAlex works endpoint.
pub struct OpenAlexClient {
    client: Client,
    works_url: Url,
    mailto: Option<String>,
}

impl OpenAlexClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let user_agent = match &config.mailto {
            Some(email) => format!("ndtsearch/{} (mailto:{})", env!("CARGO_PKG_VERSION"), email),
            None => format!("ndtsearch/{}", env!("CARGO_PKG_VERSION")),
        };

        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SearchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let works_url = config
            .api_url()?
            .join("works")
            .map_err(|e| SearchError::Config(format!("Invalid API base URL: {}", e)))?;

        Ok(Self {
            client,
            works_url,
            mailto: config.mailto.clone(),
        })
    }

    pub fn works_url(&self) -> &Url {
        &self.works_url
    }
}

#[async_trait]
impl WorksApi for OpenAlexClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<WorksPage> {
        let params = build_query(request, self.mailto.as_deref());
        debug!(url = %self.works_url, search = %request.search, cursor = %request.cursor, "Fetching OpenAlex page");

        let response = self
            .client
            .get(self.works_url.clone())
            .query(&params)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SearchError::Api {
                code: status.as_u16(),
                message: format!("OpenAlex API error: {}", status),
            });
        }

        let body = response.text().await?;
        parse_page(&body)
    }
}

/// Query string parameters for one page request
fn build_query(request: &PageRequest, mailto: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("search", request.search.clone()),
        ("filter", request.filter.clone()),
        ("per-page", request.per_page.to_string()),
        ("cursor", request.cursor.clone()),
    ];
    if let Some(email) = mailto {
        params.push(("mailto", email.to_string()));
    }
    params
}

// === OpenAlex API Response Types ===

#[derive(Debug, Deserialize)]
struct OpenAlexResponse {
    #[serde(default)]
    meta: Option<OpenAlexMeta>,
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexMeta {
    count: Option<i64>,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexWork {
    id: Option<String>,
    title: Option<String>,
    publication_year: Option<i32>,
    doi: Option<String>,
    cited_by_count: Option<i64>,
    abstract_inverted_index: Option<BTreeMap<String, Vec<i64>>>,
    authorships: Option<Vec<OpenAlexAuthorship>>,
    primary_location: Option<OpenAlexLocation>,
    open_access: Option<OpenAlexOpenAccess>,
    #[serde(rename = "type")]
    work_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthorship {
    author: Option<OpenAlexAuthor>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexLocation {
    source: Option<OpenAlexSource>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexSource {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexOpenAccess {
    is_oa: Option<bool>,
}

/// Parse one `/works` response body
pub fn parse_page(json_str: &str) -> Result<WorksPage> {
    let response: OpenAlexResponse = serde_json::from_str(json_str)
        .map_err(|e| SearchError::Parse(format!("Failed to parse OpenAlex response: {}", e)))?;

    let results = response
        .results
        .ok_or_parse("OpenAlex response has no results array")?;
    let (count, next_cursor) = match response.meta {
        Some(meta) => (meta.count, meta.next_cursor.filter(|c| !c.is_empty())),
        None => (None, None),
    };

    Ok(WorksPage {
        results,
        next_cursor,
        count,
    })
}

/// Parse a raw OpenAlex work record into a [`Paper`].
pub fn parse_work(raw: &serde_json::Value) -> std::result::Result<Paper, ParseError> {
    let work: OpenAlexWork = serde_json::from_value(raw.clone())
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    let openalex_id = work
        .id
        .filter(|id| !id.is_empty())
        .ok_or(ParseError::MissingId)?;

    let authors: Vec<String> = work
        .authorships
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| a.author)
        .filter_map(|a| a.display_name)
        .filter(|name| !name.is_empty())
        .take(MAX_AUTHORS)
        .collect();

    let journal = work
        .primary_location
        .and_then(|loc| loc.source)
        .and_then(|src| src.display_name)
        .unwrap_or_default();

    let abstract_text = match work.abstract_inverted_index {
        Some(index) => reconstruct_abstract(&index)?,
        None => String::new(),
    };

    let doi_url = work.doi.filter(|d| !d.is_empty());
    let doi = doi_url
        .as_deref()
        .map(|d| d.replace(DOI_PREFIX, ""))
        .unwrap_or_default();
    let url = doi_url.unwrap_or_else(|| openalex_id.clone());

    Ok(Paper {
        title: work.title.unwrap_or_default(),
        authors,
        year: work.publication_year,
        doi,
        journal,
        abstract_text,
        cited_by_count: work.cited_by_count.unwrap_or(0),
        work_type: work.work_type.unwrap_or_default(),
        open_access: work.open_access.and_then(|oa| oa.is_oa).unwrap_or(false),
        url,
        openalex_id,
    })
}

/// Rebuild abstract text from an inverted index.
///
/// Every word is placed at each of its positions; positions nobody claims stay
/// empty, so the joined text shows a double space there.
pub fn reconstruct_abstract(
    index: &BTreeMap<String, Vec<i64>>,
) -> std::result::Result<String, ParseError> {
    let mut max_pos: Option<i64> = None;
    for &pos in index.values().flatten() {
        if !(0..=MAX_ABSTRACT_POSITION).contains(&pos) {
            return Err(ParseError::AbstractPosition(pos));
        }
        max_pos = Some(max_pos.map_or(pos, |m| m.max(pos)));
    }

    let Some(max_pos) = max_pos else {
        return Ok(String::new());
    };

    let mut words = vec![""; max_pos as usize + 1];
    for (word, positions) in index {
        for &pos in positions {
            words[pos as usize] = word.as_str();
        }
    }
    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index(entries: &[(&str, &[i64])]) -> BTreeMap<String, Vec<i64>> {
        entries
            .iter()
            .map(|(w, p)| (w.to_string(), p.to_vec()))
            .collect()
    }

    #[test]
    fn test_reconstruct_abstract_with_gap() {
        let idx = index(&[("ultrasonic", &[0, 3]), ("testing", &[1])]);
        assert_eq!(
            reconstruct_abstract(&idx).unwrap(),
            "ultrasonic testing  ultrasonic"
        );
    }

    #[test]
    fn test_reconstruct_abstract_empty() {
        assert_eq!(reconstruct_abstract(&BTreeMap::new()).unwrap(), "");
        let idx = index(&[("orphan", &[])]);
        assert_eq!(reconstruct_abstract(&idx).unwrap(), "");
    }

    #[test]
    fn test_reconstruct_abstract_rejects_bad_positions() {
        let idx = index(&[("word", &[-1])]);
        assert_eq!(
            reconstruct_abstract(&idx),
            Err(ParseError::AbstractPosition(-1))
        );
        let idx = index(&[("word", &[MAX_ABSTRACT_POSITION + 1])]);
        assert!(reconstruct_abstract(&idx).is_err());
    }

    #[test]
    fn test_parse_work_full_record() {
        let raw = json!({
            "id": "https://openalex.org/W123",
            "title": "Impact echo on concrete",
            "publication_year": 2021,
            "doi": "https://doi.org/10.1016/j.ndteint.2021.1",
            "cited_by_count": 42,
            "type": "article",
            "open_access": {"is_oa": true},
            "primary_location": {"source": {"display_name": "NDT & E International"}},
            "authorships": [
                {"author": {"display_name": "A One"}},
                {"author": {"display_name": "B Two"}},
                {"author": null},
                {"author": {"display_name": "C Three"}},
                {"author": {"display_name": "D Four"}},
                {"author": {"display_name": "E Five"}},
                {"author": {"display_name": "F Six"}}
            ],
            "abstract_inverted_index": {"impact": [0], "echo": [1]}
        });

        let paper = parse_work(&raw).unwrap();
        assert_eq!(paper.openalex_id, "https://openalex.org/W123");
        assert_eq!(paper.doi, "10.1016/j.ndteint.2021.1");
        assert_eq!(paper.url, "https://doi.org/10.1016/j.ndteint.2021.1");
        assert_eq!(paper.year, Some(2021));
        assert_eq!(paper.journal, "NDT & E International");
        assert_eq!(paper.authors, ["A One", "B Two", "C Three", "D Four", "E Five"]);
        assert_eq!(paper.abstract_text, "impact echo");
        assert_eq!(paper.cited_by_count, 42);
        assert!(paper.open_access);
    }

    #[test]
    fn test_parse_work_sparse_record() {
        let raw = json!({
            "id": "https://openalex.org/W9",
            "title": null,
            "doi": null,
            "primary_location": {"source": null},
            "open_access": null,
            "authorships": []
        });

        let paper = parse_work(&raw).unwrap();
        assert_eq!(paper.title, "");
        assert_eq!(paper.doi, "");
        assert_eq!(paper.url, "https://openalex.org/W9");
        assert_eq!(paper.journal, "");
        assert!(!paper.open_access);
        assert_eq!(paper.year, None);
    }

    #[test]
    fn test_parse_work_malformed() {
        assert_eq!(parse_work(&json!({"title": "x"})), Err(ParseError::MissingId));
        assert!(matches!(
            parse_work(&json!({"id": "W1", "authorships": "nobody"})),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(parse_work(&json!("W1")), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_parse_page() {
        let body = r#"{"meta": {"count": 2, "next_cursor": "abc"}, "results": [{"id": "W1"}, {"id": "W2"}]}"#;
        let page = parse_page(body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
        assert_eq!(page.count, Some(2));

        let last = parse_page(r#"{"meta": {"next_cursor": null}, "results": []}"#).unwrap();
        assert!(last.next_cursor.is_none());
        assert!(parse_page(r#"{"meta": {}}"#).is_err());
    }

    #[test]
    fn test_build_query() {
        let request = PageRequest {
            search: "\"impact echo\" concrete".to_string(),
            filter: works_filter(2014, 2024),
            per_page: 100,
            cursor: FIRST_CURSOR.to_string(),
        };

        let params = build_query(&request, Some("me@example.org"));
        assert!(params.contains(&("filter", "publication_year:2014-2024,type:article".to_string())));
        assert!(params.contains(&("per-page", "100".to_string())));
        assert!(params.contains(&("cursor", "*".to_string())));
        assert!(params.contains(&("mailto", "me@example.org".to_string())));

        let params = build_query(&request, None);
        assert!(params.iter().all(|(k, _)| *k != "mailto"));
    }

    #[test]
    fn test_works_url_from_base() {
        let mut config = SearchConfig::default();
        config.api_base = "https://mirror.example.org/openalex".to_string();
        let client = OpenAlexClient::new(&config).unwrap();
        assert_eq!(
            client.works_url().as_str(),
            "https://mirror.example.org/openalex/works"
        );
    }
}
