//! Run configuration.
//!
//! Defaults reproduce the review's search protocol: articles published
//! 2014-2024, three pages of 100 results per query term.

use crate::error::{Result, SearchError};
use std::time::Duration;
use url::Url;

/// OpenAlex API base URL
pub const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// Record count the review reports as its initial corpus
pub const TARGET_RECORDS: usize = 612;

/// Output file names
pub const CSV_FILE: &str = "ndt_restricted_612_results.csv";
pub const BIBTEX_FILE: &str = "ndt_restricted_612_references.bib";
pub const SUMMARY_FILE: &str = "prisma_restricted_612.json";

/// OpenAlex hard limit for `per-page`
const MAX_PER_PAGE: u32 = 200;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub max_pages_per_term: u32,
    pub per_page: u32,
    /// Pause between page fetches of one term
    pub page_delay: Duration,
    /// Contact address for the OpenAlex polite pool
    pub mailto: Option<String>,
    pub api_base: String,
    pub http_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_year: 2014,
            end_year: 2024,
            max_pages_per_term: 3,
            per_page: 100,
            page_delay: Duration::from_millis(100),
            mailto: None,
            api_base: OPENALEX_API_BASE.to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl SearchConfig {
    /// Reject settings the API or the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(SearchError::Config(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if self.max_pages_per_term == 0 {
            return Err(SearchError::Config(
                "max pages per term must be at least 1".to_string(),
            ));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(SearchError::Config(format!(
                "per-page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        self.api_url()?;
        Ok(())
    }

    /// API base as a URL with a trailing slash, ready for `join`.
    pub fn api_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SearchError::Config(format!("Invalid API base URL {}: {}", self.api_base, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "unsupported API scheme: {}",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Human-readable year range, e.g. `2014-2024`.
    pub fn date_range(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.date_range(), "2014-2024");
        assert_eq!(config.api_url().unwrap().as_str(), "https://api.openalex.org/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let config = SearchConfig {
            start_year: 2025,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            per_page: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            max_pages_per_term: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            api_base: "ftp://api.openalex.org".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
