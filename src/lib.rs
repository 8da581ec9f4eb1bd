//! # ndtsearch
//!
//! Restricted OpenAlex literature search for a systematic review of
//! non-destructive testing in circular construction.
//!
//! ## Modules
//!
//! - [`taxonomy`] - Keyword lists, task categories and query terms
//! - [`classifier`] - Five-gate keyword relevance classifier
//! - [`openalex`] - OpenAlex client and work-record parser
//! - [`search`] - Paginated search driver with deduplication
//! - [`stats`] - PRISMA summary statistics
//! - [`export`] - CSV, BibTeX and JSON exports
//! - [`report`] - Console summary
//! - [`config`] - Run configuration
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ndtsearch::{classifier::RelevanceClassifier, config::SearchConfig};
//! use ndtsearch::openalex::OpenAlexClient;
//! use ndtsearch::search::Searcher;
//! use ndtsearch::taxonomy::SEARCH_TERMS;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SearchConfig::default();
//!     let client = OpenAlexClient::new(&config)?;
//!     let mut searcher = Searcher::new(client, config, RelevanceClassifier::new()?);
//!     let terms: Vec<&str> = SEARCH_TERMS.iter().map(|t| t.query).collect();
//!     let outcome = searcher.run(&terms).await;
//!     println!("Accepted {} papers", outcome.accepted.len());
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod export;
pub mod openalex;
pub mod report;
pub mod search;
pub mod stats;
pub mod taxonomy;

pub use error::{ParseError, Result, SearchError};
