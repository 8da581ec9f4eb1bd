//! Search driver.
//!
//! Runs every query term through cursor pagination, parses and classifies each
//! record, and accumulates the accepted set (deduplicated by OpenAlex id, in
//! insertion order) plus an exclusion log. Failures of one term never stop the
//! run.

use crate::classifier::{RelevanceClassifier, Verdict};
use crate::config::SearchConfig;
use crate::openalex::{parse_work, works_filter, Paper, PageRequest, WorksApi, FIRST_CURSOR};
use crate::taxonomy::TaskCategory;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Title characters kept in the exclusion log
const EXCLUDED_TITLE_CHARS: usize = 60;

/// A paper that passed the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedPaper {
    pub paper: Paper,
    pub tasks: Vec<TaskCategory>,
    /// Classifier reason, e.g. `Tasks: geometry, strength`
    pub assessment_tasks: String,
}

/// Audit entry for a rejected paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionRecord {
    pub title: String,
    pub reason: String,
}

impl ExclusionRecord {
    fn new(paper: &Paper, verdict: &Verdict) -> Self {
        Self {
            title: paper.title.chars().take(EXCLUDED_TITLE_CHARS).collect(),
            reason: verdict.reason(),
        }
    }
}

/// What one query term contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermReport {
    pub term: String,
    /// Newly accepted papers
    pub added: usize,
    /// Pages fetched successfully
    pub pages: u32,
    /// Error that ended this term's pagination early
    pub error: Option<String>,
}

/// Everything a search run produced.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Accepted papers in first-seen order
    pub accepted: Vec<AcceptedPaper>,
    pub excluded: Vec<ExclusionRecord>,
    /// Records dropped as malformed
    pub skipped: usize,
    pub terms: Vec<TermReport>,
    /// Exclusion terms that fired, most frequent first
    pub exclusion_counts: Vec<(&'static str, usize)>,
}

impl SearchOutcome {
    /// Records screened: accepted plus every logged exclusion.
    pub fn records_identified(&self) -> usize {
        self.accepted.len() + self.excluded.len()
    }
}

/// Per-run accumulators.
#[derive(Default)]
struct RunState {
    accepted: Vec<AcceptedPaper>,
    accepted_ids: HashSet<String>,
    excluded: Vec<ExclusionRecord>,
    skipped: usize,
}

/// Drives the paginated search against a [`WorksApi`].
pub struct Searcher<A> {
    api: A,
    config: SearchConfig,
    classifier: RelevanceClassifier,
}

impl<A: WorksApi> Searcher<A> {
    pub fn new(api: A, config: SearchConfig, classifier: RelevanceClassifier) -> Self {
        Self {
            api,
            config,
            classifier,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search every term in order. Each call starts from empty accumulators.
    pub async fn run<S: AsRef<str>>(&mut self, terms: &[S]) -> SearchOutcome {
        info!(
            terms = terms.len(),
            years = %self.config.date_range(),
            max_pages = self.config.max_pages_per_term,
            "Starting restricted literature search"
        );

        self.classifier.reset_counts();
        let mut state = RunState::default();
        let mut reports = Vec::with_capacity(terms.len());

        for term in terms {
            let report = self.search_term(term.as_ref(), &mut state).await;
            info!(
                term = %report.term,
                added = report.added,
                pages = report.pages,
                total = state.accepted.len(),
                "Term complete"
            );
            reports.push(report);
        }

        info!(
            accepted = state.accepted.len(),
            excluded = state.excluded.len(),
            skipped = state.skipped,
            "Search complete"
        );

        SearchOutcome {
            accepted: state.accepted,
            excluded: state.excluded,
            skipped: state.skipped,
            terms: reports,
            exclusion_counts: self.classifier.exclusion_counts(),
        }
    }

    async fn search_term(&mut self, term: &str, state: &mut RunState) -> TermReport {
        let mut report = TermReport {
            term: term.to_string(),
            added: 0,
            pages: 0,
            error: None,
        };
        let mut request = PageRequest {
            search: term.to_string(),
            filter: works_filter(self.config.start_year, self.config.end_year),
            per_page: self.config.per_page,
            cursor: FIRST_CURSOR.to_string(),
        };

        while report.pages < self.config.max_pages_per_term {
            let page = match self.api.fetch_page(&request).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(term = term, page = report.pages + 1, error = %e, "Failed to fetch page");
                    report.error = Some(e.to_string());
                    break;
                }
            };
            report.pages += 1;

            if page.results.is_empty() {
                debug!(term = term, page = report.pages, "Empty page");
                break;
            }
            debug!(
                term = term,
                page = report.pages,
                records = page.results.len(),
                "Processing page"
            );

            for raw in &page.results {
                if self.screen(raw, state) {
                    report.added += 1;
                }
            }

            let Some(next) = page.next_cursor else {
                break;
            };
            request.cursor = next;

            if report.pages < self.config.max_pages_per_term && !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        report
    }

    /// Parse, deduplicate and classify one raw record. Returns whether it was
    /// newly accepted.
    fn screen(&mut self, raw: &serde_json::Value, state: &mut RunState) -> bool {
        let paper = match parse_work(raw) {
            Ok(paper) => paper,
            Err(e) => {
                debug!(error = %e, "Skipping malformed record");
                state.skipped += 1;
                return false;
            }
        };

        if state.accepted_ids.contains(&paper.openalex_id) {
            return false;
        }

        let verdict = self.classifier.classify_paper(&paper);
        if !verdict.is_included() {
            state.excluded.push(ExclusionRecord::new(&paper, &verdict));
            return false;
        }

        state.accepted_ids.insert(paper.openalex_id.clone());
        state.accepted.push(AcceptedPaper {
            tasks: verdict.tasks().to_vec(),
            assessment_tasks: verdict.reason(),
            paper,
        });
        true
    }
}
