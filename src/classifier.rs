//! Keyword relevance classifier.
//!
//! A paper passes five gates in order: no exclusion term, a core NDT method, a
//! structural material, and an assessment task or circular-economy context.
//! Accepted papers are then tagged with every task whose keywords they mention.

use crate::error::{Result, SearchError};
use crate::openalex::Paper;
use crate::taxonomy::{
    TaskCategory, CIRCULAR_ECONOMY, EXCLUSIONS, NDT_METHODS, STRUCTURAL_MATERIALS,
};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::fmt;

/// A fixed list of literal keywords behind one compiled matcher.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<&'static str>,
    matcher: Regex,
}

impl KeywordSet {
    pub fn new<I>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'static str>,
    {
        let keywords: Vec<&'static str> = keywords.into_iter().collect();
        if keywords.is_empty() {
            return Err(SearchError::Config("keyword set is empty".to_string()));
        }

        let pattern = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = RegexBuilder::new(&pattern)
            .build()
            .map_err(|e| SearchError::Config(format!("Invalid keyword pattern: {}", e)))?;

        Ok(Self { keywords, matcher })
    }

    /// Whether any keyword occurs in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// First keyword in list order that occurs in `text`.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        if !self.is_match(text) {
            return None;
        }
        self.keywords.iter().copied().find(|k| text.contains(k))
    }
}

/// Outcome of classifying one paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Mentions an off-topic exclusion term
    Excluded(&'static str),
    NoNdtMethod,
    NoMaterial,
    NoTaskOrCircular,
    /// Relevant; matched tasks in [`TaskCategory::ALL`] order, empty when only
    /// the circular-economy gate passed
    Included(Vec<TaskCategory>),
}

impl Verdict {
    pub fn is_included(&self) -> bool {
        matches!(self, Verdict::Included(_))
    }

    /// Matched tasks; empty for rejected papers.
    pub fn tasks(&self) -> &[TaskCategory] {
        match self {
            Verdict::Included(tasks) => tasks,
            _ => &[],
        }
    }

    /// Human-readable reason, as stored in the exports and exclusion log.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Excluded(term) => write!(f, "Excluded: {}", term),
            Verdict::NoNdtMethod => f.write_str("No core NDT method"),
            Verdict::NoMaterial => f.write_str("No structural material"),
            Verdict::NoTaskOrCircular => f.write_str("No assessment task or circular context"),
            Verdict::Included(tasks) if tasks.is_empty() => f.write_str("Tasks: circular"),
            Verdict::Included(tasks) => {
                let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
                write!(f, "Tasks: {}", names.join(", "))
            }
        }
    }
}

/// Relevance classifier over the review taxonomy.
///
/// Keeps a running count of how often each exclusion term rejected a paper.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    exclusions: KeywordSet,
    ndt_methods: KeywordSet,
    materials: KeywordSet,
    any_task: KeywordSet,
    circular: KeywordSet,
    tasks: Vec<(TaskCategory, KeywordSet)>,
    exclusion_counts: HashMap<&'static str, usize>,
}

impl RelevanceClassifier {
    pub fn new() -> Result<Self> {
        let tasks = TaskCategory::ALL
            .iter()
            .map(|&task| KeywordSet::new(task.keywords().iter().copied()).map(|set| (task, set)))
            .collect::<Result<Vec<_>>>()?;

        let any_task = KeywordSet::new(
            TaskCategory::ALL
                .iter()
                .flat_map(|task| task.keywords().iter().copied()),
        )?;

        Ok(Self {
            exclusions: KeywordSet::new(EXCLUSIONS.iter().copied())?,
            ndt_methods: KeywordSet::new(NDT_METHODS.iter().copied())?,
            materials: KeywordSet::new(STRUCTURAL_MATERIALS.iter().copied())?,
            any_task,
            circular: KeywordSet::new(CIRCULAR_ECONOMY.iter().copied())?,
            tasks,
            exclusion_counts: HashMap::new(),
        })
    }

    /// Classify free text without touching the exclusion counters.
    pub fn evaluate(&self, text: &str) -> Verdict {
        let text = text.to_lowercase();

        if let Some(term) = self.exclusions.first_match(&text) {
            return Verdict::Excluded(term);
        }
        if !self.ndt_methods.is_match(&text) {
            return Verdict::NoNdtMethod;
        }
        if !self.materials.is_match(&text) {
            return Verdict::NoMaterial;
        }
        if !(self.any_task.is_match(&text) || self.circular.is_match(&text)) {
            return Verdict::NoTaskOrCircular;
        }

        Verdict::Included(self.matched_tasks(&text))
    }

    /// Classify free text and record the exclusion term on rejection.
    pub fn classify(&mut self, text: &str) -> Verdict {
        let verdict = self.evaluate(text);
        if let Verdict::Excluded(term) = verdict {
            *self.exclusion_counts.entry(term).or_insert(0) += 1;
        }
        verdict
    }

    /// Classify a parsed paper on its title and abstract.
    pub fn classify_paper(&mut self, paper: &Paper) -> Verdict {
        self.classify(&paper.search_text())
    }

    /// Every task whose keywords occur in lower-cased `text`.
    pub fn matched_tasks(&self, text: &str) -> Vec<TaskCategory> {
        self.tasks
            .iter()
            .filter(|(_, set)| set.is_match(text))
            .map(|(task, _)| *task)
            .collect()
    }

    /// Exclusion terms that fired, most frequent first; ties keep list order.
    pub fn exclusion_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = EXCLUSIONS
            .iter()
            .filter_map(|term| self.exclusion_counts.get(term).map(|&n| (*term, n)))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    pub fn reset_counts(&mut self) {
        self.exclusion_counts.clear();
    }
}
