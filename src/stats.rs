//! PRISMA-style summary statistics over the accepted set.

use crate::config::{SearchConfig, TARGET_RECORDS};
use crate::search::{AcceptedPaper, SearchOutcome};
use crate::taxonomy::{MaterialClass, TaskCategory};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Journals kept in the ranking
pub const TOP_JOURNALS: usize = 15;

const DATABASE: &str = "OpenAlex";
const METHODOLOGY: &str = "Restricted search aligned with the review's five assessment tasks";

/// Summary written to the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrismaStats {
    pub database: String,
    pub search_date: String,
    pub methodology: String,
    pub five_assessment_tasks: Vec<String>,
    pub date_range: String,
    pub target_records: usize,
    pub records_identified: usize,
    pub records_after_filtering: usize,
    pub excluded_count: usize,
    #[serde(serialize_with = "ordered_map")]
    pub by_assessment_task: Vec<(TaskCategory, usize)>,
    pub by_year: BTreeMap<i32, usize>,
    /// Most frequent journals, highest count first
    #[serde(serialize_with = "ordered_map")]
    pub by_journal: Vec<(String, usize)>,
    #[serde(serialize_with = "ordered_map")]
    pub by_material: Vec<(&'static str, usize)>,
    pub open_access: usize,
}

impl PrismaStats {
    pub fn from_outcome(outcome: &SearchOutcome, config: &SearchConfig, search_date: NaiveDate) -> Self {
        summarize(&outcome.accepted, outcome.excluded.len(), config, search_date)
    }

    pub fn task_count(&self, task: TaskCategory) -> usize {
        lookup(&self.by_assessment_task, &task)
    }

    pub fn material_count(&self, material: MaterialClass) -> usize {
        lookup(&self.by_material, &material.name())
    }
}

/// Recompute every count from the accepted papers.
pub fn summarize(
    accepted: &[AcceptedPaper],
    excluded: usize,
    config: &SearchConfig,
    search_date: NaiveDate,
) -> PrismaStats {
    let by_assessment_task = TaskCategory::ALL
        .iter()
        .map(|&task| (task, accepted.iter().filter(|p| p.tasks.contains(&task)).count()))
        .collect();

    let texts: Vec<String> = accepted.iter().map(|p| p.paper.search_text()).collect();
    let by_material = MaterialClass::ALL
        .iter()
        .map(|&material| {
            let count = texts.iter().filter(|t| material.detect(t)).count();
            (material.name(), count)
        })
        .collect();

    let mut by_year = BTreeMap::new();
    for year in accepted.iter().filter_map(|p| p.paper.year) {
        *by_year.entry(year).or_insert(0) += 1;
    }

    PrismaStats {
        database: DATABASE.to_string(),
        search_date: search_date.format("%Y-%m-%d").to_string(),
        methodology: METHODOLOGY.to_string(),
        five_assessment_tasks: TaskCategory::ALL
            .iter()
            .enumerate()
            .map(|(i, task)| format!("{}. {}", i + 1, task.title()))
            .collect(),
        date_range: config.date_range(),
        target_records: TARGET_RECORDS,
        records_identified: accepted.len() + excluded,
        records_after_filtering: accepted.len(),
        excluded_count: excluded,
        by_assessment_task,
        by_year,
        by_journal: top_journals(accepted, TOP_JOURNALS),
        by_material,
        open_access: accepted.iter().filter(|p| p.paper.open_access).count(),
    }
}

/// Journal counts, highest first; equal counts keep first-seen order.
pub fn top_journals(accepted: &[AcceptedPaper], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for journal in accepted.iter().map(|p| p.paper.journal.as_str()) {
        if journal.is_empty() {
            continue;
        }
        match slots.get(journal) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(journal, counts.len());
                counts.push((journal.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

fn lookup<K: PartialEq>(pairs: &[(K, usize)], key: &K) -> usize {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Serialize key/value pairs as a JSON object without reordering them.
fn ordered_map<K, S>(pairs: &[(K, usize)], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    K: Serialize,
    S: Serializer,
{
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openalex::Paper;

    fn accepted(title: &str, journal: &str, year: Option<i32>, tasks: &[TaskCategory]) -> AcceptedPaper {
        AcceptedPaper {
            paper: Paper {
                title: title.to_string(),
                journal: journal.to_string(),
                year,
                ..Default::default()
            },
            tasks: tasks.to_vec(),
            assessment_tasks: String::new(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()
    }

    #[test]
    fn test_counts() {
        let mut oa = accepted("Timber beam decay", "J1", Some(2020), &[TaskCategory::Deterioration]);
        oa.paper.open_access = true;
        let papers = vec![
            accepted(
                "Reinforced concrete and steel",
                "J2",
                Some(2021),
                &[TaskCategory::Geometry, TaskCategory::Strength],
            ),
            oa,
            accepted("Wood and masonry", "J2", None, &[]),
        ];

        let stats = summarize(&papers, 7, &SearchConfig::default(), date());
        assert_eq!(stats.records_identified, 10);
        assert_eq!(stats.records_after_filtering, 3);
        assert_eq!(stats.excluded_count, 7);
        assert_eq!(stats.target_records, 612);
        assert_eq!(stats.open_access, 1);
        assert_eq!(stats.search_date, "2026-01-09");
        assert_eq!(stats.date_range, "2014-2024");

        assert_eq!(stats.task_count(TaskCategory::Geometry), 1);
        assert_eq!(stats.task_count(TaskCategory::Strength), 1);
        assert_eq!(stats.task_count(TaskCategory::Deterioration), 1);
        assert_eq!(stats.task_count(TaskCategory::Moisture), 0);

        assert_eq!(stats.material_count(MaterialClass::Concrete), 1);
        assert_eq!(stats.material_count(MaterialClass::Steel), 1);
        assert_eq!(stats.material_count(MaterialClass::Timber), 2);
        assert_eq!(stats.material_count(MaterialClass::Masonry), 1);

        assert_eq!(stats.by_year.get(&2021), Some(&1));
        assert_eq!(stats.by_year.values().sum::<usize>(), 2);
        assert_eq!(stats.by_journal, vec![("J2".to_string(), 2), ("J1".to_string(), 1)]);
    }

    #[test]
    fn test_top_journals_limit_and_ties() {
        let mut papers: Vec<AcceptedPaper> = (0..20)
            .map(|i| accepted("t", &format!("Journal {}", i), None, &[]))
            .collect();
        papers.push(accepted("t", "Journal 19", None, &[]));
        papers.push(accepted("t", "", None, &[]));

        let top = top_journals(&papers, TOP_JOURNALS);
        assert_eq!(top.len(), 15);
        assert_eq!(top[0], ("Journal 19".to_string(), 2));
        assert_eq!(top[1].0, "Journal 0");
        assert_eq!(top[14].0, "Journal 13");
    }

    #[test]
    fn test_json_shape_keeps_order() {
        let papers = vec![
            accepted("a", "Zeta", Some(2019), &[TaskCategory::Moisture]),
            accepted("b", "Zeta", Some(2019), &[]),
            accepted("c", "Alpha", Some(2018), &[]),
        ];
        let stats = summarize(&papers, 0, &SearchConfig::default(), date());
        let json = serde_json::to_string(&stats).unwrap();

        assert!(json.contains(r#""by_journal":{"Zeta":2,"Alpha":1}"#));
        assert!(json.contains(
            r#""by_assessment_task":{"geometry":0,"strength":0,"deterioration":0,"defects":0,"moisture":1}"#
        ));
        assert!(json.contains(r#""by_year":{"2018":1,"2019":2}"#));
        assert!(json.contains(r#""by_material":{"concrete":0,"steel":0,"timber":0,"masonry":0}"#));
        assert!(json.contains(r#""1. Geometry verification""#));
    }

    #[test]
    fn test_empty_accepted_set() {
        let stats = summarize(&[], 4, &SearchConfig::default(), date());
        assert_eq!(stats.records_identified, 4);
        assert!(stats.by_journal.is_empty());
        assert!(stats.by_year.is_empty());
        assert_eq!(stats.by_assessment_task.len(), 5);
    }
}
