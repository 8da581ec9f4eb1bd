use async_trait::async_trait;
use chrono::NaiveDate;
use ndtsearch::classifier::RelevanceClassifier;
use ndtsearch::config::{SearchConfig, BIBTEX_FILE, CSV_FILE, SUMMARY_FILE};
use ndtsearch::export::export_all;
use ndtsearch::openalex::{PageRequest, WorksApi, WorksPage};
use ndtsearch::search::Searcher;
use ndtsearch::stats::PrismaStats;
use ndtsearch::Result;
use serde_json::{json, Value};
use std::time::Duration;

/// Serves two pages for the first term and one for the second.
struct CannedApi;

fn work(id: &str, year: i32, cites: i64, title: &str, abstract_words: &[&str]) -> Value {
    let index: serde_json::Map<String, Value> = abstract_words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.to_string(), json!([i])))
        .collect();
    json!({
        "id": format!("https://openalex.org/{}", id),
        "title": title,
        "publication_year": year,
        "doi": format!("https://doi.org/10.1000/{}", id.to_lowercase()),
        "cited_by_count": cites,
        "type": "article",
        "open_access": {"is_oa": year > 2020},
        "primary_location": {"source": {"display_name": "NDT & E International"}},
        "authorships": [{"author": {"display_name": "Ana Silva"}}],
        "abstract_inverted_index": index
    })
}

#[async_trait]
impl WorksApi for CannedApi {
    async fn fetch_page(&self, request: &PageRequest) -> Result<WorksPage> {
        assert_eq!(request.filter, "publication_year:2014-2024,type:article");
        let (results, next) = match (request.search.as_str(), request.cursor.as_str()) {
            ("gpr", "*") => (
                vec![
                    work("W1", 2019, 10, "GPR survey of reinforced concrete", &["rebar", "detection"]),
                    work("W2", 2023, 3, "Half-cell potential on a concrete bridge", &["corrosion", "rate"]),
                ],
                Some("next"),
            ),
            ("gpr", "next") => (
                vec![
                    work("W3", 2023, 8, "Rebound hammer on aircraft hangar slabs", &[]),
                    json!({"title": "broken record"}),
                ],
                None,
            ),
            ("timber", "*") => (
                vec![
                    work("W1", 2019, 10, "GPR survey of reinforced concrete", &["rebar", "detection"]),
                    work("W4", 2021, 1, "Resistograph on a timber structure", &["wood", "decay"]),
                ],
                None,
            ),
            _ => (vec![], None),
        };
        Ok(WorksPage {
            results,
            next_cursor: next.map(str::to_string),
            count: None,
        })
    }
}

#[tokio::test]
async fn search_aggregate_and_export() {
    let config = SearchConfig {
        page_delay: Duration::ZERO,
        ..Default::default()
    };
    let mut searcher = Searcher::new(CannedApi, config, RelevanceClassifier::new().unwrap());
    let outcome = searcher.run(&["gpr", "timber"]).await;

    let ids: Vec<&str> = outcome
        .accepted
        .iter()
        .map(|a| a.paper.openalex_id.as_str())
        .collect();
    assert_eq!(
        ids,
        [
            "https://openalex.org/W1",
            "https://openalex.org/W2",
            "https://openalex.org/W4"
        ]
    );
    assert_eq!(outcome.accepted[0].assessment_tasks, "Tasks: geometry");
    assert_eq!(outcome.accepted[1].assessment_tasks, "Tasks: deterioration");
    assert_eq!(outcome.accepted[2].assessment_tasks, "Tasks: deterioration");
    assert_eq!(outcome.excluded.len(), 1);
    assert_eq!(outcome.excluded[0].reason, "Excluded: aircraft");
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.terms[0].pages, 2);

    let stats = PrismaStats::from_outcome(
        &outcome,
        searcher.config(),
        NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
    );
    assert_eq!(stats.records_identified, 4);
    assert_eq!(stats.open_access, 2);

    let dir = tempfile::tempdir().unwrap();
    let paths = export_all(dir.path(), &outcome.accepted, &stats).unwrap();
    assert_eq!(paths.csv, Some(dir.path().join(CSV_FILE)));
    assert_eq!(paths.bibtex, Some(dir.path().join(BIBTEX_FILE)));
    assert_eq!(paths.summary, dir.path().join(SUMMARY_FILE));

    let csv = std::fs::read_to_string(dir.path().join(CSV_FILE)).unwrap();
    let order: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap_or(""))
        .collect();
    assert_eq!(
        order,
        [
            "Half-cell potential on a concrete bridge",
            "Resistograph on a timber structure",
            "GPR survey of reinforced concrete"
        ]
    );

    let bib = std::fs::read_to_string(dir.path().join(BIBTEX_FILE)).unwrap();
    assert!(bib.starts_with("@article{Silva2019_0,"));
    assert!(bib.contains("@article{Silva2021_2,"));
    assert!(bib.contains("doi = {10.1000/w2},"));

    let summary: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary["target_records"], 612);
    assert_eq!(summary["records_after_filtering"], 3);
    assert_eq!(summary["excluded_count"], 1);
    assert_eq!(summary["by_assessment_task"]["deterioration"], 2);
    assert_eq!(summary["by_material"]["timber"], 1);
    assert_eq!(summary["by_journal"]["NDT & E International"], 3);
    assert_eq!(summary["by_year"]["2023"], 1);
    assert_eq!(summary["search_date"], "2026-01-09");
}
