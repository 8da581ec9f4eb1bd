//! CSV, BibTeX and JSON exports of a search run.

use crate::config::{BIBTEX_FILE, CSV_FILE, SUMMARY_FILE};
use crate::error::Result;
use crate::openalex::Paper;
use crate::search::AcceptedPaper;
use crate::stats::PrismaStats;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One CSV row: paper fields plus the classifier reason.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    authors: String,
    year: Option<i32>,
    doi: &'a str,
    journal: &'a str,
    #[serde(rename = "abstract")]
    abstract_text: &'a str,
    cited_by_count: i64,
    #[serde(rename = "type")]
    work_type: &'a str,
    open_access: bool,
    url: &'a str,
    openalex_id: &'a str,
    assessment_tasks: &'a str,
}

impl<'a> From<&'a AcceptedPaper> for CsvRow<'a> {
    fn from(a: &'a AcceptedPaper) -> Self {
        let p = &a.paper;
        Self {
            title: &p.title,
            authors: p.authors_joined(),
            year: p.year,
            doi: &p.doi,
            journal: &p.journal,
            abstract_text: &p.abstract_text,
            cited_by_count: p.cited_by_count,
            work_type: &p.work_type,
            open_access: p.open_access,
            url: &p.url,
            openalex_id: &p.openalex_id,
            assessment_tasks: &a.assessment_tasks,
        }
    }
}

/// Newest first, then most cited; papers without a year go last.
pub fn csv_order(accepted: &[AcceptedPaper]) -> Vec<&AcceptedPaper> {
    let mut sorted: Vec<&AcceptedPaper> = accepted.iter().collect();
    sorted.sort_by(|a, b| {
        let by_year = match (a.paper.year, b.paper.year) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_year.then_with(|| b.paper.cited_by_count.cmp(&a.paper.cited_by_count))
    });
    sorted
}

/// Write accepted papers as CSV with a header row.
pub fn write_csv_to<W: Write>(writer: W, accepted: &[AcceptedPaper]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    let rows = csv_order(accepted);
    for paper in &rows {
        wtr.serialize(CsvRow::from(*paper))?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Save the CSV export. An empty set writes nothing.
pub fn write_csv(path: &Path, accepted: &[AcceptedPaper]) -> Result<usize> {
    if accepted.is_empty() {
        info!(path = %path.display(), "No papers to save");
        return Ok(0);
    }
    let file = fs::File::create(path)?;
    let written = write_csv_to(file, accepted)?;
    info!(path = %path.display(), rows = written, "Saved CSV");
    Ok(written)
}

/// Citation key `<surname><year>_<index>`, alphanumerics and `_` only.
pub fn cite_key(paper: &Paper, index: usize) -> String {
    let surname = paper
        .authors
        .first()
        .and_then(|name| name.split_whitespace().last())
        .unwrap_or("Unknown");
    let year = paper.year.map(|y| y.to_string()).unwrap_or_default();

    format!("{}{}_{}", surname, year, index)
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

fn escape_braces(text: &str) -> String {
    text.replace('{', "\\{").replace('}', "\\}")
}

/// One `@article` entry.
pub fn bibtex_entry(paper: &Paper, index: usize) -> String {
    format!(
        "@article{{{key},\n  title = {{{title}}},\n  author = {{{author}}},\n  year = {{{year}}},\n  journal = {{{journal}}},\n  doi = {{{doi}}},\n}}",
        key = cite_key(paper, index),
        title = escape_braces(&paper.title),
        author = paper.authors_joined(),
        year = paper.year.map(|y| y.to_string()).unwrap_or_default(),
        journal = paper.journal,
        doi = paper.doi,
    )
}

/// All entries in accepted order, separated by blank lines.
pub fn to_bibtex(accepted: &[AcceptedPaper]) -> String {
    accepted
        .iter()
        .enumerate()
        .map(|(i, a)| bibtex_entry(&a.paper, i))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Save the BibTeX export. An empty set writes nothing.
pub fn write_bibtex(path: &Path, accepted: &[AcceptedPaper]) -> Result<usize> {
    if accepted.is_empty() {
        info!(path = %path.display(), "No papers to save");
        return Ok(0);
    }
    fs::write(path, to_bibtex(accepted))?;
    info!(path = %path.display(), entries = accepted.len(), "Saved BibTeX");
    Ok(accepted.len())
}

/// Save the PRISMA summary as pretty-printed JSON.
pub fn write_summary(path: &Path, stats: &PrismaStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "Saved PRISMA summary");
    Ok(())
}

/// Files produced by [`export_all`]; `None` when there was nothing to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv: Option<PathBuf>,
    pub bibtex: Option<PathBuf>,
    pub summary: PathBuf,
}

/// Write all three artifacts into `dir`, creating it if needed.
pub fn export_all(dir: &Path, accepted: &[AcceptedPaper], stats: &PrismaStats) -> Result<ExportPaths> {
    fs::create_dir_all(dir)?;

    let csv_path = dir.join(CSV_FILE);
    let bib_path = dir.join(BIBTEX_FILE);
    let summary_path = dir.join(SUMMARY_FILE);

    let csv = (write_csv(&csv_path, accepted)? > 0).then_some(csv_path);
    let bibtex = (write_bibtex(&bib_path, accepted)? > 0).then_some(bib_path);
    write_summary(&summary_path, stats)?;

    Ok(ExportPaths {
        csv,
        bibtex,
        summary: summary_path,
    })
}
