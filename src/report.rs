//! Console rendering of the PRISMA summary.

use crate::stats::PrismaStats;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;
const JOURNALS_SHOWN: usize = 10;
const JOURNAL_NAME_CHARS: usize = 45;

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn bar(blocks: usize) -> String {
    "█".repeat(blocks)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Multi-line summary: totals, tasks, materials, years and top journals.
pub fn render_summary(stats: &PrismaStats) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let total = stats.records_after_filtering;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "PRISMA SUMMARY - Five Assessment Tasks");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Target: {} papers", stats.target_records);
    let _ = writeln!(out, "Records identified: {}", stats.records_identified);
    let _ = writeln!(out, "After filtering: {}", total);
    let _ = writeln!(out, "Open Access: {}", stats.open_access);

    let _ = writeln!(out, "\n--- By Assessment Task ---");
    for (task, count) in &stats.by_assessment_task {
        let pct = percent(*count, total);
        let _ = writeln!(
            out,
            "  {:15}: {:4} ({:5.1}%) {}",
            capitalize(task.name()),
            count,
            pct,
            bar((pct / 5.0) as usize)
        );
    }

    let _ = writeln!(out, "\n--- By Material ---");
    for (material, count) in &stats.by_material {
        let _ = writeln!(
            out,
            "  {:10}: {:4} ({:5.1}%)",
            capitalize(material),
            count,
            percent(*count, total)
        );
    }

    let _ = writeln!(out, "\n--- By Year ---");
    for (year, count) in stats.by_year.iter().rev() {
        let _ = writeln!(out, "  {}: {:4} {}", year, count, bar(count / 5));
    }

    let _ = writeln!(out, "\n--- Top Journals ---");
    for (i, (journal, count)) in stats.by_journal.iter().take(JOURNALS_SHOWN).enumerate() {
        let name: String = journal.chars().take(JOURNAL_NAME_CHARS).collect();
        let _ = writeln!(out, "  {}. {}: {}", i + 1, name, count);
    }

    out
}

/// Exclusion terms with their hit counts, one per line.
pub fn render_exclusions(counts: &[(&str, usize)], limit: usize) -> String {
    let mut out = String::new();
    for (term, count) in counts.iter().take(limit) {
        let _ = writeln!(out, "  {:25}: {:4}", term, count);
    }
    out
}
