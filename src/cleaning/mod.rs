//! Record cleaning.
//!
//! Raw feed rows are normalised before anything gets embedded: rows without
//! an abstract are dropped, empty optional columns are cleared, duplicate
//! abstracts are removed and markup artifacts are stripped from the text.

use std::collections::HashSet;

use tracing::debug;

use crate::models::Record;

/// Bold markup opener left in titles and abstracts by LaTeX sources.
const BOLD_MARKUP: &str = "\\textbf{";

/// Cleans a batch of fetched records.
///
/// The transformation is pure and idempotent: cleaning an already cleaned
/// batch returns it unchanged. An empty input yields an empty output.
///
/// Steps, in order:
/// 1. drop records whose summary is missing or blank
/// 2. drop records whose summary repeats an earlier one byte for byte
/// 3. replace newlines with a space and strip `\textbf{` and `}` from title and summary
/// 4. drop records left with an empty title, and repeat step 2 on the stripped text
/// 5. clear optional columns (`journal_ref`, `doi`) that are empty for every kept record
pub fn clean(records: Vec<Record>) -> Vec<Record> {
    let total = records.len();

    let records: Vec<Record> = records
        .into_iter()
        .filter(|r| r.summary.as_deref().is_some_and(|s| !s.trim().is_empty()))
        .collect();

    let mut records = dedup_by_summary(records);

    for record in &mut records {
        record.title = strip_markup(&record.title);
        record.summary = record.summary.as_deref().map(strip_markup);
    }

    let records: Vec<Record> = records
        .into_iter()
        .filter(|r| !r.title.trim().is_empty() && !r.summary_text().trim().is_empty())
        .collect();

    let mut records = dedup_by_summary(records);

    drop_empty_columns(&mut records);

    debug!("Cleaned {} raw records down to {}", total, records.len());

    records
}

/// Replaces newlines with a space and removes bold markup.
pub fn strip_markup(text: &str) -> String {
    let mut text = text.replace('\n', " ").replace('}', "");
    // removing one opener can splice a new one together
    while text.contains(BOLD_MARKUP) {
        text = text.replace(BOLD_MARKUP, "");
    }
    text
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn drop_empty_columns(records: &mut [Record]) {
    if records.iter().all(|r| is_blank(&r.journal_ref)) {
        for r in records.iter_mut() {
            r.journal_ref = None;
        }
    }
    if records.iter().all(|r| is_blank(&r.doi)) {
        for r in records.iter_mut() {
            r.doi = None;
        }
    }
}

fn dedup_by_summary(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.summary_text().to_string()))
        .collect()
}
