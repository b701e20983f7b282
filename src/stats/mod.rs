//! Summary chart data.
//!
//! Computes the numbers behind the secondary charts of a search: papers per
//! publication year, the published/unpublished split, word-count
//! distributions and the keyword frequencies of the word cloud.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Maximum number of words kept for the keyword cloud.
pub const MAX_KEYWORDS: usize = 50;

/// Shortest word admitted to the keyword cloud.
pub const MIN_KEYWORD_LENGTH: usize = 4;

/// English stopwords excluded from the keyword cloud (only words at least
/// `MIN_KEYWORD_LENGTH` long matter).
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "because", "been", "before", "being",
    "below", "between", "both", "cannot", "could", "does", "doing", "down", "during", "each",
    "else", "ever", "from", "further", "get", "have", "having", "hence", "here", "herself",
    "himself", "however", "into", "itself", "just", "like", "more", "most", "myself", "once",
    "only", "other", "otherwise", "ought", "ours", "ourselves", "over", "same", "shall", "should",
    "since", "some", "such", "than", "that", "their", "theirs", "them", "themselves", "then",
    "there", "therefore", "these", "they", "this", "those", "through", "under", "until", "very",
    "were", "what", "when", "where", "which", "while", "whom", "with", "would", "your", "yours",
    "yourself", "yourselves",
];

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("valid word pattern"))
}

fn keyword_regex() -> &'static Regex {
    static KEYWORD: OnceLock<Regex> = OnceLock::new();
    KEYWORD.get_or_init(|| Regex::new(r"[a-zA-Z#&]+").expect("valid keyword pattern"))
}

/// Counts of published (journal reference present) and unpublished papers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PublishedSplit {
    pub published: usize,
    pub unpublished: usize,
}

impl PublishedSplit {
    /// Split a batch of records by `Record::is_published`.
    pub fn from_records(records: &[Record]) -> Self {
        let published = records.iter().filter(|r| r.is_published()).count();
        Self {
            published,
            unpublished: records.len() - published,
        }
    }

    /// Total number of papers.
    pub fn total(&self) -> usize {
        self.published + self.unpublished
    }

    /// Share of published papers, in percent (`0.0` for an empty batch).
    pub fn published_percentage(&self) -> f64 {
        percentage(self.published, self.total())
    }

    /// Share of unpublished papers, in percent (`0.0` for an empty batch).
    pub fn unpublished_percentage(&self) -> f64 {
        percentage(self.unpublished, self.total())
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// A word of the keyword cloud and its number of occurrences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Number of `\w+` words in a text.
pub fn word_count(text: &str) -> usize {
    word_regex().find_iter(text).count()
}

/// Publication year taken from the first four characters of a date string.
pub fn publication_year(published: &str) -> Option<i32> {
    published.get(..4)?.parse().ok()
}

/// Papers per publication year, in ascending year order.
///
/// Records with an unparsable date are skipped.
pub fn year_trend(records: &[Record]) -> BTreeMap<i32, usize> {
    let mut trend = BTreeMap::new();
    for year in records.iter().filter_map(|r| publication_year(&r.published)) {
        *trend.entry(year).or_insert(0) += 1;
    }
    trend
}

/// Most frequent keywords across all summaries.
///
/// Words are runs of ASCII letters, `#` and `&`, lower-cased; words shorter
/// than `MIN_KEYWORD_LENGTH` and stopwords are dropped. Returns at most
/// `limit` words by descending count, ties broken alphabetically.
pub fn keywords(records: &[Record], limit: usize) -> Vec<KeywordCount> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        for m in keyword_regex().find_iter(record.summary_text()) {
            let word = m.as_str().to_lowercase();
            if word.len() < MIN_KEYWORD_LENGTH || stopwords.contains(word.as_str()) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut keywords: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(word, count)| KeywordCount { word, count })
        .collect();
    keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    keywords.truncate(limit);
    keywords
}

/// All chart data for one search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartStats {
    /// Papers per publication year
    pub year_trend: BTreeMap<i32, usize>,

    /// Published vs unpublished papers
    pub published_split: PublishedSplit,

    /// Words per title, one entry per record
    pub title_word_counts: Vec<usize>,

    /// Words per summary, one entry per record
    pub summary_word_counts: Vec<usize>,

    /// Keyword cloud frequencies
    pub keywords: Vec<KeywordCount>,
}

impl ChartStats {
    /// Compute every chart from the cleaned records of a search.
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            year_trend: year_trend(records),
            published_split: PublishedSplit::from_records(records),
            title_word_counts: records.iter().map(|r| word_count(&r.title)).collect(),
            summary_word_counts: records.iter().map(|r| word_count(r.summary_text())).collect(),
            keywords: keywords(records, MAX_KEYWORDS),
        }
    }
}
