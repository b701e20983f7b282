//! Core data models for the arXiv similarity search.
//!
//! This module contains the records fetched from the bibliographic API and the
//! edge types produced by the similarity pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single paper as returned by the fetch step.
///
/// Raw feed rows may lack an abstract, so `summary` is optional here. After
/// cleaning, both `title` and `summary` are guaranteed to be non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Paper title
    pub title: String,

    /// Abstract text
    #[serde(default)]
    pub summary: Option<String>,

    /// Publication date as reported by the API (e.g. `2021-03-04T17:59:01Z`)
    #[serde(default)]
    pub published: String,

    /// Journal reference; its presence marks the paper as published
    #[serde(default)]
    pub journal_ref: Option<String>,

    /// Stable external identifier, the arXiv abstract URL
    pub id: String,

    /// Digital Object Identifier, when the authors supplied one
    #[serde(default)]
    pub doi: Option<String>,
}

impl Record {
    /// Returns the abstract, or an empty string when the record has none.
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    /// Returns `true` when the paper carries a journal reference.
    pub fn is_published(&self) -> bool {
        self.journal_ref
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }

    /// Returns the text of the requested field.
    pub fn field(&self, field: TextField) -> &str {
        match field {
            TextField::Summary => self.summary_text(),
            TextField::Title => &self.title,
        }
    }
}

/// Which record attribute gets encoded by the embedder.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    /// The abstract (default)
    #[default]
    Summary,

    /// The title
    Title,
}

impl FromStr for TextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(TextField::Summary),
            "title" => Ok(TextField::Title),
            other => Err(format!(
                "unknown text field '{}', expected 'summary' or 'title'",
                other
            )),
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextField::Summary => f.write_str("summary"),
            TextField::Title => f.write_str("title"),
        }
    }
}

/// An unordered pair of distinct records and their cosine similarity.
///
/// `from_index` and `to_index` are positions in the embedded record slice and
/// always satisfy `from_index < to_index`. Labels are kept for display only;
/// they are not guaranteed to be unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityEdge {
    /// Position of the first record
    pub from_index: usize,

    /// Position of the second record
    pub to_index: usize,

    /// Label (title) of the first record
    pub from: String,

    /// Label (title) of the second record
    pub to: String,

    /// Cosine similarity in [-1, 1]
    pub weight: f32,
}

/// A similarity edge joined with the linking metadata of its `from` record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEdge {
    /// The underlying edge
    #[serde(flatten)]
    pub edge: SimilarityEdge,

    /// External link of the `from` record
    pub id: String,

    /// DOI of the `from` record
    pub doi: Option<String>,
}

/// The top-K similarity edges, ordered by weight descending.
///
/// The set is immutable once built by the pipeline: it can be read through
/// slices and iterators, or consumed with `into_inner`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RankedEdgeSet {
    edges: Vec<RankedEdge>,
}

impl RankedEdgeSet {
    /// Wraps edges that are already sorted and truncated.
    pub(crate) fn from_sorted(edges: Vec<RankedEdge>) -> Self {
        Self { edges }
    }

    /// Number of edges in the set.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when no edges survived ranking.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The ranked edges as a slice.
    pub fn edges(&self) -> &[RankedEdge] {
        &self.edges
    }

    /// Iterates over the ranked edges, strongest first.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedEdge> {
        self.edges.iter()
    }

    /// Consumes the set and returns the underlying edges.
    pub fn into_inner(self) -> Vec<RankedEdge> {
        self.edges
    }
}

impl<'a> IntoIterator for &'a RankedEdgeSet {
    type Item = &'a RankedEdge;
    type IntoIter = std::slice::Iter<'a, RankedEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(summary: Option<&str>, journal_ref: Option<&str>) -> Record {
        Record {
            title: "A title".to_string(),
            summary: summary.map(str::to_string),
            published: "2020-01-01T00:00:00Z".to_string(),
            journal_ref: journal_ref.map(str::to_string),
            id: "http://arxiv.org/abs/2001.00001v1".to_string(),
            doi: None,
        }
    }

    #[test]
    fn test_text_field_parsing() {
        assert_eq!("summary".parse::<TextField>(), Ok(TextField::Summary));
        assert_eq!(" Title ".parse::<TextField>(), Ok(TextField::Title));
        assert!("abstract".parse::<TextField>().is_err());
        assert_eq!(TextField::default(), TextField::Summary);
    }

    #[test]
    fn test_record_field_access() {
        let r = record(Some("An abstract"), None);
        assert_eq!(r.field(TextField::Summary), "An abstract");
        assert_eq!(r.field(TextField::Title), "A title");
        assert_eq!(record(None, None).summary_text(), "");
    }

    #[test]
    fn test_is_published() {
        assert!(record(Some("x"), Some("Phys. Rev. D 1 (2020)")).is_published());
        assert!(!record(Some("x"), None).is_published());
        assert!(!record(Some("x"), Some("  ")).is_published());
    }

    #[test]
    fn test_record_deserializes_with_missing_optionals() {
        let json = r#"{"title": "T", "id": "http://arxiv.org/abs/1"}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.summary, None);
        assert_eq!(r.journal_ref, None);
        assert_eq!(r.doi, None);
        assert!(r.published.is_empty());
    }

    #[test]
    fn test_ranked_edge_serializes_flat() {
        let edge = RankedEdge {
            edge: SimilarityEdge {
                from_index: 0,
                to_index: 1,
                from: "A".to_string(),
                to: "B".to_string(),
                weight: 0.5,
            },
            id: "http://arxiv.org/abs/1".to_string(),
            doi: None,
        };
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["from"], "A");
        assert_eq!(value["to"], "B");
        assert_eq!(value["id"], "http://arxiv.org/abs/1");
    }
}
