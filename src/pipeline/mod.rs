//! Similarity pipeline.
//!
//! Composes cleaning, embedding and similarity reduction into the ranked
//! edge list behind the network graph, and bundles one search's outputs into
//! an immutable `SearchResult`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use arxiv_cluster_search::embedding::fastembed::FastEmbedProvider;
//! use arxiv_cluster_search::pipeline::{PipelineConfig, SimilarityPipeline};
//! use arxiv_cluster_search::provider::arxiv::ArxivProvider;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = SimilarityPipeline::new(FastEmbedProvider::new(None, None)?);
//! let provider = ArxivProvider::new(Duration::from_secs(30))?;
//!
//! let result = pipeline
//!     .search(&provider, "graph neural networks", 50, &PipelineConfig::default())
//!     .await?;
//!
//! for edge in result.edges() {
//!     println!("{} <-> {} ({:.3})", edge.edge.from, edge.edge.to, edge.edge.weight);
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cleaning::clean;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::graph::NetworkGraph;
use crate::models::{RankedEdge, RankedEdgeSet, Record, SimilarityEdge, TextField};
use crate::provider::{ProviderError, RecordProvider};
use crate::similarity::{reduce, ShapeError};
use crate::stats::ChartStats;

/// Default number of records fetched per search.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Default number of records embedded per search.
pub const DEFAULT_MAX_ENCODED: usize = 50;

/// Default number of edges kept after ranking.
pub const DEFAULT_MAX_EDGES: usize = 50;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid tuning parameter; raised before any work is done
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The embedder could not encode the texts
    #[error("Encoding error: {0}")]
    Encoding(#[from] EmbeddingError),

    /// Embeddings and labels disagree in shape
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// The records could not be fetched
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Tuning parameters of the similarity computation.
///
/// All counts must be at least 1; zero is rejected with
/// `PipelineError::Config` rather than replaced by a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Record attribute that gets embedded
    pub text_field: TextField,

    /// Only the first `max_encoded` cleaned records are embedded
    pub max_encoded: usize,

    /// Number of strongest edges kept
    pub max_edges: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_field: TextField::Summary,
            max_encoded: DEFAULT_MAX_ENCODED,
            max_edges: DEFAULT_MAX_EDGES,
        }
    }
}

impl PipelineConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` if a count is zero
    pub fn new(text_field: TextField, max_encoded: usize, max_edges: usize) -> PipelineResult<Self> {
        let config = Self {
            text_field,
            max_encoded,
            max_edges,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every count is positive.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.max_encoded == 0 {
            return Err(PipelineError::Config(
                "max_encoded must be a positive integer".to_string(),
            ));
        }
        if self.max_edges == 0 {
            return Err(PipelineError::Config(
                "max_edges must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything one search produced.
///
/// Returned by value and never mutated afterwards; a new search returns a
/// new result instead of updating this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    query: String,
    records: Vec<Record>,
    edges: RankedEdgeSet,
    graph: NetworkGraph,
    stats: ChartStats,
}

impl SearchResult {
    /// The query this result answers.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Cleaned records, in fetch order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Ranked similarity edges.
    pub fn edges(&self) -> &RankedEdgeSet {
        &self.edges
    }

    /// Network graph built from the ranked edges.
    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    /// Summary chart data over all cleaned records.
    pub fn stats(&self) -> &ChartStats {
        &self.stats
    }
}

/// Join edges with the metadata of their `from` record, sort and truncate.
///
/// The join goes through `from_index`, so records sharing a title still get
/// their own `id`. The sort is stable: equal weights keep the order in which
/// the edges were produced. Edges pointing outside `records` are dropped.
pub fn rank_edges(edges: Vec<SimilarityEdge>, records: &[Record], max_edges: usize) -> RankedEdgeSet {
    let mut ranked: Vec<RankedEdge> = edges
        .into_iter()
        .filter_map(|edge| {
            let source = records.get(edge.from_index)?;
            Some(RankedEdge {
                id: source.id.clone(),
                doi: source.doi.clone(),
                edge,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.edge.weight.total_cmp(&a.edge.weight));
    ranked.truncate(max_edges);

    RankedEdgeSet::from_sorted(ranked)
}

/// Orchestrates clean → embed → reduce → join → rank.
///
/// The pipeline owns its embedder, so the model is loaded once and reused by
/// every search run through the same pipeline.
pub struct SimilarityPipeline<E>
where
    E: EmbeddingProvider,
{
    embedder: E,
}

impl<E> SimilarityPipeline<E>
where
    E: EmbeddingProvider,
{
    /// Create a pipeline around an already constructed embedder.
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// The embedder used by this pipeline.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Compute the strongest similarity edges among `records`.
    ///
    /// Records are cleaned, the first `max_encoded` (input order) are
    /// embedded by `text_field` and labelled by title, and the resulting
    /// edges are ranked by weight and cut to `max_edges`.
    ///
    /// Fewer than two usable records give an empty set, not an error.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` for an invalid configuration (before
    /// any work), `PipelineError::Encoding` if embedding fails and
    /// `PipelineError::Shape` if the embedder returns the wrong shape
    pub async fn compute_top_similar(
        &self,
        records: Vec<Record>,
        config: &PipelineConfig,
    ) -> PipelineResult<RankedEdgeSet> {
        config.validate()?;
        let cleaned = clean(records);
        self.rank_cleaned(&cleaned, config).await
    }

    /// Run a full search: fetch, clean, rank and build chart data.
    ///
    /// # Arguments
    /// * `provider` - Source of raw records
    /// * `query` - Free-text search query
    /// * `max_results` - Number of records requested from the provider
    /// * `config` - Similarity tuning parameters
    ///
    /// # Errors
    /// Returns `PipelineError::Config` before fetching if a parameter is
    /// invalid; any provider, encoding or shape failure aborts the search
    pub async fn search<P>(
        &self,
        provider: &P,
        query: &str,
        max_results: usize,
        config: &PipelineConfig,
    ) -> PipelineResult<SearchResult>
    where
        P: RecordProvider + ?Sized,
    {
        config.validate()?;
        if max_results == 0 {
            return Err(PipelineError::Config(
                "max_results must be a positive integer".to_string(),
            ));
        }

        let raw = provider.fetch_records(query, max_results).await?;
        info!("Fetched {} records from {}", raw.len(), provider.name());

        let records = clean(raw);
        if records.is_empty() {
            warn!("No usable records for '{}' after cleaning", query);
        }
        let edges = self.rank_cleaned(&records, config).await?;

        let encoded = &records[..records.len().min(config.max_encoded)];
        let graph = NetworkGraph::from_edges(&edges, encoded);
        let stats = ChartStats::from_records(&records);

        Ok(SearchResult {
            query: query.to_string(),
            records,
            edges,
            graph,
            stats,
        })
    }

    async fn rank_cleaned(
        &self,
        cleaned: &[Record],
        config: &PipelineConfig,
    ) -> PipelineResult<RankedEdgeSet> {
        let encoded = &cleaned[..cleaned.len().min(config.max_encoded)];
        if encoded.len() < 2 {
            debug!("{} record(s) to encode, no pairs to rank", encoded.len());
            return Ok(RankedEdgeSet::default());
        }

        let texts: Vec<&str> = encoded.iter().map(|r| r.field(config.text_field)).collect();
        let labels: Vec<&str> = encoded.iter().map(|r| r.title.as_str()).collect();

        info!(
            "Encoding {} of {} records by {} with {}",
            encoded.len(),
            cleaned.len(),
            config.text_field,
            self.embedder.model_name()
        );
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let edges = reduce(&embeddings, &labels)?;
        debug!("Reduced {} embeddings to {} edges", embeddings.len(), edges.len());

        let ranked = rank_edges(edges, encoded, config.max_edges);
        info!("Kept {} strongest edges", ranked.len());
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingResult;
    use crate::provider::ProviderResult;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // Mock EmbeddingProvider: fixed vectors for known texts, a letter
    // histogram for anything else.
    #[derive(Clone, Default)]
    struct MockEmbeddingProvider {
        table: HashMap<String, Vec<f32>>,
        calls: Arc<Mutex<Vec<Vec<String>>>>,
        should_fail: bool,
        wrong_count: bool,
    }

    impl MockEmbeddingProvider {
        fn new() -> Self {
            Self::default()
        }

        fn with_vectors(pairs: &[(&str, Vec<f32>)]) -> Self {
            Self {
                table: pairs
                    .iter()
                    .map(|(text, v)| (text.to_string(), v.clone()))
                    .collect(),
                ..Self::default()
            }
        }

        fn with_failure() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            if let Some(v) = self.table.get(text) {
                return v.clone();
            }
            let mut v = vec![0.0; 26];
            for c in text.to_ascii_lowercase().bytes().filter(u8::is_ascii_lowercase) {
                v[(c - b'a') as usize] += 1.0;
            }
            v
        }

        fn encoded_texts(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().flatten().cloned().collect()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
            Ok(self.embed_batch(&[text]).await?.remove(0))
        }

        async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
            self.calls
                .lock()
                .unwrap()
                .push(texts.iter().map(|t| t.to_string()).collect());
            if self.should_fail {
                return Err(EmbeddingError::ModelUnavailable("Mock model missing".to_string()));
            }
            let mut vectors: Vec<Vec<f32>> = texts.iter().map(|t| self.vector_for(t)).collect();
            if self.wrong_count {
                vectors.pop();
            }
            Ok(vectors)
        }

        fn dimension(&self) -> usize {
            26
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    // Mock RecordProvider serving a fixed batch
    struct MockRecordProvider {
        records: Vec<Record>,
        should_fail: bool,
    }

    #[async_trait]
    impl RecordProvider for MockRecordProvider {
        async fn fetch_records(&self, _query: &str, max_results: usize) -> ProviderResult<Vec<Record>> {
            if self.should_fail {
                return Err(ProviderError::NetworkError("Mock network down".to_string()));
            }
            Ok(self.records.iter().take(max_results).cloned().collect())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn create_test_record(title: &str, summary: &str) -> Record {
        Record {
            title: title.to_string(),
            summary: Some(summary.to_string()),
            published: "2022-02-02T00:00:00Z".to_string(),
            journal_ref: None,
            id: format!("http://arxiv.org/abs/{}", title.replace(' ', "_")),
            doi: None,
        }
    }

    fn config(max_encoded: usize, max_edges: usize) -> PipelineConfig {
        PipelineConfig::new(TextField::Summary, max_encoded, max_edges).unwrap()
    }

    fn assert_non_increasing(set: &RankedEdgeSet) {
        for pair in set.edges().windows(2) {
            assert!(pair[0].edge.weight >= pair[1].edge.weight);
        }
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let default = PipelineConfig::default();
        assert_eq!(default.text_field, TextField::Summary);
        assert_eq!(default.max_encoded, 50);
        assert_eq!(default.max_edges, 50);
        assert!(default.validate().is_ok());

        assert!(matches!(
            PipelineConfig::new(TextField::Summary, 0, 50),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::new(TextField::Title, 50, 0),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"max_edges": 10}"#).unwrap();
        assert_eq!(config.max_edges, 10);
        assert_eq!(config.max_encoded, DEFAULT_MAX_ENCODED);
        assert_eq!(config.text_field, TextField::Summary);

        let config: PipelineConfig = serde_json::from_str(r#"{"text_field": "title"}"#).unwrap();
        assert_eq!(config.text_field, TextField::Title);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let embedder = MockEmbeddingProvider::new();
        let pipeline = SimilarityPipeline::new(embedder.clone());

        let result = pipeline
            .compute_top_similar(Vec::new(), &PipelineConfig::default())
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_record_gives_no_edges() {
        let embedder = MockEmbeddingProvider::new();
        let pipeline = SimilarityPipeline::new(embedder.clone());

        let records = vec![create_test_record("Only", "a lonely abstract")];
        let result = pipeline
            .compute_top_similar(records.clone(), &PipelineConfig::default())
            .await
            .unwrap();

        assert_eq!(clean(records).len(), 1);
        assert!(result.is_empty());
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_max_encoded_of_one_gives_no_edges() {
        let pipeline = SimilarityPipeline::new(MockEmbeddingProvider::new());
        let records = vec![create_test_record("A", "alpha"), create_test_record("B", "beta")];

        let result = pipeline.compute_top_similar(records, &config(1, 50)).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_summaries_collapse_to_one_edge() {
        let pipeline = SimilarityPipeline::new(MockEmbeddingProvider::new());
        let records = vec![
            create_test_record("First", "x"),
            create_test_record("Second", "x"),
            create_test_record("Third", "y"),
        ];

        let result = pipeline
            .compute_top_similar(records, &PipelineConfig::default())
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        let edge = &result.edges()[0].edge;
        assert_eq!((edge.from.as_str(), edge.to.as_str()), ("First", "Third"));
    }

    #[tokio::test]
    async fn test_truncation_embeds_first_records_only() {
        let embedder = MockEmbeddingProvider::new();
        let pipeline = SimilarityPipeline::new(embedder.clone());
        let records: Vec<Record> = (0..10)
            .map(|i| create_test_record(&format!("Paper {}", i), &format!("abstract number {}", "z".repeat(i + 1))))
            .collect();

        let result = pipeline.compute_top_similar(records, &config(5, 100)).await.unwrap();

        assert_eq!(result.len(), 10);
        let encoded = embedder.encoded_texts();
        assert_eq!(encoded.len(), 5);
        assert_eq!(encoded[0], "abstract number z");
        assert_eq!(encoded[4], "abstract number zzzzz");
        assert!(result
            .iter()
            .all(|e| e.edge.from_index < 5 && e.edge.to_index < 5));
    }

    #[tokio::test]
    async fn test_ranking_sorted_and_truncated_prefix() {
        let embedder = MockEmbeddingProvider::new();
        let pipeline = SimilarityPipeline::new(embedder);
        let records = vec![
            create_test_record("A", "graph neural networks"),
            create_test_record("B", "graph neural nets"),
            create_test_record("C", "quantum computing"),
            create_test_record("D", "quantum computers"),
            create_test_record("E", "protein folding"),
        ];

        let full = pipeline
            .compute_top_similar(records.clone(), &config(50, 100))
            .await
            .unwrap();
        assert_eq!(full.len(), 10);
        assert_non_increasing(&full);

        let top = pipeline.compute_top_similar(records, &config(50, 3)).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top.edges(), &full.edges()[..3]);
    }

    #[tokio::test]
    async fn test_ties_keep_discovery_order() {
        let embedder = MockEmbeddingProvider::with_vectors(&[
            ("a", vec![1.0, 0.0]),
            ("b", vec![1.0, 0.0]),
            ("c", vec![0.0, 1.0]),
            ("d", vec![1.0, 0.0]),
        ]);
        let pipeline = SimilarityPipeline::new(embedder);
        let records = vec![
            create_test_record("A", "a"),
            create_test_record("B", "b"),
            create_test_record("C", "c"),
            create_test_record("D", "d"),
        ];

        let result = pipeline
            .compute_top_similar(records, &PipelineConfig::default())
            .await
            .unwrap();

        let top: Vec<(usize, usize)> = result
            .iter()
            .take(3)
            .map(|e| (e.edge.from_index, e.edge.to_index))
            .collect();
        assert_eq!(top, vec![(0, 1), (0, 3), (1, 3)]);
        assert_non_increasing(&result);
    }

    #[tokio::test]
    async fn test_join_by_index_with_colliding_titles() {
        let embedder = MockEmbeddingProvider::with_vectors(&[
            ("first copy", vec![1.0, 0.0, 0.0]),
            ("second copy", vec![0.0, 1.0, 0.0]),
            ("close to second", vec![0.0, 1.0, 0.1]),
        ]);
        let pipeline = SimilarityPipeline::new(embedder);

        let mut first = create_test_record("Same Title", "first copy");
        first.id = "http://arxiv.org/abs/0001".to_string();
        let mut second = create_test_record("Same Title", "second copy");
        second.id = "http://arxiv.org/abs/0002".to_string();
        second.doi = Some("10.1/second".to_string());
        let third = create_test_record("Other", "close to second");

        let result = pipeline
            .compute_top_similar(vec![first, second, third], &PipelineConfig::default())
            .await
            .unwrap();

        let strongest = &result.edges()[0];
        assert_eq!(strongest.edge.from_index, 1);
        assert_eq!(strongest.edge.from, "Same Title");
        assert_eq!(strongest.id, "http://arxiv.org/abs/0002");
        assert_eq!(strongest.doi.as_deref(), Some("10.1/second"));
    }

    #[tokio::test]
    async fn test_same_text_is_self_similar() {
        let embedder = MockEmbeddingProvider::new();
        let vectors = embedder
            .embed_batch(&["attention is all you need", "attention is all you need"])
            .await
            .unwrap();
        let weight = crate::similarity::cosine_similarity(&vectors[0], &vectors[1]);
        assert!((weight - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_encodes_title_when_configured() {
        let embedder = MockEmbeddingProvider::new();
        let pipeline = SimilarityPipeline::new(embedder.clone());
        let records = vec![create_test_record("Title A", "alpha"), create_test_record("Title B", "beta")];

        let config = PipelineConfig::new(TextField::Title, 50, 50).unwrap();
        pipeline.compute_top_similar(records, &config).await.unwrap();

        assert_eq!(embedder.encoded_texts(), vec!["Title A", "Title B"]);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_encoding() {
        let embedder = MockEmbeddingProvider::new();
        let pipeline = SimilarityPipeline::new(embedder.clone());
        let records = vec![create_test_record("A", "alpha"), create_test_record("B", "beta")];

        let bad = PipelineConfig {
            max_edges: 0,
            ..PipelineConfig::default()
        };
        let result = pipeline.compute_top_similar(records, &bad).await;

        assert!(matches!(result, Err(PipelineError::Config(_))));
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_embedding_error_propagation() {
        let pipeline = SimilarityPipeline::new(MockEmbeddingProvider::with_failure());
        let records = vec![create_test_record("A", "alpha"), create_test_record("B", "beta")];

        let result = pipeline
            .compute_top_similar(records, &PipelineConfig::default())
            .await;

        assert!(matches!(result, Err(PipelineError::Encoding(_))));
    }

    #[tokio::test]
    async fn test_shape_error_propagation() {
        let embedder = MockEmbeddingProvider {
            wrong_count: true,
            ..MockEmbeddingProvider::default()
        };
        let pipeline = SimilarityPipeline::new(embedder);
        let records = vec![create_test_record("A", "alpha"), create_test_record("B", "beta")];

        let result = pipeline
            .compute_top_similar(records, &PipelineConfig::default())
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::Shape(ShapeError::LengthMismatch { embeddings: 1, labels: 2 }))
        ));
    }

    #[test]
    fn test_rank_edges_drops_unknown_sources() {
        let records = vec![create_test_record("A", "alpha")];
        let edges = vec![
            SimilarityEdge {
                from_index: 3,
                to_index: 4,
                from: "ghost".to_string(),
                to: "ghost".to_string(),
                weight: 0.9,
            },
            SimilarityEdge {
                from_index: 0,
                to_index: 1,
                from: "A".to_string(),
                to: "B".to_string(),
                weight: 0.1,
            },
        ];
        let ranked = rank_edges(edges, &records, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.edges()[0].id, "http://arxiv.org/abs/A");
    }

    #[tokio::test]
    async fn test_search_builds_full_result() {
        let provider = MockRecordProvider {
            records: vec![
                create_test_record("A", "graph neural networks"),
                Record {
                    summary: None,
                    ..create_test_record("Broken", "")
                },
                create_test_record("B", "graph neural nets"),
                create_test_record("C", "quantum computing"),
            ],
            should_fail: false,
        };
        let pipeline = SimilarityPipeline::new(MockEmbeddingProvider::new());

        let result = pipeline
            .search(&provider, "graphs", 10, &PipelineConfig::default())
            .await
            .unwrap();

        assert_eq!(result.query(), "graphs");
        assert_eq!(result.records().len(), 3);
        assert_eq!(result.edges().len(), 3);
        assert_eq!(result.graph().edges().len(), 3);
        assert_eq!(result.graph().nodes().len(), 3);
        assert_eq!(result.stats().year_trend.get(&2022), Some(&3));
        assert_eq!(result.stats().summary_word_counts.len(), 3);
    }

    #[tokio::test]
    async fn test_search_with_no_records_is_empty_not_error() {
        let provider = MockRecordProvider {
            records: Vec::new(),
            should_fail: false,
        };
        let pipeline = SimilarityPipeline::new(MockEmbeddingProvider::new());

        let result = pipeline
            .search(&provider, "nothing", 10, &PipelineConfig::default())
            .await
            .unwrap();

        assert!(result.records().is_empty());
        assert!(result.edges().is_empty());
        assert!(result.graph().is_empty());
    }

    #[tokio::test]
    async fn test_search_provider_error_propagation() {
        let provider = MockRecordProvider {
            records: Vec::new(),
            should_fail: true,
        };
        let pipeline = SimilarityPipeline::new(MockEmbeddingProvider::new());

        let result = pipeline
            .search(&provider, "anything", 10, &PipelineConfig::default())
            .await;

        assert!(matches!(result, Err(PipelineError::Provider(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_zero_max_results() {
        let provider = MockRecordProvider {
            records: vec![create_test_record("A", "alpha")],
            should_fail: false,
        };
        let pipeline = SimilarityPipeline::new(MockEmbeddingProvider::new());

        let result = pipeline
            .search(&provider, "anything", 0, &PipelineConfig::default())
            .await;

        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
