//! arXiv Cluster Search - semantic similarity networks over search results.
//!
//! Given a free-text query, this library fetches matching paper metadata from
//! the arXiv API, embeds every abstract, and reduces the pairwise cosine
//! similarities to a ranked edge list that can be drawn as a network graph.
//! It also computes the data behind the summary charts (publication years,
//! published share, keyword cloud).
//!
//! # Architecture
//!
//! - **models**: Core data structures (Record, SimilarityEdge, RankedEdgeSet)
//! - **provider**: Record sources (arXiv Atom API, local JSON files)
//! - **cleaning**: Record normalization and deduplication
//! - **embedding**: Text embedding generation
//! - **similarity**: Cosine similarity matrix and upper-triangle reduction
//! - **pipeline**: Orchestration from raw records to ranked edges
//! - **graph**: Node/edge lists for the network renderer
//! - **stats**: Summary chart data
//!
//! # Workflow
//!
//! 1. Fetch records for the query
//! 2. Drop incomplete and duplicate records, strip markup
//! 3. Embed the first `max_encoded` abstracts
//! 4. Compute pairwise similarities and keep each unordered pair once
//! 5. Attach links, sort by weight and keep the top `max_edges`
//!
//! # Example
//!
//! ```ignore
//! use arxiv_cluster_search::{
//!     embedding::fastembed::FastEmbedProvider,
//!     pipeline::{PipelineConfig, SimilarityPipeline},
//!     provider::arxiv::ArxivProvider,
//! };
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = SimilarityPipeline::new(FastEmbedProvider::new(None, None)?);
//!     let provider = ArxivProvider::new(Duration::from_secs(30))?;
//!
//!     let result = pipeline
//!         .search(&provider, "contrastive learning", 50, &PipelineConfig::default())
//!         .await?;
//!
//!     for edge in result.edges() {
//!         println!("{} <-> {}: {:.3}", edge.edge.from, edge.edge.to, edge.edge.weight);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cleaning;
pub mod embedding;
pub mod graph;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod similarity;
pub mod stats;

pub use cleaning::clean;
pub use embedding::{EmbeddingError, EmbeddingProvider, EncodingError};
pub use graph::NetworkGraph;
pub use models::{RankedEdge, RankedEdgeSet, Record, SimilarityEdge, TextField};
pub use pipeline::{PipelineConfig, PipelineError, SearchResult, SimilarityPipeline};
pub use provider::{ProviderError, RecordProvider};
pub use similarity::{reduce, ShapeError};
pub use stats::ChartStats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding model name
pub const DEFAULT_EMBEDDING_MODEL: &str = "AllMiniLML6V2";

/// Default embedding dimension for AllMiniLML6V2
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;
