//! Embedding provider abstraction and implementations.
//!
//! This module defines the interface for turning paper text into fixed-size
//! vectors and provides a local implementation backed by fastembed.
//!
//! The abstraction keeps the similarity pipeline independent of the model:
//! tests drive it with deterministic mock providers, the CLI with the real one.

pub mod fastembed;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Invalid input text (e.g., empty)
    #[error("Invalid input text: {0}")]
    InvalidInput(String),

    /// The model could not be loaded
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model failed while encoding
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// The model returned vectors of an unexpected size or count
    #[error("Embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// The embedder's failure type, as seen by the pipeline.
pub type EncodingError = EmbeddingError;

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Trait for text embedding providers.
///
/// Implementations must return exactly one vector per input text, in input
/// order, and every vector must have `dimension()` components. Batching is an
/// implementation detail and must not change the values produced.
///
/// # Example Usage
/// ```ignore
/// let provider = FastEmbedProvider::new(None, None)?;
/// let vectors = provider.embed_batch(&["first abstract", "second abstract"]).await?;
/// assert_eq!(vectors[0].len(), provider.dimension());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for the given text.
    ///
    /// # Errors
    /// Returns `EmbeddingError` if the embedding generation fails
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Generate embeddings for multiple texts in one call.
    ///
    /// # Arguments
    /// * `texts` - Slice of text inputs to embed
    ///
    /// # Returns
    /// A vector of embedding vectors, in the same order as the input texts
    ///
    /// # Errors
    /// Returns `EmbeddingError` if any embedding generation fails
    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Get the dimension of embeddings produced by this provider.
    fn dimension(&self) -> usize;

    /// Get the model name/identifier for this provider.
    fn model_name(&self) -> &str;
}

/// Checks that a batch of vectors matches the expected count and dimension.
pub fn check_batch(
    vectors: &[Vec<f32>],
    expected_count: usize,
    dimension: usize,
) -> EmbeddingResult<()> {
    if vectors.len() != expected_count {
        return Err(EmbeddingError::Encoding(format!(
            "model returned {} vectors for {} texts",
            vectors.len(),
            expected_count
        )));
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimension,
            found: bad.len(),
        });
    }
    Ok(())
}
