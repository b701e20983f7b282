//! Record provider module.
//!
//! This module defines the interface for fetching paper records for a query
//! and includes implementations for the arXiv API and local JSON files.
//!
//! Providers return raw records: they may contain rows without an abstract,
//! duplicates and markup. Cleaning is the pipeline's job.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Record;

pub mod arxiv;
pub mod json;

/// Errors that can occur when fetching records from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failed to read from the data source
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the data format
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Trait for sourcing paper records for a search query.
///
/// # Design Notes
///
/// - Any request timeout belongs to the implementation; the pipeline
///   waits for the call to return
/// - Implementations should preserve the source's ranking order, since the
///   pipeline embeds only the first records it receives
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Fetch up to `max_results` records matching `query`.
    ///
    /// # Errors
    /// Returns `ProviderError` if records cannot be fetched or parsed
    async fn fetch_records(&self, query: &str, max_results: usize) -> ProviderResult<Vec<Record>>;

    /// Get a human-readable name/description of this provider.
    ///
    /// This is useful for logging and debugging.
    fn name(&self) -> &str;
}
