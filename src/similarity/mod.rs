//! Pairwise similarity reduction.
//!
//! Turns a set of embeddings into a flat list of scored edges: the dense
//! `n×n` cosine matrix is computed, then only its strict upper triangle is
//! kept, so self-pairs and mirrored pairs never reach the output.
//!
//! The dense matrix is quadratic in memory. That is fine for the few hundred
//! papers a single search returns.

use thiserror::Error;

use crate::models::SimilarityEdge;

/// Contract violations between embeddings and their labels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// Embeddings and labels differ in length
    #[error("{embeddings} embeddings but {labels} labels")]
    LengthMismatch { embeddings: usize, labels: usize },

    /// An embedding has a different dimension than the first one
    #[error("embedding {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Compute cosine similarity between two vectors.
///
/// Returns `dot(a, b) / (|a|·|b|)`, in [-1, 1]. A zero-magnitude vector has
/// no direction, so its similarity to anything is `0.0`.
///
/// Callers must pass vectors of equal length; extra components of the longer
/// vector are ignored.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

fn check_dimensions(embeddings: &[Vec<f32>]) -> Result<(), ShapeError> {
    let Some(first) = embeddings.first() else {
        return Ok(());
    };
    let expected = first.len();
    match embeddings.iter().position(|e| e.len() != expected) {
        Some(index) => Err(ShapeError::DimensionMismatch {
            index,
            expected,
            found: embeddings[index].len(),
        }),
        None => Ok(()),
    }
}

/// Compute the full `n×n` cosine similarity matrix.
///
/// Row `i`, column `j` holds `cosine_similarity(e_i, e_j)`; the matrix is
/// symmetric with ones on the diagonal (for non-zero vectors).
///
/// # Errors
/// Returns `ShapeError::DimensionMismatch` if the embeddings are ragged
pub fn similarity_matrix(embeddings: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, ShapeError> {
    check_dimensions(embeddings)?;

    Ok(embeddings
        .iter()
        .map(|a| embeddings.iter().map(|b| cosine_similarity(a, b)).collect())
        .collect())
}

/// Reduce embeddings to the list of all distinct unordered pairs.
///
/// Emits one edge per matrix entry with `i < j`, in row-major order, so `n`
/// embeddings yield exactly `n·(n-1)/2` edges. Labels are attached by
/// position; records sharing a label still produce separate edges.
///
/// # Arguments
/// * `embeddings` - One vector per record
/// * `labels` - One display label per record, same order
///
/// # Errors
/// Returns `ShapeError` if the two slices differ in length or the
/// embeddings are ragged
pub fn reduce<S: AsRef<str>>(
    embeddings: &[Vec<f32>],
    labels: &[S],
) -> Result<Vec<SimilarityEdge>, ShapeError> {
    if embeddings.len() != labels.len() {
        return Err(ShapeError::LengthMismatch {
            embeddings: embeddings.len(),
            labels: labels.len(),
        });
    }

    let matrix = similarity_matrix(embeddings)?;
    let n = matrix.len();

    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, row) in matrix.iter().enumerate() {
        for (j, &weight) in row.iter().enumerate().skip(i + 1) {
            edges.push(SimilarityEdge {
                from_index: i,
                to_index: j,
                from: labels[i].as_ref().to_string(),
                to: labels[j].as_ref().to_string(),
                weight,
            });
        }
    }

    Ok(edges)
}
