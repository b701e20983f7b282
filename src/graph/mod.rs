//! Network graph data.
//!
//! Builds the node and edge lists the graph renderer draws from a ranked
//! edge set. Nodes are keyed by record position, so two papers with the same
//! title stay two nodes and each resolves to its own link.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{RankedEdgeSet, Record};

/// A paper participating in at least one ranked edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    /// Position of the paper in the embedded record slice
    pub index: usize,

    /// Display label (title)
    pub label: String,

    /// External link (arXiv abstract URL)
    pub id: String,

    /// DOI, when known
    pub doi: Option<String>,

    /// Number of ranked edges touching this node
    pub degree: usize,
}

/// An edge between two entries of `NetworkGraph::nodes`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    /// Position of the source node in `nodes`
    pub source: usize,

    /// Position of the target node in `nodes`
    pub target: usize,

    /// Cosine similarity
    pub weight: f32,
}

/// Undirected similarity graph ready for layout and drawing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl NetworkGraph {
    /// Build the graph from ranked edges.
    ///
    /// `records` must be the slice the edges were computed over; edge indices
    /// point into it. Nodes appear in first-seen order while walking the
    /// edges strongest first (`from` before `to`). Edges whose indices fall
    /// outside `records` are skipped.
    pub fn from_edges(ranked: &RankedEdgeSet, records: &[Record]) -> Self {
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut positions: HashMap<usize, usize> = HashMap::new();
        let mut edges = Vec::with_capacity(ranked.len());

        for ranked_edge in ranked {
            let edge = &ranked_edge.edge;
            if edge.from_index >= records.len() || edge.to_index >= records.len() {
                continue;
            }

            let mut position_of = |index: usize| -> usize {
                *positions.entry(index).or_insert_with(|| {
                    let record = &records[index];
                    nodes.push(GraphNode {
                        index,
                        label: record.title.clone(),
                        id: record.id.clone(),
                        doi: record.doi.clone(),
                        degree: 0,
                    });
                    nodes.len() - 1
                })
            };
            let source = position_of(edge.from_index);
            let target = position_of(edge.to_index);

            nodes[source].degree += 1;
            nodes[target].degree += 1;
            edges.push(GraphEdge {
                source,
                target,
                weight: edge.weight,
            });
        }

        Self { nodes, edges }
    }

    /// The graph's nodes.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// The graph's edges.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Returns `true` when the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Link of the node at `position`, for click-to-open handling.
    pub fn link_for(&self, position: usize) -> Option<&str> {
        self.nodes.get(position).map(|n| n.id.as_str())
    }

    /// Chart title.
    pub fn title(&self) -> String {
        format!("Network graph of top {} links", self.edges.len())
    }
}
