//! Stable indexing for solver integration.
//!
//! Fixes the node ordering of one graph instance and records the contiguous
//! indices of the inlet (`source_idx`) and outlet (`target_idx`) nodes. An
//! `IndexMap` is only valid for the graph it was built from; a topology change
//! means a new graph and a new map.

use fd_core::{EdgeId, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::FractureGraph;

/// Index map providing stable, contiguous indices for graph objects.
///
/// Provides O(1) lookup from IDs to indices.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Contiguous list of node IDs (index -> NodeId).
    node_ids: Vec<NodeId>,

    /// Contiguous list of edge IDs (index -> EdgeId).
    edge_ids: Vec<EdgeId>,

    /// Reverse lookup: NodeId -> index.
    /// Sized to max(NodeId.index) + 1; None if that ID doesn't exist.
    node_to_idx: Vec<Option<usize>>,

    /// Reverse lookup: EdgeId -> index.
    edge_to_idx: Vec<Option<usize>>,

    source_idx: Vec<usize>,
    target_idx: Vec<usize>,
}

impl IndexMap {
    /// Build an index map from a graph.
    pub fn from_graph(graph: &FractureGraph) -> Self {
        let node_ids: Vec<NodeId> = graph.nodes().iter().map(|n| n.id).collect();
        let edge_ids: Vec<EdgeId> = graph.edges().iter().map(|e| e.id).collect();

        let max_node_idx = node_ids.iter().map(|id| id.idx()).max().unwrap_or(0);
        let max_edge_idx = edge_ids.iter().map(|id| id.idx()).max().unwrap_or(0);

        let mut node_to_idx = vec![None; max_node_idx + 1];
        let mut edge_to_idx = vec![None; max_edge_idx + 1];
        for (i, &id) in node_ids.iter().enumerate() {
            node_to_idx[id.idx()] = Some(i);
        }
        for (i, &id) in edge_ids.iter().enumerate() {
            edge_to_idx[id.idx()] = Some(i);
        }

        let lookup = |ids: &[NodeId]| -> Vec<usize> {
            ids.iter()
                .filter_map(|id| node_to_idx.get(id.idx()).copied().flatten())
                .collect()
        };
        let source_idx = lookup(graph.sources());
        let target_idx = lookup(graph.targets());

        Self {
            node_ids,
            edge_ids,
            node_to_idx,
            edge_to_idx,
            source_idx,
            target_idx,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_ids.len()
    }

    /// Get the contiguous index for a node ID.
    pub fn node_idx(&self, id: NodeId) -> GraphResult<usize> {
        self.node_to_idx
            .get(id.idx())
            .and_then(|&opt| opt)
            .ok_or(GraphError::IdNotFound { what: "NodeId" })
    }

    /// Get the contiguous index for an edge ID.
    pub fn edge_idx(&self, id: EdgeId) -> GraphResult<usize> {
        self.edge_to_idx
            .get(id.idx())
            .and_then(|&opt| opt)
            .ok_or(GraphError::IdNotFound { what: "EdgeId" })
    }

    /// Contiguous indices of the inlet nodes.
    pub fn source_idx(&self) -> &[usize] {
        &self.source_idx
    }

    /// Contiguous indices of the outlet nodes.
    pub fn target_idx(&self) -> &[usize] {
        &self.target_idx
    }
}
