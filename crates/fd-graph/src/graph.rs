//! Core graph data structures.

use std::collections::HashSet;

use fd_core::{EdgeId, FracId, NodeId};

use crate::builder::GraphBuilder;
use crate::error::GraphResult;
use crate::validate;

/// A fracture intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub coords: [f64; 3],
}

/// Initial half-aperture / half-width profile of a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialAperture {
    /// Constant along the channel.
    Uniform { alpha: f64, beta: f64 },
    /// Values at the tail and head endpoints, in that order.
    Tapered { alpha: [f64; 2], beta: [f64; 2] },
}

impl InitialAperture {
    pub fn uniform(alpha: f64, beta: f64) -> Self {
        InitialAperture::Uniform { alpha, beta }
    }

    pub(crate) fn is_valid(&self) -> bool {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        match self {
            InitialAperture::Uniform { alpha, beta } => ok(*alpha) && ok(*beta),
            InitialAperture::Tapered { alpha, beta } => alpha
                .iter()
                .chain(beta.iter())
                .all(|&v| ok(v)),
        }
    }
}

/// A fracture channel between two intersections.
///
/// `tail -> head` is the natural orientation; the flow direction of a given
/// step is decided by the hydraulic solve, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub tail: NodeId,
    pub head: NodeId,
    /// Channel length (cm).
    pub length: f64,
    /// Fracture polygon the edge was extracted from, if known.
    pub frac: Option<FracId>,
    pub aperture: InitialAperture,
}

/// Validated, immutable fracture network.
///
/// Nodes and edges are stored in vectors indexed by their IDs. Any topology
/// change produces a new `FractureGraph` through [`GraphBuilder`].
#[derive(Debug, Clone)]
pub struct FractureGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) sources: Vec<NodeId>,
    pub(crate) targets: Vec<NodeId>,
}

impl FractureGraph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.idx())
    }

    /// Inlet boundary nodes.
    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    /// Outlet boundary nodes.
    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn is_source(&self, node: NodeId) -> bool {
        self.sources.contains(&node)
    }

    pub fn is_target(&self, node: NodeId) -> bool {
        self.targets.contains(&node)
    }

    /// Parallel read-only iterator over the edges, for per-edge worker jobs.
    pub fn par_edges(&self) -> rayon::slice::Iter<'_, Edge> {
        use rayon::prelude::*;
        self.edges.par_iter()
    }

    /// Number of connected components.
    pub fn component_count(&self) -> usize {
        validate::component_count(self.nodes.len(), &self.edges)
    }

    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    /// Rebuild the graph without the given edges.
    ///
    /// Surviving edges keep their relative order and are renumbered. Returns the
    /// new graph together with, for each new edge index, the old edge ID.
    /// Fails if the reduced graph is disconnected.
    pub fn without_edges(&self, removed: &HashSet<EdgeId>) -> GraphResult<(Self, Vec<EdgeId>)> {
        let mut builder = GraphBuilder::new();
        for node in &self.nodes {
            builder.push_node(node.clone());
        }
        let mut kept = Vec::with_capacity(self.edges.len());
        for edge in self.edges.iter().filter(|e| !removed.contains(&e.id)) {
            builder.add_edge(edge.tail, edge.head, edge.length, edge.frac, edge.aperture);
            kept.push(edge.id);
        }
        for &s in &self.sources {
            builder.mark_source(s);
        }
        for &t in &self.targets {
            builder.mark_target(t);
        }
        Ok((builder.build()?, kept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aperture_validity() {
        assert!(InitialAperture::uniform(0.02, 100.0).is_valid());
        assert!(!InitialAperture::uniform(0.0, 100.0).is_valid());
        let tapered = InitialAperture::Tapered {
            alpha: [0.02, f64::NAN],
            beta: [1.0, 1.0],
        };
        assert!(!tapered.is_valid());
    }
}
