//! Per-step flow record derived from a head solution.

use fd_core::numeric::{Tolerances, nearly_equal};
use fd_core::{EdgeId, NodeId};
use fd_graph::{FractureGraph, IndexMap};

use crate::error::{SolverError, SolverResult};
use crate::hydraulic::HeadSolution;

/// Heads closer than this count as equal when orienting an edge.
pub const HEAD_TOLERANCE: Tolerances = Tolerances {
    abs: 1e-9,
    rel: 1e-12,
};

/// Flow quantities of one edge for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFlow {
    /// `1 / R`
    pub conductance: f64,
    /// `|h_tail - h_head| / length`
    pub hgrad: f64,
    /// `Hgrad * length / R`
    pub q: f64,
    /// Flow runs `tail -> head`.
    pub forward: bool,
    /// End heads tie within [`HEAD_TOLERANCE`]; no flow and no causal link.
    pub stagnant: bool,
    pub upstream: NodeId,
    pub downstream: NodeId,
}

/// Orientation and flow of every edge for one step.
///
/// Indexed by `IndexMap` edge and node order. Rebuilt every step and carried
/// to the next one only to break head ties.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowField {
    edges: Vec<EdgeFlow>,
    in_edges: Vec<Vec<EdgeId>>,
    out_edges: Vec<Vec<EdgeId>>,
}

impl FlowField {
    /// Orient every edge from higher to lower head.
    ///
    /// Edges whose end heads tie keep the orientation they had in `previous`,
    /// or their natural `tail -> head` orientation if there is none. They are
    /// marked stagnant and carry zero gradient and flow.
    pub fn from_heads(
        graph: &FractureGraph,
        index: &IndexMap,
        heads: &HeadSolution,
        conductance: &[f64],
        previous: Option<&FlowField>,
    ) -> SolverResult<Self> {
        if conductance.len() != index.edge_count() {
            return Err(SolverError::Shape {
                what: "conductance vector",
                expected: index.edge_count(),
                actual: conductance.len(),
            });
        }
        if heads.len() != index.node_count() {
            return Err(SolverError::Shape {
                what: "head vector",
                expected: index.node_count(),
                actual: heads.len(),
            });
        }
        let previous = previous.filter(|p| p.edges.len() == index.edge_count());

        let mut edges = Vec::with_capacity(index.edge_count());
        let mut in_edges = vec![Vec::new(); index.node_count()];
        let mut out_edges = vec![Vec::new(); index.node_count()];
        for edge in graph.edges() {
            let e = index.edge_idx(edge.id)?;
            let (a, b) = (index.node_idx(edge.tail)?, index.node_idx(edge.head)?);
            let (ha, hb) = (heads.head[a], heads.head[b]);
            let stagnant = nearly_equal(ha, hb, HEAD_TOLERANCE);
            let forward = if stagnant {
                previous.map(|p| p.edges[e].forward).unwrap_or(true)
            } else {
                ha > hb
            };
            let (upstream, downstream, up, down) = if forward {
                (edge.tail, edge.head, a, b)
            } else {
                (edge.head, edge.tail, b, a)
            };
            let hgrad = if stagnant {
                0.0
            } else {
                (ha - hb).abs() / edge.length
            };
            let g = conductance[e];
            edges.push(EdgeFlow {
                conductance: g,
                hgrad,
                q: hgrad * edge.length * g,
                forward,
                stagnant,
                upstream,
                downstream,
            });
            out_edges[up].push(edge.id);
            in_edges[down].push(edge.id);
        }

        Ok(Self {
            edges,
            in_edges,
            out_edges,
        })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Flow record of the edge at contiguous index `e`.
    pub fn get(&self, e: usize) -> &EdgeFlow {
        &self.edges[e]
    }

    pub fn edges(&self) -> &[EdgeFlow] {
        &self.edges
    }

    /// Edges flowing into the node at contiguous index `n`.
    pub fn in_edges(&self, n: usize) -> &[EdgeId] {
        &self.in_edges[n]
    }

    /// Edges flowing out of the node at contiguous index `n`.
    pub fn out_edges(&self, n: usize) -> &[EdgeId] {
        &self.out_edges[n]
    }

    /// Sum of `Q` over the edges leaving node `n`.
    pub fn total_out_flow(&self, index: &IndexMap, n: usize) -> SolverResult<f64> {
        let mut total = 0.0;
        for &e in &self.out_edges[n] {
            total += self.edges[index.edge_idx(e)?].q;
        }
        Ok(total)
    }

    /// Net flow into node `n` (inflow minus outflow).
    pub fn imbalance(&self, index: &IndexMap, n: usize) -> SolverResult<f64> {
        let mut inflow = 0.0;
        for &e in &self.in_edges[n] {
            inflow += self.edges[index.edge_idx(e)?].q;
        }
        Ok(inflow - self.total_out_flow(index, n)?)
    }
}
