//! Removal of redundant edges before the first step.
//!
//! Intersection extraction can leave several edges on one fracture leaving
//! the same node. Within each fracture, edges are grouped by their upstream
//! node under the step-0 flow, and only the shortest of each group is kept.

use std::collections::{BTreeMap, HashSet};

use fd_core::{EdgeId, FracId, NodeId};
use fd_graph::FractureGraph;
use fd_solver::FlowField;
use tracing::info;

use crate::error::{SimError, SimResult};

/// Edges to drop so each fracture keeps one (the shortest) edge per upstream
/// node. Edges without a fracture label and single-edge fractures are kept.
pub fn redundant_edges(graph: &FractureGraph, flow: &FlowField) -> HashSet<EdgeId> {
    let mut by_frac: BTreeMap<FracId, Vec<usize>> = BTreeMap::new();
    for (e, edge) in graph.edges().iter().enumerate() {
        if let Some(frac) = edge.frac {
            by_frac.entry(frac).or_default().push(e);
        }
    }

    let mut removed = HashSet::new();
    for edges in by_frac.values().filter(|edges| edges.len() > 1) {
        let mut by_upstream: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
        for &e in edges {
            by_upstream.entry(flow.get(e).upstream).or_default().push(e);
        }
        for group in by_upstream.values() {
            let keep = group
                .iter()
                .copied()
                .min_by(|&a, &b| graph.edges()[a].length.total_cmp(&graph.edges()[b].length));
            removed.extend(
                group
                    .iter()
                    .filter(|&&e| Some(e) != keep)
                    .map(|&e| graph.edges()[e].id),
            );
        }
    }
    removed
}

/// Drop redundant edges and rebuild the graph.
///
/// `flow` must be indexed like `graph` (built from its `IndexMap`). A graph
/// left disconnected is an error.
pub fn remove_redundant_edges(
    graph: &FractureGraph,
    flow: &FlowField,
) -> SimResult<(FractureGraph, usize)> {
    let removed = redundant_edges(graph, flow);
    if removed.is_empty() {
        return Ok((graph.clone(), 0));
    }
    let (reduced, _) = graph
        .without_edges(&removed)
        .map_err(|e| SimError::topology("preprocessing", e))?;
    info!(
        removed = removed.len(),
        remaining = reduced.edges().len(),
        "removed redundant fracture edges"
    );
    Ok((reduced, removed.len()))
}
