//! Causal edge ordering.
//!
//! Channels must be integrated so that every edge leaving a node comes after
//! every edge entering it; the inlet concentration of an edge mixes the outlet
//! concentrations of the edges feeding its upstream node.

use std::collections::BTreeSet;

use fd_core::timing::{Timer, step_timing};
use fd_core::{EdgeId, NodeId};
use fd_graph::{FractureGraph, IndexMap};
use tracing::warn;

use crate::error::{SolverError, SolverResult};
use crate::flow::FlowField;

/// What to do when no waiting node has all of its inflow resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Fail with [`SolverError::OrderingDeadlock`].
    #[default]
    Strict,
    /// Release every waiting node anyway and log a warning.
    ForceDeferred,
}

/// Visit order of all edges for one step.
///
/// The first batch is the out-edges of the sources and of every node without
/// in-edges. After that a node is released once all of its flowing in-edges
/// have been visited, and its out-edges form part of the next batch. Nodes
/// that are reached early are deferred and retried. Stagnant edges never hold
/// a node back, so dead-end loops with tied heads resolve; when no batch is
/// left, every unreleased node whose flowing inflow is complete is swept in.
pub fn causal_order(
    graph: &FractureGraph,
    index: &IndexMap,
    flow: &FlowField,
    policy: OrderingPolicy,
) -> SolverResult<Vec<EdgeId>> {
    let timer = Timer::start("ordering");
    let n_edges = index.edge_count();
    let n_nodes = index.node_count();
    if flow.len() != n_edges {
        return Err(SolverError::Shape {
            what: "flow field",
            expected: n_edges,
            actual: flow.len(),
        });
    }

    let mut visited = vec![false; n_edges];
    let mut released = vec![false; n_nodes];
    let mut order = Vec::with_capacity(n_edges);

    let mut seeds: BTreeSet<usize> = index.source_idx().iter().copied().collect();
    seeds.extend((0..n_nodes).filter(|&n| flow.in_edges(n).is_empty()));
    let mut batch = release(index, flow, seeds, &mut released, &mut visited, &mut order)?;
    let mut deferred: BTreeSet<usize> = BTreeSet::new();

    while order.len() < n_edges {
        let mut candidates = std::mem::take(&mut deferred);
        for &e in &batch {
            let down = flow.get(index.edge_idx(e)?).downstream;
            candidates.insert(index.node_idx(down)?);
        }

        let mut passing = BTreeSet::new();
        for n in candidates {
            if released[n] {
                continue;
            }
            if inflow_resolved(index, flow, n, &visited)? {
                passing.insert(n);
            } else {
                deferred.insert(n);
            }
        }

        batch = release(index, flow, passing, &mut released, &mut visited, &mut order)?;
        if batch.is_empty() && order.len() < n_edges {
            let mut idle = BTreeSet::new();
            for n in (0..n_nodes).filter(|&n| !released[n]) {
                if inflow_resolved(index, flow, n, &visited)? {
                    idle.insert(n);
                }
            }
            deferred.retain(|n| !idle.contains(n));
            batch = release(index, flow, idle, &mut released, &mut visited, &mut order)?;
        }
        if batch.is_empty() && order.len() < n_edges {
            if policy == OrderingPolicy::ForceDeferred && !deferred.is_empty() {
                warn!(
                    nodes = deferred.len(),
                    "forcing deferred nodes with unresolved inflow"
                );
                let forced = std::mem::take(&mut deferred);
                batch = release(index, flow, forced, &mut released, &mut visited, &mut order)?;
            }
            if batch.is_empty() {
                return Err(SolverError::OrderingDeadlock {
                    unresolved: unresolved(graph, index, flow, &visited)?,
                });
            }
        }
    }

    timer.stop_into(&step_timing::ORDERING);
    Ok(order)
}

/// Every flowing in-edge of node `n` has been visited.
fn inflow_resolved(
    index: &IndexMap,
    flow: &FlowField,
    n: usize,
    visited: &[bool],
) -> SolverResult<bool> {
    for &e in flow.in_edges(n) {
        let ei = index.edge_idx(e)?;
        if !visited[ei] && !flow.get(ei).stagnant {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Mark `nodes` released and visit their unvisited out-edges.
fn release(
    index: &IndexMap,
    flow: &FlowField,
    nodes: BTreeSet<usize>,
    released: &mut [bool],
    visited: &mut [bool],
    order: &mut Vec<EdgeId>,
) -> SolverResult<Vec<EdgeId>> {
    let mut batch = Vec::new();
    for n in nodes {
        released[n] = true;
        for &e in flow.out_edges(n) {
            let ei = index.edge_idx(e)?;
            if !visited[ei] {
                visited[ei] = true;
                batch.push(e);
            }
        }
    }
    order.extend_from_slice(&batch);
    Ok(batch)
}

/// Upstream nodes of the edges that were never visited.
fn unresolved(
    graph: &FractureGraph,
    index: &IndexMap,
    flow: &FlowField,
    visited: &[bool],
) -> SolverResult<Vec<NodeId>> {
    let mut nodes = BTreeSet::new();
    for edge in graph.edges() {
        let e = index.edge_idx(edge.id)?;
        if !visited[e] {
            nodes.insert(flow.get(e).upstream);
        }
    }
    Ok(nodes.into_iter().collect())
}
