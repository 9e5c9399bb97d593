//! Graph validation logic.

use std::collections::HashSet;

use fd_core::NodeId;
use petgraph::unionfind::UnionFind;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Node};

/// Validate references, lengths, apertures and coordinates.
pub(crate) fn validate_structure(nodes: &[Node], edges: &[Edge]) -> GraphResult<()> {
    for (i, node) in nodes.iter().enumerate() {
        if node.id.idx() != i {
            return Err(GraphError::IdNotFound { what: "NodeId" });
        }
        if !node.coords.iter().all(|c| c.is_finite()) {
            return Err(GraphError::InvalidCoords { node: node.id });
        }
    }

    for (i, edge) in edges.iter().enumerate() {
        if edge.id.idx() != i {
            return Err(GraphError::IdNotFound { what: "EdgeId" });
        }
        for node in [edge.tail, edge.head] {
            if node.idx() >= nodes.len() {
                return Err(GraphError::InvalidNodeRef {
                    edge: edge.id,
                    node,
                });
            }
        }
        if edge.tail == edge.head {
            return Err(GraphError::SelfLoop { edge: edge.id });
        }
        if !(edge.length.is_finite() && edge.length > 0.0) {
            return Err(GraphError::InvalidLength {
                edge: edge.id,
                length: edge.length,
            });
        }
        if !edge.aperture.is_valid() {
            return Err(GraphError::InvalidAperture { edge: edge.id });
        }
    }

    Ok(())
}

/// Validate the inlet and outlet sets.
pub(crate) fn validate_boundaries(
    node_count: usize,
    sources: &[NodeId],
    targets: &[NodeId],
) -> GraphResult<()> {
    if sources.is_empty() {
        return Err(GraphError::MissingBoundary { what: "source" });
    }
    if targets.is_empty() {
        return Err(GraphError::MissingBoundary { what: "target" });
    }
    for &node in sources.iter().chain(targets) {
        if node.idx() >= node_count {
            return Err(GraphError::InvalidBoundaryRef { node });
        }
    }
    let source_set: HashSet<NodeId> = sources.iter().copied().collect();
    if let Some(&node) = targets.iter().find(|t| source_set.contains(t)) {
        return Err(GraphError::OverlappingBoundary { node });
    }
    Ok(())
}

/// Number of connected components of the undirected topology.
pub(crate) fn component_count(node_count: usize, edges: &[Edge]) -> usize {
    if node_count == 0 {
        return 0;
    }
    let mut uf = UnionFind::<usize>::new(node_count);
    for edge in edges {
        uf.union(edge.tail.idx(), edge.head.idx());
    }
    let roots: HashSet<usize> = (0..node_count).map(|i| uf.find(i)).collect();
    roots.len()
}

pub(crate) fn validate_connected(node_count: usize, edges: &[Edge]) -> GraphResult<()> {
    let components = component_count(node_count, edges);
    if components > 1 {
        return Err(GraphError::Disconnected { components });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::InitialAperture;
    use fd_core::Id;

    fn node(i: u32) -> Node {
        Node {
            id: Id::from_index(i),
            name: format!("N{i}"),
            coords: [i as f64, 0.0, 0.0],
        }
    }

    fn edge(i: u32, tail: u32, head: u32) -> Edge {
        Edge {
            id: Id::from_index(i),
            tail: Id::from_index(tail),
            head: Id::from_index(head),
            length: 1.0,
            frac: None,
            aperture: InitialAperture::uniform(0.02, 1.0),
        }
    }

    #[test]
    fn validate_empty_graph() {
        assert!(validate_structure(&[], &[]).is_ok());
        assert_eq!(component_count(0, &[]), 0);
    }

    #[test]
    fn validate_invalid_node_ref() {
        let nodes = vec![node(0)];
        let edges = vec![edge(0, 0, 99)];
        assert!(matches!(
            validate_structure(&nodes, &edges),
            Err(GraphError::InvalidNodeRef { .. })
        ));
    }

    #[test]
    fn validate_self_loop() {
        let nodes = vec![node(0)];
        let edges = vec![edge(0, 0, 0)];
        assert_eq!(
            validate_structure(&nodes, &edges),
            Err(GraphError::SelfLoop {
                edge: Id::from_index(0)
            })
        );
    }

    #[test]
    fn validate_overlapping_boundary() {
        let s = [Id::from_index(0), Id::from_index(1)];
        let t = [Id::from_index(1)];
        assert_eq!(
            validate_boundaries(2, &s, &t),
            Err(GraphError::OverlappingBoundary {
                node: Id::from_index(1)
            })
        );
    }

    #[test]
    fn components_counted() {
        let edges = vec![edge(0, 0, 1), edge(1, 2, 3), edge(2, 1, 0)];
        assert_eq!(component_count(4, &edges), 2);
        assert_eq!(component_count(5, &edges), 3);
    }
}
