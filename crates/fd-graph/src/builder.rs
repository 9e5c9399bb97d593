//! Incremental graph builder.

use fd_core::{EdgeId, FracId, NodeId};

use crate::error::GraphResult;
use crate::graph::{Edge, FractureGraph, InitialAperture, Node};
use crate::validate;

/// Builder for constructing a fracture network incrementally.
///
/// Use `add_node` and `add_edge` to build up the graph, mark the boundary
/// nodes, then call `build()` to validate and freeze it.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    sources: Vec<NodeId>,
    targets: Vec<NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intersection node and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>, coords: [f64; 3]) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(Node {
            id,
            name: name.into(),
            coords,
        });
        id
    }

    /// Re-add a node from another graph, renumbered to this builder.
    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(Node { id, ..node });
        id
    }

    /// Add a channel from `tail` to `head`. Returns the edge ID.
    pub fn add_edge(
        &mut self,
        tail: NodeId,
        head: NodeId,
        length: f64,
        frac: Option<FracId>,
        aperture: InitialAperture,
    ) -> EdgeId {
        let id = EdgeId::from_usize(self.edges.len());
        self.edges.push(Edge {
            id,
            tail,
            head,
            length,
            frac,
            aperture,
        });
        id
    }

    /// Add `node` to the inlet set.
    pub fn mark_source(&mut self, node: NodeId) {
        if !self.sources.contains(&node) {
            self.sources.push(node);
        }
    }

    /// Add `node` to the outlet set.
    pub fn mark_target(&mut self, node: NodeId) {
        if !self.targets.contains(&node) {
            self.targets.push(node);
        }
    }

    /// Validate and freeze the graph.
    ///
    /// Checks references, lengths, apertures, boundary sets and connectivity.
    pub fn build(self) -> GraphResult<FractureGraph> {
        validate::validate_structure(&self.nodes, &self.edges)?;
        validate::validate_boundaries(self.nodes.len(), &self.sources, &self.targets)?;
        validate::validate_connected(self.nodes.len(), &self.edges)?;

        Ok(FractureGraph {
            nodes: self.nodes,
            edges: self.edges,
            sources: self.sources,
            targets: self.targets,
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    fn ap() -> InitialAperture {
        InitialAperture::uniform(0.02, 1.0)
    }

    #[test]
    fn builder_basic() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("N1", [0.0; 3]);
        let n2 = builder.add_node("N2", [1.0, 0.0, 0.0]);
        let e1 = builder.add_edge(n1, n2, 1.0, None, ap());

        assert_eq!(n1.index(), 0);
        assert_eq!(n2.index(), 1);
        assert_eq!(e1.index(), 0);
    }

    #[test]
    fn builder_build_simple() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("N1", [0.0; 3]);
        let n2 = builder.add_node("N2", [1.0, 0.0, 0.0]);
        let n3 = builder.add_node("N3", [2.0, 0.0, 0.0]);
        let e1 = builder.add_edge(n1, n2, 1.0, None, ap());
        let e2 = builder.add_edge(n2, n3, 1.0, None, ap());
        builder.mark_source(n1);
        builder.mark_target(n3);

        let graph = builder.build().unwrap();
        assert_eq!(graph.edge(e1).unwrap().head, n2);
        assert_eq!(graph.edge(e2).unwrap().tail, n2);
        assert_eq!(graph.node(n3).unwrap().coords, [2.0, 0.0, 0.0]);
        assert_eq!(graph.sources(), &[n1]);
        assert_eq!(graph.targets(), &[n3]);
    }

    #[test]
    fn builder_rejects_missing_target() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("N1", [0.0; 3]);
        let n2 = builder.add_node("N2", [1.0, 0.0, 0.0]);
        builder.add_edge(n1, n2, 1.0, None, ap());
        builder.mark_source(n1);

        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::MissingBoundary { what: "target" }
        );
    }

    #[test]
    fn builder_rejects_disconnected() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node("a", [0.0; 3]);
        let b = builder.add_node("b", [1.0, 0.0, 0.0]);
        let c = builder.add_node("c", [5.0, 0.0, 0.0]);
        let d = builder.add_node("d", [6.0, 0.0, 0.0]);
        builder.add_edge(a, b, 1.0, None, ap());
        builder.add_edge(c, d, 1.0, None, ap());
        builder.mark_source(a);
        builder.mark_target(d);

        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::Disconnected { components: 2 }
        );
    }

    #[test]
    fn builder_rejects_bad_length() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node("a", [0.0; 3]);
        let b = builder.add_node("b", [1.0, 0.0, 0.0]);
        let e = builder.add_edge(a, b, 0.0, None, ap());
        builder.mark_source(a);
        builder.mark_target(b);

        assert!(matches!(
            builder.build().unwrap_err(),
            GraphError::InvalidLength { edge, .. } if edge == e
        ));
    }
}
