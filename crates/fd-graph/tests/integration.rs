//! Integration tests for fd-graph: building networks, indexing, edge removal.

use std::collections::HashSet;

use fd_graph::{GraphBuilder, GraphError, IndexMap, InitialAperture};

fn ap() -> InitialAperture {
    InitialAperture::uniform(0.02, 1.0)
}

#[test]
fn diamond_network_boundaries() {
    // s -> a -> t and s -> b -> t
    let mut builder = GraphBuilder::new();
    let s = builder.add_node("s", [0.0, 0.0, 0.0]);
    let a = builder.add_node("a", [1.0, 1.0, 0.0]);
    let b = builder.add_node("b", [1.0, -1.0, 0.0]);
    let t = builder.add_node("t", [2.0, 0.0, 0.0]);
    let e0 = builder.add_edge(s, a, 1.5, Some(1), ap());
    let e1 = builder.add_edge(s, b, 1.5, Some(2), ap());
    let e2 = builder.add_edge(a, t, 1.5, Some(1), ap());
    let e3 = builder.add_edge(b, t, 1.5, Some(2), ap());
    builder.mark_source(s);
    builder.mark_target(t);
    let graph = builder.build().unwrap();

    let into_t: Vec<_> = graph.edges().iter().filter(|e| e.head == t).map(|e| e.id).collect();
    assert_eq!(into_t, [e2, e3]);
    assert_eq!(graph.edge(e0).unwrap().head, a);
    assert_eq!(graph.edge(e1).unwrap().tail, s);
    assert!(graph.is_source(s));
    assert!(graph.is_target(t));
    assert!(!graph.is_source(a));

    let idx = IndexMap::from_graph(&graph);
    assert_eq!(idx.source_idx(), &[0]);
    assert_eq!(idx.target_idx(), &[3]);
}

#[test]
fn removing_a_parallel_edge_renumbers() {
    let mut builder = GraphBuilder::new();
    let s = builder.add_node("s", [0.0; 3]);
    let m = builder.add_node("m", [1.0, 0.0, 0.0]);
    let t = builder.add_node("t", [2.0, 0.0, 0.0]);
    let short = builder.add_edge(s, m, 1.0, Some(3), ap());
    let long = builder.add_edge(s, m, 2.0, Some(3), ap());
    let out = builder.add_edge(m, t, 1.0, Some(4), ap());
    builder.mark_source(s);
    builder.mark_target(t);
    let graph = builder.build().unwrap();

    let removed: HashSet<_> = [long].into_iter().collect();
    let (reduced, kept) = graph.without_edges(&removed).unwrap();
    assert_eq!(reduced.edges().len(), 2);
    assert_eq!(kept, vec![short, out]);
    assert_eq!(reduced.edges()[1].length, 1.0);
    assert_eq!(reduced.edges()[1].frac, Some(4));
    assert_eq!(reduced.sources(), graph.sources());
}

#[test]
fn removing_a_bridge_is_rejected() {
    let mut builder = GraphBuilder::new();
    let s = builder.add_node("s", [0.0; 3]);
    let t = builder.add_node("t", [1.0, 0.0, 0.0]);
    let only = builder.add_edge(s, t, 1.0, None, ap());
    builder.mark_source(s);
    builder.mark_target(t);
    let graph = builder.build().unwrap();

    let removed: HashSet<_> = [only].into_iter().collect();
    assert_eq!(
        graph.without_edges(&removed).unwrap_err(),
        GraphError::Disconnected { components: 2 }
    );
}

#[test]
fn parallel_edge_iteration_sees_every_edge() {
    use rayon::prelude::*;

    let mut builder = GraphBuilder::new();
    let nodes: Vec<_> = (0..6)
        .map(|i| builder.add_node(format!("n{i}"), [i as f64, 0.0, 0.0]))
        .collect();
    for w in nodes.windows(2) {
        builder.add_edge(w[0], w[1], 2.0, None, ap());
    }
    builder.mark_source(nodes[0]);
    builder.mark_target(nodes[5]);
    let graph = builder.build().unwrap();

    let total: f64 = graph.par_edges().map(|e| e.length).sum();
    assert!((total - 10.0).abs() < 1e-12);
}
