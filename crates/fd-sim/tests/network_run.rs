//! End-to-end runs of the network engine.

use fd_core::units::years;
use fd_graph::{FractureGraph, GraphBuilder, InitialAperture};
use fd_sim::{
    Discretization, GeometrySample, NetworkEngine, RemeshSchedule, Remesher, SimError, SimOptions,
    SimplifiedEdge, SimplifiedGraph, SimplifiedNode,
};

fn ap() -> InitialAperture {
    InitialAperture::uniform(0.02, 10.0)
}

/// Inlet feeding a split that rejoins before the outlet.
fn diamond() -> FractureGraph {
    let mut b = GraphBuilder::new();
    let s = b.add_node("s", [0.0, 0.0, 0.0]);
    let u = b.add_node("u", [5.0, 2.0, 0.0]);
    let d = b.add_node("d", [5.0, -2.0, 0.0]);
    let t = b.add_node("t", [10.0, 0.0, 0.0]);
    b.add_edge(s, u, 5.0, Some(1), ap());
    b.add_edge(s, d, 5.0, Some(2), ap());
    b.add_edge(u, t, 5.0, Some(3), ap());
    b.add_edge(d, t, 6.0, Some(4), ap());
    b.mark_source(s);
    b.mark_target(t);
    b.build().unwrap()
}

fn options(steps: f64) -> SimOptions {
    let mut opts = SimOptions {
        duration: years(steps * 10.0),
        dt: years(10.0),
        ..SimOptions::default()
    };
    opts.chemistry.dx = 0.05;
    opts
}

#[test]
fn network_run_widens_every_channel() {
    let run = NetworkEngine::new(diamond(), options(4.0))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(run.epochs(), 1);
    assert_eq!(run.records.len(), 4);
    let state = run.final_state().unwrap();
    assert_eq!(state.steps(), 4);
    for channel in &state.channels {
        assert_eq!(channel.steps(), 4);
        for pair in channel.alpha_series().windows(2) {
            assert!(pair[0].iter().zip(&pair[1]).all(|(a, b)| b >= a));
        }
        assert!(channel.alpha()[0] > 0.02);
    }
    for record in &run.records {
        assert_eq!(record.order.len(), 4);
    }
}

#[test]
fn dead_end_loop_runs_with_default_ordering() {
    let mut b = GraphBuilder::new();
    let s = b.add_node("s", [0.0, 0.0, 0.0]);
    let u = b.add_node("u", [5.0, 0.0, 0.0]);
    let t = b.add_node("t", [10.0, 0.0, 0.0]);
    let x = b.add_node("x", [5.0, 3.0, 0.0]);
    let y = b.add_node("y", [6.0, 3.0, 0.0]);
    b.add_edge(s, u, 5.0, None, ap());
    b.add_edge(u, t, 5.0, None, ap());
    b.add_edge(u, x, 3.0, None, ap());
    b.add_edge(x, y, 1.0, None, ap());
    b.add_edge(y, u, 3.0, None, ap());
    b.mark_source(s);
    b.mark_target(t);

    let run = NetworkEngine::new(b.build().unwrap(), options(2.0))
        .unwrap()
        .run()
        .unwrap();
    for record in &run.records {
        assert_eq!(record.order.len(), 5);
        assert!((2..5).all(|e| record.flow.get(e).stagnant));
    }
    let state = run.final_state().unwrap();
    assert!(state.channels[0].alpha()[0] > 0.02);
}

#[test]
fn concentration_carries_through_junctions() {
    let run = NetworkEngine::new(diamond(), options(2.0))
        .unwrap()
        .run()
        .unwrap();
    let state = run.final_state().unwrap();
    let chem = SimOptions::default().chemistry;
    for channel in &state.channels {
        for c in channel.c_series() {
            assert!(c.iter().all(|&v| (0.0..chem.c_eq).contains(&v)));
        }
    }
    // downstream edges start from a non-zero inlet
    let record = &run.records[1];
    let last = record.order[3];
    let c = state.channel(last).unwrap().concentration(1).unwrap();
    assert!(c[0] > 0.0);
}

#[test]
fn heads_are_recorded_per_step() {
    let run = NetworkEngine::new(diamond(), options(3.0))
        .unwrap()
        .run()
        .unwrap();
    let state = run.final_state().unwrap();
    assert!(state.heads.iter().all(|h| h.len() == 3));
    assert_eq!(state.heads[0][0], 1000.0);
    assert_eq!(state.heads[3][0], 0.0);
    let grid = state
        .channel_grid(state.graph.edges()[0].id, &run.t)
        .unwrap();
    assert_eq!(grid.alpha.ncols(), 4);
}

#[test]
fn redundant_edges_are_removed_before_the_run() {
    let mut b = GraphBuilder::new();
    let s = b.add_node("s", [0.0; 3]);
    let m = b.add_node("m", [5.0, 0.0, 0.0]);
    let t = b.add_node("t", [10.0, 0.0, 0.0]);
    b.add_edge(s, m, 5.0, Some(1), ap());
    b.add_edge(s, m, 7.0, Some(1), ap());
    b.add_edge(m, t, 5.0, Some(2), ap());
    b.mark_source(s);
    b.mark_target(t);
    let graph = b.build().unwrap();

    let engine = NetworkEngine::new(graph.clone(), options(1.0)).unwrap();
    assert_eq!(engine.state().graph.edges().len(), 2);
    assert_eq!(engine.state().graph.edges()[0].length, 5.0);

    let kept = NetworkEngine::new(
        graph,
        SimOptions {
            preprocess: false,
            ..options(1.0)
        },
    )
    .unwrap();
    assert_eq!(kept.state().graph.edges().len(), 3);
}

#[test]
fn every_discretization_runs() {
    for discretization in [
        Discretization::FixedSpace,
        Discretization::FixedConcentration,
        Discretization::RefinedConcentration,
    ] {
        let opts = SimOptions {
            discretization,
            ..options(2.0)
        };
        let run = NetworkEngine::new(diamond(), opts).unwrap().run().unwrap();
        assert_eq!(run.records.len(), 2);
    }
}

/// Collapses the network onto two fixed clusters.
struct TwoClusters {
    calls: usize,
}

impl Remesher for TwoClusters {
    fn simplify(&mut self, sample: &GeometrySample) -> Result<SimplifiedGraph, String> {
        self.calls += 1;
        if sample.points.is_empty() {
            return Err("empty sample".into());
        }
        let alpha = sample.points.iter().map(|p| p.alpha).fold(f64::INFINITY, f64::min);
        let node = |label: &str, x: f64| SimplifiedNode {
            label: label.into(),
            centroid: [x, 0.0, 0.0],
            alpha,
            beta: 10.0,
        };
        Ok(SimplifiedGraph {
            nodes: vec![node("c0", 3.0), node("c1", 7.0)],
            edges: vec![SimplifiedEdge {
                a: 0,
                b: 1,
                length: None,
            }],
        })
    }
}

#[test]
fn remeshing_starts_a_new_epoch() {
    let opts = SimOptions {
        remesh: Some(RemeshSchedule {
            start: years(20.0),
            interval: years(1000.0),
        }),
        ..options(4.0)
    };
    let run = NetworkEngine::new(diamond(), opts)
        .unwrap()
        .with_remesher(Box::new(TwoClusters { calls: 0 }))
        .run()
        .unwrap();

    assert_eq!(run.epochs(), 2);
    assert_eq!(run.history[0].steps(), 2);
    assert_eq!(run.history[1].steps(), 2);
    assert_eq!(run.history[1].epoch_start, 2);
    assert_eq!(run.records[2].epoch, 1);

    let graph = &run.history[1].graph;
    assert_eq!(graph.nodes().len(), 4);
    let src = graph.node(graph.sources()[0]).unwrap();
    assert_eq!(src.coords, [0.0, 0.0, 0.0]);
    let tgt = graph.node(graph.targets()[0]).unwrap();
    assert_eq!(tgt.coords, [10.0, 0.0, 0.0]);
}

#[test]
fn remeshing_without_remesher_is_rejected() {
    let opts = SimOptions {
        remesh: Some(RemeshSchedule::default()),
        ..options(2.0)
    };
    let err = NetworkEngine::new(diamond(), opts).unwrap().run().unwrap_err();
    assert!(matches!(err, SimError::InvalidArg { .. }));
}
