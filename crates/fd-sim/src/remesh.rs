//! Hand-off to an external network simplification service.
//!
//! At a remeshing event the engine samples the current channel geometry,
//! passes it to a [`Remesher`] and rebuilds the network from the simplified
//! graph it returns. The simplified graph never contains the boundary, so the
//! previous inlet and outlet nodes are reattached to their nearest returned
//! node.

use fd_core::NodeId;
use fd_core::numeric::interp;
use fd_graph::{FractureGraph, GraphBuilder, InitialAperture};
use rayon::prelude::*;

use crate::engine::NetworkState;
use crate::error::{SimError, SimResult};

/// Points sampled along each edge.
pub const SAMPLES_PER_EDGE: usize = 51;

/// One point of the geometry cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub coords: [f64; 3],
    pub alpha: f64,
    pub beta: f64,
}

/// Current channel geometry as a point cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySample {
    /// Step index the sample was taken at.
    pub step: usize,
    /// Time in years.
    pub t: f64,
    pub points: Vec<SamplePoint>,
}

/// A node of the simplified network, placed at its cluster centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedNode {
    pub label: String,
    pub centroid: [f64; 3],
    pub alpha: f64,
    pub beta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifiedEdge {
    pub a: usize,
    pub b: usize,
    /// Channel length; the centroid distance when absent.
    pub length: Option<f64>,
}

/// Network returned by a [`Remesher`], without boundary nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplifiedGraph {
    pub nodes: Vec<SimplifiedNode>,
    pub edges: Vec<SimplifiedEdge>,
}

impl SimplifiedGraph {
    /// Index and distance of the node closest to `point`.
    pub fn nearest(&self, point: [f64; 3]) -> Option<(usize, f64)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (i, distance(n.centroid, point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// External simplification service.
pub trait Remesher {
    fn simplify(&mut self, sample: &GeometrySample) -> Result<SimplifiedGraph, String>;
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

impl GeometrySample {
    /// Sample every channel at [`SAMPLES_PER_EDGE`] points along the straight
    /// line between its end nodes.
    pub fn from_state(state: &NetworkState, step: usize, t: f64) -> SimResult<Self> {
        let per_edge: Vec<Vec<SamplePoint>> = state
            .graph
            .par_edges()
            .map(|edge| -> SimResult<Vec<SamplePoint>> {
                let e = state.index.edge_idx(edge.id)?;
                let channel = &state.channels[e];
                let (start, end) = if state.channel_forward[e] {
                    (edge.tail, edge.head)
                } else {
                    (edge.head, edge.tail)
                };
                let a = node_coords(&state.graph, start)?;
                let b = node_coords(&state.graph, end)?;
                let length = channel.length();
                Ok((0..SAMPLES_PER_EDGE)
                    .map(|k| {
                        let s = k as f64 / (SAMPLES_PER_EDGE - 1) as f64;
                        let xs = s * length;
                        SamplePoint {
                            coords: [
                                a[0] + s * (b[0] - a[0]),
                                a[1] + s * (b[1] - a[1]),
                                a[2] + s * (b[2] - a[2]),
                            ],
                            alpha: interp(xs, channel.x(), channel.alpha()),
                            beta: interp(xs, channel.x(), channel.beta()),
                        }
                    })
                    .collect())
            })
            .collect::<SimResult<_>>()?;
        Ok(Self {
            step,
            t,
            points: per_edge.into_iter().flatten().collect(),
        })
    }
}

fn node_coords(graph: &FractureGraph, id: NodeId) -> SimResult<[f64; 3]> {
    graph
        .node(id)
        .map(|n| n.coords)
        .ok_or(SimError::InvalidArg {
            what: "edge refers to a missing node",
        })
}

/// Build the next topology from a simplified graph.
///
/// Every source and target of `previous` is re-added at its old coordinates
/// and joined to the nearest simplified node by a channel with that node's
/// aperture.
/// Lengths below `min_length` (coincident points) are raised to it.
pub fn reattach_boundary(
    previous: &FractureGraph,
    simplified: &SimplifiedGraph,
    min_length: f64,
) -> SimResult<FractureGraph> {
    if simplified.nodes.is_empty() {
        return Err(SimError::Remesh {
            message: "simplified graph has no nodes".to_string(),
        });
    }
    let mut builder = GraphBuilder::new();
    let ids: Vec<NodeId> = simplified
        .nodes
        .iter()
        .map(|n| builder.add_node(n.label.clone(), n.centroid))
        .collect();

    for edge in &simplified.edges {
        let (Some(&tail), Some(&head)) = (ids.get(edge.a), ids.get(edge.b)) else {
            return Err(SimError::Remesh {
                message: format!("edge {}-{} refers to a missing node", edge.a, edge.b),
            });
        };
        let (na, nb) = (&simplified.nodes[edge.a], &simplified.nodes[edge.b]);
        let length = edge
            .length
            .unwrap_or_else(|| distance(na.centroid, nb.centroid))
            .max(min_length);
        let aperture = InitialAperture::Tapered {
            alpha: [na.alpha, nb.alpha],
            beta: [na.beta, nb.beta],
        };
        builder.add_edge(tail, head, length, None, aperture);
    }

    for (nodes, is_source) in [(previous.sources(), true), (previous.targets(), false)] {
        for &old in nodes {
            let node = previous.node(old).ok_or(SimError::InvalidArg {
                what: "boundary node missing from graph",
            })?;
            let Some((nearest, dist)) = simplified.nearest(node.coords) else {
                continue;
            };
            let anchor = &simplified.nodes[nearest];
            let id = builder.add_node(format!("{}-b", node.name), node.coords);
            builder.add_edge(
                id,
                ids[nearest],
                dist.max(min_length),
                None,
                InitialAperture::uniform(anchor.alpha, anchor.beta),
            );
            if is_source {
                builder.mark_source(id);
            } else {
                builder.mark_target(id);
            }
        }
    }

    builder
        .build()
        .map_err(|e| SimError::topology("remeshing", e))
}
