//! Nodal head solve on the weighted graph Laplacian.

use fd_core::NodeId;
use fd_core::timing::{Timer, step_timing};
use fd_graph::{FractureGraph, IndexMap};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::{SolverError, SolverResult};

/// Dirichlet head solve with fixed heads on the inlet and outlet sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydraulicSolver {
    pub source_head: f64,
    pub target_head: f64,
}

impl Default for HydraulicSolver {
    fn default() -> Self {
        Self {
            source_head: 1000.0,
            target_head: 0.0,
        }
    }
}

/// Heads of one solve, in `IndexMap` node order.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadSolution {
    pub head: Vec<f64>,
}

impl HeadSolution {
    pub fn head(&self, index: &IndexMap, node: NodeId) -> SolverResult<f64> {
        Ok(self.head[index.node_idx(node)?])
    }

    pub fn len(&self) -> usize {
        self.head.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }
}

impl HydraulicSolver {
    pub fn new(source_head: f64, target_head: f64) -> Self {
        Self {
            source_head,
            target_head,
        }
    }

    /// Weighted Laplacian `diag(rowsum W) - W`; parallel edges add up.
    pub fn laplacian(
        graph: &FractureGraph,
        index: &IndexMap,
        conductance: &[f64],
    ) -> SolverResult<DMatrix<f64>> {
        if conductance.len() != index.edge_count() {
            return Err(SolverError::Shape {
                what: "conductance vector",
                expected: index.edge_count(),
                actual: conductance.len(),
            });
        }
        let n = index.node_count();
        let mut lap = DMatrix::<f64>::zeros(n, n);
        for edge in graph.edges() {
            let g = conductance[index.edge_idx(edge.id)?];
            if !g.is_finite() || g < 0.0 {
                return Err(SolverError::InvalidConductance {
                    edge: edge.id,
                    value: g,
                });
            }
            let a = index.node_idx(edge.tail)?;
            let b = index.node_idx(edge.head)?;
            lap[(a, b)] -= g;
            lap[(b, a)] -= g;
            lap[(a, a)] += g;
            lap[(b, b)] += g;
        }
        Ok(lap)
    }

    /// Solve for nodal heads given per-edge conductances `1/R` in `IndexMap`
    /// edge order.
    pub fn solve(
        &self,
        graph: &FractureGraph,
        index: &IndexMap,
        conductance: &[f64],
    ) -> SolverResult<HeadSolution> {
        let timer = Timer::start("head_solve");
        let mut lap = Self::laplacian(graph, index, conductance)?;
        let n = index.node_count();
        let mut rhs = DVector::<f64>::zeros(n);

        let boundary: Vec<(usize, f64)> = index
            .source_idx()
            .iter()
            .map(|&k| (k, self.source_head))
            .chain(index.target_idx().iter().map(|&k| (k, self.target_head)))
            .collect();

        // lift known heads to the free rows before clearing boundary columns
        for &(k, h) in &boundary {
            for r in 0..n {
                rhs[r] -= lap[(r, k)] * h;
            }
        }
        for &(k, h) in &boundary {
            lap.row_mut(k).fill(0.0);
            lap.column_mut(k).fill(0.0);
            lap[(k, k)] = 1.0;
            rhs[k] = h;
        }

        let solution = lap.lu().solve(&rhs).ok_or(SolverError::Singular {
            what: "graph Laplacian",
        })?;
        if solution.iter().any(|h| !h.is_finite()) {
            return Err(SolverError::Singular {
                what: "non-finite head",
            });
        }
        timer.stop_into(&step_timing::HEAD_SOLVE);
        debug!(nodes = n, "head solve");
        Ok(HeadSolution {
            head: solution.iter().copied().collect(),
        })
    }
}
