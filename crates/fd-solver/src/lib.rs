//! Network-level hydraulics for fracture networks.
//!
//! This crate solves the graph Laplacian for nodal heads given per-edge
//! conductances, turns the heads into a per-step [`FlowField`] (gradients,
//! flows, orientation) and derives the causal order in which channels have to
//! be integrated so that every channel sees its upstream concentrations.

pub mod error;
pub mod flow;
pub mod hydraulic;
pub mod ordering;

pub use error::{SolverError, SolverResult};
pub use flow::{EdgeFlow, FlowField};
pub use hydraulic::{HeadSolution, HydraulicSolver};
pub use ordering::{OrderingPolicy, causal_order};
