//! Error types for solver operations.

use fd_channel::ChannelError;
use fd_core::error::FdError;
use fd_core::{EdgeId, NodeId};
use fd_graph::GraphError;
use thiserror::Error;

/// Errors that can occur during the head solve and edge ordering.
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    #[error("Singular system: {what}")]
    Singular { what: &'static str },

    #[error("Invalid conductance on edge {edge}: {value}")]
    InvalidConductance { edge: EdgeId, value: f64 },

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Edge ordering deadlocked at nodes {unresolved:?}")]
    OrderingDeadlock { unresolved: Vec<NodeId> },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for FdError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Singular { what } => FdError::Invariant { what },
            SolverError::InvalidConductance { .. } => FdError::InvalidArg {
                what: "conductance",
            },
            SolverError::Shape { what, .. } => FdError::InvalidArg { what },
            SolverError::OrderingDeadlock { .. } => FdError::Invariant {
                what: "edge ordering deadlock",
            },
            SolverError::Graph(g) => g.into(),
            SolverError::Channel(c) => c.into(),
        }
    }
}
