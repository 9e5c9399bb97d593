//! Error types for simulation operations.

use fd_core::NodeId;
use thiserror::Error;

/// Errors encountered while running a dissolution simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Topology error during {stage}: {message}")]
    Topology { stage: &'static str, message: String },

    #[error("Edge ordering deadlocked at step {step}, unresolved nodes {unresolved:?}")]
    OrderingDeadlock { step: usize, unresolved: Vec<NodeId> },

    #[error("Remeshing failed: {message}")]
    Remesh { message: String },

    #[error("Solver error: {0}")]
    Solver(#[from] fd_solver::SolverError),

    #[error("Channel error: {0}")]
    Channel(#[from] fd_channel::ChannelError),

    #[error(transparent)]
    Core(#[from] fd_core::error::FdError),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Wrap a graph construction failure at a named stage of the run.
    pub fn topology(stage: &'static str, e: fd_graph::GraphError) -> Self {
        SimError::Topology {
            stage,
            message: e.to_string(),
        }
    }
}

impl From<fd_graph::GraphError> for SimError {
    fn from(e: fd_graph::GraphError) -> Self {
        SimError::topology("graph", e)
    }
}
