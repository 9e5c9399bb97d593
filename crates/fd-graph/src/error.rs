//! Graph-specific error types.

use fd_core::{EdgeId, FdError, NodeId};

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An edge refers to a node that doesn't exist.
    InvalidNodeRef { edge: EdgeId, node: NodeId },

    /// A boundary set refers to a node that doesn't exist.
    InvalidBoundaryRef { node: NodeId },

    /// An edge connects a node to itself.
    SelfLoop { edge: EdgeId },

    /// An edge length is zero, negative or not finite.
    InvalidLength { edge: EdgeId, length: f64 },

    /// An initial aperture or width is not positive and finite.
    InvalidAperture { edge: EdgeId },

    /// A node coordinate is not finite.
    InvalidCoords { node: NodeId },

    /// The source or target set is empty.
    MissingBoundary { what: &'static str },

    /// A node is both a source and a target.
    OverlappingBoundary { node: NodeId },

    /// The graph splits into more than one connected component.
    Disconnected { components: usize },

    /// ID not found in index map.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidNodeRef { edge, node } => {
                write!(f, "Edge {} refers to non-existent node {}", edge, node)
            }
            GraphError::InvalidBoundaryRef { node } => {
                write!(f, "Boundary set refers to non-existent node {}", node)
            }
            GraphError::SelfLoop { edge } => write!(f, "Edge {} is a self loop", edge),
            GraphError::InvalidLength { edge, length } => {
                write!(f, "Edge {} has invalid length {}", edge, length)
            }
            GraphError::InvalidAperture { edge } => {
                write!(f, "Edge {} has a non-positive initial aperture or width", edge)
            }
            GraphError::InvalidCoords { node } => {
                write!(f, "Node {} has non-finite coordinates", node)
            }
            GraphError::MissingBoundary { what } => write!(f, "Graph has no {} nodes", what),
            GraphError::OverlappingBoundary { node } => {
                write!(f, "Node {} is both a source and a target", node)
            }
            GraphError::Disconnected { components } => {
                write!(
                    f,
                    "Graph is not connected ({} connected components)",
                    components
                )
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found in index map", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for FdError {
    fn from(err: GraphError) -> Self {
        FdError::Graph {
            message: err.to_string(),
        }
    }
}
