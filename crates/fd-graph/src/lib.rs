//! fd-graph: fracture network topology.
//!
//! Provides:
//! - Core graph data structures (Node, Edge, FractureGraph)
//! - Incremental graph builder with validation (including connectivity)
//! - Stable indexing for the hydraulic solver (`source_idx` / `target_idx`)
//!
//! # Example
//!
//! ```
//! use fd_graph::{GraphBuilder, InitialAperture};
//!
//! let mut builder = GraphBuilder::new();
//! let inlet = builder.add_node("inlet", [0.0, 0.0, 0.0]);
//! let outlet = builder.add_node("outlet", [10.0, 0.0, 0.0]);
//! builder.add_edge(inlet, outlet, 10.0, Some(1), InitialAperture::uniform(0.02, 1.0));
//! builder.mark_source(inlet);
//! builder.mark_target(outlet);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.edges().len(), 1);
//! assert!(graph.is_connected());
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, FractureGraph, InitialAperture, Node};
pub use indexing::IndexMap;
