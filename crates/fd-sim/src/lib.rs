//! Time stepping of dissolving fracture networks.
//!
//! Provides:
//! - `NetworkEngine`: coupled head solve, causal ordering and per-edge channel
//!   integration, with optional remeshing epochs
//! - redundant-edge preprocessing
//! - the `Remesher` trait for external network simplification
//! - `run_channel` for single-fracture runs

pub mod channel_run;
pub mod engine;
pub mod error;
pub mod options;
pub mod preprocess;
pub mod remesh;

pub use channel_run::{ChannelSetup, run_channel};
pub use engine::{NetworkEngine, NetworkRun, NetworkState, StepRecord};
pub use error::{SimError, SimResult};
pub use options::{Discretization, RemeshSchedule, SimOptions};
pub use preprocess::remove_redundant_edges;
pub use remesh::{
    GeometrySample, Remesher, SamplePoint, SimplifiedEdge, SimplifiedGraph, SimplifiedNode,
};
