//! fd-channel: 1-D reactive transport and aperture widening of a single fracture.
//!
//! Provides:
//! - `Chemistry`: immutable kinetic and fluid constants
//! - the regime-switched dissolution rate law (`rate`)
//! - rectangular cross-section hydraulics (`hydraulics`)
//! - `ChannelState` (per-edge time series) and its dense `ChannelGrid` view
//! - two interchangeable `ChannelStepper`s: fixed-space (dx) and
//!   fixed-concentration (dc), the latter with optional spline-refined grids
//!
//! # Example
//!
//! ```
//! use fd_channel::{
//!     ChannelState, ChannelStepper, Chemistry, CrossSection, FixedConcentrationStepper,
//!     StepInputs,
//! };
//!
//! let chem = Chemistry::default();
//! let x: Vec<f64> = (0..=100).map(|i| i as f64).collect();
//! let mut state = ChannelState::uniform(x, 0.02, 100.0).unwrap();
//! let stepper = FixedConcentrationStepper::new(chem.clone(), CrossSection::Rectangular);
//!
//! let r = CrossSection::Rectangular
//!     .resistance(&chem, state.alpha(), state.beta(), state.x())
//!     .unwrap();
//! let inputs = StepInputs { c_in: 0.0, resistance: r, hgrad: 0.01, length: 100.0, dt: 10.0 };
//! stepper.step(&mut state, inputs).unwrap();
//!
//! assert_eq!(state.steps(), 1);
//! assert!(state.alpha()[0] > 0.02);
//! ```

pub mod common;
pub mod error;
pub mod fixed_concentration;
pub mod fixed_space;
pub mod grid;
pub mod hydraulics;
pub mod params;
pub mod rate;
pub mod spline;
pub mod state;
pub mod traits;

pub use error::{ChannelError, ChannelResult};
pub use fixed_concentration::{FixedConcentrationStepper, ReferenceGrid, reference_grid};
pub use fixed_space::FixedSpaceStepper;
pub use grid::ChannelGrid;
pub use hydraulics::{CrossSection, flow_rate};
pub use params::Chemistry;
pub use rate::{RateRegime, dissolution_rate};
pub use state::ChannelState;
pub use traits::{ChannelStepper, StepInputs, StepOutcome};
