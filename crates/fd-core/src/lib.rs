//! fd-core: stable foundation for the fracture dissolution workspace.
//!
//! Contains:
//! - units (uom types + cm/year constructors)
//! - numeric (Real, tolerances, trapezoid rule, linear interpolation)
//! - ids (compact IDs for graph objects)
//! - error (shared error types)
//! - timing (opt-in run timers)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;
pub mod units;

pub use error::{FdError, FdResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
