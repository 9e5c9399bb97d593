//! Stepper abstraction shared by both discretizations.

use crate::common::check_finite;
use crate::error::{ChannelError, ChannelResult};
use crate::hydraulics::CrossSection;
use crate::params::Chemistry;
use crate::state::ChannelState;

/// Per-step boundary data of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInputs {
    /// Concentration entering at `x = 0`.
    pub c_in: f64,
    /// Hydraulic resistance of the current profile.
    pub resistance: f64,
    /// Head gradient along the channel.
    pub hgrad: f64,
    /// Channel length (cm).
    pub length: f64,
    /// Time step (years); `Chemistry::gamma` carries the conversion.
    pub dt: f64,
}

impl StepInputs {
    pub fn validate(&self) -> ChannelResult<()> {
        check_finite(self.c_in, "inlet concentration")?;
        check_finite(self.hgrad, "head gradient")?;
        if !(self.resistance > 0.0) || !self.resistance.is_finite() {
            return Err(ChannelError::NonPhysical {
                what: "hydraulic resistance",
            });
        }
        if !(self.length > 0.0) || !self.length.is_finite() {
            return Err(ChannelError::InvalidArg {
                what: "channel length must be positive",
            });
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(ChannelError::InvalidArg {
                what: "time step must be positive",
            });
        }
        Ok(())
    }
}

/// What a step produced besides the new profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub q: f64,
    /// The concentration march ran out of points and used the channel grid.
    pub reference_fallback: bool,
}

/// Advances one channel by one time step.
///
/// Implementations are pure functions of their parameters and the state they
/// are handed, so a network can step disjoint channels from worker threads.
pub trait ChannelStepper: Send + Sync {
    fn name(&self) -> &str;

    fn chemistry(&self) -> &Chemistry;

    fn cross_section(&self) -> CrossSection;

    /// Compute concentration and rate for the current geometry, then widen.
    ///
    /// Appends `c`, `f`, `q` of this step and the widened `alpha`/`beta`.
    fn step(&self, state: &mut ChannelState, inputs: StepInputs) -> ChannelResult<StepOutcome>;

    /// One-off adjustment before the first step of a fresh channel.
    fn prepare(&self, _state: &mut ChannelState, _inputs: StepInputs) -> ChannelResult<()> {
        Ok(())
    }

    /// Resistance of the current profile.
    fn resistance(&self, state: &ChannelState) -> ChannelResult<f64> {
        self.cross_section()
            .resistance(self.chemistry(), state.alpha(), state.beta(), state.x())
    }
}
