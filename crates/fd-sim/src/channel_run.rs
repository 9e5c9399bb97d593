//! Single-fracture runs with an imposed head gradient.

use fd_channel::{ChannelGrid, ChannelState, StepInputs};
use fd_core::numeric::uniform_grid;
use fd_core::units::{Length, as_cm};
use tracing::info;

use crate::error::{SimError, SimResult};
use crate::options::SimOptions;

/// Geometry and forcing of a lone channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSetup {
    pub length: Length,
    /// Initial half aperture
    pub alpha: Length,
    /// Initial half width
    pub beta: Length,
    /// Imposed head gradient
    pub hgrad: f64,
}

/// Dissolve one channel over the options' time axis.
pub fn run_channel(setup: &ChannelSetup, options: &SimOptions) -> SimResult<ChannelGrid> {
    options.validate()?;
    if !setup.hgrad.is_finite() || setup.hgrad < 0.0 {
        return Err(SimError::InvalidArg {
            what: "head gradient must be finite and non-negative",
        });
    }
    let chem = &options.chemistry;
    let stepper = options.stepper();
    let t = options.time_axis()?;
    let length = as_cm(setup.length);
    let x = uniform_grid(length, chem.dx)?;
    let mut state = ChannelState::uniform(x, as_cm(setup.alpha), as_cm(setup.beta))?;

    let steps = t.len() - 1;
    let every = ((steps as f64 / 10.0).round() as usize).max(1);
    info!(steps, length, stepper = stepper.name(), "starting channel run");
    for j in 0..steps {
        let inputs = StepInputs {
            c_in: chem.init_c,
            resistance: stepper.resistance(&state)?,
            hgrad: setup.hgrad,
            length,
            dt: t[j + 1] - t[j],
        };
        if j == 0 {
            stepper.prepare(&mut state, inputs)?;
        }
        stepper.step(&mut state, inputs)?;
        if (j + 1) % every == 0 {
            info!(
                step = j + 1,
                of = steps,
                percent = 100 * (j + 1) / steps,
                t = t[j + 1],
                "channel progress"
            );
        }
    }
    Ok(ChannelGrid::from_state(&state, t)?)
}
