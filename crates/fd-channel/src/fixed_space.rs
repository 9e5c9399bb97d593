//! Explicit march over the channel grid (dx algorithm).

use crate::common::{EPSILON_FLOW, check_finite, widen};
use crate::error::ChannelResult;
use crate::hydraulics::{CrossSection, flow_rate};
use crate::params::Chemistry;
use crate::rate::dissolution_rate;
use crate::state::ChannelState;
use crate::traits::{ChannelStepper, StepInputs, StepOutcome};

/// Integrates `dc/dx = P f / Q` with forward Euler on the stored grid.
#[derive(Debug, Clone)]
pub struct FixedSpaceStepper {
    chem: Chemistry,
    section: CrossSection,
}

impl FixedSpaceStepper {
    pub fn new(chem: Chemistry, section: CrossSection) -> Self {
        Self { chem, section }
    }
}

impl ChannelStepper for FixedSpaceStepper {
    fn name(&self) -> &str {
        "fixed-space"
    }

    fn chemistry(&self) -> &Chemistry {
        &self.chem
    }

    fn cross_section(&self) -> CrossSection {
        self.section
    }

    fn step(&self, state: &mut ChannelState, inputs: StepInputs) -> ChannelResult<StepOutcome> {
        inputs.validate()?;
        let chem = &self.chem;
        let q = flow_rate(inputs.resistance, inputs.hgrad, inputs.length);
        check_finite(q, "flow rate")?;

        let x = state.x();
        let alpha = state.alpha();
        let perimeter = self.section.perimeter_profile(alpha, state.beta());
        let n = x.len();

        let mut c = Vec::with_capacity(n);
        let mut f = Vec::with_capacity(n);
        c.push(chem.clamp_concentration(inputs.c_in));
        f.push(dissolution_rate(chem, alpha[0], c[0]));
        for i in 0..n - 1 {
            let next = if q > EPSILON_FLOW {
                chem.clamp_concentration(c[i] + (x[i + 1] - x[i]) * perimeter[i] * f[i] / q)
            } else {
                chem.c_ceiling()
            };
            c.push(next);
            f.push(dissolution_rate(chem, alpha[i + 1], next));
        }

        let (alpha_next, beta_next) = widen(chem, alpha, state.beta(), &f, inputs.dt);
        state.push_step(c, f, q, alpha_next, beta_next);
        Ok(StepOutcome {
            q,
            reference_fallback: false,
        })
    }
}
