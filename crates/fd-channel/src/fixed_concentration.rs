//! Concentration-driven march (dc algorithm).
//!
//! Instead of stepping in space and integrating concentration, the channel is
//! walked in fixed concentration increments `dc`; each increment advances the
//! position by `dx_k = Q dc / (f_k P(x_k))`. The resulting reference profile
//! is linearly resampled onto the channel grid.

use fd_core::numeric::interp_onto;
use tracing::debug;

use crate::common::{EPSILON_FLOW, check_finite, widen};
use crate::error::ChannelResult;
use crate::hydraulics::{CrossSection, flow_rate};
use crate::params::Chemistry;
use crate::rate::{dissolution_rate, rate_profile};
use crate::spline::{REFINE_FACTOR, refine_reference_grid};
use crate::state::ChannelState;
use crate::traits::{ChannelStepper, StepInputs, StepOutcome};

/// Positions reached by the concentration march and the concentration there.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGrid {
    pub x: Vec<f64>,
    pub c: Vec<f64>,
    /// The march used up as many increments as the channel grid has points
    /// before reaching the outlet, and the channel grid was used instead.
    pub fell_back: bool,
}

/// March `c_k = c_in + k dc` along the channel.
///
/// Rate and perimeter at each reference position are evaluated at the nearest
/// channel grid point. The march is capped at `x.len()` increments; hitting
/// the cap (or a degenerate increment) falls back to the channel grid.
pub fn reference_grid(
    chem: &Chemistry,
    section: CrossSection,
    x: &[f64],
    alpha: &[f64],
    beta: &[f64],
    c_in: f64,
    q: f64,
) -> ReferenceGrid {
    let n = x.len();
    let length = x[n - 1];
    let c_at = |k: usize| chem.clamp_concentration(c_in + k as f64 * chem.dc);

    let mut xs = vec![0.0];
    let mut cs = vec![c_at(0)];
    let mut pos = 0.0;
    let mut near = 0;
    let mut k = 0;
    while pos < length && k < n {
        while near + 1 < n && (x[near + 1] - pos).abs() <= (x[near] - pos).abs() {
            near += 1;
        }
        let f = dissolution_rate(chem, alpha[near], cs[k]);
        let p = section.perimeter(alpha[near], beta[near]);
        let dx = q * chem.dc / (f * p);
        if !dx.is_finite() || pos + dx <= pos {
            break;
        }
        pos += dx;
        k += 1;
        xs.push(pos.min(length));
        cs.push(c_at(k));
    }

    if pos < length {
        ReferenceGrid {
            x: x.to_vec(),
            c: (0..n).map(c_at).collect(),
            fell_back: true,
        }
    } else {
        ReferenceGrid {
            x: xs,
            c: cs,
            fell_back: false,
        }
    }
}

/// dc stepper; optionally re-initialises a fresh channel on a spline-refined
/// version of its first reference grid.
#[derive(Debug, Clone)]
pub struct FixedConcentrationStepper {
    chem: Chemistry,
    section: CrossSection,
    refine_grid: bool,
}

impl FixedConcentrationStepper {
    pub fn new(chem: Chemistry, section: CrossSection) -> Self {
        Self {
            chem,
            section,
            refine_grid: false,
        }
    }

    pub fn with_refined_grid(mut self, refine: bool) -> Self {
        self.refine_grid = refine;
        self
    }

    pub fn refines_grid(&self) -> bool {
        self.refine_grid
    }
}

impl ChannelStepper for FixedConcentrationStepper {
    fn name(&self) -> &str {
        if self.refine_grid {
            "fixed-concentration-refined"
        } else {
            "fixed-concentration"
        }
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
        let beta = state.beta();

        let (c, fell_back) = if q > EPSILON_FLOW {
            let reference = reference_grid(chem, self.section, x, alpha, beta, inputs.c_in, q);
            if reference.fell_back {
                debug!(
                    points = x.len(),
                    "concentration march did not reach the outlet, using channel grid"
                );
            }
            (interp_onto(x, &reference.x, &reference.c), reference.fell_back)
        } else {
            let mut c = vec![chem.c_ceiling(); x.len()];
            c[0] = chem.clamp_concentration(inputs.c_in);
            (c, false)
        };
        let f = rate_profile(chem, alpha, &c);

        let (alpha_next, beta_next) = widen(chem, alpha, beta, &f, inputs.dt);
        state.push_step(c, f, q, alpha_next, beta_next);
        Ok(StepOutcome {
            q,
            reference_fallback: fell_back,
        })
    }

    fn prepare(&self, state: &mut ChannelState, inputs: StepInputs) -> ChannelResult<()> {
        if !self.refine_grid || state.steps() > 0 {
            return Ok(());
        }
        inputs.validate()?;
        let q = flow_rate(inputs.resistance, inputs.hgrad, inputs.length);
        if !(q > EPSILON_FLOW) || !q.is_finite() {
            return Ok(());
        }
        let reference = reference_grid(
            &self.chem,
            self.section,
            state.x(),
            state.alpha(),
            state.beta(),
            inputs.c_in,
            q,
        );
        if reference.fell_back {
            debug!("first reference grid fell back, keeping channel grid");
            return Ok(());
        }
        let refined = refine_reference_grid(&reference.x, state.length(), REFINE_FACTOR)?;
        debug!(
            from = state.x().len(),
            to = refined.len(),
            "re-initialising channel on refined grid"
        );
        state.resample(refined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chem() -> Chemistry {
        Chemistry::default()
    }

    #[test]
    fn march_reaches_outlet_with_dc_steps() {
        let chem = chem();
        let x: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();
        let alpha = vec![0.02; 11];
        let beta = vec![1.0; 11];
        // flow small enough to need a handful of increments
        let f0 = dissolution_rate(&chem, 0.02, 0.0);
        let p = CrossSection::Rectangular.perimeter(0.02, 1.0);
        let q = 0.3 * f0 * p / chem.dc;
        let reference = reference_grid(&chem, CrossSection::Rectangular, &x, &alpha, &beta, 0.0, q);
        assert!(!reference.fell_back);
        assert_eq!(reference.x[0], 0.0);
        assert_eq!(*reference.x.last().unwrap(), 1.0);
        assert!(reference.x.windows(2).all(|w| w[1] > w[0]));
        assert!((reference.c[1] - chem.dc).abs() < 1e-20);
    }

    #[test]
    fn march_falls_back_when_flow_is_tiny() {
        let chem = chem();
        let x = vec![0.0, 0.5, 1.0];
        let reference = reference_grid(
            &chem,
            CrossSection::Rectangular,
            &x,
            &[0.02; 3],
            &[1.0; 3],
            0.0,
            1e-30,
        );
        assert!(reference.fell_back);
        assert_eq!(reference.x, x);
        assert_eq!(reference.c.len(), 3);
    }

    #[test]
    fn stagnant_channel_saturates() {
        let chem = chem();
        let stepper = FixedConcentrationStepper::new(chem.clone(), CrossSection::Rectangular);
        let mut state = ChannelState::uniform(vec![0.0, 0.5, 1.0], 0.02, 1.0).unwrap();
        let inputs = StepInputs {
            c_in: 0.0,
            resistance: 1.0,
            hgrad: 0.0,
            length: 1.0,
            dt: 1.0,
        };
        let outcome = stepper.step(&mut state, inputs).unwrap();
        assert_eq!(outcome.q, 0.0);
        let c = state.concentration(0).unwrap();
        assert_eq!(c[0], 0.0);
        assert_eq!(c[1], chem.c_ceiling());
        assert_eq!(c[2], chem.c_ceiling());
    }

    #[test]
    fn prepare_refines_only_fresh_channels() {
        let chem = chem();
        let stepper =
            FixedConcentrationStepper::new(chem.clone(), CrossSection::Rectangular).with_refined_grid(true);
        assert!(stepper.refines_grid());
        let x: Vec<f64> = (0..=20).map(|i| i as f64 * 0.05).collect();
        let mut state = ChannelState::uniform(x, 0.02, 1.0).unwrap();
        let r = stepper.resistance(&state).unwrap();
        let f0 = dissolution_rate(&chem, 0.02, 0.0);
        let p = CrossSection::Rectangular.perimeter(0.02, 1.0);
        // pick the head gradient so the march needs about five increments
        let hgrad = 0.2 * f0 * p / chem.dc * r;
        let inputs = StepInputs {
            c_in: 0.0,
            resistance: r,
            hgrad,
            length: 1.0,
            dt: 1.0,
        };
        stepper.prepare(&mut state, inputs).unwrap();
        let refined = state.x().len();
        assert!(refined > 21);
        assert_eq!(state.length(), 1.0);

        stepper.step(&mut state, inputs).unwrap();
        stepper.prepare(&mut state, inputs).unwrap();
        assert_eq!(state.x().len(), refined);
    }
}
