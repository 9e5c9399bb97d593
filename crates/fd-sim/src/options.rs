//! Run options.

use fd_channel::{
    ChannelStepper, Chemistry, CrossSection, FixedConcentrationStepper, FixedSpaceStepper,
};
use fd_core::numeric::uniform_grid;
use fd_core::units::{Time, as_years, years};
use fd_solver::{HydraulicSolver, OrderingPolicy};

use crate::error::{SimError, SimResult};

/// Channel discretization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Discretization {
    /// March in space over the channel grid.
    FixedSpace,
    /// March in fixed concentration increments.
    #[default]
    FixedConcentration,
    /// As `FixedConcentration`, on a spline-refined grid built at the first step.
    RefinedConcentration,
}

/// When remeshing events fire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemeshSchedule {
    pub start: Time,
    pub interval: Time,
}

impl Default for RemeshSchedule {
    fn default() -> Self {
        Self {
            start: years(30.0),
            interval: years(1000.0),
        }
    }
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Simulated time span
    pub duration: Time,
    /// Fixed time step
    pub dt: Time,
    pub chemistry: Chemistry,
    pub cross_section: CrossSection,
    pub discretization: Discretization,
    /// Head imposed on the source nodes
    pub source_head: f64,
    /// Head imposed on the target nodes
    pub target_head: f64,
    pub ordering: OrderingPolicy,
    /// Remove redundant edges sharing a fracture before the first step
    pub preprocess: bool,
    pub remesh: Option<RemeshSchedule>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            duration: years(10.0),
            dt: years(1.0),
            chemistry: Chemistry::default(),
            cross_section: CrossSection::default(),
            discretization: Discretization::default(),
            source_head: 1000.0,
            target_head: 0.0,
            ordering: OrderingPolicy::default(),
            preprocess: true,
            remesh: None,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        let (duration, dt) = (as_years(self.duration), as_years(self.dt));
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(duration > 0.0) || !duration.is_finite() {
            return Err(SimError::InvalidArg {
                what: "duration must be positive",
            });
        }
        if !self.source_head.is_finite() || !self.target_head.is_finite() {
            return Err(SimError::InvalidArg {
                what: "boundary heads must be finite",
            });
        }
        if let Some(schedule) = &self.remesh {
            let interval = as_years(schedule.interval);
            if !(interval > 0.0) || !interval.is_finite() || !as_years(schedule.start).is_finite() {
                return Err(SimError::InvalidArg {
                    what: "remesh interval must be positive",
                });
            }
        }
        self.chemistry.validate()?;
        Ok(())
    }

    /// Time axis in years: `0, dt, 2dt, ...` below the duration, closed with
    /// the duration itself. One step runs between consecutive entries.
    pub fn time_axis(&self) -> SimResult<Vec<f64>> {
        let dt = as_years(self.dt);
        let mut t = uniform_grid(as_years(self.duration), dt)?;
        // unit round-off can leave a sliver step just before the end
        let n = t.len();
        if n > 2 && t[n - 1] - t[n - 2] < 1e-9 * dt {
            t.remove(n - 2);
        }
        Ok(t)
    }

    pub fn stepper(&self) -> Box<dyn ChannelStepper> {
        let chem = self.chemistry.clone();
        match self.discretization {
            Discretization::FixedSpace => Box::new(FixedSpaceStepper::new(chem, self.cross_section)),
            Discretization::FixedConcentration => {
                Box::new(FixedConcentrationStepper::new(chem, self.cross_section))
            }
            Discretization::RefinedConcentration => Box::new(
                FixedConcentrationStepper::new(chem, self.cross_section).with_refined_grid(true),
            ),
        }
    }

    pub fn head_solver(&self) -> HydraulicSolver {
        HydraulicSolver::new(self.source_head, self.target_head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = SimOptions::default();
        opts.validate().unwrap();
        assert_eq!(opts.discretization, Discretization::FixedConcentration);
        assert_eq!(opts.ordering, OrderingPolicy::Strict);
        let schedule = RemeshSchedule::default();
        assert!((as_years(schedule.start) - 30.0).abs() < 1e-9);
        assert!((as_years(schedule.interval) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn time_axis_closes_on_duration() {
        let opts = SimOptions {
            duration: years(2.5),
            dt: years(1.0),
            ..SimOptions::default()
        };
        let t = opts.time_axis().unwrap();
        assert_eq!(t.len(), 4);
        assert!((t[3] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_dt() {
        let opts = SimOptions {
            dt: years(0.0),
            ..SimOptions::default()
        };
        assert!(matches!(opts.validate(), Err(SimError::InvalidArg { .. })));
    }

    #[test]
    fn stepper_follows_discretization() {
        let opts = SimOptions {
            discretization: Discretization::RefinedConcentration,
            ..SimOptions::default()
        };
        assert_eq!(opts.stepper().name(), "fixed-concentration-refined");
    }
}
