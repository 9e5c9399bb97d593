//! Kinetic and fluid constants of the dissolving channel.

use crate::error::{ChannelError, ChannelResult};

/// Immutable chemistry and fluid parameters (cgs units).
///
/// Defaults describe calcite dissolution in water. Construct once and hand a
/// clone to every stepper; nothing mutates it during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Chemistry {
    /// Reaction order of the nonlinear regime.
    pub n: f64,
    /// Linear rate constant (mol/(cm^2 s)).
    pub kl: f64,
    /// Nonlinear rate constant (mol/(cm^2 s)).
    pub kn: f64,
    /// Switch concentration between the kinetic regimes (mol/cm^3).
    pub c_s: f64,
    /// Equilibrium concentration (mol/cm^3).
    pub c_eq: f64,
    /// Dynamic viscosity (g/(cm s)).
    pub eta: f64,
    /// Density (g/cm^3).
    pub rho: f64,
    /// Gravitational acceleration (cm/s^2).
    pub g: f64,
    /// Molar volume factor turning flux into wall retreat.
    pub gamma: f64,
    /// Diffusion coefficient (cm^2/s).
    pub diffusion: f64,
    /// Thickness of the diffusion boundary layer (cm).
    pub boundary_length: f64,
    /// Concentration increment of the fixed-concentration stepper.
    pub dc: f64,
    /// Grid spacing for fresh channels (cm).
    pub dx: f64,
    /// Inlet concentration for channels fed directly by a source.
    pub init_c: f64,
    /// Apertures above this use the diffusion-corrected linear rate.
    pub alpha_threshold: f64,
}

impl Default for Chemistry {
    fn default() -> Self {
        let c_s = 1.8e-6;
        Self {
            n: 4.0,
            kl: 4e-11,
            kn: 4e-8,
            c_s,
            c_eq: 2e-6,
            eta: 1.2e-2,
            rho: 1.0,
            g: 980.0,
            gamma: 1.7e9,
            diffusion: 1e-5,
            boundary_length: 3e-5,
            dc: c_s / 100.0,
            dx: 1e-3,
            init_c: 0.0,
            alpha_threshold: 0.1,
        }
    }
}

impl Chemistry {
    pub fn dc(&self) -> f64 {
        self.dc
    }

    /// Highest concentration a channel may carry.
    pub fn c_ceiling(&self) -> f64 {
        self.c_eq - self.dc
    }

    /// Clamp a concentration into `[0, c_eq - dc]`.
    pub fn clamp_concentration(&self, c: f64) -> f64 {
        if c >= self.c_eq {
            self.c_ceiling()
        } else {
            c.clamp(0.0, self.c_ceiling())
        }
    }

    /// `12 eta / (g rho)`, the factor in front of the resistance integral.
    pub fn resistance_prefactor(&self) -> f64 {
        12.0 * self.eta / (self.g * self.rho)
    }

    /// Reject parameter sets the rate law cannot work with.
    pub fn validate(&self) -> ChannelResult<()> {
        let positive = [
            (self.n, "n must be positive"),
            (self.kl, "kl must be positive"),
            (self.kn, "kn must be positive"),
            (self.c_s, "c_s must be positive"),
            (self.c_eq, "c_eq must be positive"),
            (self.eta, "eta must be positive"),
            (self.rho, "rho must be positive"),
            (self.g, "g must be positive"),
            (self.gamma, "gamma must be positive"),
            (self.diffusion, "diffusion coefficient must be positive"),
            (self.boundary_length, "boundary length must be positive"),
            (self.dc, "dc must be positive"),
            (self.dx, "dx must be positive"),
        ];
        for (value, what) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChannelError::InvalidArg { what });
            }
        }
        if self.c_s >= self.c_eq {
            return Err(ChannelError::InvalidArg {
                what: "c_s must be below c_eq",
            });
        }
        if self.dc >= self.c_eq {
            return Err(ChannelError::InvalidArg {
                what: "dc must be below c_eq",
            });
        }
        if !self.init_c.is_finite() || self.init_c < 0.0 || self.init_c >= self.c_eq {
            return Err(ChannelError::InvalidArg {
                what: "init_c must lie in [0, c_eq)",
            });
        }
        if !self.alpha_threshold.is_finite() {
            return Err(ChannelError::InvalidArg {
                what: "alpha threshold must be finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let chem = Chemistry::default();
        chem.validate().unwrap();
        assert!((chem.dc() - 1.8e-8).abs() < 1e-20);
        assert!((chem.c_ceiling() - (2e-6 - 1.8e-8)).abs() < 1e-20);
    }

    #[test]
    fn clamp_concentration_bounds() {
        let chem = Chemistry::default();
        assert_eq!(chem.clamp_concentration(-1.0), 0.0);
        assert_eq!(chem.clamp_concentration(1.0e-6), 1.0e-6);
        assert_eq!(chem.clamp_concentration(chem.c_eq), chem.c_ceiling());
        assert_eq!(chem.clamp_concentration(1.0), chem.c_ceiling());
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let chem = Chemistry {
            c_s: 3e-6,
            ..Chemistry::default()
        };
        assert!(chem.validate().is_err());
    }
}
