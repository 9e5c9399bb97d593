//! Cross-section hydraulics of a channel.

use crate::error::{ChannelError, ChannelResult};
use crate::params::Chemistry;
use fd_core::numeric::trapezoid;

/// Cross-section model used for perimeter and resistance.
///
/// Channels are rectangular slots of half aperture `alpha` and half width
/// `beta`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrossSection {
    #[default]
    Rectangular,
}

impl CrossSection {
    /// Wetted perimeter `2 alpha + 2 beta`.
    pub fn perimeter(self, alpha: f64, beta: f64) -> f64 {
        match self {
            CrossSection::Rectangular => 2.0 * alpha + 2.0 * beta,
        }
    }

    pub fn perimeter_profile(self, alpha: &[f64], beta: &[f64]) -> Vec<f64> {
        alpha
            .iter()
            .zip(beta)
            .map(|(&a, &b)| self.perimeter(a, b))
            .collect()
    }

    /// Finite-width correction `1 - 0.6 alpha / beta`.
    pub fn shape_factor(self, alpha: f64, beta: f64) -> f64 {
        match self {
            CrossSection::Rectangular => 1.0 - 0.6 * alpha / beta,
        }
    }

    /// Hydraulic resistance `12 eta / (g rho) * integral(1 / (beta M alpha^3) dx)`.
    pub fn resistance(
        self,
        chem: &Chemistry,
        alpha: &[f64],
        beta: &[f64],
        x: &[f64],
    ) -> ChannelResult<f64> {
        if alpha.len() != x.len() || beta.len() != x.len() {
            return Err(ChannelError::Shape {
                what: "resistance profile",
                expected: x.len(),
                actual: alpha.len().min(beta.len()),
            });
        }
        let mut integrand = Vec::with_capacity(x.len());
        for (&a, &b) in alpha.iter().zip(beta) {
            if !(a > 0.0) || !(b > 0.0) {
                return Err(ChannelError::NonPhysical {
                    what: "aperture and width must be positive",
                });
            }
            let m = self.shape_factor(a, b);
            if !(m > 0.0) {
                return Err(ChannelError::NonPhysical {
                    what: "aperture too large for channel width",
                });
            }
            integrand.push(1.0 / (b * m * a.powi(3)));
        }
        let r = chem.resistance_prefactor() * trapezoid(&integrand, x)?;
        if !r.is_finite() || r <= 0.0 {
            return Err(ChannelError::NonPhysical {
                what: "hydraulic resistance",
            });
        }
        Ok(r)
    }
}

/// Volumetric flow `Hgrad L / R`.
pub fn flow_rate(resistance: f64, hgrad: f64, length: f64) -> f64 {
    hgrad * length / resistance
}
