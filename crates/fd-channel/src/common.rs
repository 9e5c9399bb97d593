//! Helpers shared by both steppers.

use crate::error::{ChannelError, ChannelResult};
use crate::params::Chemistry;
use fd_core::numeric::ensure_finite;

/// Flows at or below this (cm^3 per unit time) count as a stagnant channel.
pub const EPSILON_FLOW: f64 = 1e-300;

/// Ensure a value is finite, returning ChannelError if not.
pub fn check_finite(value: f64, what: &'static str) -> ChannelResult<()> {
    ensure_finite(value, what).map_err(|_| ChannelError::NonPhysical { what })?;
    Ok(())
}

/// Widen aperture and width by `2 gamma f dt` at every grid point.
pub fn widen(chem: &Chemistry, alpha: &[f64], beta: &[f64], f: &[f64], dt: f64) -> (Vec<f64>, Vec<f64>) {
    let inc: Vec<f64> = f.iter().map(|fi| 2.0 * chem.gamma * fi * dt).collect();
    let alpha_next = alpha.iter().zip(&inc).map(|(a, d)| a + d).collect();
    let beta_next = beta.iter().zip(&inc).map(|(b, d)| b + d).collect();
    (alpha_next, beta_next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_is_symmetric() {
        let chem = Chemistry::default();
        let (a, b) = widen(&chem, &[0.1, 0.2], &[1.0, 2.0], &[1e-12, 0.0], 10.0);
        let d = 2.0 * chem.gamma * 1e-12 * 10.0;
        assert!((a[0] - 0.1 - d).abs() < 1e-15);
        assert!((b[0] - 1.0 - d).abs() < 1e-15);
        assert_eq!(a[1], 0.2);
        assert_eq!(b[1], 2.0);
    }

    #[test]
    fn check_finite_rejects_inf() {
        assert!(check_finite(f64::INFINITY, "x").is_err());
        assert!(check_finite(1.0, "x").is_ok());
    }
}
