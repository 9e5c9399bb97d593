//! Regime-switched dissolution rate law.
//!
//! Below the switch concentration the rate is linear in undersaturation,
//! optionally corrected for diffusion across the boundary layer in wide
//! apertures. Above it the rate is the smaller of the diffusion-limited flux
//! and the high-order kinetic rate.

use crate::params::Chemistry;

/// Which branch of the rate law applies at a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateRegime {
    SubThresholdLinear,
    SubThresholdDiffusionCorrected,
    SuperThreshold,
}

impl RateRegime {
    pub fn classify(chem: &Chemistry, alpha: f64, c: f64) -> Self {
        if c >= chem.c_s {
            RateRegime::SuperThreshold
        } else if alpha > chem.alpha_threshold {
            RateRegime::SubThresholdDiffusionCorrected
        } else {
            RateRegime::SubThresholdLinear
        }
    }

    pub fn rate(self, chem: &Chemistry, c: f64) -> f64 {
        match self {
            RateRegime::SubThresholdLinear => linear_rate(chem, c),
            RateRegime::SubThresholdDiffusionCorrected => diffusion_corrected_rate(chem, c),
            RateRegime::SuperThreshold => super_threshold_rate(chem, c),
        }
    }
}

/// `kl (1 - c/c_eq)`
pub fn linear_rate(chem: &Chemistry, c: f64) -> f64 {
    chem.kl * (1.0 - c / chem.c_eq)
}

/// Linear rate reduced by the boundary-layer transport resistance.
pub fn diffusion_corrected_rate(chem: &Chemistry, c: f64) -> f64 {
    let correction = 1.0 + chem.kl * chem.boundary_length / (3.0 * chem.diffusion * chem.c_eq);
    (1.0 - c / chem.c_eq) * chem.kl / correction
}

/// `2 D (c_eq - c) / boundary_length`
pub fn diffusion_limited_rate(chem: &Chemistry, c: f64) -> f64 {
    2.0 * chem.diffusion * (chem.c_eq - c) / chem.boundary_length
}

/// `kn (1 - c/c_eq)^n`
pub fn nonlinear_rate(chem: &Chemistry, c: f64) -> f64 {
    chem.kn * (1.0 - c / chem.c_eq).powf(chem.n)
}

pub fn super_threshold_rate(chem: &Chemistry, c: f64) -> f64 {
    diffusion_limited_rate(chem, c).min(nonlinear_rate(chem, c))
}

/// Dissolution rate `f(alpha, c)`.
pub fn dissolution_rate(chem: &Chemistry, alpha: f64, c: f64) -> f64 {
    RateRegime::classify(chem, alpha, c).rate(chem, c)
}

/// Pointwise rate along a profile.
pub fn rate_profile(chem: &Chemistry, alpha: &[f64], c: &[f64]) -> Vec<f64> {
    alpha
        .iter()
        .zip(c)
        .map(|(&a, &ci)| dissolution_rate(chem, a, ci))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn regimes_are_classified() {
        let chem = Chemistry::default();
        assert_eq!(
            RateRegime::classify(&chem, 0.05, 0.0),
            RateRegime::SubThresholdLinear
        );
        assert_eq!(
            RateRegime::classify(&chem, 0.2, 0.0),
            RateRegime::SubThresholdDiffusionCorrected
        );
        assert_eq!(
            RateRegime::classify(&chem, 0.05, chem.c_s),
            RateRegime::SuperThreshold
        );
    }

    #[test]
    fn continuous_at_switch_concentration() {
        let chem = Chemistry::default();
        let below = linear_rate(&chem, chem.c_s);
        let above = super_threshold_rate(&chem, chem.c_s);
        assert!((below - 4e-12).abs() < 1e-20);
        assert!((above - 4e-12).abs() < 1e-20);

        // the boundary-layer correction only shifts the rate by ~2e-5 relative
        let corrected = diffusion_corrected_rate(&chem, chem.c_s);
        assert!(((corrected - above) / above).abs() < 1e-4);
    }

    #[test]
    fn zero_at_equilibrium() {
        let chem = Chemistry::default();
        assert_eq!(dissolution_rate(&chem, 0.05, chem.c_eq), 0.0);
    }

    #[test]
    fn profile_matches_pointwise() {
        let chem = Chemistry::default();
        let f = rate_profile(&chem, &[0.05, 0.2, 0.05], &[0.0, 0.0, 1.9e-6]);
        assert_eq!(f.len(), 3);
        assert_eq!(f[0], linear_rate(&chem, 0.0));
        assert_eq!(f[1], diffusion_corrected_rate(&chem, 0.0));
        assert_eq!(f[2], super_threshold_rate(&chem, 1.9e-6));
    }

    proptest! {
        #[test]
        fn rate_is_non_negative(alpha in 1e-4f64..1.0, frac in 0.0f64..1.0) {
            let chem = Chemistry::default();
            let c = frac * chem.c_ceiling();
            let f = dissolution_rate(&chem, alpha, c);
            prop_assert!(f > 0.0);
            prop_assert!(f <= chem.kl);
        }
    }
}
