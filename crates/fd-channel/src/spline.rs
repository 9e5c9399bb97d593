//! Natural cubic spline over an index parameter, used to densify the
//! reference grid of the fixed-concentration stepper.

use crate::error::{ChannelError, ChannelResult};

/// Samples per reference point when refining a grid.
pub const REFINE_FACTOR: usize = 50;

/// Natural cubic spline through `(i, y[i])` for `i = 0..n`.
#[derive(Debug, Clone)]
pub struct IndexSpline {
    y: Vec<f64>,
    /// Second derivatives at the knots.
    m: Vec<f64>,
}

impl IndexSpline {
    pub fn new(y: &[f64]) -> ChannelResult<Self> {
        let n = y.len();
        if n < 2 {
            return Err(ChannelError::InvalidArg {
                what: "spline needs at least two knots",
            });
        }
        let mut m = vec![0.0; n];
        if n > 2 {
            // Thomas algorithm on the (1, 4, 1) system of the interior knots
            let k = n - 2;
            let mut c_prime = vec![0.0; k];
            let mut d_prime = vec![0.0; k];
            for i in 0..k {
                let d = 6.0 * (y[i + 2] - 2.0 * y[i + 1] + y[i]);
                let denom = if i == 0 { 4.0 } else { 4.0 - c_prime[i - 1] };
                c_prime[i] = 1.0 / denom;
                d_prime[i] = if i == 0 {
                    d / denom
                } else {
                    (d - d_prime[i - 1]) / denom
                };
            }
            m[k] = d_prime[k - 1];
            for i in (0..k - 1).rev() {
                m[i + 1] = d_prime[i] - c_prime[i] * m[i + 2];
            }
        }
        Ok(Self { y: y.to_vec(), m })
    }

    /// Evaluate at a fractional index, clamped to the knot range.
    pub fn eval(&self, s: f64) -> f64 {
        let last = self.y.len() - 1;
        let s = s.clamp(0.0, last as f64);
        let i = (s.floor() as usize).min(last - 1);
        let t = s - i as f64;
        let u = 1.0 - t;
        u * self.y[i]
            + t * self.y[i + 1]
            + ((u * u * u - u) * self.m[i] + (t * t * t - t) * self.m[i + 1]) / 6.0
    }
}

/// Densify reference positions `x_dc` by `factor` with a cubic spline.
///
/// Samples outside `(0, length)` are dropped, `0` and `length` are added, and
/// any sample that would break strict monotonicity is skipped.
pub fn refine_reference_grid(x_dc: &[f64], length: f64, factor: usize) -> ChannelResult<Vec<f64>> {
    if !(length > 0.0) || !length.is_finite() {
        return Err(ChannelError::InvalidArg {
            what: "channel length must be positive",
        });
    }
    if factor == 0 {
        return Err(ChannelError::InvalidArg {
            what: "refinement factor must be positive",
        });
    }
    let spline = IndexSpline::new(x_dc)?;
    let samples = factor * x_dc.len();
    let span = (x_dc.len() - 1) as f64;

    let mut out = Vec::with_capacity(samples + 2);
    out.push(0.0);
    for j in 0..samples {
        let s = if samples > 1 {
            span * j as f64 / (samples - 1) as f64
        } else {
            0.0
        };
        let v = spline.eval(s);
        if v > 0.0 && v < length && v > out[out.len() - 1] {
            out.push(v);
        }
    }
    out.push(length);
    Ok(out)
}
