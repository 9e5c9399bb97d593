use crate::FdError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FdError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FdError::NonFinite { what, value: v })
    }
}

/// Integrate `y(x)` with the composite trapezoid rule.
///
/// `x` and `y` must have the same length; fewer than two samples integrate to zero.
pub fn trapezoid(y: &[Real], x: &[Real]) -> Result<Real, FdError> {
    if x.len() != y.len() {
        return Err(FdError::InvalidArg {
            what: "trapezoid: x and y lengths differ",
        });
    }
    let sum = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum();
    Ok(sum)
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be increasing. Values outside `[xp[0], xp[last]]` take the end values.
pub fn interp(x: Real, xp: &[Real], fp: &[Real]) -> Real {
    debug_assert_eq!(xp.len(), fp.len());
    let n = xp.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // first index with xp[i] > x; 1 <= i <= n-1 here
    let i = xp.partition_point(|&v| v <= x);
    let (x0, x1) = (xp[i - 1], xp[i]);
    let (f0, f1) = (fp[i - 1], fp[i]);
    if x1 == x0 {
        return f1;
    }
    f0 + (f1 - f0) * (x - x0) / (x1 - x0)
}

/// Resample `(xp, fp)` onto every point of `x`.
///
/// Walks both grids once, so `x` must be increasing as well.
pub fn interp_onto(x: &[Real], xp: &[Real], fp: &[Real]) -> Vec<Real> {
    let n = xp.len();
    if n == 0 {
        return vec![0.0; x.len()];
    }
    let mut out = Vec::with_capacity(x.len());
    let mut i = 1;
    for &xv in x {
        if xv <= xp[0] {
            out.push(fp[0]);
            continue;
        }
        if xv >= xp[n - 1] {
            out.push(fp[n - 1]);
            continue;
        }
        while i < n - 1 && xp[i] <= xv {
            i += 1;
        }
        let (x0, x1) = (xp[i - 1], xp[i]);
        let (f0, f1) = (fp[i - 1], fp[i]);
        out.push(if x1 == x0 {
            f1
        } else {
            f0 + (f1 - f0) * (xv - x0) / (x1 - x0)
        });
    }
    out
}

/// Uniform grid `0, dx, 2dx, ...` below `length`, closed with `length` itself.
pub fn uniform_grid(length: Real, dx: Real) -> Result<Vec<Real>, FdError> {
    if !(length > 0.0) || !length.is_finite() {
        return Err(FdError::InvalidArg {
            what: "grid length must be positive and finite",
        });
    }
    if !(dx > 0.0) || !dx.is_finite() {
        return Err(FdError::InvalidArg {
            what: "grid spacing must be positive and finite",
        });
    }
    let count = (length / dx).ceil() as usize;
    let mut x: Vec<Real> = (0..count)
        .map(|i| i as Real * dx)
        .take_while(|&v| v < length)
        .collect();
    x.push(length);
    Ok(x)
}
