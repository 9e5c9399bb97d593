//! Per-channel time series.

use fd_core::numeric::interp_onto;
use fd_graph::InitialAperture;

use crate::error::{ChannelError, ChannelResult};

/// Evolving state of one channel.
///
/// `alpha` and `beta` hold one more profile than `c` and `f`: profile `j` is
/// the geometry step `j` started from, and the last one is the geometry the
/// next step will start from. Series only ever grow.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelState {
    x: Vec<f64>,
    alpha: Vec<Vec<f64>>,
    beta: Vec<Vec<f64>>,
    c: Vec<Vec<f64>>,
    f: Vec<Vec<f64>>,
    q: Vec<f64>,
}

fn check_grid(x: &[f64]) -> ChannelResult<()> {
    if x.len() < 2 {
        return Err(ChannelError::InvalidArg {
            what: "channel grid needs at least two points",
        });
    }
    if x[0] != 0.0 {
        return Err(ChannelError::InvalidArg {
            what: "channel grid must start at zero",
        });
    }
    if x.iter().any(|v| !v.is_finite()) || x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ChannelError::InvalidArg {
            what: "channel grid must be finite and strictly increasing",
        });
    }
    Ok(())
}

fn check_profile(profile: &[f64], len: usize, what: &'static str) -> ChannelResult<()> {
    if profile.len() != len {
        return Err(ChannelError::Shape {
            what,
            expected: len,
            actual: profile.len(),
        });
    }
    if profile.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(ChannelError::NonPhysical { what });
    }
    Ok(())
}

/// Endpoint rule for tapered channels: a channel narrowing from tail to head
/// is interpolated linearly, anything else keeps the tail value.
fn taper(x: &[f64], start: f64, end: f64) -> Vec<f64> {
    let length = x[x.len() - 1];
    if start > end {
        x.iter()
            .map(|&xi| start + (end - start) * xi / length)
            .collect()
    } else {
        vec![start; x.len()]
    }
}

impl ChannelState {
    /// Fresh channel with the given initial profiles.
    pub fn new(x: Vec<f64>, alpha0: Vec<f64>, beta0: Vec<f64>) -> ChannelResult<Self> {
        check_grid(&x)?;
        check_profile(&alpha0, x.len(), "initial aperture")?;
        check_profile(&beta0, x.len(), "initial width")?;
        Ok(Self {
            x,
            alpha: vec![alpha0],
            beta: vec![beta0],
            c: Vec::new(),
            f: Vec::new(),
            q: Vec::new(),
        })
    }

    pub fn uniform(x: Vec<f64>, alpha: f64, beta: f64) -> ChannelResult<Self> {
        let n = x.len();
        Self::new(x, vec![alpha; n], vec![beta; n])
    }

    pub fn from_initial_aperture(x: Vec<f64>, aperture: &InitialAperture) -> ChannelResult<Self> {
        check_grid(&x)?;
        let (alpha0, beta0) = match *aperture {
            InitialAperture::Uniform { alpha, beta } => (vec![alpha; x.len()], vec![beta; x.len()]),
            InitialAperture::Tapered { alpha, beta } => {
                (taper(&x, alpha[0], alpha[1]), taper(&x, beta[0], beta[1]))
            }
        };
        Self::new(x, alpha0, beta0)
    }

    /// Rebuild from complete series, validating their shapes.
    pub(crate) fn from_parts(
        x: Vec<f64>,
        alpha: Vec<Vec<f64>>,
        beta: Vec<Vec<f64>>,
        c: Vec<Vec<f64>>,
        f: Vec<Vec<f64>>,
        q: Vec<f64>,
    ) -> ChannelResult<Self> {
        check_grid(&x)?;
        let steps = q.len();
        let counts = [
            (alpha.len(), steps + 1, "aperture series"),
            (beta.len(), steps + 1, "width series"),
            (c.len(), steps, "concentration series"),
            (f.len(), steps, "rate series"),
        ];
        for (actual, expected, what) in counts {
            if actual != expected {
                return Err(ChannelError::Shape {
                    what,
                    expected,
                    actual,
                });
            }
        }
        for profile in alpha.iter().chain(&beta).chain(&c).chain(&f) {
            if profile.len() != x.len() {
                return Err(ChannelError::Shape {
                    what: "profile length",
                    expected: x.len(),
                    actual: profile.len(),
                });
            }
        }
        Ok(Self {
            x,
            alpha,
            beta,
            c,
            f,
            q,
        })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn length(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Number of completed steps.
    pub fn steps(&self) -> usize {
        self.q.len()
    }

    /// Current aperture profile.
    pub fn alpha(&self) -> &[f64] {
        &self.alpha[self.alpha.len() - 1]
    }

    /// Current width profile.
    pub fn beta(&self) -> &[f64] {
        &self.beta[self.beta.len() - 1]
    }

    pub fn alpha_series(&self) -> &[Vec<f64>] {
        &self.alpha
    }

    pub fn beta_series(&self) -> &[Vec<f64>] {
        &self.beta
    }

    pub fn c_series(&self) -> &[Vec<f64>] {
        &self.c
    }

    pub fn f_series(&self) -> &[Vec<f64>] {
        &self.f
    }

    pub fn q_series(&self) -> &[f64] {
        &self.q
    }

    /// Concentration profile of a completed step.
    pub fn concentration(&self, step: usize) -> Option<&[f64]> {
        self.c.get(step).map(Vec::as_slice)
    }

    /// Outlet concentration of the latest step, if any step has run.
    pub fn outlet_concentration(&self) -> Option<f64> {
        self.c.last().and_then(|c| c.last()).copied()
    }

    /// Append the results of one step.
    pub(crate) fn push_step(
        &mut self,
        c: Vec<f64>,
        f: Vec<f64>,
        q: f64,
        alpha_next: Vec<f64>,
        beta_next: Vec<f64>,
    ) {
        debug_assert!([c.len(), f.len(), alpha_next.len(), beta_next.len()]
            .iter()
            .all(|&n| n == self.x.len()));
        self.c.push(c);
        self.f.push(f);
        self.q.push(q);
        self.alpha.push(alpha_next);
        self.beta.push(beta_next);
    }

    /// Mirror the channel so that `x = 0` sits at the other end.
    ///
    /// Used when the flow through a channel reverses; every stored profile is
    /// reversed with the grid.
    pub fn reverse(&mut self) {
        let length = self.length();
        self.x = self.x.iter().rev().map(|&v| length - v).collect();
        // keep the end points exact
        self.x[0] = 0.0;
        let last = self.x.len() - 1;
        self.x[last] = length;
        for profile in self
            .alpha
            .iter_mut()
            .chain(self.beta.iter_mut())
            .chain(self.c.iter_mut())
            .chain(self.f.iter_mut())
        {
            profile.reverse();
        }
    }

    /// Linearly resample every stored profile onto a new grid.
    pub(crate) fn resample(&mut self, x: Vec<f64>) -> ChannelResult<()> {
        check_grid(&x)?;
        let onto = |series: &mut Vec<Vec<f64>>, old: &[f64]| {
            for profile in series.iter_mut() {
                *profile = interp_onto(&x, old, profile);
            }
        };
        let old = std::mem::take(&mut self.x);
        onto(&mut self.alpha, &old);
        onto(&mut self.beta, &old);
        onto(&mut self.c, &old);
        onto(&mut self.f, &old);
        self.x = x;
        Ok(())
    }
}
