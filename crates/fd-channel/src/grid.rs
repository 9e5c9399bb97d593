//! Dense space x time view of a channel.

use nalgebra::{DMatrix, DVector};

use crate::error::{ChannelError, ChannelResult};
use crate::state::ChannelState;

/// Matrix form of a [`ChannelState`].
///
/// Rows are grid points and columns are time steps. `alpha`/`beta` carry one
/// more column than `c`/`f`, matching the time axis `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelGrid {
    pub t: Vec<f64>,
    pub x: DVector<f64>,
    pub alpha: DMatrix<f64>,
    pub beta: DMatrix<f64>,
    pub c: DMatrix<f64>,
    pub f: DMatrix<f64>,
    pub q: DVector<f64>,
}

fn columns(series: &[Vec<f64>], rows: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows, series.len(), |i, j| series[j][i])
}

fn series(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.column_iter().map(|col| col.iter().copied().collect()).collect()
}

impl ChannelGrid {
    /// `t` holds the time of every aperture profile, so `steps + 1` entries.
    pub fn from_state(state: &ChannelState, t: Vec<f64>) -> ChannelResult<Self> {
        let profiles = state.alpha_series().len();
        if t.len() != profiles {
            return Err(ChannelError::Shape {
                what: "time axis",
                expected: profiles,
                actual: t.len(),
            });
        }
        let rows = state.x().len();
        Ok(Self {
            t,
            x: DVector::from_column_slice(state.x()),
            alpha: columns(state.alpha_series(), rows),
            beta: columns(state.beta_series(), rows),
            c: columns(state.c_series(), rows),
            f: columns(state.f_series(), rows),
            q: DVector::from_column_slice(state.q_series()),
        })
    }

    pub fn to_state(&self) -> ChannelResult<ChannelState> {
        ChannelState::from_parts(
            self.x.iter().copied().collect(),
            series(&self.alpha),
            series(&self.beta),
            series(&self.c),
            series(&self.f),
            self.q.iter().copied().collect(),
        )
    }

    pub fn steps(&self) -> usize {
        self.q.len()
    }
}
