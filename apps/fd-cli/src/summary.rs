//! JSON summaries of finished runs.

use fd_channel::{ChannelGrid, ChannelState};
use fd_sim::{NetworkRun, SimError, SimResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChannelSummary {
    pub project: String,
    pub stepper: String,
    pub steps: usize,
    pub t_end_years: f64,
    pub length_cm: f64,
    pub points: usize,
    pub inlet_alpha_initial: f64,
    pub inlet_alpha_final: f64,
    pub outlet_alpha_initial: f64,
    pub outlet_alpha_final: f64,
    pub outlet_concentration: Option<f64>,
    pub q_initial: Option<f64>,
    pub q_final: Option<f64>,
}

impl ChannelSummary {
    pub fn from_grid(project: &str, stepper: &str, grid: &ChannelGrid) -> Self {
        let rows = grid.x.len();
        let cols = grid.alpha.ncols();
        let last = rows.saturating_sub(1);
        let alpha = |i: usize, j: usize| if rows > 0 && cols > 0 { grid.alpha[(i, j)] } else { f64::NAN };
        let end = cols.saturating_sub(1);

        Self {
            project: project.to_string(),
            stepper: stepper.to_string(),
            steps: grid.steps(),
            t_end_years: grid.t.last().copied().unwrap_or(0.0),
            length_cm: grid.x.iter().last().copied().unwrap_or(0.0),
            points: rows,
            inlet_alpha_initial: alpha(0, 0),
            inlet_alpha_final: alpha(0, end),
            outlet_alpha_initial: alpha(last, 0),
            outlet_alpha_final: alpha(last, end),
            outlet_concentration: (grid.c.ncols() > 0 && rows > 0)
                .then(|| grid.c[(last, grid.c.ncols() - 1)]),
            q_initial: grid.q.iter().next().copied(),
            q_final: grid.q.iter().last().copied(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EdgeSummary {
    pub tail: String,
    pub head: String,
    pub length_cm: f64,
    /// Whether the last step flowed tail to head.
    pub forward: Option<bool>,
    pub q: Option<f64>,
    pub alpha_max_initial: f64,
    pub alpha_max_final: f64,
    pub outlet_concentration: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub head: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NetworkSummary {
    pub project: String,
    pub stepper: String,
    pub steps: usize,
    pub t_end_years: f64,
    pub epochs: usize,
    pub reference_fallbacks: usize,
    pub nodes: Vec<NodeSummary>,
    pub edges: Vec<EdgeSummary>,
}

fn max_of(profile: Option<&Vec<f64>>) -> f64 {
    profile
        .map(|p| p.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .unwrap_or(f64::NAN)
}

fn alpha_span(channel: &ChannelState) -> (f64, f64) {
    let series = channel.alpha_series();
    (max_of(series.first()), max_of(series.last()))
}

impl NetworkSummary {
    /// Summarise the final epoch of a run.
    pub fn from_run(project: &str, stepper: &str, run: &NetworkRun) -> SimResult<Self> {
        let state = run.final_state().ok_or(SimError::InvalidArg {
            what: "network run has no state",
        })?;
        let epoch = run.epochs().saturating_sub(1);
        let last_record = run.records.last().filter(|r| r.epoch == epoch);
        let heads = state.heads.last();

        let name_of = |id| {
            state
                .graph
                .node(id)
                .map(|n| n.name.clone())
                .unwrap_or_default()
        };

        let mut nodes = Vec::with_capacity(state.graph.nodes().len());
        for node in state.graph.nodes() {
            let i = state.index.node_idx(node.id)?;
            nodes.push(NodeSummary {
                name: node.name.clone(),
                head: heads.and_then(|h| h.get(i).copied()),
            });
        }

        let mut edges = Vec::with_capacity(state.graph.edges().len());
        for edge in state.graph.edges() {
            let e = state.index.edge_idx(edge.id)?;
            let channel = state.channel(edge.id)?;
            let (alpha_max_initial, alpha_max_final) = alpha_span(channel);
            let flow = last_record.map(|r| r.flow.get(e));
            edges.push(EdgeSummary {
                tail: name_of(edge.tail),
                head: name_of(edge.head),
                length_cm: edge.length,
                forward: flow.map(|f| f.forward),
                q: flow.map(|f| f.q),
                alpha_max_initial,
                alpha_max_final,
                outlet_concentration: channel.outlet_concentration(),
            });
        }

        Ok(Self {
            project: project.to_string(),
            stepper: stepper.to_string(),
            steps: run.records.len(),
            t_end_years: run.t.last().copied().unwrap_or(0.0),
            epochs: run.epochs(),
            reference_fallbacks: run.records.iter().map(|r| r.fallbacks).sum(),
            nodes,
            edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_channel::ChannelState;

    #[test]
    fn channel_summary_reads_grid_corners() {
        let state = ChannelState::uniform(vec![0.0, 0.5, 1.0], 0.02, 1.0).unwrap();
        let grid = ChannelGrid::from_state(&state, vec![0.0]).unwrap();
        let summary = ChannelSummary::from_grid("p", "fixed-space", &grid);

        assert_eq!(summary.points, 3);
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.length_cm, 1.0);
        assert_eq!(summary.inlet_alpha_initial, 0.02);
        assert_eq!(summary.outlet_alpha_final, 0.02);
        assert!(summary.outlet_concentration.is_none());
        assert!(summary.q_final.is_none());
    }

    #[test]
    fn alpha_span_of_fresh_channel() {
        let state = ChannelState::uniform(vec![0.0, 1.0], 0.03, 1.0).unwrap();
        assert_eq!(alpha_span(&state), (0.03, 0.03));
    }
}
