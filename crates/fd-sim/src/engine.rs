//! Network dissolution engine.

use fd_channel::{ChannelGrid, ChannelState, ChannelStepper, Chemistry, StepInputs};
use fd_core::EdgeId;
use fd_core::numeric::uniform_grid;
use fd_core::timing::{Timer, step_timing};
use fd_graph::{FractureGraph, IndexMap};
use fd_solver::{FlowField, HydraulicSolver, SolverError, causal_order};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::options::SimOptions;
use crate::preprocess::remove_redundant_edges;
use crate::remesh::{GeometrySample, Remesher, reattach_boundary};

/// Everything that lives as long as one topology.
#[derive(Debug, Clone)]
pub struct NetworkState {
    pub graph: FractureGraph,
    pub index: IndexMap,
    /// Channel of every edge, in `IndexMap` edge order.
    pub channels: Vec<ChannelState>,
    /// `true` while a channel's `x = 0` sits at the edge tail.
    pub channel_forward: Vec<bool>,
    /// Head series of every node, in `IndexMap` node order.
    pub heads: Vec<Vec<f64>>,
    /// Global index of the first step run on this topology.
    pub epoch_start: usize,
}

impl NetworkState {
    /// Fresh channels on a uniform `chem.dx` grid for every edge.
    pub fn initialise(graph: FractureGraph, chem: &Chemistry, epoch_start: usize) -> SimResult<Self> {
        let index = IndexMap::from_graph(&graph);
        let mut channels = Vec::with_capacity(graph.edges().len());
        for edge in graph.edges() {
            let x = uniform_grid(edge.length, chem.dx)?;
            channels.push(ChannelState::from_initial_aperture(x, &edge.aperture)?);
        }
        let n_edges = channels.len();
        let n_nodes = index.node_count();
        Ok(Self {
            graph,
            index,
            channels,
            channel_forward: vec![true; n_edges],
            heads: vec![Vec::new(); n_nodes],
            epoch_start,
        })
    }

    /// Steps run on this topology.
    pub fn steps(&self) -> usize {
        self.heads.first().map(Vec::len).unwrap_or(0)
    }

    pub fn channel(&self, edge: EdgeId) -> SimResult<&ChannelState> {
        Ok(&self.channels[self.index.edge_idx(edge)?])
    }

    /// Dense view of one channel; `t` is the full time axis of the run.
    pub fn channel_grid(&self, edge: EdgeId, t: &[f64]) -> SimResult<ChannelGrid> {
        let end = self.epoch_start + self.steps();
        let axis = t.get(self.epoch_start..=end).ok_or(SimError::InvalidArg {
            what: "time axis shorter than the epoch",
        })?;
        Ok(ChannelGrid::from_state(self.channel(edge)?, axis.to_vec())?)
    }

    /// Per-edge `(conductance, resistance)` of the current profiles.
    pub fn conductances(&self, stepper: &dyn ChannelStepper) -> SimResult<(Vec<f64>, Vec<f64>)> {
        let timer = Timer::start("conductance");
        let resistance: Vec<f64> = self
            .graph
            .par_edges()
            .map(|edge| -> SimResult<f64> {
                let e = self.index.edge_idx(edge.id)?;
                Ok(stepper.resistance(&self.channels[e])?)
            })
            .collect::<SimResult<_>>()?;
        let conductance = resistance.iter().map(|r| 1.0 / r).collect();
        timer.stop_into(&step_timing::CONDUCTANCE);
        Ok((conductance, resistance))
    }

    /// Inlet concentration of edge `e`: its share of the outflow of its
    /// upstream node times the summed outlet concentration of the edges
    /// entering that node.
    fn inlet_concentration(&self, flow: &FlowField, e: usize, chem: &Chemistry) -> SimResult<f64> {
        let up = self.index.node_idx(flow.get(e).upstream)?;
        let feeders = flow.in_edges(up);
        if feeders.is_empty() {
            return Ok(chem.init_c);
        }
        let mut total_c = 0.0;
        for &feeder in feeders {
            let fi = self.index.edge_idx(feeder)?;
            total_c += self.channels[fi].outlet_concentration().unwrap_or(chem.init_c);
        }
        let total_q = flow.total_out_flow(&self.index, up)?;
        let share = if total_q > 0.0 {
            flow.get(e).q / total_q
        } else {
            1.0 / flow.out_edges(up).len() as f64
        };
        Ok(share * total_c)
    }
}

/// Transient per-step data.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: usize,
    /// Topology the step ran on (0 before the first remeshing).
    pub epoch: usize,
    /// Time in years at the start of the step.
    pub t: f64,
    pub flow: FlowField,
    pub order: Vec<EdgeId>,
    /// Channels whose concentration march fell back to the channel grid.
    pub fallbacks: usize,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct NetworkRun {
    /// Time axis in years.
    pub t: Vec<f64>,
    /// One state per topology, in order; the last one is the final state.
    pub history: Vec<NetworkState>,
    pub records: Vec<StepRecord>,
}

impl NetworkRun {
    pub fn final_state(&self) -> Option<&NetworkState> {
        self.history.last()
    }

    pub fn epochs(&self) -> usize {
        self.history.len()
    }
}

/// Couples the head solve, edge ordering and channel steppers over time.
pub struct NetworkEngine {
    options: SimOptions,
    stepper: Box<dyn ChannelStepper>,
    solver: HydraulicSolver,
    remesher: Option<Box<dyn Remesher>>,
    t: Vec<f64>,
    state: NetworkState,
    history: Vec<NetworkState>,
    records: Vec<StepRecord>,
    next_remesh: Option<f64>,
    step: usize,
}

impl NetworkEngine {
    /// Validate the options, preprocess the graph if requested and set up the
    /// initial channels.
    pub fn new(graph: FractureGraph, options: SimOptions) -> SimResult<Self> {
        options.validate()?;
        let t = options.time_axis()?;
        let stepper = options.stepper();
        let solver = options.head_solver();
        let chem = &options.chemistry;

        let mut state = NetworkState::initialise(graph, chem, 0)?;
        if options.preprocess {
            let (conductance, _) = state.conductances(stepper.as_ref())?;
            let heads = solver.solve(&state.graph, &state.index, &conductance)?;
            let flow = FlowField::from_heads(&state.graph, &state.index, &heads, &conductance, None)?;
            let (reduced, removed) = remove_redundant_edges(&state.graph, &flow)?;
            if removed > 0 {
                state = NetworkState::initialise(reduced, chem, 0)?;
            }
        }

        let next_remesh = options
            .remesh
            .map(|schedule| fd_core::units::as_years(schedule.start));
        Ok(Self {
            options,
            stepper,
            solver,
            remesher: None,
            t,
            state,
            history: Vec::new(),
            records: Vec::new(),
            next_remesh,
            step: 0,
        })
    }

    pub fn with_remesher(mut self, remesher: Box<dyn Remesher>) -> Self {
        self.remesher = Some(remesher);
        self
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn history(&self) -> &[NetworkState] {
        &self.history
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn time(&self) -> &[f64] {
        &self.t
    }

    pub fn total_steps(&self) -> usize {
        self.t.len().saturating_sub(1)
    }

    /// Run one step. Returns `false` once the time axis is exhausted.
    pub fn advance(&mut self) -> SimResult<bool> {
        let j = self.step;
        if j + 1 >= self.t.len() {
            return Ok(false);
        }
        let (t_j, dt) = (self.t[j], self.t[j + 1] - self.t[j]);

        if let (Some(next), Some(schedule)) = (self.next_remesh, self.options.remesh) {
            if t_j >= next {
                self.remesh(j)?;
                let interval = fd_core::units::as_years(schedule.interval);
                let mut following = next + interval;
                while following <= t_j {
                    following += interval;
                }
                self.next_remesh = Some(following);
            }
        }

        let (conductance, resistance) = self.state.conductances(self.stepper.as_ref())?;
        let heads = self
            .solver
            .solve(&self.state.graph, &self.state.index, &conductance)?;
        for (series, &h) in self.state.heads.iter_mut().zip(&heads.head) {
            series.push(h);
        }

        let epoch = self.history.len();
        let previous = self
            .records
            .last()
            .filter(|r| r.epoch == epoch)
            .map(|r| &r.flow);
        let flow = FlowField::from_heads(
            &self.state.graph,
            &self.state.index,
            &heads,
            &conductance,
            previous,
        )?;
        let order = causal_order(&self.state.graph, &self.state.index, &flow, self.options.ordering)
            .map_err(|e| match e {
                SolverError::OrderingDeadlock { unresolved } => SimError::OrderingDeadlock {
                    step: j,
                    unresolved,
                },
                other => other.into(),
            })?;

        let timer = Timer::start("channel_step");
        let chem = &self.options.chemistry;
        let mut fallbacks = 0;
        for &edge_id in &order {
            let e = self.state.index.edge_idx(edge_id)?;
            let edge_flow = *flow.get(e);
            if self.state.channel_forward[e] != edge_flow.forward {
                self.state.channels[e].reverse();
                self.state.channel_forward[e] = edge_flow.forward;
            }
            let c_in = self.state.inlet_concentration(&flow, e, chem)?;
            let length = self.state.graph.edges()[e].length;
            let inputs = StepInputs {
                c_in,
                resistance: resistance[e],
                hgrad: edge_flow.hgrad,
                length,
                dt,
            };
            let channel = &mut self.state.channels[e];
            if channel.steps() == 0 {
                self.stepper.prepare(channel, inputs)?;
            }
            if self.stepper.step(channel, inputs)?.reference_fallback {
                fallbacks += 1;
            }
        }
        timer.stop_into(&step_timing::CHANNEL_STEP);

        debug!(step = j, t = t_j, fallbacks, "network step");
        let total = self.total_steps();
        let every = ((total as f64 / 10.0).round() as usize).max(1);
        if (j + 1) % every == 0 {
            info!(
                step = j + 1,
                of = total,
                percent = 100 * (j + 1) / total,
                "network progress"
            );
        }

        self.records.push(StepRecord {
            step: j,
            epoch,
            t: t_j,
            flow,
            order,
            fallbacks,
        });
        self.step += 1;
        Ok(true)
    }

    /// Run to the end of the time axis.
    pub fn run(mut self) -> SimResult<NetworkRun> {
        if self.options.remesh.is_some() && self.remesher.is_none() {
            return Err(SimError::InvalidArg {
                what: "remeshing scheduled without a remesher",
            });
        }
        info!(
            steps = self.total_steps(),
            nodes = self.state.graph.nodes().len(),
            edges = self.state.graph.edges().len(),
            stepper = self.stepper.name(),
            "starting network run"
        );
        step_timing::reset_all();
        while self.advance()? {}
        step_timing::log_summary();

        let NetworkEngine {
            t,
            mut history,
            records,
            state,
            ..
        } = self;
        history.push(state);
        info!(epochs = history.len(), "network run finished");
        Ok(NetworkRun { t, history, records })
    }

    fn remesh(&mut self, j: usize) -> SimResult<()> {
        let remesher = self.remesher.as_mut().ok_or(SimError::InvalidArg {
            what: "remeshing scheduled without a remesher",
        })?;
        let timer = Timer::start("remesh");
        let sample = GeometrySample::from_state(&self.state, j, self.t[j])?;
        let simplified = remesher
            .simplify(&sample)
            .map_err(|message| SimError::Remesh { message })?;
        let graph = reattach_boundary(&self.state.graph, &simplified, self.options.chemistry.dx)?;
        let next = NetworkState::initialise(graph, &self.options.chemistry, j)?;
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push(previous);
        timer.stop_into(&step_timing::REMESH);
        info!(
            step = j,
            t = self.t[j],
            nodes = self.state.graph.nodes().len(),
            edges = self.state.graph.edges().len(),
            epoch = self.history.len(),
            "remeshed network"
        );
        Ok(())
    }
}
