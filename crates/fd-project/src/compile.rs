//! Compile a validated project into simulation inputs.

use std::collections::HashMap;

use fd_channel::{Chemistry, CrossSection};
use fd_core::NodeId;
use fd_core::units::{cm, years};
use fd_graph::{FractureGraph, GraphBuilder, InitialAperture};
use fd_sim::{ChannelSetup, Discretization, RemeshSchedule, SimOptions};
use fd_solver::OrderingPolicy;

use crate::schema::{
    ApertureDef, ChemistryDef, CrossSectionDef, DiscretizationDef, NodeRole, OrderingDef, Project,
};
use crate::{ProjectError, ProjectResult};

/// A fracture network built from the project's network section.
#[derive(Debug, Clone)]
pub struct CompiledNetwork {
    pub graph: FractureGraph,
    /// Project node IDs to graph node IDs.
    pub node_ids: HashMap<String, NodeId>,
}

/// Run options with chemistry overrides applied.
pub fn compile_options(project: &Project) -> ProjectResult<SimOptions> {
    let run = &project.run;
    let chemistry = compile_chemistry(&project.chemistry)?;

    let options = SimOptions {
        duration: years(run.duration_years),
        dt: years(run.dt_years),
        chemistry,
        cross_section: match run.cross_section {
            CrossSectionDef::Rectangular => CrossSection::Rectangular,
        },
        discretization: match run.discretization {
            DiscretizationDef::Dx => Discretization::FixedSpace,
            DiscretizationDef::Dc => Discretization::FixedConcentration,
            DiscretizationDef::DcRefined => Discretization::RefinedConcentration,
        },
        source_head: run.source_head,
        target_head: run.target_head,
        ordering: match run.ordering {
            OrderingDef::Strict => OrderingPolicy::Strict,
            OrderingDef::ForceDeferred => OrderingPolicy::ForceDeferred,
        },
        preprocess: run.preprocess,
        remesh: run.remesh.as_ref().map(|r| RemeshSchedule {
            start: years(r.start_years),
            interval: years(r.interval_years),
        }),
    };
    options.validate().map_err(|e| ProjectError::Compile {
        what: e.to_string(),
    })?;
    Ok(options)
}

fn compile_chemistry(def: &ChemistryDef) -> ProjectResult<Chemistry> {
    let mut chem = Chemistry::default();
    let overrides = [
        (&mut chem.n, def.n),
        (&mut chem.kl, def.kl),
        (&mut chem.kn, def.kn),
        (&mut chem.c_s, def.c_s),
        (&mut chem.c_eq, def.c_eq),
        (&mut chem.eta, def.eta),
        (&mut chem.rho, def.rho),
        (&mut chem.g, def.g),
        (&mut chem.gamma, def.gamma),
        (&mut chem.diffusion, def.diffusion),
        (&mut chem.boundary_length, def.boundary_length),
        (&mut chem.dx, def.dx),
        (&mut chem.init_c, def.init_c),
        (&mut chem.alpha_threshold, def.alpha_threshold),
    ];
    for (slot, value) in overrides {
        if let Some(v) = value {
            *slot = v;
        }
    }
    chem.dc = def.dc.unwrap_or(chem.c_s / 100.0);

    chem.validate().map_err(|e| ProjectError::Compile {
        what: e.to_string(),
    })?;
    Ok(chem)
}

/// The lone channel described by the project.
pub fn compile_channel(project: &Project) -> ProjectResult<ChannelSetup> {
    let channel = project.channel.as_ref().ok_or_else(|| ProjectError::Compile {
        what: "project has no channel section".to_string(),
    })?;
    Ok(ChannelSetup {
        length: cm(channel.length_cm),
        alpha: cm(channel.alpha_cm),
        beta: cm(channel.beta_cm),
        hgrad: channel.hgrad,
    })
}

/// Build the fracture network. Nodes keep their declaration order, so the
/// graph's node `i` is the project's `i`-th node.
pub fn compile_network(project: &Project) -> ProjectResult<CompiledNetwork> {
    let network = project.network.as_ref().ok_or_else(|| ProjectError::Compile {
        what: "project has no network section".to_string(),
    })?;

    let mut builder = GraphBuilder::new();
    let mut node_ids = HashMap::with_capacity(network.nodes.len());
    for node in &network.nodes {
        let id = builder.add_node(node.id.clone(), node.coords);
        match node.role {
            NodeRole::Source => builder.mark_source(id),
            NodeRole::Target => builder.mark_target(id),
            NodeRole::Interior => {}
        }
        node_ids.insert(node.id.clone(), id);
    }

    for edge in &network.edges {
        let lookup = |name: &String| {
            node_ids.get(name).copied().ok_or_else(|| ProjectError::Compile {
                what: format!("edge references unknown node '{name}'"),
            })
        };
        let (tail, head) = (lookup(&edge.tail)?, lookup(&edge.head)?);
        let aperture = match edge.aperture {
            ApertureDef::Uniform { alpha_cm, beta_cm } => InitialAperture::uniform(alpha_cm, beta_cm),
            ApertureDef::Tapered { alpha_cm, beta_cm } => InitialAperture::Tapered {
                alpha: alpha_cm,
                beta: beta_cm,
            },
        };
        builder.add_edge(tail, head, edge.length_cm, edge.frac, aperture);
    }

    let graph = builder.build()?;
    Ok(CompiledNetwork { graph, node_ids })
}
