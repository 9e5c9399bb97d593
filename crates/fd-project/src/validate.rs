//! Project validation logic.

use crate::schema::{ApertureDef, ChannelDef, ChemistryDef, EdgeDef, NetworkDef, NodeRole, Project, RunDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing section: {what}")]
    MissingSection { what: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_run(&project.run)?;
    validate_chemistry(&project.chemistry)?;

    if project.channel.is_none() && project.network.is_none() {
        return Err(ValidationError::MissingSection {
            what: "project needs a channel or a network section".to_string(),
        });
    }
    if let Some(channel) = &project.channel {
        validate_channel(channel)?;
    }
    if let Some(network) = &project.network {
        validate_network(network)?;
    }

    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    positive("run.duration_years", run.duration_years)?;
    positive("run.dt_years", run.dt_years)?;
    finite("run.source_head", run.source_head)?;
    finite("run.target_head", run.target_head)?;

    if let Some(remesh) = &run.remesh {
        finite("run.remesh.start_years", remesh.start_years)?;
        positive("run.remesh.interval_years", remesh.interval_years)?;
    }
    Ok(())
}

fn validate_chemistry(chem: &ChemistryDef) -> Result<(), ValidationError> {
    let strictly_positive = [
        ("chemistry.n", chem.n),
        ("chemistry.kl", chem.kl),
        ("chemistry.kn", chem.kn),
        ("chemistry.c_s", chem.c_s),
        ("chemistry.c_eq", chem.c_eq),
        ("chemistry.eta", chem.eta),
        ("chemistry.rho", chem.rho),
        ("chemistry.g", chem.g),
        ("chemistry.gamma", chem.gamma),
        ("chemistry.diffusion", chem.diffusion),
        ("chemistry.boundary_length", chem.boundary_length),
        ("chemistry.dc", chem.dc),
        ("chemistry.dx", chem.dx),
    ];
    for (field, value) in strictly_positive {
        if let Some(v) = value {
            positive(field, v)?;
        }
    }

    if let Some(c) = chem.init_c
        && (!c.is_finite() || c < 0.0)
    {
        return Err(ValidationError::InvalidValue {
            field: "chemistry.init_c".to_string(),
            value: c.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    if let Some(a) = chem.alpha_threshold {
        finite("chemistry.alpha_threshold", a)?;
    }
    Ok(())
}

fn validate_channel(channel: &ChannelDef) -> Result<(), ValidationError> {
    positive("channel.length_cm", channel.length_cm)?;
    positive("channel.alpha_cm", channel.alpha_cm)?;
    positive("channel.beta_cm", channel.beta_cm)?;
    if !channel.hgrad.is_finite() || channel.hgrad < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "channel.hgrad".to_string(),
            value: channel.hgrad.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    let mut node_ids = HashSet::new();
    for node in &network.nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: "network nodes".to_string(),
            });
        }
        if node.coords.iter().any(|c| !c.is_finite()) {
            return Err(ValidationError::InvalidValue {
                field: format!("node '{}' coords", node.id),
                value: format!("{:?}", node.coords),
                reason: "must be finite".to_string(),
            });
        }
    }

    for (role, what) in [(NodeRole::Source, "source"), (NodeRole::Target, "target")] {
        if !network.nodes.iter().any(|n| n.role == role) {
            return Err(ValidationError::MissingSection {
                what: format!("network needs at least one {what} node"),
            });
        }
    }

    if network.edges.is_empty() {
        return Err(ValidationError::MissingSection {
            what: "network needs at least one edge".to_string(),
        });
    }
    for (i, edge) in network.edges.iter().enumerate() {
        validate_edge(i, edge, &node_ids)?;
    }
    Ok(())
}

fn validate_edge(i: usize, edge: &EdgeDef, node_ids: &HashSet<&str>) -> Result<(), ValidationError> {
    for end in [&edge.tail, &edge.head] {
        if !node_ids.contains(end.as_str()) {
            return Err(ValidationError::MissingReference {
                id: end.clone(),
                context: format!("edge {i} endpoint"),
            });
        }
    }
    if edge.tail == edge.head {
        return Err(ValidationError::InvalidValue {
            field: format!("edge {i} head"),
            value: edge.head.clone(),
            reason: "self-loops are not allowed".to_string(),
        });
    }
    positive(&format!("edge {i} length_cm"), edge.length_cm)?;

    match &edge.aperture {
        ApertureDef::Uniform { alpha_cm, beta_cm } => {
            positive(&format!("edge {i} alpha_cm"), *alpha_cm)?;
            positive(&format!("edge {i} beta_cm"), *beta_cm)?;
        }
        ApertureDef::Tapered { alpha_cm, beta_cm } => {
            for v in alpha_cm {
                positive(&format!("edge {i} alpha_cm"), *v)?;
            }
            for v in beta_cm {
                positive(&format!("edge {i} beta_cm"), *v)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NodeDef, RemeshDef};

    fn node(id: &str, x: f64, role: NodeRole) -> NodeDef {
        NodeDef {
            id: id.to_string(),
            coords: [x, 0.0, 0.0],
            role,
        }
    }

    fn edge(tail: &str, head: &str) -> EdgeDef {
        EdgeDef {
            tail: tail.to_string(),
            head: head.to_string(),
            length_cm: 10.0,
            frac: None,
            aperture: ApertureDef::Uniform {
                alpha_cm: 0.02,
                beta_cm: 10.0,
            },
        }
    }

    fn line() -> Project {
        Project {
            version: 1,
            name: "line".to_string(),
            run: RunDef::default(),
            chemistry: ChemistryDef::default(),
            channel: None,
            network: Some(NetworkDef {
                nodes: vec![
                    node("s", 0.0, NodeRole::Source),
                    node("m", 10.0, NodeRole::Interior),
                    node("t", 20.0, NodeRole::Target),
                ],
                edges: vec![edge("s", "m"), edge("m", "t")],
            }),
        }
    }

    #[test]
    fn accepts_line_network() {
        validate_project(&line()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut project = line();
        project.version = 7;
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::UnsupportedVersion { version: 7 })
        ));
    }

    #[test]
    fn rejects_empty_project() {
        let mut project = line();
        project.network = None;
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::MissingSection { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_node() {
        let mut project = line();
        let network = project.network.as_mut().unwrap();
        network.nodes.push(node("m", 5.0, NodeRole::Interior));
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::DuplicateId { id, .. }) if id == "m"
        ));
    }

    #[test]
    fn rejects_dangling_edge() {
        let mut project = line();
        project.network.as_mut().unwrap().edges.push(edge("m", "nowhere"));
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::MissingReference { id, .. }) if id == "nowhere"
        ));
    }

    #[test]
    fn rejects_missing_target() {
        let mut project = line();
        let network = project.network.as_mut().unwrap();
        network.nodes[2].role = NodeRole::Interior;
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::MissingSection { what }) if what.contains("target")
        ));
    }

    #[test]
    fn rejects_bad_values() {
        let mut project = line();
        project.run.dt_years = 0.0;
        assert!(validate_project(&project).is_err());

        let mut project = line();
        project.run.remesh = Some(RemeshDef {
            start_years: 30.0,
            interval_years: -1.0,
        });
        assert!(validate_project(&project).is_err());

        let mut project = line();
        project.chemistry.kl = Some(f64::NAN);
        assert!(validate_project(&project).is_err());

        let mut project = line();
        project.network.as_mut().unwrap().edges[0].aperture = ApertureDef::Tapered {
            alpha_cm: [0.02, 0.0],
            beta_cm: [1.0, 1.0],
        };
        assert!(validate_project(&project).is_err());
    }

    #[test]
    fn rejects_negative_gradient() {
        let mut project = line();
        project.channel = Some(ChannelDef {
            length_cm: 100.0,
            alpha_cm: 0.02,
            beta_cm: 100.0,
            hgrad: -0.1,
        });
        assert!(validate_project(&project).is_err());
    }
}
