//! Project schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub run: RunDef,
    #[serde(default)]
    pub chemistry: ChemistryDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    #[serde(default = "default_duration_years")]
    pub duration_years: f64,
    #[serde(default = "default_dt_years")]
    pub dt_years: f64,
    #[serde(default)]
    pub discretization: DiscretizationDef,
    #[serde(default)]
    pub cross_section: CrossSectionDef,
    #[serde(default = "default_source_head")]
    pub source_head: f64,
    #[serde(default)]
    pub target_head: f64,
    #[serde(default)]
    pub ordering: OrderingDef,
    #[serde(default = "default_preprocess")]
    pub preprocess: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remesh: Option<RemeshDef>,
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            duration_years: default_duration_years(),
            dt_years: default_dt_years(),
            discretization: DiscretizationDef::default(),
            cross_section: CrossSectionDef::default(),
            source_head: default_source_head(),
            target_head: 0.0,
            ordering: OrderingDef::default(),
            preprocess: default_preprocess(),
            remesh: None,
        }
    }
}

fn default_duration_years() -> f64 {
    10.0
}

fn default_dt_years() -> f64 {
    1.0
}

fn default_source_head() -> f64 {
    1000.0
}

fn default_preprocess() -> bool {
    true
}

/// Channel discretization selector.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscretizationDef {
    /// Fixed spatial increments.
    Dx,
    /// Fixed concentration increments.
    #[default]
    Dc,
    /// Fixed concentration increments on a spline-refined grid.
    DcRefined,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CrossSectionDef {
    #[default]
    Rectangular,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderingDef {
    #[default]
    Strict,
    ForceDeferred,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemeshDef {
    #[serde(default = "default_remesh_start")]
    pub start_years: f64,
    #[serde(default = "default_remesh_interval")]
    pub interval_years: f64,
}

fn default_remesh_start() -> f64 {
    30.0
}

fn default_remesh_interval() -> f64 {
    1000.0
}

/// Overrides applied on top of the default calcite chemistry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChemistryDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kn: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_eq: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rho: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffusion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_length: Option<f64>,
    /// Defaults to `c_s / 100` of the effective `c_s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<f64>,
    /// Grid spacing of fresh channels (cm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_threshold: Option<f64>,
}

/// A lone channel driven by an imposed head gradient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelDef {
    pub length_cm: f64,
    pub alpha_cm: f64,
    pub beta_cm: f64,
    pub hgrad: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    pub coords: [f64; 3],
    #[serde(default)]
    pub role: NodeRole,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    #[default]
    Interior,
    Source,
    Target,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub tail: String,
    pub head: String,
    pub length_cm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frac: Option<u32>,
    pub aperture: ApertureDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ApertureDef {
    Uniform { alpha_cm: f64, beta_cm: f64 },
    /// Tail and head values, in that order.
    Tapered {
        alpha_cm: [f64; 2],
        beta_cm: [f64; 2],
    },
}
