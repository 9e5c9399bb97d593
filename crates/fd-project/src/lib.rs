//! fd-project: project file schema, validation and compilation.
//!
//! A project file describes one dissolution run: the time axis, the channel
//! discretization, optional chemistry overrides, and either a lone channel or
//! a fracture network. `compile` turns a validated project into the inputs of
//! `fd-sim`.

pub mod compile;
pub mod schema;
pub mod validate;

pub use compile::{CompiledNetwork, compile_channel, compile_network, compile_options};
pub use schema::*;
pub use validate::{ValidationError, validate_project};

use std::fs;
use std::path::Path;

/// Newest project file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Compilation error: {what}")]
    Compile { what: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

impl From<fd_graph::GraphError> for ProjectError {
    fn from(e: fd_graph::GraphError) -> Self {
        ProjectError::Compile {
            what: e.to_string(),
        }
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<Project> {
    let content = fs::read_to_string(path)?;
    from_yaml_str(&content)
}

/// Parse and validate a project held in memory.
pub fn from_yaml_str(content: &str) -> ProjectResult<Project> {
    let project: Project = serde_yaml::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Project> {
    let content = fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    fs::write(path, content)?;
    Ok(())
}
