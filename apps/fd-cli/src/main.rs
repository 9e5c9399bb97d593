mod summary;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use fd_project::ProjectError;
use fd_sim::{NetworkEngine, SimError};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported: {what}")]
    Unsupported { what: String },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "fd-cli")]
#[command(about = "Fracture dissolution CLI - single channels and fracture networks", long_about = None)]
struct Cli {
    /// Print per-phase timing totals after a run
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Dissolve the project's single channel
    Channel {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Write the JSON summary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Dissolve the project's fracture network
    Network {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Write the JSON summary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.timing {
        fd_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Channel {
            project_path,
            output,
        } => cmd_channel(&project_path, output.as_deref()),
        Commands::Network {
            project_path,
            output,
        } => cmd_network(&project_path, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = fd_project::load_yaml(project_path)?;
    fd_project::compile_options(&project)?;
    if project.channel.is_some() {
        fd_project::compile_channel(&project)?;
    }
    if project.network.is_some() {
        let network = fd_project::compile_network(&project)?;
        println!(
            "  Network: {} nodes, {} edges",
            network.graph.nodes().len(),
            network.graph.edges().len()
        );
    }
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_channel(project_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let project = fd_project::load_yaml(project_path)?;
    let options = fd_project::compile_options(&project)?;
    let setup = fd_project::compile_channel(&project)?;
    info!(project = %project.name, "running single channel");

    let grid = fd_sim::run_channel(&setup, &options)?;
    let stepper = options.stepper();
    let report = summary::ChannelSummary::from_grid(&project.name, stepper.name(), &grid);
    emit(&report, output)
}

fn cmd_network(project_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let project = fd_project::load_yaml(project_path)?;
    let options = fd_project::compile_options(&project)?;
    if options.remesh.is_some() {
        return Err(CliError::Unsupported {
            what: "remeshing needs an external remesher, none is available to the CLI".to_string(),
        });
    }
    let network = fd_project::compile_network(&project)?;
    info!(project = %project.name, "running fracture network");

    let stepper = options.stepper();
    let run = NetworkEngine::new(network.graph, options)?.run()?;
    let report = summary::NetworkSummary::from_run(&project.name, stepper.name(), &run)?;
    emit(&report, output)
}

fn emit<T: serde::Serialize>(report: &T, output: Option<&Path>) -> CliResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("✓ Summary written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
