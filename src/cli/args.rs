use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dependency graph analyzer for multi-module Maven-style projects.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Project root directory
    #[clap(short, long, default_value = ".")]
    pub root: PathBuf,
    /// Name of the module descriptor file
    #[clap(short, long)]
    pub descriptor: Option<PathBuf>,
    /// Location of the repository holding external artifact descriptors
    #[clap(long)]
    pub repository_dir: Option<PathBuf>,
    /// Additional repositories consulted in order after the main one
    #[clap(long)]
    pub repository: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyzes the project and prints every module's resolved dependency
    /// tree
    Analyze {
        /// Print the module tree as JSON instead of text
        #[clap(long)]
        json: bool,
    },
    /// Lists the modules of the workspace in declared order
    Modules,
    /// Creates an initial module descriptor in the project root
    Init {
        #[clap(short, long)]
        name: Option<String>,
    },
}
