use std::{error::Error, path::PathBuf};

use crate::{
    cli::command_handlers::{do_analyze, do_init, do_modules},
    model::{artifact::Coordinate, graph::Module},
};

mod builder;

pub use builder::DepgraphBuilder;

pub struct Depgraph {
    root: PathBuf,
    descriptor_file_name: PathBuf,
    repository_dir: PathBuf,
    extra_repositories: Vec<PathBuf>,
}

impl Depgraph {
    pub fn builder() -> DepgraphBuilder {
        DepgraphBuilder::default()
    }

    /// Analyzes the project and returns its fully resolved module tree.
    /// One call is one analysis run with its own resolution session.
    pub fn analyze(&self) -> Result<Module, Box<dyn Error>> {
        do_analyze(
            &self.root,
            &self.descriptor_file_name,
            &self.repository_dir,
            &self.extra_repositories,
        )
    }

    /// Lists the workspace modules with their identities, in declared
    /// order.
    pub fn modules(&self) -> Result<Vec<(Coordinate, PathBuf)>, Box<dyn Error>> {
        do_modules(&self.root, &self.descriptor_file_name)
    }

    /// Creates an initial module descriptor
    pub fn init(&self, name: Option<String>) -> Result<(), Box<dyn Error>> {
        do_init(&self.root, name, &self.descriptor_file_name)
    }
}
