use std::{env, error::Error, path::PathBuf};

use home::home_dir;

use crate::Depgraph;

#[derive(Default)]
pub struct DepgraphBuilder {
    root: Option<PathBuf>,
    descriptor_file_name: Option<PathBuf>,
    repository_dir: Option<PathBuf>,
    extra_repositories: Vec<PathBuf>,
}

impl DepgraphBuilder {
    /// Project root directory.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Name of the module descriptor file.
    ///
    /// Defaults to `project.toml`.
    pub fn descriptor_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor_file_name = Some(path.into());
        self
    }

    /// Location of the repository holding external artifact descriptors.
    ///
    /// Defaults to `$HOME/.depgraph/repository`.
    pub fn repository_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.repository_dir = Some(path.into());
        self
    }

    /// Adds a repository consulted, in insertion order, after the main
    /// one.
    pub fn repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_repositories.push(path.into());
        self
    }

    pub fn try_build(self) -> Result<Depgraph, Box<dyn Error>> {
        let Self {
            root,
            descriptor_file_name,
            repository_dir,
            extra_repositories,
        } = self;

        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let descriptor_file_name =
            descriptor_file_name.unwrap_or_else(|| PathBuf::from("project.toml"));

        let repository_dir = repository_dir.unwrap_or_else(default_repository_dir);

        Ok(Depgraph {
            root,
            descriptor_file_name,
            repository_dir,
            extra_repositories,
        })
    }
}

fn default_repository_dir() -> PathBuf {
    let mut repository_dir =
        home_dir().expect("Could not find home dir. Please define $HOME env variable.");
    repository_dir.push(".depgraph/repository");
    repository_dir
}
