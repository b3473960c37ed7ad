mod reader;

pub use reader::{ArtifactKind, WorkspaceReader, WorkspaceReaderError};

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use thiserror::Error;
use toml::Table;

use crate::model::{project::validate_module_path, ParseError};

const DEFAULT_OUTPUT_DIR: &str = "target";

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("IO error while enumerating workspace modules: {0}")]
    IO(#[from] std::io::Error),
    #[error("Error reading descriptor {path}: {source}")]
    Descriptor {
        path: String,
        #[source]
        source: ParseError,
    },
    #[error("Missing descriptor {file} in module directory {dir}")]
    MissingDescriptor { dir: String, file: String },
    #[error("Module directory {dir} is listed as its own descendant")]
    ModuleCycle { dir: String },
}

/// A module directory discovered in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceModule {
    pub dir: PathBuf,
}

/// Filesystem view of a project's module layout. The analyzer and the
/// workspace reader depend only on this contract, not on any concrete
/// directory convention.
pub trait WorkspaceFilesystem {
    /// The module at the project root.
    fn root_module(&self) -> WorkspaceModule;

    /// Every module of the project, root first, sub-modules in declared
    /// order. Fails when the layout cannot be enumerated, including when a
    /// descriptor lists a module as its own descendant.
    fn list_modules(&self) -> Result<Vec<WorkspaceModule>, WorkspaceError>;

    /// The module's descriptor file, used for model building.
    fn descriptor_path(&self, module: &WorkspaceModule) -> PathBuf;

    /// The module's build-output directory, used for dependent compilation.
    fn output_path(&self, module: &WorkspaceModule) -> PathBuf;

    /// Locates a declared sub-module of `parent` by its declared path.
    fn sub_module(
        &self,
        parent: &WorkspaceModule,
        name: &str,
    ) -> Result<WorkspaceModule, WorkspaceError>;
}

/// Module layout rooted at a project directory: one descriptor file per
/// module directory, sub-modules in directories named by the descriptor's
/// `modules` list.
pub struct FsWorkspaceFilesystem {
    root: PathBuf,
    descriptor_file_name: PathBuf,
}

impl FsWorkspaceFilesystem {
    pub fn new(
        root: impl Into<PathBuf>,
        descriptor_file_name: impl Into<PathBuf>,
    ) -> Result<FsWorkspaceFilesystem, WorkspaceError> {
        let root = root.into();
        let descriptor_file_name = descriptor_file_name.into();
        if !root.join(&descriptor_file_name).exists() {
            return Err(WorkspaceError::MissingDescriptor {
                dir: root.display().to_string(),
                file: descriptor_file_name.display().to_string(),
            });
        }
        Ok(FsWorkspaceFilesystem {
            root,
            descriptor_file_name,
        })
    }

    fn walk(
        &self,
        module: WorkspaceModule,
        modules: &mut Vec<WorkspaceModule>,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<(), WorkspaceError> {
        let canonical = module.dir.canonicalize()?;
        if !visited.insert(canonical) {
            return Err(WorkspaceError::ModuleCycle {
                dir: module.dir.display().to_string(),
            });
        }

        let descriptor = self.descriptor_path(&module);
        let declared =
            declared_sub_modules(&descriptor).map_err(|source| WorkspaceError::Descriptor {
                path: descriptor.display().to_string(),
                source,
            })?;

        modules.push(module.clone());
        for name in declared {
            let sub = self.sub_module(&module, &name)?;
            self.walk(sub, modules, visited)?;
        }
        Ok(())
    }
}

impl WorkspaceFilesystem for FsWorkspaceFilesystem {
    fn root_module(&self) -> WorkspaceModule {
        WorkspaceModule {
            dir: self.root.clone(),
        }
    }

    fn list_modules(&self) -> Result<Vec<WorkspaceModule>, WorkspaceError> {
        let mut modules = Vec::new();
        let mut visited = HashSet::new();
        self.walk(self.root_module(), &mut modules, &mut visited)?;
        Ok(modules)
    }

    fn descriptor_path(&self, module: &WorkspaceModule) -> PathBuf {
        module.dir.join(&self.descriptor_file_name)
    }

    fn output_path(&self, module: &WorkspaceModule) -> PathBuf {
        module.dir.join(DEFAULT_OUTPUT_DIR)
    }

    fn sub_module(
        &self,
        parent: &WorkspaceModule,
        name: &str,
    ) -> Result<WorkspaceModule, WorkspaceError> {
        validate_module_path(name).map_err(|source| WorkspaceError::Descriptor {
            path: self.descriptor_path(parent).display().to_string(),
            source,
        })?;
        let dir = parent.dir.join(name);
        if !dir.join(&self.descriptor_file_name).exists() {
            return Err(WorkspaceError::MissingDescriptor {
                dir: dir.display().to_string(),
                file: self.descriptor_file_name.display().to_string(),
            });
        }
        Ok(WorkspaceModule { dir })
    }
}

/// Reads only the `modules` key of a descriptor. Enumeration does not need
/// the full model, and full parsing failures belong to model building.
fn declared_sub_modules(path: &Path) -> Result<Vec<String>, ParseError> {
    let contents = std::fs::read_to_string(path)?;
    let mut table = toml::from_str::<Table>(&contents)?;
    table
        .remove("modules")
        .map(|v| v.try_into::<Vec<String>>())
        .map_or(Ok(None), |v| v.map(Some))
        .map_err(ParseError::from)
        .map(Option::unwrap_or_default)
}
