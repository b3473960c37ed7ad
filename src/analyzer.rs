use std::path::PathBuf;

use thiserror::Error;

use crate::{
    listener::ListenerLogger,
    model::{artifact::Coordinate, graph::Module},
    model_builder::{ModelBuilder, ModelError},
    session::{CollectError, RepositorySession},
    workspace::{WorkspaceError, WorkspaceFilesystem, WorkspaceModule},
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error building project model for module in {dir}: {source}")]
    ModelBuilding {
        dir: String,
        #[source]
        source: ModelError,
    },
    #[error("Error collecting dependencies of {module}: {source}")]
    DependencyCollection {
        module: Coordinate,
        #[source]
        source: CollectError,
    },
    #[error("Error reading an artifact descriptor while resolving {module}: {source}")]
    ArtifactDescriptor {
        module: Coordinate,
        #[source]
        source: CollectError,
    },
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

/// The dependency resolution engine. Resolves a module's model, collects
/// its mediated dependency tree through the session, then recurses into
/// each declared sub-module in order.
///
/// Fail-fast: the first failing module aborts the whole analysis and no
/// partial module tree is returned.
pub struct ProjectAnalyzer<'a> {
    filesystem: &'a dyn WorkspaceFilesystem,
    model_builder: &'a dyn ModelBuilder,
    listener: &'a dyn ListenerLogger,
}

impl<'a> ProjectAnalyzer<'a> {
    pub fn new(
        filesystem: &'a dyn WorkspaceFilesystem,
        model_builder: &'a dyn ModelBuilder,
        listener: &'a dyn ListenerLogger,
    ) -> ProjectAnalyzer<'a> {
        ProjectAnalyzer {
            filesystem,
            model_builder,
            listener,
        }
    }

    pub fn module_dependencies(
        &self,
        module: &WorkspaceModule,
        session: &mut RepositorySession,
    ) -> Result<Module, AnalysisError> {
        let mut ancestry = Vec::new();
        match self.analyze(module, session, &mut ancestry) {
            Ok(module) => Ok(module),
            Err(error) => {
                self.listener
                    .error_with_cause("Project analysis failed", &error);
                Err(error)
            }
        }
    }

    fn analyze(
        &self,
        module: &WorkspaceModule,
        session: &mut RepositorySession,
        ancestry: &mut Vec<PathBuf>,
    ) -> Result<Module, AnalysisError> {
        // Sub-module membership is a declared tree; a module reachable as
        // its own descendant is a broken layout, not a resolvable cycle.
        let canonical = module.dir.canonicalize().map_err(WorkspaceError::from)?;
        if ancestry.contains(&canonical) {
            return Err(AnalysisError::Workspace(WorkspaceError::ModuleCycle {
                dir: module.dir.display().to_string(),
            }));
        }
        ancestry.push(canonical);

        let descriptor_path = self.filesystem.descriptor_path(module);
        let model = self
            .model_builder
            .build_model(&descriptor_path)
            .map_err(|source| AnalysisError::ModelBuilding {
                dir: module.dir.display().to_string(),
                source,
            })?;
        self.listener
            .progress(&format!("Analyzing module {}", model.coordinate));

        let dependency_tree =
            session
                .collect(&model.artifact_descriptor())
                .map_err(|source| match source {
                    CollectError::Descriptor { .. } => AnalysisError::ArtifactDescriptor {
                        module: model.coordinate.clone(),
                        source,
                    },
                    source => AnalysisError::DependencyCollection {
                        module: model.coordinate.clone(),
                        source,
                    },
                })?;

        let mut sub_modules = Vec::with_capacity(model.module_paths.len());
        for name in &model.module_paths {
            let sub = self.filesystem.sub_module(module, name)?;
            sub_modules.push(self.analyze(&sub, session, ancestry)?);
        }
        ancestry.pop();

        Ok(Module {
            coordinate: model.coordinate,
            dependency_tree,
            sub_modules,
        })
    }
}
