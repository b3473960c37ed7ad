use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    listener::ListenerLogger,
    model::{artifact::Coordinate, project::ArtifactDescriptor},
    model_builder::{ModelBuilder, ModelError},
    workspace::{WorkspaceError, WorkspaceFilesystem, WorkspaceModule},
};

/// Which local path of a workspace module an artifact lookup is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The module's descriptor file, consumed by model building.
    Descriptor,
    /// The module's build-output directory, consumed by dependent
    /// compilation.
    Output,
}

/// Local paths of one in-project module, plus its descriptor as built at
/// enumeration time. Read-only after construction.
#[derive(Debug)]
struct WorkspaceArtifactReference {
    descriptor_path: PathBuf,
    output_path: PathBuf,
    descriptor: ArtifactDescriptor,
}

#[derive(Error, Debug)]
pub enum WorkspaceReaderError {
    #[error(transparent)]
    Enumeration(#[from] WorkspaceError),
    #[error("Error building model for workspace descriptor {path}: {source}")]
    Model {
        path: String,
        #[source]
        source: ModelError,
    },
}

/// The workspace-resolution policy: answers artifact lookups for modules
/// that belong to the analyzed project with their local paths, so the
/// session never falls through to a repository for a reactor module.
///
/// Owned by exactly one analysis run. Lookups never fail; absence means
/// the artifact is external and resolution proceeds with the configured
/// repositories.
pub struct WorkspaceReader {
    root_module: WorkspaceModule,
    references: HashMap<Coordinate, WorkspaceArtifactReference>,
}

impl WorkspaceReader {
    pub fn new(
        filesystem: &dyn WorkspaceFilesystem,
        model_builder: &dyn ModelBuilder,
        listener: &dyn ListenerLogger,
    ) -> Result<WorkspaceReader, WorkspaceReaderError> {
        let mut references = HashMap::new();
        for module in filesystem.list_modules()? {
            let descriptor_path = filesystem.descriptor_path(&module);
            let model = model_builder.build_model(&descriptor_path).map_err(|source| {
                WorkspaceReaderError::Model {
                    path: descriptor_path.display().to_string(),
                    source,
                }
            })?;
            let output_path = match &model.output_dir {
                Some(dir) => module.dir.join(dir),
                None => filesystem.output_path(&module),
            };
            listener.info(&format!(
                "Found workspace module {} in {}",
                model.coordinate,
                module.dir.display()
            ));
            references.insert(
                model.coordinate.clone(),
                WorkspaceArtifactReference {
                    descriptor_path,
                    output_path,
                    descriptor: model.artifact_descriptor(),
                },
            );
        }
        Ok(WorkspaceReader {
            root_module: filesystem.root_module(),
            references,
        })
    }

    pub fn root_module(&self) -> &WorkspaceModule {
        &self.root_module
    }

    /// Answers a workspace-local lookup with the requested path. `None`
    /// means the artifact is not an in-project module and the caller
    /// should proceed with repository resolution.
    pub fn find_artifact(&self, coordinate: &Coordinate, kind: ArtifactKind) -> Option<&Path> {
        self.references.get(coordinate).map(|r| match kind {
            ArtifactKind::Descriptor => r.descriptor_path.as_path(),
            ArtifactKind::Output => r.output_path.as_path(),
        })
    }

    /// The versions under which (group, artifact) exists in this project:
    /// the module's single version, or empty for external artifacts.
    pub fn find_versions(&self, group_id: &str, artifact_id: &str) -> Vec<String> {
        let mut versions: Vec<String> = self
            .references
            .keys()
            .filter(|c| c.group_id == group_id && c.artifact_id == artifact_id)
            .map(|c| c.version.clone())
            .collect();
        versions.sort();
        versions
    }

    /// The reactor short-circuit used by the resolution session: an
    /// in-project module's descriptor, already built at construction time
    /// from its local descriptor file.
    pub fn artifact_descriptor(&self, coordinate: &Coordinate) -> Option<&ArtifactDescriptor> {
        self.references.get(coordinate).map(|r| &r.descriptor)
    }
}
