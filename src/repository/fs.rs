use std::path::PathBuf;

use log::debug;

use crate::model::{
    artifact::Coordinate,
    project::{ArtifactDescriptor, ProjectDescriptor},
};

use super::{DescriptorReader, RepositoryError};

/// A repository laid out as a directory tree of TOML descriptors:
/// `<root>/<group as path>/<artifact>/<version>/<artifact>-<version>.toml`.
/// Serves both the local repository and any additional file-based
/// repositories; remote transports live behind the same trait.
pub struct FsRepository {
    id: String,
    root: PathBuf,
}

impl FsRepository {
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> FsRepository {
        FsRepository {
            id: id.into(),
            root: root.into(),
        }
    }

    fn descriptor_file(&self, coordinate: &Coordinate) -> PathBuf {
        self.root.join(coordinate.to_path()).join(format!(
            "{}-{}.toml",
            coordinate.artifact_id, coordinate.version
        ))
    }
}

impl DescriptorReader for FsRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_descriptor(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<ArtifactDescriptor>, RepositoryError> {
        let path = self.descriptor_file(coordinate);
        if !path.exists() {
            debug!(
                "Artifact {coordinate} not present in repository `{}`",
                self.id
            );
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        let descriptor = ProjectDescriptor::from_toml_str(&contents)
            .and_then(ProjectDescriptor::into_artifact_descriptor)
            .map_err(|source| RepositoryError::Descriptor {
                coordinate: coordinate.clone(),
                repository: self.id.clone(),
                source,
            })?;

        if descriptor.coordinate != *coordinate {
            return Err(RepositoryError::IdentityMismatch {
                requested: coordinate.clone(),
                found: descriptor.coordinate,
                repository: self.id.clone(),
            });
        }

        Ok(Some(descriptor))
    }
}
