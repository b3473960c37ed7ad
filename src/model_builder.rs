use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{
    artifact::Coordinate,
    project::{ProjectDescriptor, ProjectModel},
    ParseError,
};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Error parsing descriptor {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
    #[error("Parent descriptor {path} referenced from {child} does not exist")]
    MissingParent { path: String, child: String },
    #[error("Parent chain of {path} loops back on itself")]
    ParentCycle { path: String },
    #[error("Descriptor {path} declares no `{key}` and has no parent to inherit it from")]
    MissingInherited { path: String, key: String },
}

/// Builds a module's effective project model from its descriptor file and
/// the parent chain the descriptor references.
pub trait ModelBuilder {
    fn build_model(&self, descriptor_path: &Path) -> Result<ProjectModel, ModelError>;
}

/// Model builder for TOML module descriptors. A descriptor inherits its
/// missing `group` and `version` from the parent named by its `parent`
/// key, a directory path relative to the module, walked recursively.
pub struct TomlModelBuilder {
    descriptor_file_name: PathBuf,
}

impl TomlModelBuilder {
    pub fn new(descriptor_file_name: impl Into<PathBuf>) -> TomlModelBuilder {
        TomlModelBuilder {
            descriptor_file_name: descriptor_file_name.into(),
        }
    }

    fn build_recursive(
        &self,
        descriptor_path: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<ProjectModel, ModelError> {
        // The chain tracks canonical ancestor paths; a repeated entry means
        // a descriptor names itself or an ancestor as its parent.
        let canonical = descriptor_path
            .canonicalize()
            .unwrap_or_else(|_| descriptor_path.to_path_buf());
        if chain.contains(&canonical) {
            return Err(ModelError::ParentCycle {
                path: descriptor_path.display().to_string(),
            });
        }
        chain.push(canonical);

        let descriptor =
            ProjectDescriptor::from_file(descriptor_path).map_err(|source| ModelError::Parse {
                path: descriptor_path.display().to_string(),
                source,
            })?;

        let module_dir = descriptor_path.parent().unwrap_or_else(|| Path::new("."));
        let parent = match &descriptor.parent_path {
            Some(parent_path) => {
                let parent_descriptor_path = module_dir
                    .join(parent_path)
                    .join(&self.descriptor_file_name);
                if !parent_descriptor_path.exists() {
                    return Err(ModelError::MissingParent {
                        path: parent_descriptor_path.display().to_string(),
                        child: descriptor_path.display().to_string(),
                    });
                }
                Some(self.build_recursive(&parent_descriptor_path, chain)?)
            }
            None => None,
        };
        chain.pop();

        let group_id = match descriptor.group_id {
            Some(group_id) => group_id,
            None => match &parent {
                Some(parent) => parent.coordinate.group_id.clone(),
                None => {
                    return Err(ModelError::MissingInherited {
                        path: descriptor_path.display().to_string(),
                        key: "group".to_string(),
                    })
                }
            },
        };
        let version = match descriptor.version {
            Some(version) => version,
            None => match &parent {
                Some(parent) => parent.coordinate.version.clone(),
                None => {
                    return Err(ModelError::MissingInherited {
                        path: descriptor_path.display().to_string(),
                        key: "version".to_string(),
                    })
                }
            },
        };

        Ok(ProjectModel {
            coordinate: Coordinate {
                group_id,
                artifact_id: descriptor.artifact_id,
                version,
            },
            parent: parent.map(|p| p.coordinate),
            module_paths: descriptor.module_paths,
            output_dir: descriptor.output_dir,
            dependencies: descriptor.dependencies,
        })
    }
}

impl ModelBuilder for TomlModelBuilder {
    fn build_model(&self, descriptor_path: &Path) -> Result<ProjectModel, ModelError> {
        let mut chain = Vec::new();
        self.build_recursive(descriptor_path, &mut chain)
    }
}
