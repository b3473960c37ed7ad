use log::{debug, error};
use std::{
    path::{Component, Path},
    str::FromStr,
};
use toml::{map::Map, Table, Value};

use crate::model::{artifact::Coordinate, ParseError};

/// Scope assigned to a declared dependency when the descriptor does not
/// name one. Scopes are carried as opaque strings and never interpreted
/// beyond mediation.
pub const DEFAULT_SCOPE: &str = "compile";

/// A dependency declaration as written in a module descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub coordinate: Coordinate,
    pub scope: String,
}

/// The raw contents of a single module descriptor file, before parent
/// inheritance is applied. `group` and `version` may be omitted when a
/// parent is declared; the model builder resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub parent_path: Option<String>,
    pub module_paths: Vec<String>,
    pub output_dir: Option<String>,
    pub dependencies: Vec<DeclaredDependency>,
}

/// A module's fully resolved descriptor model: complete identity, parent
/// reference, declared dependencies and sub-module paths in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectModel {
    pub coordinate: Coordinate,
    pub parent: Option<Coordinate>,
    pub module_paths: Vec<String>,
    pub output_dir: Option<String>,
    pub dependencies: Vec<DeclaredDependency>,
}

impl ProjectModel {
    /// The per-artifact view of this module that the resolution session
    /// consumes: identity plus ordered declared dependencies.
    pub fn artifact_descriptor(&self) -> ArtifactDescriptor {
        ArtifactDescriptor {
            coordinate: self.coordinate.clone(),
            dependencies: self.dependencies.clone(),
        }
    }
}

/// What a repository answers for an artifact lookup: the artifact's
/// identity and its declared dependencies in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub coordinate: Coordinate,
    pub dependencies: Vec<DeclaredDependency>,
}

impl ProjectDescriptor {
    pub fn from_file(path: &Path) -> Result<ProjectDescriptor, ParseError> {
        debug!(
            "Attempting to read descriptor from file {}",
            path.display()
        );
        let contents = std::fs::read_to_string(path)?;

        let descriptor = ProjectDescriptor::from_toml_str(&contents);
        if let Err(err) = &descriptor {
            error!(
                "Could not build a valid descriptor from {} due to err {err}",
                path.display()
            )
        }
        descriptor
    }

    pub fn from_toml_str(data: &str) -> Result<ProjectDescriptor, ParseError> {
        let mut table = toml::from_str::<Table>(data)?;

        let artifact_id = table
            .remove("artifact")
            .ok_or_else(|| ParseError::MissingKey("artifact".to_string()))
            .and_then(|v| v.try_into::<String>().map_err(|e| e.into()))?;

        let group_id = table
            .remove("group")
            .map(|v| v.try_into::<String>())
            .map_or(Ok(None), |v| v.map(Some))?;

        let version = table
            .remove("version")
            .map(|v| v.try_into::<String>())
            .map_or(Ok(None), |v| v.map(Some))?;

        let parent_path = table
            .remove("parent")
            .map(|v| v.try_into::<String>())
            .map_or(Ok(None), |v| v.map(Some))?;

        let output_dir = table
            .remove("output_dir")
            .map(|v| v.try_into::<String>())
            .map_or(Ok(None), |v| v.map(Some))?;

        let module_paths = table
            .remove("modules")
            .map(|v| v.try_into::<Vec<String>>())
            .map_or(Ok(None), |v| v.map(Some))?
            .unwrap_or_default();
        for path in &module_paths {
            validate_module_path(path)?;
        }

        let dependencies = table
            .remove("dependencies")
            .map(|v| v.try_into::<Vec<Value>>())
            .map_or(Ok(None), |v| v.map(Some))?
            .unwrap_or_default()
            .iter()
            .map(parse_dependency)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectDescriptor {
            group_id,
            artifact_id,
            version,
            parent_path,
            module_paths,
            output_dir,
            dependencies,
        })
    }

    /// Converts a repository descriptor into its artifact view. Repository
    /// descriptors carry no parent to inherit from, so the identity must be
    /// complete.
    pub fn into_artifact_descriptor(self) -> Result<ArtifactDescriptor, ParseError> {
        let group_id = self
            .group_id
            .ok_or_else(|| ParseError::MissingKey("group".to_string()))?;
        let version = self
            .version
            .ok_or_else(|| ParseError::MissingKey("version".to_string()))?;

        Ok(ArtifactDescriptor {
            coordinate: Coordinate {
                group_id,
                artifact_id: self.artifact_id,
                version,
            },
            dependencies: self.dependencies,
        })
    }

    pub fn into_toml(self) -> Value {
        let mut table = Map::new();
        if let Some(group_id) = self.group_id {
            table.insert("group".to_string(), Value::String(group_id));
        }
        table.insert("artifact".to_string(), Value::String(self.artifact_id));
        if let Some(version) = self.version {
            table.insert("version".to_string(), Value::String(version));
        }
        if let Some(parent_path) = self.parent_path {
            table.insert("parent".to_string(), Value::String(parent_path));
        }
        if let Some(output_dir) = self.output_dir {
            table.insert("output_dir".to_string(), Value::String(output_dir));
        }
        if !self.module_paths.is_empty() {
            table.insert(
                "modules".to_string(),
                Value::Array(self.module_paths.into_iter().map(Value::String).collect()),
            );
        }
        if !self.dependencies.is_empty() {
            let dependencies = self
                .dependencies
                .into_iter()
                .map(|d| {
                    let mut dependency = Map::new();
                    dependency.insert(
                        "coordinate".to_string(),
                        Value::String(d.coordinate.to_string()),
                    );
                    if d.scope != DEFAULT_SCOPE {
                        dependency.insert("scope".to_string(), Value::String(d.scope));
                    }
                    Value::Table(dependency)
                })
                .collect();
            table.insert("dependencies".to_string(), Value::Array(dependencies));
        }
        Value::Table(table)
    }
}

fn parse_dependency(value: &Value) -> Result<DeclaredDependency, ParseError> {
    let coordinate = value
        .get("coordinate")
        .ok_or_else(|| ParseError::MissingKey("coordinate".to_string()))
        .and_then(|v| v.clone().try_into::<String>().map_err(|e| e.into()))
        .and_then(|s| Coordinate::from_str(&s))?;

    let scope = value
        .get("scope")
        .map(|v| v.clone().try_into::<String>())
        .map_or(Ok(None), |v| v.map(Some))?
        .unwrap_or_else(|| DEFAULT_SCOPE.to_string());

    Ok(DeclaredDependency { coordinate, scope })
}

pub(crate) fn validate_module_path(path: &str) -> Result<(), ParseError> {
    let valid = !path.is_empty()
        && !Path::new(path).is_absolute()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(ParseError::InvalidModulePath(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_valid_descriptor_with_dependencies() {
        let str = r#"
            group = "com.sonatype.example"
            artifact = "moduleB"
            version = "1.0.0-SNAPSHOT"

            [[dependencies]]
            coordinate = "org.apache.commons:commons-skin:3"

            [[dependencies]]
            coordinate = "junit:junit:4.10"
            scope = "test"
        "#;
        let expected = ProjectDescriptor {
            group_id: Some("com.sonatype.example".to_string()),
            artifact_id: "moduleB".to_string(),
            version: Some("1.0.0-SNAPSHOT".to_string()),
            parent_path: None,
            module_paths: vec![],
            output_dir: None,
            dependencies: vec![
                DeclaredDependency {
                    coordinate: Coordinate::new("org.apache.commons", "commons-skin", "3"),
                    scope: "compile".to_string(),
                },
                DeclaredDependency {
                    coordinate: Coordinate::new("junit", "junit", "4.10"),
                    scope: "test".to_string(),
                },
            ],
        };
        assert_eq!(ProjectDescriptor::from_toml_str(str).unwrap(), expected);
    }

    #[test]
    fn load_descriptor_with_modules_keeps_declared_order() {
        let str = r#"
            group = "com.sonatype.example"
            artifact = "projB"
            version = "1.0.0-SNAPSHOT"
            modules = ["moduleA", "moduleB"]
        "#;
        let descriptor = ProjectDescriptor::from_toml_str(str).unwrap();
        assert_eq!(descriptor.module_paths, vec!["moduleA", "moduleB"]);
        assert_eq!(descriptor.dependencies, vec![]);
    }

    #[test]
    fn load_descriptor_with_parent_and_partial_identity() {
        let str = r#"
            artifact = "moduleA"
            parent = ".."
        "#;
        let descriptor = ProjectDescriptor::from_toml_str(str).unwrap();
        assert_eq!(descriptor.group_id, None);
        assert_eq!(descriptor.version, None);
        assert_eq!(descriptor.parent_path, Some("..".to_string()));
    }

    #[test]
    fn load_descriptor_missing_artifact() {
        let str = r#"
            group = "com.sonatype.example"
            version = "1.0.0-SNAPSHOT"
        "#;
        assert!(matches!(
            ProjectDescriptor::from_toml_str(str),
            Err(ParseError::MissingKey(key)) if key == "artifact"
        ));
    }

    #[test]
    fn load_descriptor_invalid_coordinate() {
        let str = r#"
            group = "com.sonatype.example"
            artifact = "projA"
            version = "1.0.0-SNAPSHOT"

            [[dependencies]]
            coordinate = "junit:junit"
        "#;
        assert!(matches!(
            ProjectDescriptor::from_toml_str(str),
            Err(ParseError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn load_descriptor_invalid_module_path() {
        let str = r#"
            group = "com.sonatype.example"
            artifact = "projA"
            version = "1.0.0-SNAPSHOT"
            modules = ["../escape"]
        "#;
        assert!(matches!(
            ProjectDescriptor::from_toml_str(str),
            Err(ParseError::InvalidModulePath(_))
        ));
    }

    #[test]
    fn descriptor_toml_round_trip() {
        let str = r#"
            group = "com.sonatype.example"
            artifact = "projA"
            version = "1.0.0-SNAPSHOT"

            [[dependencies]]
            coordinate = "org.apache.maven:maven-model:3.0.4"
        "#;
        let descriptor = ProjectDescriptor::from_toml_str(str).unwrap();
        assert_eq!(
            descriptor.clone().into_toml(),
            toml::Value::from_str(str).unwrap()
        );
    }

    #[test]
    fn artifact_descriptor_requires_complete_identity() {
        let descriptor = ProjectDescriptor {
            group_id: None,
            artifact_id: "moduleA".to_string(),
            version: Some("1.0.0-SNAPSHOT".to_string()),
            parent_path: Some("..".to_string()),
            module_paths: vec![],
            output_dir: None,
            dependencies: vec![],
        };
        assert!(matches!(
            descriptor.into_artifact_descriptor(),
            Err(ParseError::MissingKey(key)) if key == "group"
        ));
    }
}
