use log::debug;

use crate::{
    analyzer::ProjectAnalyzer,
    listener::LogListener,
    model::{
        artifact::Coordinate,
        graph::Module,
        project::ProjectDescriptor,
    },
    model_builder::{ModelBuilder, TomlModelBuilder},
    repository::FsRepository,
    session::RepositorySession,
    workspace::{FsWorkspaceFilesystem, WorkspaceFilesystem, WorkspaceReader},
};
use std::{
    error::Error,
    path::{Path, PathBuf},
};

/// Handler to analyze command: wires one workspace reader, one resolution
/// session and the analyzer for a single run, all discarded afterwards.
pub fn do_analyze(
    root: &Path,
    descriptor_file_name: &Path,
    repository_dir: &Path,
    extra_repositories: &[PathBuf],
) -> Result<Module, Box<dyn Error>> {
    let listener = LogListener;
    let filesystem = FsWorkspaceFilesystem::new(root, descriptor_file_name)?;
    let model_builder = TomlModelBuilder::new(descriptor_file_name);
    let reader = WorkspaceReader::new(&filesystem, &model_builder, &listener)?;

    let local = FsRepository::new("local", repository_dir);
    let extras: Vec<FsRepository> = extra_repositories
        .iter()
        .enumerate()
        .map(|(position, dir)| FsRepository::new(format!("repository{}", position + 1), dir))
        .collect();

    let mut session = RepositorySession::new(&listener);
    session.set_workspace_reader(&reader);
    session.add_repository(&local);
    for repository in &extras {
        session.add_repository(repository);
    }

    let analyzer = ProjectAnalyzer::new(&filesystem, &model_builder, &listener);
    let root_module = reader.root_module().clone();
    let module = analyzer.module_dependencies(&root_module, &mut session)?;
    debug!("Resolved module tree of {}", module.coordinate);

    Ok(module)
}

/// Handler to modules command
pub fn do_modules(
    root: &Path,
    descriptor_file_name: &Path,
) -> Result<Vec<(Coordinate, PathBuf)>, Box<dyn Error>> {
    let filesystem = FsWorkspaceFilesystem::new(root, descriptor_file_name)?;
    let model_builder = TomlModelBuilder::new(descriptor_file_name);

    let mut entries = Vec::new();
    for module in filesystem.list_modules()? {
        let model = model_builder.build_model(&filesystem.descriptor_path(&module))?;
        entries.push((model.coordinate, module.dir));
    }
    Ok(entries)
}

/// Handler to init command
pub fn do_init(
    root: &Path,
    name: Option<String>,
    descriptor_file_name: &Path,
) -> Result<(), Box<dyn Error>> {
    let artifact_id = build_artifact_id(name, root)?;
    let descriptor = ProjectDescriptor {
        group_id: Some("org.example".to_string()),
        artifact_id,
        version: Some("1.0.0-SNAPSHOT".to_string()),
        parent_path: None,
        module_paths: vec![],
        output_dir: None,
        dependencies: vec![],
    };
    create_descriptor_file(descriptor, &root.join(descriptor_file_name))
}

/// Name if present otherwise attempt to extract from directory
fn build_artifact_id(name: Option<String>, path: &Path) -> Result<String, Box<dyn Error>> {
    match name {
        Some(name) => Ok(name),
        None => match path.canonicalize()?.file_name() {
            Some(dir) => Ok(dir.to_string_lossy().to_string()),
            None => {
                Err("Module name not given and could not convert location to directory name".into())
            }
        },
    }
}

fn create_descriptor_file(
    descriptor: ProjectDescriptor,
    descriptor_path: &PathBuf,
) -> Result<(), Box<dyn Error>> {
    if !descriptor_path.exists() {
        std::fs::write(
            descriptor_path,
            toml::to_string_pretty(&descriptor.into_toml())?,
        )?;
        Ok(())
    } else {
        Err(format!("File already exists: {}", descriptor_path.display()).into())
    }
}
