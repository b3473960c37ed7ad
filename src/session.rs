use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use crate::{
    listener::ListenerLogger,
    model::{
        artifact::{ArtifactKey, Coordinate},
        graph::Dependency,
        project::{ArtifactDescriptor, DEFAULT_SCOPE},
    },
    repository::{DescriptorReader, RepositoryError},
    workspace::WorkspaceReader,
};

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Artifact {0} was not found in the workspace or any configured repository")]
    NotFound(Coordinate),
    #[error("Error reading descriptor of {coordinate}: {source}")]
    Descriptor {
        coordinate: Coordinate,
        #[source]
        source: RepositoryError,
    },
}

/// The resolution state of one analysis run: the workspace reader
/// consulted first for every artifact, the repositories consulted in
/// order afterwards, and the descriptors already looked up.
///
/// One session per run; it holds mutable resolution state and is not safe
/// to share between runs or threads. Discard it together with the run.
pub struct RepositorySession<'a> {
    workspace: Option<&'a WorkspaceReader>,
    repositories: Vec<&'a dyn DescriptorReader>,
    listener: &'a dyn ListenerLogger,
    descriptors: HashMap<Coordinate, ArtifactDescriptor>,
}

impl<'a> RepositorySession<'a> {
    pub fn new(listener: &'a dyn ListenerLogger) -> RepositorySession<'a> {
        RepositorySession {
            workspace: None,
            repositories: vec![],
            listener,
            descriptors: HashMap::new(),
        }
    }

    /// Enables the reactor short-circuit: artifacts matching in-project
    /// modules resolve from their local descriptors instead of the
    /// repositories.
    pub fn set_workspace_reader(&mut self, workspace: &'a WorkspaceReader) {
        self.workspace = Some(workspace);
    }

    pub fn add_repository(&mut self, repository: &'a dyn DescriptorReader) {
        self.repositories.push(repository);
    }

    /// Collects the mediated dependency tree of `root`. The root's own
    /// descriptor is supplied by the caller; everything below it is
    /// resolved through the workspace and the repositories, expanded
    /// depth-first and then mediated (nearest wins, first declared wins on
    /// ties), so the returned tree holds at most one node per
    /// (group, artifact).
    pub fn collect(&mut self, root: &ArtifactDescriptor) -> Result<Dependency, CollectError> {
        self.listener
            .progress(&format!("Collecting dependencies of {}", root.coordinate));

        let mut raw = Dependency::new(root.coordinate.clone(), DEFAULT_SCOPE);
        let mut path = vec![root.coordinate.key()];
        for declared in &root.dependencies {
            if path.contains(&declared.coordinate.key()) {
                continue;
            }
            raw.dependencies
                .push(self.expand(&declared.coordinate, &declared.scope, &mut path)?);
        }

        Ok(mediate(&raw))
    }

    /// Depth-first expansion of one artifact's raw subtree. Expansion
    /// truncates when a (group, artifact) already occurs on the current
    /// path, which breaks dependency cycles between reactor modules as
    /// well as external ones.
    fn expand(
        &mut self,
        coordinate: &Coordinate,
        scope: &str,
        path: &mut Vec<ArtifactKey>,
    ) -> Result<Dependency, CollectError> {
        let descriptor = self.descriptor_of(coordinate)?;
        let mut node = Dependency::new(coordinate.clone(), scope);

        path.push(coordinate.key());
        for declared in &descriptor.dependencies {
            if path.contains(&declared.coordinate.key()) {
                continue;
            }
            node.dependencies
                .push(self.expand(&declared.coordinate, &declared.scope, path)?);
        }
        path.pop();

        Ok(node)
    }

    fn descriptor_of(&mut self, coordinate: &Coordinate) -> Result<ArtifactDescriptor, CollectError> {
        if let Some(descriptor) = self.descriptors.get(coordinate) {
            return Ok(descriptor.clone());
        }
        let descriptor = self.lookup(coordinate)?;
        self.descriptors
            .insert(coordinate.clone(), descriptor.clone());
        Ok(descriptor)
    }

    fn lookup(&self, coordinate: &Coordinate) -> Result<ArtifactDescriptor, CollectError> {
        if let Some(workspace) = self.workspace {
            if let Some(descriptor) = workspace.artifact_descriptor(coordinate) {
                self.listener
                    .info(&format!("Resolved {coordinate} from the workspace"));
                return Ok(descriptor.clone());
            }
        }

        for repository in &self.repositories {
            match repository.read_descriptor(coordinate) {
                Ok(Some(descriptor)) => {
                    self.listener.info(&format!(
                        "Resolved {coordinate} from repository `{}`",
                        repository.id()
                    ));
                    return Ok(descriptor);
                }
                Ok(None) => continue,
                Err(source) => {
                    return Err(CollectError::Descriptor {
                        coordinate: coordinate.clone(),
                        source,
                    })
                }
            }
        }

        Err(CollectError::NotFound(coordinate.clone()))
    }
}

/// Maven dependency mediation over a raw tree. A breadth-first,
/// left-to-right sweep claims one winning node per (group, artifact): the
/// shallowest occurrence, first declared on ties. Pruning then keeps
/// exactly the claimed occurrences; every other occurrence is dropped
/// with its whole subtree.
fn mediate(raw: &Dependency) -> Dependency {
    let mut winners: HashMap<ArtifactKey, &Dependency> = HashMap::new();
    let mut queue = VecDeque::from([raw]);
    while let Some(node) = queue.pop_front() {
        winners.entry(node.coordinate.key()).or_insert(node);
        queue.extend(&node.dependencies);
    }

    Dependency {
        coordinate: raw.coordinate.clone(),
        scope: raw.scope.clone(),
        dependencies: raw
            .dependencies
            .iter()
            .filter_map(|d| prune(d, &winners))
            .collect(),
    }
}

fn prune(node: &Dependency, winners: &HashMap<ArtifactKey, &Dependency>) -> Option<Dependency> {
    let winner = winners[&node.coordinate.key()];
    if !std::ptr::eq(winner, node) {
        return None;
    }
    Some(Dependency {
        coordinate: node.coordinate.clone(),
        scope: node.scope.clone(),
        dependencies: node
            .dependencies
            .iter()
            .filter_map(|d| prune(d, winners))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{listener::LogListener, model::project::DeclaredDependency};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct InMemoryRepository {
        id: String,
        descriptors: HashMap<Coordinate, Vec<DeclaredDependency>>,
        reads: Cell<usize>,
    }

    impl InMemoryRepository {
        fn new(artifacts: Vec<(&str, Vec<&str>)>) -> InMemoryRepository {
            let descriptors = artifacts
                .into_iter()
                .map(|(coordinate, dependencies)| {
                    (
                        coordinate.parse().unwrap(),
                        dependencies.into_iter().map(dep).collect(),
                    )
                })
                .collect();
            InMemoryRepository {
                id: "memory".to_string(),
                descriptors,
                reads: Cell::new(0),
            }
        }
    }

    impl DescriptorReader for InMemoryRepository {
        fn id(&self) -> &str {
            &self.id
        }

        fn read_descriptor(
            &self,
            coordinate: &Coordinate,
        ) -> Result<Option<ArtifactDescriptor>, RepositoryError> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.descriptors.get(coordinate).map(|dependencies| {
                ArtifactDescriptor {
                    coordinate: coordinate.clone(),
                    dependencies: dependencies.clone(),
                }
            }))
        }
    }

    fn dep(coordinate: &str) -> DeclaredDependency {
        DeclaredDependency {
            coordinate: coordinate.parse().unwrap(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    fn descriptor(coordinate: &str, dependencies: Vec<&str>) -> ArtifactDescriptor {
        ArtifactDescriptor {
            coordinate: coordinate.parse().unwrap(),
            dependencies: dependencies.into_iter().map(dep).collect(),
        }
    }

    fn node(coordinate: &str, dependencies: Vec<Dependency>) -> Dependency {
        Dependency {
            coordinate: coordinate.parse().unwrap(),
            scope: DEFAULT_SCOPE.to_string(),
            dependencies,
        }
    }

    #[test]
    fn nearest_version_wins_over_transitive() {
        let repository = InMemoryRepository::new(vec![
            ("org.example:lib:1", vec!["junit:junit:3.8.1"]),
            ("junit:junit:3.8.1", vec![]),
            ("junit:junit:4.10", vec![]),
        ]);
        let mut session = RepositorySession::new(&LogListener);
        session.add_repository(&repository);

        let tree = session
            .collect(&descriptor(
                "org.example:app:1",
                vec!["org.example:lib:1", "junit:junit:4.10"],
            ))
            .unwrap();

        assert_eq!(
            tree,
            node(
                "org.example:app:1",
                vec![
                    node("org.example:lib:1", vec![]),
                    node("junit:junit:4.10", vec![]),
                ]
            )
        );
    }

    #[test]
    fn first_declared_wins_on_equal_depth() {
        let repository = InMemoryRepository::new(vec![
            ("org.example:first:1", vec!["org.example:x:1"]),
            ("org.example:second:1", vec!["org.example:x:2"]),
            ("org.example:x:1", vec![]),
            ("org.example:x:2", vec![]),
        ]);
        let mut session = RepositorySession::new(&LogListener);
        session.add_repository(&repository);

        let tree = session
            .collect(&descriptor(
                "org.example:app:1",
                vec!["org.example:first:1", "org.example:second:1"],
            ))
            .unwrap();

        assert_eq!(
            tree,
            node(
                "org.example:app:1",
                vec![
                    node("org.example:first:1", vec![node("org.example:x:1", vec![])]),
                    node("org.example:second:1", vec![]),
                ]
            )
        );
    }

    #[test]
    fn duplicate_artifact_is_kept_at_its_nearest_occurrence_only() {
        let repository = InMemoryRepository::new(vec![
            ("org.example:lib:1", vec!["org.example:x:1"]),
            ("org.example:x:1", vec![]),
        ]);
        let mut session = RepositorySession::new(&LogListener);
        session.add_repository(&repository);

        let tree = session
            .collect(&descriptor(
                "org.example:app:1",
                vec!["org.example:lib:1", "org.example:x:1"],
            ))
            .unwrap();

        assert_eq!(
            tree,
            node(
                "org.example:app:1",
                vec![
                    node("org.example:lib:1", vec![]),
                    node("org.example:x:1", vec![]),
                ]
            )
        );
    }

    #[test]
    fn dependency_cycles_are_truncated() {
        let repository = InMemoryRepository::new(vec![
            ("org.example:a:1", vec!["org.example:b:1"]),
            ("org.example:b:1", vec!["org.example:a:1"]),
        ]);
        let mut session = RepositorySession::new(&LogListener);
        session.add_repository(&repository);

        let tree = session
            .collect(&descriptor("org.example:app:1", vec!["org.example:a:1"]))
            .unwrap();

        assert_eq!(
            tree,
            node(
                "org.example:app:1",
                vec![node(
                    "org.example:a:1",
                    vec![node("org.example:b:1", vec![])]
                )]
            )
        );
    }

    #[test]
    fn unresolvable_artifact_fails_collection() {
        let repository = InMemoryRepository::new(vec![]);
        let mut session = RepositorySession::new(&LogListener);
        session.add_repository(&repository);

        let result = session.collect(&descriptor(
            "org.example:app:1",
            vec!["org.example:ghost:1"],
        ));
        assert!(matches!(result, Err(CollectError::NotFound(c)) if c.artifact_id == "ghost"));
    }

    #[test]
    fn descriptors_are_looked_up_once_per_session() {
        let repository = InMemoryRepository::new(vec![
            ("org.example:a:1", vec!["org.example:shared:1"]),
            ("org.example:b:1", vec!["org.example:shared:1"]),
            ("org.example:shared:1", vec![]),
        ]);
        let mut session = RepositorySession::new(&LogListener);
        session.add_repository(&repository);

        session
            .collect(&descriptor(
                "org.example:app:1",
                vec!["org.example:a:1", "org.example:b:1"],
            ))
            .unwrap();

        // a, b and shared: one read each, even though shared is reachable
        // twice.
        assert_eq!(repository.reads.get(), 3);
    }

    #[test]
    fn repositories_are_consulted_in_configured_order() {
        let first = InMemoryRepository::new(vec![("org.example:x:1", vec![])]);
        let second = InMemoryRepository::new(vec![("org.example:x:1", vec!["junit:junit:3.8.1"])]);
        let mut session = RepositorySession::new(&LogListener);
        session.add_repository(&first);
        session.add_repository(&second);

        let tree = session
            .collect(&descriptor("org.example:app:1", vec!["org.example:x:1"]))
            .unwrap();

        // The first repository's childless descriptor wins; the second is
        // never reached for x.
        assert_eq!(
            tree,
            node("org.example:app:1", vec![node("org.example:x:1", vec![])])
        );
        assert_eq!(second.reads.get(), 0);
    }
}
