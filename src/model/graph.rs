use serde::Serialize;

use crate::{
    model::artifact::{ArtifactKey, Coordinate},
    visitor::ModuleVisitor,
};

/// One buildable unit of the analyzed project: its identity, its mediated
/// dependency tree and its nested sub-modules in declared order.
///
/// Constructed exactly once per analysis run and immutable afterwards. The
/// dependency tree's root identity always equals the module's own identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub coordinate: Coordinate,
    pub dependency_tree: Dependency,
    pub sub_modules: Vec<Module>,
}

impl Module {
    /// Drives a full depth-first traversal: the module itself first, then
    /// each sub-module in declared order. There is no early halt.
    pub fn accept(&self, visitor: &mut dyn ModuleVisitor) {
        visitor.visit(self);
        for sub_module in &self.sub_modules {
            sub_module.accept(visitor);
        }
    }
}

/// A node in a resolved dependency tree. Children are the node's own
/// transitive dependencies, already mediated, in resolution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub coordinate: Coordinate,
    pub scope: String,
    pub dependencies: Vec<Dependency>,
}

impl Dependency {
    pub fn new(coordinate: Coordinate, scope: impl Into<String>) -> Dependency {
        Dependency {
            coordinate,
            scope: scope.into(),
            dependencies: vec![],
        }
    }

    /// Finds the node resolved for the given (group, artifact) anywhere in
    /// this subtree, the node itself included.
    pub fn find(&self, key: &ArtifactKey) -> Option<&Dependency> {
        if self.coordinate.key() == *key {
            return Some(self);
        }
        self.dependencies.iter().find_map(|d| d.find(key))
    }
}
