use std::fmt::Write;

use crate::{
    listener::ListenerLogger,
    model::graph::{Dependency, Module},
};

/// Traversal capability over a completed module tree. Implementations are
/// handed each module in depth-first, declared order by `Module::accept`
/// and may read the module's mediated dependency tree; they cannot mutate
/// it or halt the walk.
pub trait ModuleVisitor {
    fn visit(&mut self, module: &Module);
}

/// Emits each visited module's dependency tree through a listener, one
/// line per node.
pub struct LoggingModuleVisitor<'a> {
    listener: &'a dyn ListenerLogger,
}

impl<'a> LoggingModuleVisitor<'a> {
    pub fn new(listener: &'a dyn ListenerLogger) -> LoggingModuleVisitor<'a> {
        LoggingModuleVisitor { listener }
    }
}

impl ModuleVisitor for LoggingModuleVisitor<'_> {
    fn visit(&mut self, module: &Module) {
        for line in format_tree(module).lines() {
            self.listener.info(line);
        }
    }
}

/// Renders a module's mediated dependency tree in the familiar
/// `dependency:tree` text form, children connected with `+-` and `\-`.
pub fn format_tree(module: &Module) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", module.coordinate);
    format_children(&module.dependency_tree, "", &mut out);
    out
}

fn format_children(node: &Dependency, prefix: &str, out: &mut String) {
    let last = node.dependencies.len().saturating_sub(1);
    for (position, dependency) in node.dependencies.iter().enumerate() {
        let connector = if position == last { r"\-" } else { "+-" };
        let _ = writeln!(
            out,
            "{prefix}{connector} {} [{}]",
            dependency.coordinate, dependency.scope
        );
        let nested = if position == last {
            format!("{prefix}   ")
        } else {
            format!("{prefix}|  ")
        };
        format_children(dependency, &nested, out);
    }
}
