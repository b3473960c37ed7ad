use std::error::Error;

use clap::Parser;
use depgraph::{
    cli::args::{CliArgs, Command},
    config::DepgraphConfig,
    model::graph::Module,
    visitor::{format_tree, ModuleVisitor},
    Depgraph,
};

fn run() -> Result<(), Box<dyn Error>> {
    let CliArgs {
        cmd,
        root,
        descriptor,
        repository_dir,
        repository,
    } = CliArgs::parse();
    let config = DepgraphConfig::load()?;

    let mut builder = Depgraph::builder().root(root);
    if let Some(descriptor) = descriptor.or(config.descriptor_file) {
        builder = builder.descriptor_file_name(descriptor);
    }
    if let Some(repository_dir) = repository_dir.or(config.repository_dir) {
        builder = builder.repository_dir(repository_dir);
    }
    for extra in repository {
        builder = builder.repository(extra);
    }
    let depgraph = builder.try_build()?;

    match cmd {
        Command::Analyze { json } => {
            let module = depgraph.analyze()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&module)?);
            } else {
                module.accept(&mut PrintingVisitor);
            }
            Ok(())
        }
        Command::Modules => {
            for (coordinate, dir) in depgraph.modules()? {
                println!("{coordinate} ({})", dir.display());
            }
            Ok(())
        }
        Command::Init { name } => depgraph.init(name),
    }
}

struct PrintingVisitor;

impl ModuleVisitor for PrintingVisitor {
    fn visit(&mut self, module: &Module) {
        println!("{}", format_tree(module));
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
