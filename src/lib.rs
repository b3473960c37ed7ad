pub mod analyzer;
pub mod cli;
pub mod config;
pub mod listener;
pub mod model;
pub mod model_builder;
pub mod repository;
pub mod session;
pub mod visitor;
pub mod workspace;

mod api;

pub use api::{Depgraph, DepgraphBuilder};
