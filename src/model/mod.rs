use thiserror::Error;

pub mod artifact;
pub mod graph;
pub mod project;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading descriptor toml: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Missing TOML key `{0}` while parsing")]
    MissingKey(String),
    #[error("Invalid artifact coordinate `{0}`, expected `group:artifact:version`")]
    InvalidCoordinate(String),
    #[error("Invalid sub-module path `{0}`")]
    InvalidModulePath(String),
}
