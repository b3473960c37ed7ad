mod fs;

pub use fs::FsRepository;

use thiserror::Error;

use crate::model::{artifact::Coordinate, project::ArtifactDescriptor, ParseError};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("IO error reading artifact descriptor: {0}")]
    IO(#[from] std::io::Error),
    #[error("Error parsing descriptor of {coordinate} in repository `{repository}`: {source}")]
    Descriptor {
        coordinate: Coordinate,
        repository: String,
        #[source]
        source: ParseError,
    },
    #[error(
        "Repository `{repository}` answered {found} for a lookup of {requested}"
    )]
    IdentityMismatch {
        requested: Coordinate,
        found: Coordinate,
        repository: String,
    },
}

/// A source of artifact descriptors, consulted in configured order after
/// the workspace reader. `Ok(None)` means the artifact is not present in
/// this repository and the next one is tried; only a present-but-broken
/// descriptor is an error.
pub trait DescriptorReader {
    /// Repository identifier used in events and errors.
    fn id(&self) -> &str;

    fn read_descriptor(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<ArtifactDescriptor>, RepositoryError>;
}
