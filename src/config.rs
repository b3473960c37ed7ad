use std::{collections::HashMap, path::PathBuf};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub struct DepgraphConfig {
    pub repository_dir: Option<PathBuf>,
    pub descriptor_file: Option<PathBuf>,
}

impl DepgraphConfig {
    pub fn load() -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(None)?;

        Ok(Self {
            repository_dir: raw_config.repository.dir,
            descriptor_file: raw_config.descriptor.file,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    repository: RepositoryConfig,
    #[serde(default)]
    descriptor: DescriptorConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RepositoryConfig {
    dir: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct DescriptorConfig {
    file: Option<PathBuf>,
}

impl RawConfig {
    fn load(env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("DEPGRAPH")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn load_empty() {
        let env = HashMap::from([]);
        let config = RawConfig::load(Some(env)).unwrap();
        assert_eq!(
            config,
            RawConfig {
                repository: RepositoryConfig { dir: None },
                descriptor: DescriptorConfig { file: None }
            }
        )
    }

    #[test]
    fn load_environment() {
        let env = HashMap::from([
            (
                "DEPGRAPH_REPOSITORY_DIR".to_owned(),
                "/repository".to_owned(),
            ),
            (
                "DEPGRAPH_DESCRIPTOR_FILE".to_owned(),
                "module.toml".to_owned(),
            ),
        ]);
        let config = RawConfig::load(Some(env)).unwrap();
        assert_eq!(
            config,
            RawConfig {
                repository: RepositoryConfig {
                    dir: Some(PathBuf::from("/repository"))
                },
                descriptor: DescriptorConfig {
                    file: Some(PathBuf::from("module.toml"))
                }
            }
        )
    }
}
