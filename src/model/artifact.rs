use regex_lite::Regex;
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::Display,
    path::PathBuf,
    str::FromStr,
};

use crate::model::ParseError;

/// The (group, artifact, version) triple uniquely naming a resolvable
/// artifact. Equality is structural; this is the dedup and lookup key for
/// every resolution step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Coordinate {
        Coordinate {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// The versionless (group, artifact) pair, used as the conflict key
    /// during dependency mediation.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
        }
    }

    /// Repository-layout path of this artifact: group segments as
    /// directories, then artifact and version.
    pub fn to_path(&self) -> PathBuf {
        let mut result = PathBuf::new();

        for segment in self.group_id.split('.') {
            result.push(segment);
        }
        result.push(&self.artifact_id);
        result.push(&self.version);

        result
    }
}

impl FromStr for Coordinate {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let re: Regex =
            Regex::new(r"^(?P<group>[^:\s]+):(?P<artifact>[^:\s]+):(?P<version>[^:\s]+)$").unwrap();
        let captures = re
            .captures(value)
            .ok_or_else(|| ParseError::InvalidCoordinate(value.to_string()))?;

        Ok(Coordinate {
            group_id: captures["group"].to_string(),
            artifact_id: captures["artifact"].to_string(),
            version: captures["version"].to_string(),
        })
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id, self.artifact_id, self.version
        )
    }
}

impl Serialize for Coordinate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CoordinateVisitor;

        impl Visitor<'_> for CoordinateVisitor {
            type Value = Coordinate;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a `group:artifact:version` string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Coordinate::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(CoordinateVisitor)
    }
}

/// A versionless (group, artifact) pair. At most one version per key
/// survives mediation within a single dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ArtifactKey {
    pub group_id: String,
    pub artifact_id: String,
}

impl Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_coordinate() {
        assert_eq!(
            Coordinate::from_str("org.apache.maven:maven-model:3.0.4").unwrap(),
            Coordinate::new("org.apache.maven", "maven-model", "3.0.4")
        );
    }

    #[test]
    fn parse_coordinate_missing_version() {
        assert!(Coordinate::from_str("org.apache.maven:maven-model").is_err());
    }

    #[test]
    fn parse_coordinate_empty_component() {
        assert!(Coordinate::from_str("org.apache.maven::3.0.4").is_err());
    }

    #[test]
    fn coordinate_display_round_trip() {
        let coordinate = Coordinate::new("junit", "junit", "4.10");
        assert_eq!(
            Coordinate::from_str(&coordinate.to_string()).unwrap(),
            coordinate
        );
    }

    #[test]
    fn coordinate_repository_path() {
        let coordinate = Coordinate::new("org.apache.commons", "commons-skin", "3");
        assert_eq!(
            coordinate.to_path(),
            PathBuf::from("org/apache/commons/commons-skin/3")
        );
    }

    #[test]
    fn coordinate_serializes_as_string() {
        let coordinate = Coordinate::new("junit", "junit", "3.8.1");
        assert_eq!(
            serde_json::to_string(&coordinate).unwrap(),
            r#""junit:junit:3.8.1""#
        );
        assert_eq!(
            serde_json::from_str::<Coordinate>(r#""junit:junit:3.8.1""#).unwrap(),
            coordinate
        );
    }
}
