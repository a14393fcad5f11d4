//! Dependency coordinate decoding
//!
//! Maven prints coordinates as colon-separated fields. The number of fields
//! determines the layout:
//!
//! | Fields | Layout |
//! |--------|--------|
//! | 4 | `group:artifact:type:version` |
//! | 5 | `group:artifact:type:version:scope` |
//! | 6+ | `group:artifact:type:classifier:version:scope` |
//!
//! The 6-field form puts the classifier *before* the version. That is how
//! the dependency plugin prints classified artifacts and is preserved here.

use crate::error::{PomlensError, PomlensResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum number of colon-separated fields in a coordinate
const MIN_FIELDS: usize = 4;

/// A decoded dependency coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    /// Packaging type (`jar`, `pom`, `war`, ...)
    #[serde(rename = "type")]
    pub packaging: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

/// A flat dependency record, as produced by the list parser
pub type ResolvedDependency = DependencyCoordinate;

impl DependencyCoordinate {
    /// Decode a coordinate string
    ///
    /// Fails when there are fewer than four fields or a required field is
    /// empty. Fields past the sixth are ignored.
    pub fn decode(input: &str) -> PomlensResult<Self> {
        let fields: Vec<&str> = input.split(':').map(str::trim).collect();

        let coordinate = match fields.len() {
            n if n < MIN_FIELDS => {
                return Err(PomlensError::Decode {
                    input: input.to_string(),
                    reason: format!("expected at least {} fields, found {}", MIN_FIELDS, n),
                });
            }
            4 => Self {
                group_id: fields[0].to_string(),
                artifact_id: fields[1].to_string(),
                packaging: fields[2].to_string(),
                version: fields[3].to_string(),
                scope: None,
                classifier: None,
            },
            5 => Self {
                group_id: fields[0].to_string(),
                artifact_id: fields[1].to_string(),
                packaging: fields[2].to_string(),
                version: fields[3].to_string(),
                scope: Some(fields[4].to_string()),
                classifier: None,
            },
            _ => Self {
                group_id: fields[0].to_string(),
                artifact_id: fields[1].to_string(),
                packaging: fields[2].to_string(),
                classifier: Some(fields[3].to_string()),
                version: fields[4].to_string(),
                scope: Some(fields[5].to_string()),
            },
        };

        if let Some(name) = coordinate.first_empty_required() {
            return Err(PomlensError::Decode {
                input: input.to_string(),
                reason: format!("{} is empty", name),
            });
        }

        Ok(coordinate)
    }

    /// The `(groupId, artifactId)` identity used for de-duplication
    pub fn key(&self) -> (&str, &str) {
        (&self.group_id, &self.artifact_id)
    }

    fn first_empty_required(&self) -> Option<&'static str> {
        [
            ("groupId", &self.group_id),
            ("artifactId", &self.artifact_id),
            ("type", &self.packaging),
            ("version", &self.version),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

impl FromStr for DependencyCoordinate {
    type Err = PomlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.packaging)?;
        match (&self.classifier, &self.scope) {
            (Some(classifier), Some(scope)) => {
                write!(f, ":{}:{}:{}", classifier, self.version, scope)
            }
            (Some(classifier), None) => write!(f, ":{}:{}", classifier, self.version),
            (None, Some(scope)) => write!(f, ":{}:{}", self.version, scope),
            (None, None) => write!(f, ":{}", self.version),
        }
    }
}
