//! Artifact domain model

use serde::{Deserialize, Serialize};

/// What an artifact is published as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Build output, fetchable by downstream jobs
    Build,
    /// Test report, rendered by the server's test tab
    Test,
}

/// A file or directory published by a job
///
/// Equality over the full (kind, source, destination) triple drives the
/// set semantics of [`Job::ensure_artifacts`](crate::core::Job::ensure_artifacts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,

    /// Source path relative to the job's working directory
    pub source: String,

    /// Destination path on the server; defaults to the artifact root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

impl Artifact {
    /// A build artifact copied to `destination`
    pub fn build(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Artifact {
            kind: ArtifactKind::Build,
            source: source.into(),
            destination: Some(destination.into()),
        }
    }

    /// A test report published at the artifact root
    pub fn test(source: impl Into<String>) -> Self {
        Artifact {
            kind: ArtifactKind::Test,
            source: source.into(),
            destination: None,
        }
    }
}
