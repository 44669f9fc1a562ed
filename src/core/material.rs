//! Material domain model
//!
//! A material is what triggers a pipeline: either a source repository or
//! the completion of an upstream pipeline's stage.

use serde::{Deserialize, Serialize};

/// An upstream trigger source for a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Material {
    /// A git repository
    Git {
        url: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
    },

    /// Completion of an upstream pipeline's stage
    Pipeline {
        /// Upstream pipeline name
        pipeline: String,

        /// Stage whose completion triggers this pipeline
        stage: String,

        /// Optional material alias; preserved literally even where it
        /// mirrors the pipeline name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl Material {
    /// Create a git material tracking the default branch
    pub fn git(url: impl Into<String>) -> Self {
        Material::Git {
            url: url.into(),
            branch: None,
        }
    }

    /// Create an upstream-pipeline material
    pub fn pipeline(pipeline: impl Into<String>, stage: impl Into<String>) -> Self {
        Material::Pipeline {
            pipeline: pipeline.into(),
            stage: stage.into(),
            name: None,
        }
    }

    /// Create an upstream-pipeline material with an explicit alias
    pub fn pipeline_named(
        pipeline: impl Into<String>,
        stage: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Material::Pipeline {
            pipeline: pipeline.into(),
            stage: stage.into(),
            name: Some(name.into()),
        }
    }

    /// The upstream pipeline name, if this is a pipeline material
    pub fn upstream_pipeline(&self) -> Option<&str> {
        match self {
            Material::Pipeline { pipeline, .. } => Some(pipeline),
            Material::Git { .. } => None,
        }
    }
}
