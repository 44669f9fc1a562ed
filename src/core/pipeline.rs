//! Pipeline and pipeline-group domain models

use crate::core::{material::Material, stage::Stage};
use serde::{Deserialize, Serialize};

/// A named variable injected into every job of a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,

    /// Plain value, or the plaintext of a secure variable. Secure values
    /// travel unencrypted in the declared configuration; the server
    /// encrypts them at rest.
    pub value: String,

    #[serde(default)]
    pub secure: bool,
}

/// A named unit of the delivery topology: materials, variables, stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,

    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Pipeline {
            name: name.into(),
            materials: Vec::new(),
            environment_variables: Vec::new(),
            stages: Vec::new(),
        }
    }

    /// Set the pipeline's git material, replacing any existing one
    pub fn set_git_url(&mut self, url: &str) -> &mut Self {
        self.materials
            .retain(|m| !matches!(m, Material::Git { .. }));
        self.materials.insert(0, Material::git(url));
        self
    }

    /// The git material's URL, if one is declared
    pub fn git_url(&self) -> Option<&str> {
        self.materials.iter().find_map(|m| match m {
            Material::Git { url, .. } => Some(url.as_str()),
            _ => None,
        })
    }

    /// Declare a material; identical re-declarations are ignored
    pub fn ensure_material(&mut self, material: Material) -> &mut Self {
        if !self.materials.contains(&material) {
            self.materials.push(material);
        }
        self
    }

    /// Upsert plain environment variables, keeping declaration order
    pub fn ensure_environment_variables(&mut self, vars: &[(&str, &str)]) -> &mut Self {
        for (name, value) in vars {
            self.upsert_variable(name, value, false);
        }
        self
    }

    /// Upsert secure environment variables (values sent in plaintext,
    /// encrypted server-side)
    pub fn ensure_secure_environment_variables(&mut self, vars: &[(&str, &str)]) -> &mut Self {
        for (name, value) in vars {
            self.upsert_variable(name, value, true);
        }
        self
    }

    fn upsert_variable(&mut self, name: &str, value: &str, secure: bool) {
        if let Some(var) = self
            .environment_variables
            .iter_mut()
            .find(|v| v.name == name)
        {
            var.value = value.to_string();
            var.secure = secure;
            return;
        }
        self.environment_variables.push(EnvironmentVariable {
            name: name.to_string(),
            value: value.to_string(),
            secure,
        });
    }

    /// Look up a variable by name
    pub fn environment_variable(&self, name: &str) -> Option<&EnvironmentVariable> {
        self.environment_variables.iter().find(|v| v.name == name)
    }

    /// Get or create a stage by name, preserving stage order
    pub fn ensure_stage(&mut self, name: &str) -> &mut Stage {
        if let Some(index) = self.stages.iter().position(|s| s.name == name) {
            return &mut self.stages[index];
        }
        self.stages.push(Stage::new(name));
        self.stages.last_mut().unwrap()
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Names of the upstream pipelines this pipeline is triggered by
    pub fn upstream_pipelines(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().filter_map(Material::upstream_pipeline)
    }
}

/// A named bucket of related pipelines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineGroup {
    pub name: String,

    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
}

impl PipelineGroup {
    pub fn new(name: impl Into<String>) -> Self {
        PipelineGroup {
            name: name.into(),
            pipelines: Vec::new(),
        }
    }

    /// Get or create a pipeline, keeping an existing definition intact
    pub fn ensure_pipeline(&mut self, name: &str) -> &mut Pipeline {
        if let Some(index) = self.pipelines.iter().position(|p| p.name == name) {
            return &mut self.pipelines[index];
        }
        self.pipelines.push(Pipeline::new(name));
        self.pipelines.last_mut().unwrap()
    }

    /// Get or create a pipeline, resetting any existing definition
    ///
    /// This is the call the topology builders use: the declared pipeline
    /// fully replaces whatever the server had under the same name.
    pub fn ensure_replacement_of_pipeline(&mut self, name: &str) -> &mut Pipeline {
        if let Some(index) = self.pipelines.iter().position(|p| p.name == name) {
            self.pipelines[index] = Pipeline::new(name);
            return &mut self.pipelines[index];
        }
        self.pipelines.push(Pipeline::new(name));
        self.pipelines.last_mut().unwrap()
    }

    pub fn pipeline(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| p.name == name)
    }
}
