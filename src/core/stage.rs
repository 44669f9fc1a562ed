//! Stage and job domain models

use crate::core::{artifact::Artifact, task::Task};
use serde::{Deserialize, Serialize};

/// How a stage is triggered once its materials are satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approval {
    /// Triggers automatically when the previous stage (or material) passes
    #[default]
    Success,
    /// Requires an explicit operator action; never auto-triggers
    Manual,
}

/// A named, ordered unit of execution within a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,

    #[serde(default)]
    pub approval: Approval,

    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Stage {
            name: name.into(),
            approval: Approval::default(),
            jobs: Vec::new(),
        }
    }

    /// Gate this stage behind a manual approval
    pub fn set_manual_approval(&mut self) -> &mut Self {
        self.approval = Approval::Manual;
        self
    }

    pub fn requires_manual_approval(&self) -> bool {
        self.approval == Approval::Manual
    }

    /// Get or create a job by name
    pub fn ensure_job(&mut self, name: &str) -> &mut Job {
        if let Some(index) = self.jobs.iter().position(|j| j.name == name) {
            return &mut self.jobs[index];
        }
        self.jobs.push(Job::new(name));
        self.jobs.last_mut().unwrap()
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.name == name)
    }
}

/// A named unit of work: an ordered task sequence plus declared artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,

    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Job {
            name: name.into(),
            tasks: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Append a task to the job's sequence
    pub fn add_task(&mut self, task: Task) -> &mut Self {
        self.tasks.push(task);
        self
    }

    /// Declare artifacts with set semantics: duplicates collapse, first
    /// declaration keeps its position
    pub fn ensure_artifacts(&mut self, artifacts: impl IntoIterator<Item = Artifact>) -> &mut Self {
        for artifact in artifacts {
            if !self.artifacts.contains(&artifact) {
                self.artifacts.push(artifact);
            }
        }
        self
    }
}
