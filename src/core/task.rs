//! Task domain model

use serde::{Deserialize, Serialize};

/// Run condition for a task within a job
///
/// Controls whether the task runs depending on the outcome of the tasks
/// before it in the same job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunIf {
    /// Run only if every prior task in the job passed (server default)
    #[default]
    Passed,
    /// Run only if a prior task failed
    Failed,
    /// Run regardless of prior outcome (teardown/cleanup tasks)
    Any,
}

/// Source of a fetched artifact: a whole directory or a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    Dir(String),
    File(String),
}

/// A single task in a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Task {
    /// Shell command executed by the agent
    Exec {
        /// Full command vector handed to the agent
        command: Vec<String>,

        /// Working directory relative to the agent's sandbox
        #[serde(default, skip_serializing_if = "Option::is_none")]
        working_dir: Option<String>,

        /// Run condition
        #[serde(default)]
        run_if: RunIf,
    },

    /// Fetch an artifact published by an upstream pipeline's job
    FetchArtifact {
        /// Upstream pipeline name
        pipeline: String,

        /// Stage within the upstream pipeline
        stage: String,

        /// Job within that stage
        job: String,

        /// Artifact directory or file to fetch
        source: FetchSource,

        /// Destination within the working directory
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
    },
}

impl Task {
    /// Create an exec task running `command` through a login shell
    ///
    /// The command is composed as `/bin/bash -l -c <command>` so agent
    /// profiles (rvm, PATH) are loaded before the command runs.
    pub fn bash(command: impl Into<String>) -> Self {
        Task::Exec {
            command: vec![
                "/bin/bash".to_string(),
                "-l".to_string(),
                "-c".to_string(),
                command.into(),
            ],
            working_dir: None,
            run_if: RunIf::default(),
        }
    }

    /// Create a fetch task for an upstream artifact directory
    pub fn fetch_dir(
        pipeline: impl Into<String>,
        stage: impl Into<String>,
        job: impl Into<String>,
        dir: impl Into<String>,
    ) -> Self {
        Task::FetchArtifact {
            pipeline: pipeline.into(),
            stage: stage.into(),
            job: job.into(),
            source: FetchSource::Dir(dir.into()),
            destination: None,
        }
    }

    /// Create a fetch task for a single upstream artifact file
    pub fn fetch_file(
        pipeline: impl Into<String>,
        stage: impl Into<String>,
        job: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Task::FetchArtifact {
            pipeline: pipeline.into(),
            stage: stage.into(),
            job: job.into(),
            source: FetchSource::File(file.into()),
            destination: None,
        }
    }

    /// Set the working directory (exec tasks only)
    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        if let Task::Exec { working_dir, .. } = &mut self {
            *working_dir = Some(dir.into());
        }
        self
    }

    /// Override the run condition (exec tasks only)
    pub fn with_run_if(mut self, condition: RunIf) -> Self {
        if let Task::Exec { run_if, .. } = &mut self {
            *run_if = condition;
        }
        self
    }

    /// The run condition this task is declared with
    pub fn run_condition(&self) -> RunIf {
        match self {
            Task::Exec { run_if, .. } => *run_if,
            // Fetch tasks have no override; they follow the server default
            Task::FetchArtifact { .. } => RunIf::Passed,
        }
    }

    /// The shell command string, if this is an exec task
    pub fn shell_command(&self) -> Option<&str> {
        match self {
            Task::Exec { command, .. } => command.last().map(String::as_str),
            Task::FetchArtifact { .. } => None,
        }
    }
}
