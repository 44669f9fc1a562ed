//! cruiser - declarative pipeline topology for a GoCD-style CI server

pub mod apply;
pub mod cli;
pub mod client;
pub mod core;
pub mod settings;
pub mod topology;

// Re-export commonly used types
pub use apply::{apply, ApplyError, ApplyOutcome};
pub use client::{
    ConfigStore, ConfigStoreError, ConfigVersion, HttpConfigStore, InMemoryConfigStore,
};
pub use self::core::{
    Approval, Artifact, ArtifactKind, CruiseConfig, EnvironmentVariable, Job, Material, Pipeline,
    PipelineGroup, RunIf, Stage, Task,
};
pub use settings::{CfCredentials, Settings};
