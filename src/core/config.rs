//! Whole-server configuration value
//!
//! [`CruiseConfig`] is the explicit configuration value the topology
//! builders thread through as an argument/return. It is what the client
//! fetches from and pushes back to the server, in one piece.

use crate::core::pipeline::{Pipeline, PipelineGroup};
use serde::{Deserialize, Serialize};

/// The server's full pipeline configuration: an ordered list of groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CruiseConfig {
    #[serde(default)]
    pub groups: Vec<PipelineGroup>,
}

impl CruiseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a pipeline group by name
    pub fn ensure_pipeline_group(&mut self, name: &str) -> &mut PipelineGroup {
        if let Some(index) = self.groups.iter().position(|g| g.name == name) {
            return &mut self.groups[index];
        }
        self.groups.push(PipelineGroup::new(name));
        self.groups.last_mut().unwrap()
    }

    /// Drop every pipeline group; the topology is rebuilt from scratch on
    /// each push
    pub fn remove_all_pipeline_groups(&mut self) {
        self.groups.clear();
    }

    pub fn group(&self, name: &str) -> Option<&PipelineGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Every pipeline with its owning group name, in declaration order
    pub fn pipelines(&self) -> impl Iterator<Item = (&str, &Pipeline)> {
        self.groups
            .iter()
            .flat_map(|g| g.pipelines.iter().map(move |p| (g.name.as_str(), p)))
    }

    /// Look a pipeline up by name across all groups
    ///
    /// Pipeline names are unique across the whole configuration (enforced
    /// by validation), so the first match is the only one.
    pub fn find_pipeline(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines().map(|(_, p)| p).find(|p| p.name == name)
    }

    pub fn pipeline_count(&self) -> usize {
        self.groups.iter().map(|g| g.pipelines.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_pipeline_group_is_an_upsert() {
        let mut config = CruiseConfig::new();
        config.ensure_pipeline_group("catalog").ensure_pipeline("a");
        config.ensure_pipeline_group("catalog").ensure_pipeline("b");
        config.ensure_pipeline_group("pricing");

        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.group("catalog").unwrap().pipelines.len(), 2);
    }

    #[test]
    fn test_remove_all_pipeline_groups() {
        let mut config = CruiseConfig::new();
        config.ensure_pipeline_group("catalog");
        config.ensure_pipeline_group("PIE");

        config.remove_all_pipeline_groups();
        assert!(config.groups.is_empty());
        assert_eq!(config, CruiseConfig::default());
    }

    #[test]
    fn test_find_pipeline_searches_all_groups() {
        let mut config = CruiseConfig::new();
        config
            .ensure_pipeline_group("catalog")
            .ensure_pipeline("catalog_unit_tests");
        config
            .ensure_pipeline_group("pricing")
            .ensure_pipeline("pricing_unit_tests");

        assert!(config.find_pipeline("pricing_unit_tests").is_some());
        assert!(config.find_pipeline("missing").is_none());
        assert_eq!(config.pipeline_count(), 2);
    }

    #[test]
    fn test_config_json_round_trip() {
        let mut config = CruiseConfig::new();
        let pipeline = config
            .ensure_pipeline_group("catalog")
            .ensure_pipeline("catalog_unit_tests");
        pipeline.set_git_url("https://example.com/catalog.git");
        pipeline
            .ensure_stage("test")
            .ensure_job("test")
            .add_task(crate::core::Task::bash("bundle exec rake spec:unit"));

        let json = serde_json::to_string(&config).unwrap();
        let back: CruiseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
