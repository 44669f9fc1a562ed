//! Test utility functions for cruiser

use cruiser::topology;
use cruiser::{CfCredentials, CruiseConfig};

/// Credentials used by every topology test
pub fn test_credentials() -> CfCredentials {
    CfCredentials::new("cf-user", "cf-pass")
}

/// The full topology, built against an empty configuration
pub fn build_topology() -> CruiseConfig {
    topology::build(CruiseConfig::default(), &test_credentials())
}

/// A configuration resembling what an already-configured server returns
pub fn legacy_config() -> CruiseConfig {
    let mut config = CruiseConfig::default();
    let pipeline = config
        .ensure_pipeline_group("legacy")
        .ensure_pipeline("old_pipeline");
    pipeline.set_git_url("https://example.com/old.git");
    pipeline.ensure_stage("build").ensure_job("build");
    config
}

#[test]
fn helpers_build_the_full_topology() {
    let config = build_topology();
    assert_eq!(config.groups.len(), 5);
    assert!(config.find_pipeline("PIE").is_some());
}
