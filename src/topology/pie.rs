//! PIE environment-lifecycle pipelines
//!
//! PIE (pretend integration environment) stands the full four-service
//! stack up from the last good web_app functional build, and tears it
//! down again. Both stages are manually gated; nothing here runs off an
//! upstream trigger.

use super::{create_pipeline, parallel_rake};
use crate::core::{CruiseConfig, Material, RunIf, Task};
use crate::settings::CfCredentials;

const ALL_BUILDS: [&str; 4] = [
    "catalog_build",
    "pricing_build",
    "deals_build",
    "web_app_build",
];

pub(super) fn build(mut config: CruiseConfig, credentials: &CfCredentials) -> CruiseConfig {
    let pipeline = create_pipeline(&mut config, "PIE", "PIE", Some(credentials));
    pipeline.ensure_material(Material::pipeline_named(
        "web_app_functional_tests",
        "test",
        "web_app_functional_tests",
    ));

    let stage = pipeline.ensure_stage("deploy");
    stage.set_manual_approval();
    let job = stage.ensure_job("deploy");
    for build_dir in ALL_BUILDS {
        job.add_task(Task::fetch_dir(
            "web_app_functional_tests",
            "test",
            "test",
            build_dir,
        ));
    }
    job.add_task(Task::bash(parallel_rake("cf:cups", &ALL_BUILDS)));
    job.add_task(Task::bash(parallel_rake("cf:deploy", &ALL_BUILDS)));

    let stage = pipeline.ensure_stage("destroy");
    stage.set_manual_approval();
    let job = stage.ensure_job("destroy");
    for build_dir in ALL_BUILDS {
        job.add_task(Task::fetch_dir(
            "web_app_functional_tests",
            "test",
            "test",
            build_dir,
        ));
    }
    job.add_task(Task::bash(parallel_rake("cf:delete", &ALL_BUILDS)).with_run_if(RunIf::Any));
    job.add_task(Task::bash(parallel_rake("cf:dups", &ALL_BUILDS)).with_run_if(RunIf::Any));

    config
}
