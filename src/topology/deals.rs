//! deals service pipelines
//!
//! deals runs its functional suite against a live pricing instance, so
//! the functional_tests pipeline is triggered by pricing's functional
//! pipeline as well and deploys both services into the ephemeral
//! environment.

use super::{create_pipeline, declare_deployment, parallel_rake};
use crate::core::{Artifact, CruiseConfig, Material, RunIf, Task};
use crate::settings::CfCredentials;

pub(super) fn build(mut config: CruiseConfig, credentials: &CfCredentials) -> CruiseConfig {
    let pipeline = create_pipeline(&mut config, "deals", "deals_unit_tests", None);
    pipeline.set_git_url("https://github.com/ThoughtWorks-AELab/pretend_deals_service");
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::bash(
        "bundle install --path vendor/bundle --without production",
    ));
    job.add_task(Task::bash("bundle exec rake spec:unit"));
    job.ensure_artifacts([Artifact::test("spec/reports")]);
    job.ensure_artifacts([Artifact::build("*", "deals_build")]);

    let pipeline = create_pipeline(
        &mut config,
        "deals",
        "deals_functional_tests",
        Some(credentials),
    );
    pipeline.ensure_material(Material::pipeline_named(
        "pricing_functional_tests",
        "test",
        "pricing_functional_tests",
    ));
    pipeline.ensure_material(Material::pipeline("deals_unit_tests", "test"));
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::fetch_dir(
        "pricing_functional_tests",
        "test",
        "test",
        "pricing_build",
    ));
    job.add_task(Task::fetch_dir(
        "deals_unit_tests",
        "test",
        "test",
        "deals_build",
    ));
    job.add_task(Task::bash(parallel_rake(
        "cf:cups",
        &["pricing_build", "deals_build"],
    )));
    job.add_task(Task::bash(parallel_rake(
        "cf:deploy",
        &["pricing_build", "deals_build"],
    )));
    job.add_task(
        Task::bash("BASE_URL=http://$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER-deals.cfapps.io bundle exec rake spec:functional")
            .with_working_dir("deals_build"),
    );
    job.add_task(
        Task::bash(parallel_rake("cf:delete", &["pricing_build", "deals_build"]))
            .with_run_if(RunIf::Any),
    );
    job.add_task(
        Task::bash(parallel_rake("cf:dups", &["pricing_build", "deals_build"]))
            .with_run_if(RunIf::Any),
    );
    job.ensure_artifacts([
        Artifact::build("deals_build/*", "deals_build"),
        Artifact::build("pricing_build/*", "pricing_build"),
        Artifact::test("deals_build/spec/reports"),
    ]);

    declare_deployment(&mut config, "deals", "deals", credentials);

    config
}
