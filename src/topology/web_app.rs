//! web_app pipelines
//!
//! The web app fronts every other service, so its functional_tests
//! pipeline is triggered by catalog's and deals' functional pipelines
//! and deploys the full four-service stack into the ephemeral
//! environment. The pricing build travels via deals' re-published
//! artifacts rather than straight from pricing.

use super::{create_pipeline, declare_deployment, parallel_rake};
use crate::core::{Artifact, CruiseConfig, Material, RunIf, Task};
use crate::settings::CfCredentials;

const ALL_BUILDS: [&str; 4] = [
    "catalog_build",
    "pricing_build",
    "deals_build",
    "web_app_build",
];

pub(super) fn build(mut config: CruiseConfig, credentials: &CfCredentials) -> CruiseConfig {
    let pipeline = create_pipeline(
        &mut config,
        "web_app",
        "web_app_unit_tests",
        Some(credentials),
    );
    pipeline.set_git_url("https://github.com/ThoughtWorks-AELab/pretend_web_app");
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::bash(
        "bundle install --path vendor/bundle --without production",
    ));
    job.add_task(Task::bash("bundle exec rake spec:unit"));
    job.ensure_artifacts([Artifact::test("spec/reports")]);
    job.ensure_artifacts([Artifact::build("*", "web_app_build")]);

    let pipeline = create_pipeline(
        &mut config,
        "web_app",
        "web_app_functional_tests",
        Some(credentials),
    );
    pipeline.ensure_material(Material::pipeline_named(
        "catalog_functional_tests",
        "test",
        "catalog_functional_tests",
    ));
    pipeline.ensure_material(Material::pipeline_named(
        "deals_functional_tests",
        "test",
        "deals_functional_tests",
    ));
    pipeline.ensure_material(Material::pipeline("web_app_unit_tests", "test"));
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::fetch_dir(
        "catalog_functional_tests",
        "test",
        "test",
        "catalog_build",
    ));
    job.add_task(Task::fetch_dir(
        "deals_functional_tests",
        "test",
        "test",
        "pricing_build",
    ));
    job.add_task(Task::fetch_dir(
        "deals_functional_tests",
        "test",
        "test",
        "deals_build",
    ));
    job.add_task(Task::fetch_dir(
        "web_app_unit_tests",
        "test",
        "test",
        "web_app_build",
    ));
    job.add_task(Task::bash(parallel_rake("cf:cups", &ALL_BUILDS)));
    job.add_task(Task::bash(parallel_rake("cf:deploy", &ALL_BUILDS)));
    job.add_task(
        Task::bash("BASE_URL=http://$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER-web-app.cfapps.io bundle exec rake spec:functional")
            .with_working_dir("web_app_build"),
    );
    job.add_task(Task::bash(parallel_rake("cf:delete", &ALL_BUILDS)).with_run_if(RunIf::Any));
    job.add_task(Task::bash(parallel_rake("cf:dups", &ALL_BUILDS)).with_run_if(RunIf::Any));
    job.ensure_artifacts([
        Artifact::build("catalog_build/*", "catalog_build"),
        Artifact::build("pricing_build/*", "pricing_build"),
        Artifact::build("deals_build/*", "deals_build"),
        Artifact::build("web_app_build/*", "web_app_build"),
        Artifact::test("web_app_build/spec/reports"),
    ]);

    declare_deployment(&mut config, "web_app", "web_app", credentials);

    config
}
