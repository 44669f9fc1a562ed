//! pricing service pipelines

use super::{create_pipeline, declare_deployment};
use crate::core::{Artifact, CruiseConfig, Material, Task};
use crate::settings::CfCredentials;

pub(super) fn build(mut config: CruiseConfig, credentials: &CfCredentials) -> CruiseConfig {
    let pipeline = create_pipeline(&mut config, "pricing", "pricing_unit_tests", None);
    pipeline.set_git_url("https://github.com/ThoughtWorks-AELab/pretend_pricing_service");
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::bash("bundle install --path vendor/bundle"));
    job.add_task(Task::bash("bundle exec rake db:migrate"));
    job.add_task(Task::bash("bundle exec rake spec:unit"));
    job.ensure_artifacts([Artifact::test("spec/reports")]);
    job.ensure_artifacts([Artifact::build("*", "pricing_build")]);

    // The pricing functional suite runs in-place against a PREFIX-scoped
    // environment; there is nothing to deploy or tear down.
    let pipeline = create_pipeline(
        &mut config,
        "pricing",
        "pricing_functional_tests",
        Some(credentials),
    );
    pipeline.ensure_material(Material::pipeline("pricing_unit_tests", "test"));
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::fetch_dir(
        "pricing_unit_tests",
        "test",
        "test",
        "pricing_build",
    ));
    job.add_task(
        Task::bash("PREFIX=$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER bundle exec rake spec:functional")
            .with_working_dir("pricing_build"),
    );
    job.ensure_artifacts([
        Artifact::build("pricing_build/*", "pricing_build"),
        Artifact::test("pricing_build/spec/reports"),
    ]);

    declare_deployment(&mut config, "pricing", "pricing", credentials);

    config
}
