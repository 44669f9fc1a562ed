//! catalog service pipelines

use super::{create_pipeline, declare_deployment};
use crate::core::{Artifact, CruiseConfig, Material, RunIf, Task};
use crate::settings::CfCredentials;

pub(super) fn build(mut config: CruiseConfig, credentials: &CfCredentials) -> CruiseConfig {
    let pipeline = create_pipeline(&mut config, "catalog", "catalog_unit_tests", None);
    pipeline.set_git_url("https://github.com/ThoughtWorks-AELab/pretend_catalog_service");
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::bash(
        "bundle install --path vendor/bundle --without production",
    ));
    job.add_task(Task::bash("bundle exec rake assemble"));
    job.add_task(Task::bash("bundle exec rake spec:unit"));
    job.ensure_artifacts([Artifact::test("build/test-results")]);
    job.ensure_artifacts([Artifact::build("*", "catalog_build")]);

    let pipeline = create_pipeline(
        &mut config,
        "catalog",
        "catalog_functional_tests",
        Some(credentials),
    );
    pipeline.ensure_material(Material::pipeline("catalog_unit_tests", "test"));
    let job = pipeline.ensure_stage("test").ensure_job("test");
    job.add_task(Task::fetch_dir(
        "catalog_unit_tests",
        "test",
        "test",
        "catalog_build",
    ));
    job.add_task(
        Task::bash("bundle exec rake cf:deploy[test,$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER]")
            .with_working_dir("catalog_build"),
    );
    job.add_task(
        Task::bash("BASE_URL=http://$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER-catalog.cfapps.io bundle exec rake spec:functional")
            .with_working_dir("catalog_build"),
    );
    job.add_task(
        Task::bash("bundle exec rake cf:delete[test,$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER]")
            .with_working_dir("catalog_build")
            .with_run_if(RunIf::Any),
    );
    job.ensure_artifacts([
        Artifact::build("catalog_build/*", "catalog_build"),
        Artifact::test("catalog_build/spec/reports"),
    ]);

    declare_deployment(&mut config, "catalog", "catalog", credentials);

    config
}
