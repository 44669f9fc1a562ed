//! Structural properties of the declared topology

mod helpers;

use cruiser::core::validate::validate;
use cruiser::{Material, RunIf, Task};
use helpers::build_topology;

#[test]
fn topology_is_structurally_valid() {
    let report = validate(&build_topology());
    assert!(report.is_ok(), "unexpected findings: {}", report);
}

#[test]
fn functional_tests_upstream_materials_are_exact() {
    let config = build_topology();

    let materials = |name: &str| config.find_pipeline(name).unwrap().materials.clone();

    assert_eq!(
        materials("catalog_functional_tests"),
        vec![Material::pipeline("catalog_unit_tests", "test")]
    );
    assert_eq!(
        materials("pricing_functional_tests"),
        vec![Material::pipeline("pricing_unit_tests", "test")]
    );
    assert_eq!(
        materials("deals_functional_tests"),
        vec![
            Material::pipeline_named("pricing_functional_tests", "test", "pricing_functional_tests"),
            Material::pipeline("deals_unit_tests", "test"),
        ]
    );
    assert_eq!(
        materials("web_app_functional_tests"),
        vec![
            Material::pipeline_named("catalog_functional_tests", "test", "catalog_functional_tests"),
            Material::pipeline_named("deals_functional_tests", "test", "deals_functional_tests"),
            Material::pipeline("web_app_unit_tests", "test"),
        ]
    );
}

#[test]
fn deployment_pipelines_have_staging_then_gated_production() {
    let config = build_topology();

    for service in ["catalog", "pricing", "deals", "web_app"] {
        let pipeline = config
            .find_pipeline(&format!("{}_deployment", service))
            .unwrap();

        assert_eq!(pipeline.stages.len(), 2, "{} deployment", service);
        assert_eq!(pipeline.stages[0].name, "Deploy_Staging");
        assert!(
            !pipeline.stages[0].requires_manual_approval(),
            "{} staging must auto-trigger",
            service
        );
        assert_eq!(pipeline.stages[1].name, "Deploy_Production");
        assert!(
            pipeline.stages[1].requires_manual_approval(),
            "{} production must be gated",
            service
        );
    }
}

#[test]
fn teardown_tasks_run_regardless_of_prior_outcome() {
    let config = build_topology();

    let mut teardowns = 0;
    for (_, pipeline) in config.pipelines() {
        for stage in &pipeline.stages {
            for job in &stage.jobs {
                for task in &job.tasks {
                    let Some(command) = task.shell_command() else {
                        continue;
                    };
                    if command.contains("cf:delete") || command.contains("cf:dups") {
                        teardowns += 1;
                        assert_eq!(
                            task.run_condition(),
                            RunIf::Any,
                            "teardown in {} must run after failures: {}",
                            pipeline.name,
                            command
                        );
                    }
                }
            }
        }
    }

    // catalog delete, deals delete+dups, web_app delete+dups, PIE delete+dups
    assert_eq!(teardowns, 7);
}

#[test]
fn catalog_functional_tests_carries_platform_credentials() {
    let config = build_topology();
    let pipeline = config.find_pipeline("catalog_functional_tests").unwrap();

    let username = pipeline.environment_variable("CF_USERNAME").unwrap();
    assert!(username.secure);
    assert_eq!(username.value, "cf-user");

    let password = pipeline.environment_variable("CF_PASSWORD").unwrap();
    assert!(password.secure);
    assert_eq!(password.value, "cf-pass");

    let home = pipeline.environment_variable("CF_HOME").unwrap();
    assert!(!home.secure);
    assert_eq!(home.value, ".");

    // Unit-test pipelines deploy nothing and carry no credentials,
    // except web_app's which the topology declares with them.
    assert!(config
        .find_pipeline("catalog_unit_tests")
        .unwrap()
        .environment_variables
        .is_empty());
    assert!(config
        .find_pipeline("web_app_unit_tests")
        .unwrap()
        .environment_variable("CF_USERNAME")
        .is_some());
}

#[test]
fn unit_tests_pipelines_build_off_fresh_git_clones() {
    let config = build_topology();

    let url = |name: &str| {
        config
            .find_pipeline(name)
            .unwrap()
            .git_url()
            .unwrap()
            .to_string()
    };

    assert_eq!(
        url("catalog_unit_tests"),
        "https://github.com/ThoughtWorks-AELab/pretend_catalog_service"
    );
    assert_eq!(
        url("pricing_unit_tests"),
        "https://github.com/ThoughtWorks-AELab/pretend_pricing_service"
    );
    assert_eq!(
        url("deals_unit_tests"),
        "https://github.com/ThoughtWorks-AELab/pretend_deals_service"
    );
    assert_eq!(
        url("web_app_unit_tests"),
        "https://github.com/ThoughtWorks-AELab/pretend_web_app"
    );
}

#[test]
fn web_app_functional_tests_fetches_pricing_build_via_deals() {
    let config = build_topology();
    let pipeline = config.find_pipeline("web_app_functional_tests").unwrap();
    let job = pipeline.stage("test").unwrap().job("test").unwrap();

    let fetches: Vec<_> = job
        .tasks
        .iter()
        .filter_map(|t| match t {
            Task::FetchArtifact {
                pipeline, source, ..
            } => Some((pipeline.as_str(), source.clone())),
            _ => None,
        })
        .collect();

    use cruiser::core::FetchSource;
    assert_eq!(
        fetches,
        vec![
            ("catalog_functional_tests", FetchSource::Dir("catalog_build".into())),
            ("deals_functional_tests", FetchSource::Dir("pricing_build".into())),
            ("deals_functional_tests", FetchSource::Dir("deals_build".into())),
            ("web_app_unit_tests", FetchSource::Dir("web_app_build".into())),
        ]
    );
}

#[test]
fn pie_lifecycle_stages_are_both_manually_gated() {
    let config = build_topology();
    let group = config.group("PIE").unwrap();
    assert_eq!(group.pipelines.len(), 1);

    let pipeline = group.pipeline("PIE").unwrap();
    let stage_names: Vec<_> = pipeline.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stage_names, vec!["deploy", "destroy"]);
    assert!(pipeline.stages.iter().all(|s| s.requires_manual_approval()));

    // Both stages pull every service's build out of the last good
    // web_app functional run.
    for stage in &pipeline.stages {
        let job = &stage.jobs[0];
        let fetch_count = job
            .tasks
            .iter()
            .filter(|t| matches!(t, Task::FetchArtifact { .. }))
            .count();
        assert_eq!(fetch_count, 4, "stage {}", stage.name);
    }
}
