//! The production delivery topology
//!
//! Five pipeline groups declared in dependency order: catalog, pricing,
//! deals, web_app and PIE. Each service follows the same pattern: a
//! unit_tests pipeline off a fresh git clone, a functional_tests pipeline
//! triggered by it that deploys to an ephemeral environment named after
//! the running pipeline instance, and a two-stage deployment pipeline.
//! The PIE group stands the whole stack up and tears it down again for
//! exploratory and integration use.

mod catalog;
mod deals;
mod pie;
mod pricing;
mod web_app;

use crate::core::{CruiseConfig, Material, Pipeline, Task};
use crate::settings::CfCredentials;

/// Build every pipeline group against `config`, in dependency order
pub fn build(config: CruiseConfig, credentials: &CfCredentials) -> CruiseConfig {
    let config = catalog::build(config, credentials);
    let config = pricing::build(config, credentials);
    let config = deals::build(config, credentials);
    let config = web_app::build(config, credentials);
    pie::build(config, credentials)
}

/// Declare (or re-declare) a pipeline, optionally injecting the platform
/// deployment credentials as secure variables
fn create_pipeline<'a>(
    config: &'a mut CruiseConfig,
    group: &str,
    name: &str,
    credentials: Option<&CfCredentials>,
) -> &'a mut Pipeline {
    let pipeline = config
        .ensure_pipeline_group(group)
        .ensure_replacement_of_pipeline(name);
    if let Some(credentials) = credentials {
        pipeline.ensure_secure_environment_variables(&[
            ("CF_USERNAME", credentials.username.as_str()),
            ("CF_PASSWORD", credentials.password.as_str()),
        ]);
        pipeline.ensure_environment_variables(&[("CF_HOME", ".")]);
    }
    pipeline
}

/// The common two-stage deployment pipeline: automatic staging deploy,
/// manually gated production deploy, each fetching the service's build
/// artifact first
fn declare_deployment(
    config: &mut CruiseConfig,
    group: &str,
    service: &str,
    credentials: &CfCredentials,
) {
    let functional = format!("{}_functional_tests", service);
    let build_dir = format!("{}_build", service);

    let pipeline = create_pipeline(
        config,
        group,
        &format!("{}_deployment", service),
        Some(credentials),
    );
    pipeline.ensure_material(Material::pipeline(functional.as_str(), "test"));

    let job = pipeline.ensure_stage("Deploy_Staging").ensure_job("deploy");
    job.add_task(Task::fetch_dir(
        functional.as_str(),
        "test",
        "test",
        build_dir.as_str(),
    ));
    job.add_task(
        Task::bash("bundle exec rake cf:deploy[staging,staging]")
            .with_working_dir(build_dir.as_str()),
    );

    let stage = pipeline.ensure_stage("Deploy_Production");
    stage.set_manual_approval();
    let job = stage.ensure_job("deploy");
    job.add_task(Task::fetch_dir(
        functional.as_str(),
        "test",
        "test",
        build_dir.as_str(),
    ));
    job.add_task(
        Task::bash("bundle exec rake cf:deploy[production]").with_working_dir(build_dir.as_str()),
    );
}

/// GNU-parallel fan-out of a rake task across service build directories
///
/// The `{}` placeholder belongs to `parallel`, not to us.
fn parallel_rake(task: &str, build_dirs: &[&str]) -> String {
    format!(
        "parallel \"cd {{}}; bundle exec rake {}[test,$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER];\" ::: {}",
        task,
        build_dirs.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> CfCredentials {
        CfCredentials::new("cf-user", "cf-pass")
    }

    #[test]
    fn test_builds_five_groups_in_dependency_order() {
        let config = build(CruiseConfig::default(), &credentials());

        let groups: Vec<_> = config.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            groups,
            vec!["catalog", "pricing", "deals", "web_app", "PIE"]
        );
        assert_eq!(config.pipeline_count(), 13);
    }

    #[test]
    fn test_parallel_rake_composes_the_fan_out() {
        assert_eq!(
            parallel_rake("cf:cups", &["pricing_build", "deals_build"]),
            "parallel \"cd {}; bundle exec rake cf:cups[test,$GO_PIPELINE_NAME$GO_PIPELINE_COUNTER];\" ::: pricing_build deals_build"
        );
    }

    #[test]
    fn test_declare_deployment_shape() {
        let mut config = CruiseConfig::default();
        // The deployment fetch passes validation only with the functional
        // pipeline present; here we only check the declared shape.
        declare_deployment(&mut config, "catalog", "catalog", &credentials());

        let pipeline = config.find_pipeline("catalog_deployment").unwrap();
        assert_eq!(pipeline.stages.len(), 2);
        assert_eq!(pipeline.stages[0].name, "Deploy_Staging");
        assert!(!pipeline.stages[0].requires_manual_approval());
        assert_eq!(pipeline.stages[1].name, "Deploy_Production");
        assert!(pipeline.stages[1].requires_manual_approval());
    }
}
