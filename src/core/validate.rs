//! Structural validation of a configuration
//!
//! The server rejects broken references on its side too, but running
//! these checks locally turns a failed push into a readable report
//! before anything leaves the machine.

use crate::core::{config::CruiseConfig, material::Material, task::Task};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// A single structural problem in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("pipeline name '{0}' is declared more than once")]
    DuplicatePipeline(String),

    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("pipeline '{pipeline}' has no material")]
    NoMaterial { pipeline: String },

    #[error("pipeline '{pipeline}' has a material on unknown pipeline '{upstream}'")]
    UnknownMaterialPipeline { pipeline: String, upstream: String },

    #[error("pipeline '{pipeline}' has a material on '{upstream}' stage '{stage}', which does not exist")]
    UnknownMaterialStage {
        pipeline: String,
        upstream: String,
        stage: String,
    },

    #[error("pipeline '{pipeline}' fetches an artifact from unknown pipeline '{upstream}'")]
    FetchUnknownPipeline { pipeline: String, upstream: String },

    #[error("pipeline '{pipeline}' fetches an artifact from '{upstream}' stage '{stage}', which does not exist")]
    FetchUnknownStage {
        pipeline: String,
        upstream: String,
        stage: String,
    },

    #[error("pipeline '{pipeline}' fetches an artifact from '{upstream}' job '{job}', which does not exist")]
    FetchUnknownJob {
        pipeline: String,
        upstream: String,
        job: String,
    },

    #[error("pipeline '{pipeline}' fetches an artifact from '{upstream}', which is not among its upstream materials")]
    FetchOutsideUpstream { pipeline: String, upstream: String },
}

/// Everything wrong with a configuration, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// Names the server accepts for groups, pipelines, stages and jobs
fn valid_name(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-][A-Za-z0-9_\-.]*$").expect("literal pattern"));
    pattern.is_match(name)
}

/// Check the whole configuration against the structural invariants
pub fn validate(config: &CruiseConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_names(config, &mut report);
    check_unique_pipelines(config, &mut report);
    check_materials(config, &mut report);
    check_fetches(config, &mut report);

    report
}

fn check_names(config: &CruiseConfig, report: &mut ValidationReport) {
    for group in &config.groups {
        if !valid_name(&group.name) {
            report.errors.push(ValidationError::InvalidName {
                kind: "group",
                name: group.name.clone(),
            });
        }
        for pipeline in &group.pipelines {
            if !valid_name(&pipeline.name) {
                report.errors.push(ValidationError::InvalidName {
                    kind: "pipeline",
                    name: pipeline.name.clone(),
                });
            }
            for stage in &pipeline.stages {
                if !valid_name(&stage.name) {
                    report.errors.push(ValidationError::InvalidName {
                        kind: "stage",
                        name: stage.name.clone(),
                    });
                }
                for job in &stage.jobs {
                    if !valid_name(&job.name) {
                        report.errors.push(ValidationError::InvalidName {
                            kind: "job",
                            name: job.name.clone(),
                        });
                    }
                }
            }
        }
    }
}

fn check_unique_pipelines(config: &CruiseConfig, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for (_, pipeline) in config.pipelines() {
        if !seen.insert(pipeline.name.clone()) {
            report
                .errors
                .push(ValidationError::DuplicatePipeline(pipeline.name.clone()));
        }
    }
}

fn check_materials(config: &CruiseConfig, report: &mut ValidationReport) {
    for (_, pipeline) in config.pipelines() {
        if pipeline.materials.is_empty() {
            report.errors.push(ValidationError::NoMaterial {
                pipeline: pipeline.name.clone(),
            });
        }
        for material in &pipeline.materials {
            let Material::Pipeline {
                pipeline: upstream,
                stage,
                ..
            } = material
            else {
                continue;
            };
            match config.find_pipeline(upstream) {
                None => report.errors.push(ValidationError::UnknownMaterialPipeline {
                    pipeline: pipeline.name.clone(),
                    upstream: upstream.clone(),
                }),
                Some(target) if target.stage(stage).is_none() => {
                    report.errors.push(ValidationError::UnknownMaterialStage {
                        pipeline: pipeline.name.clone(),
                        upstream: upstream.clone(),
                        stage: stage.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }
}

fn check_fetches(config: &CruiseConfig, report: &mut ValidationReport) {
    let upstreams = upstream_map(config);

    for (_, pipeline) in config.pipelines() {
        let closure = upstream_closure(&pipeline.name, &upstreams);

        for stage in &pipeline.stages {
            for job in &stage.jobs {
                for task in &job.tasks {
                    let Task::FetchArtifact {
                        pipeline: upstream,
                        stage: upstream_stage,
                        job: upstream_job,
                        ..
                    } = task
                    else {
                        continue;
                    };

                    let Some(target) = config.find_pipeline(upstream) else {
                        report.errors.push(ValidationError::FetchUnknownPipeline {
                            pipeline: pipeline.name.clone(),
                            upstream: upstream.clone(),
                        });
                        continue;
                    };
                    let Some(target_stage) = target.stage(upstream_stage) else {
                        report.errors.push(ValidationError::FetchUnknownStage {
                            pipeline: pipeline.name.clone(),
                            upstream: upstream.clone(),
                            stage: upstream_stage.clone(),
                        });
                        continue;
                    };
                    if target_stage.job(upstream_job).is_none() {
                        report.errors.push(ValidationError::FetchUnknownJob {
                            pipeline: pipeline.name.clone(),
                            upstream: upstream.clone(),
                            job: upstream_job.clone(),
                        });
                        continue;
                    }
                    if !closure.contains(upstream.as_str()) {
                        report.errors.push(ValidationError::FetchOutsideUpstream {
                            pipeline: pipeline.name.clone(),
                            upstream: upstream.clone(),
                        });
                    }
                }
            }
        }
    }
}

/// Direct upstream pipeline names, per pipeline
fn upstream_map(config: &CruiseConfig) -> HashMap<&str, Vec<&str>> {
    config
        .pipelines()
        .map(|(_, p)| (p.name.as_str(), p.upstream_pipelines().collect()))
        .collect()
}

/// Transitive closure of a pipeline's upstream materials
fn upstream_closure<'a>(
    pipeline: &'a str,
    upstreams: &HashMap<&'a str, Vec<&'a str>>,
) -> HashSet<&'a str> {
    let mut closure = HashSet::new();
    let mut pending = upstreams.get(pipeline).cloned().unwrap_or_default();

    while let Some(name) = pending.pop() {
        if closure.insert(name) {
            if let Some(next) = upstreams.get(name) {
                pending.extend(next.iter().copied());
            }
        }
    }

    closure
}
