//! CLI output formatting

use crate::core::{CruiseConfig, Material};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a spinner for a network call
pub fn network_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format the topology as a group/pipeline/stage tree
pub fn format_config_summary(config: &CruiseConfig) -> String {
    let mut lines = Vec::new();

    for group in &config.groups {
        lines.push(format!("{}", style(&group.name).bold()));
        for pipeline in &group.pipelines {
            lines.push(format!("  {}", style(&pipeline.name).cyan()));
            for material in &pipeline.materials {
                lines.push(format!("    {}", format_material(material)));
            }
            for stage in &pipeline.stages {
                let gate = if stage.requires_manual_approval() {
                    style(" (manual)").yellow().to_string()
                } else {
                    String::new()
                };
                lines.push(format!(
                    "    stage {}{} - {} job(s)",
                    stage.name,
                    gate,
                    stage.jobs.len()
                ));
            }
        }
    }

    lines.join("\n")
}

fn format_material(material: &Material) -> String {
    match material {
        Material::Git { url, .. } => format!("git {}", style(url).dim()),
        Material::Pipeline {
            pipeline, stage, ..
        } => format!("upstream {}", style(format!("{}/{}", pipeline, stage)).dim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CruiseConfig, Material};

    #[test]
    fn test_summary_marks_manual_stages() {
        let mut config = CruiseConfig::new();
        let pipeline = config
            .ensure_pipeline_group("catalog")
            .ensure_pipeline("catalog_deployment");
        pipeline.ensure_material(Material::pipeline("catalog_functional_tests", "test"));
        pipeline.ensure_stage("Deploy_Staging");
        pipeline.ensure_stage("Deploy_Production").set_manual_approval();

        let summary = format_config_summary(&config);
        assert!(summary.contains("catalog_deployment"));
        assert!(summary.contains("Deploy_Production"));
        assert!(summary.contains("(manual)"));
        assert!(summary.contains("catalog_functional_tests/test"));
    }
}
