mod apply;
mod cli;
mod client;
mod core;
mod settings;
mod topology;

use anyhow::{Context, Result};
use apply::ApplyError;
use cli::commands::{PlanCommand, PushCommand, ValidateCommand};
use cli::output::*;
use cli::{Cli, Command};
use client::HttpConfigStore;
use crate::core::validate::validate;
use crate::core::CruiseConfig;
use settings::{CfCredentials, Settings};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Push(cmd) => push_topology(cmd, &cli).await?,
        Command::Plan(cmd) => plan_topology(cmd)?,
        Command::Validate(cmd) => validate_topology(cmd)?,
    }

    Ok(())
}

/// Build the topology from scratch, as a push would declare it
fn build_topology() -> Result<CruiseConfig> {
    let credentials =
        CfCredentials::from_env().context("Platform deployment credentials are required")?;
    Ok(topology::build(CruiseConfig::default(), &credentials))
}

async fn push_topology(cmd: &PushCommand, cli: &Cli) -> Result<()> {
    let mut settings = Settings::load(cli.settings.as_deref())
        .context("Failed to load settings")?;
    if let Some(server) = &cli.server {
        settings.server.url = server.clone();
    }

    if cmd.dry_run {
        let config = build_topology()?;
        let report = validate(&config);
        if !report.is_ok() {
            println!("{} Topology failed validation:", CROSS);
            for finding in &report.errors {
                println!("  {}", style(finding).red());
            }
            std::process::exit(1);
        }
        println!(
            "{} Would declare {} pipelines across {} groups on {}",
            CHECK,
            style(config.pipeline_count()).cyan(),
            style(config.groups.len()).cyan(),
            style(&settings.server.url).bold()
        );
        return Ok(());
    }

    let credentials =
        CfCredentials::from_env().context("Platform deployment credentials are required")?;
    let store = HttpConfigStore::from_settings(&settings.server)
        .context("Failed to build the server client")?;

    println!(
        "{} Pushing pipeline topology to {}",
        ROCKET,
        style(&settings.server.url).bold()
    );

    let spinner = network_spinner("Replacing server configuration...");
    let result = apply::apply(&store, &credentials).await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!(
                "{} Declared {} pipelines across {} groups (config version {})",
                CHECK,
                style(outcome.pipelines).cyan(),
                style(outcome.groups).cyan(),
                style(&outcome.version).dim()
            );
            Ok(())
        }
        Err(ApplyError::Validation(report)) => {
            println!("{} Topology failed validation:", CROSS);
            for finding in &report.errors {
                println!("  {}", style(finding).red());
            }
            std::process::exit(1);
        }
        Err(e) => {
            println!("{} Push failed", CROSS);
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn plan_topology(cmd: &PlanCommand) -> Result<()> {
    let config = build_topology()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{} Topology a push would declare:\n", INFO);
    println!("{}", format_config_summary(&config));
    println!(
        "\n{} {} pipelines across {} groups",
        INFO,
        style(config.pipeline_count()).cyan(),
        style(config.groups.len()).cyan()
    );

    Ok(())
}

fn validate_topology(cmd: &ValidateCommand) -> Result<()> {
    let config = build_topology()?;
    let report = validate(&config);

    if cmd.json {
        let findings: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        let data = serde_json::json!({ "valid": report.is_ok(), "errors": findings });
        println!("{}", serde_json::to_string_pretty(&data)?);
        if !report.is_ok() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if report.is_ok() {
        println!("{} Topology is structurally valid", CHECK);
        println!(
            "  {} pipelines across {} groups",
            style(config.pipeline_count()).cyan(),
            style(config.groups.len()).cyan()
        );
        Ok(())
    } else {
        println!("{} Topology failed validation:", CROSS);
        for finding in &report.errors {
            println!("  {}", style(finding).red());
        }
        std::process::exit(1);
    }
}
