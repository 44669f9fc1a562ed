//! CLI command definitions

use clap::Args;

/// Push the topology to the server
#[derive(Debug, Args, Clone)]
pub struct PushCommand {
    /// Build and validate without contacting the server
    #[arg(long)]
    pub dry_run: bool,
}

/// Preview the topology that a push would declare
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Print the exact configuration JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Validate the topology's structural invariants
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Output findings in JSON format
    #[arg(long)]
    pub json: bool,
}
