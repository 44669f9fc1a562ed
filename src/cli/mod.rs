//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{PlanCommand, PushCommand, ValidateCommand};

/// Declarative pipeline topology for a GoCD-style CI server
#[derive(Debug, Parser, Clone)]
#[command(name = "cruiser")]
#[command(author = "Cruiser Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Declare and push the delivery pipeline topology", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a settings file
    #[arg(short, long, global = true)]
    pub settings: Option<String>,

    /// Server base URL (overrides the settings file)
    #[arg(long, global = true)]
    pub server: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Push the topology to the server
    Push(PushCommand),

    /// Preview the topology that a push would declare
    Plan(PlanCommand),

    /// Validate the topology's structural invariants
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_push_with_globals() {
        let cli = Cli::try_parse_from([
            "cruiser",
            "--verbose",
            "--server",
            "http://ci.example.com:8153",
            "push",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.server.as_deref(), Some("http://ci.example.com:8153"));
        match cli.command {
            Command::Push(cmd) => assert!(cmd.dry_run),
            _ => panic!("expected push command"),
        }
    }

    #[test]
    fn test_parse_plan_json() {
        let cli = Cli::try_parse_from(["cruiser", "plan", "--json"]).unwrap();
        match cli.command {
            Command::Plan(cmd) => assert!(cmd.json),
            _ => panic!("expected plan command"),
        }
    }
}
