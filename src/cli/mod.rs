//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Rosterflow using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Rosterflow - student record pipeline
#[derive(Parser, Debug)]
#[command(name = "rosterflow")]
#[command(version, about, long_about = None)]
#[command(author = "Rosterflow Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rosterflow.toml", env = "ROSTERFLOW_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ROSTERFLOW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a workbook of synthetic student rows
    Generate(commands::generate::GenerateArgs),

    /// Convert a workbook's first sheet to CSV
    Convert(commands::convert::ConvertArgs),

    /// Load a CSV file into the configured store
    Ingest(commands::ingest::IngestArgs),

    /// Generate, convert and ingest in one go
    Run(commands::run::RunArgs),

    /// Show store and output directory status
    Status(commands::status::StatusArgs),

    /// Page through stored rows or export them to CSV
    Report(commands::report::ReportArgs),

    /// Resolve a file name inside an output directory
    Locate(commands::locate::LocateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from(["rosterflow", "generate", "--count", "100"]);
        assert_eq!(cli.config, "rosterflow.toml");
        match cli.command {
            Commands::Generate(args) => assert_eq!(args.count, 100),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["rosterflow", "--config", "custom.toml", "status"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["rosterflow", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_ingest() {
        let cli = Cli::parse_from(["rosterflow", "ingest", "in.csv", "--dry-run", "--batch-size", "10"]);
        match cli.command {
            Commands::Ingest(args) => {
                assert_eq!(args.input.to_string_lossy(), "in.csv");
                assert!(args.dry_run);
                assert_eq!(args.batch_size, Some(10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_report_filters() {
        let cli = Cli::parse_from([
            "rosterflow", "report", "--class", "Class2", "--page", "2", "--size", "5",
        ]);
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.class_name.as_deref(), Some("Class2"));
                assert_eq!(args.page, 2);
                assert_eq!(args.size, 5);
                assert!(!args.export);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_locate() {
        let cli = Cli::parse_from(["rosterflow", "locate", "csv", "students.csv"]);
        assert!(matches!(cli.command, Commands::Locate(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["rosterflow", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["rosterflow", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_generate_requires_count() {
        assert!(Cli::try_parse_from(["rosterflow", "generate"]).is_err());
    }
}
