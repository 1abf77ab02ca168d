//! Command-line argument parsing for Marker Fetcher
//!
//! This module defines the CLI structure using clap derive macros. Flags
//! given on the command line override values loaded from the config file.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::app::SuffixOrder;
use crate::config::AppConfig;

/// Marker Fetcher - Download genomic reference markers
#[derive(Parser, Debug)]
#[command(
    name = "marker_fetcher",
    version,
    about = "Download and verify genomic accessions and markers",
    long_about = "Downloads chromosome accessions and their markers from a rate-limited REST API.
Every artifact is verified against known SHA-256 checksums; valid artifacts are never downloaded twice."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data directory holding the JSON artifacts
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download accessions and markers
    Download(DownloadArgs),

    /// Verify local artifacts against known checksums
    Validate(ValidateArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the download command
#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Print the result as a JSON envelope
    #[arg(long)]
    pub json: bool,

    /// Markers requested per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// Minimum milliseconds between any two requests
    #[arg(long, value_name = "N")]
    pub interval_ms: Option<u64>,

    /// RSID suffix tie-break (descending or ascending)
    #[arg(long, value_name = "ORDER")]
    pub suffix_order: Option<SuffixOrder>,
}

/// Arguments for the validate command
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Print the report as a JSON envelope
    #[arg(long)]
    pub json: bool,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a commented default configuration file
    Init {
        /// Target path (defaults to the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        self.explicit_log_level().unwrap_or(tracing::Level::WARN)
    }

    /// Level requested by a verbosity flag, if any
    pub fn explicit_log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }

    /// Filter directive for this crate; flags win over the configured level
    pub fn log_directive(&self, configured_level: &str) -> String {
        match self.explicit_log_level() {
            Some(level) => format!("marker_fetcher={}", level),
            None => format!("marker_fetcher={}", configured_level),
        }
    }
}

impl GlobalArgs {
    /// Apply global overrides to a loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_root = data_dir.clone();
        }
    }
}

impl DownloadArgs {
    /// Reject values that cannot produce a run
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == Some(0) {
            return Err("Page size must be greater than 0".to_string());
        }

        if self.interval_ms == Some(0) {
            return Err("Request interval must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Apply download overrides to a loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(page_size) = self.page_size {
            config.download.page_size = page_size;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.client.min_request_interval = Duration::from_millis(interval_ms);
        }
        if let Some(suffix_order) = self.suffix_order {
            config.download.suffix_order = suffix_order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_download_args_validation() {
        let mut args = DownloadArgs::default();
        assert!(args.validate().is_ok());

        args.page_size = Some(0);
        assert!(args.validate().is_err());

        args.page_size = Some(100);
        args.interval_ms = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "marker_fetcher",
            "--data-dir",
            "/tmp/data",
            "download",
            "--page-size",
            "250",
            "--interval-ms",
            "100",
            "--suffix-order",
            "asc",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.global.apply(&mut config);
        let Commands::Download(args) = cli.command else {
            panic!("Expected download command");
        };
        args.apply(&mut config);

        assert_eq!(config.storage.data_root, PathBuf::from("/tmp/data"));
        assert_eq!(config.download.page_size, 250);
        assert_eq!(config.client.min_request_interval, Duration::from_millis(100));
        assert_eq!(config.download.suffix_order, SuffixOrder::Ascending);
    }

    #[test]
    fn test_log_level_selection() {
        let cli = Cli::try_parse_from(["marker_fetcher", "validate"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::WARN);

        let cli = Cli::try_parse_from(["marker_fetcher", "-v", "validate"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::INFO);

        let cli = Cli::try_parse_from(["marker_fetcher", "validate", "--very-verbose"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);

        let cli = Cli::try_parse_from(["marker_fetcher", "-q", "-v", "validate"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_directive_prefers_flags() {
        let cli = Cli::try_parse_from(["marker_fetcher", "validate"]).unwrap();
        assert_eq!(cli.log_directive("debug"), "marker_fetcher=debug");

        let cli = Cli::try_parse_from(["marker_fetcher", "-q", "validate"]).unwrap();
        assert_eq!(cli.log_directive("debug"), "marker_fetcher=ERROR");
    }

    #[test]
    fn test_config_init_parsing() {
        let cli =
            Cli::try_parse_from(["marker_fetcher", "config", "init", "./custom.toml", "--force"])
                .unwrap();

        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, Some(PathBuf::from("./custom.toml")));
                assert!(force);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }
}
