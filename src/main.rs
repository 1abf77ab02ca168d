//! Marker Fetcher CLI application
//!
//! Command-line interface for downloading and validating genomic accessions
//! and markers.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use marker_fetcher::cli::{
    handle_config, handle_download, handle_validate, load_config, Cli, Commands,
};
use marker_fetcher::constants::logging::DEFAULT_LOG_LEVEL;
use marker_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Config errors surface from the command handler; here only the level matters
    let configured_level = load_config(&cli.global)
        .await
        .map(|config| config.logging.level)
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    init_logging(&cli, &configured_level);

    info!("Marker Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Download(args) => {
            info!("Executing download command");
            handle_download(&cli.global, args).await
        }
        Commands::Validate(args) => {
            info!("Executing validate command");
            handle_validate(&cli.global, args).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(&cli.global, args).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli, configured_level: &str) {
    let mut filter = EnvFilter::from_default_env();
    match cli.log_directive(configured_level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(_) => eprintln!("Ignoring invalid log level: {}", configured_level),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
