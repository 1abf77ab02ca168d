//! Command handlers for Marker Fetcher CLI
//!
//! This module implements the command handlers that turn CLI arguments and
//! configuration into calls on the core application.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::app::{
    ApiClient, ChecksumTable, ChecksumVerifier, DownloadOrchestrator, Response, RunStats,
    ValidationReport,
};
use crate::cli::{ConfigAction, ConfigArgs, DownloadArgs, GlobalArgs, ValidateArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the download command
///
/// Runs the orchestrator until it finishes or Ctrl-C is pressed. With
/// `--json` the outcome is printed as a response envelope, failures included.
pub async fn handle_download(global: &GlobalArgs, args: DownloadArgs) -> Result<()> {
    let show_spinner = !args.json && !global.quiet;
    let result = run_download(global, &args, show_spinner).await;

    if args.json {
        let envelope = match &result {
            Ok(stats) => Response::ok(stats.summary()),
            Err(e) => Response::failed(e),
        };
        print_json(&envelope)?;
    } else if let Ok(stats) = &result {
        println!("{}", render_summary(stats));
    }

    result.map(|_| ())
}

async fn run_download(
    global: &GlobalArgs,
    args: &DownloadArgs,
    show_spinner: bool,
) -> Result<RunStats> {
    args.validate().map_err(AppError::generic)?;

    let mut config = load_config(global).await?;
    args.apply(&mut config);
    config.validate()?;

    let client = Arc::new(ApiClient::from_config(&config.client.to_runtime_config())?);
    let verifier = Arc::new(ChecksumVerifier::new(
        ChecksumTable::reference()?,
        config.storage_layout(),
    ));
    let orchestrator =
        DownloadOrchestrator::new(config.download.to_runtime_config(), client, verifier);

    info!(
        "Downloading into {} ({:?} between requests)",
        config.storage.data_root.display(),
        config.client.min_request_interval
    );

    let spinner = show_spinner.then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")
        {
            spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
        }
        spinner.set_message("Downloading accessions and markers...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    });

    let result = tokio::select! {
        result = orchestrator.run_with_stats() => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Ctrl-C received, cancelling download");
            Err(AppError::generic("Download cancelled by Ctrl-C"))
        }
    };

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    result
}

/// Handle the validate command
///
/// Fails when any artifact is missing or invalid so scripts can rely on the
/// exit code; the report itself is always printed.
pub async fn handle_validate(global: &GlobalArgs, args: ValidateArgs) -> Result<()> {
    let result = run_validate(global).await;

    if args.json {
        print_json(&Response::from_result(&result))?;
    } else if let Ok(report) = &result {
        print!("{}", render_validation_table(report));
    }

    let report = result?;
    if report.is_successful() {
        Ok(())
    } else {
        let invalid =
            report.markers.len() - report.valid_count() + usize::from(!report.accession);
        Err(AppError::generic(format!(
            "{} artifacts failed validation",
            invalid
        )))
    }
}

async fn run_validate(global: &GlobalArgs) -> Result<ValidationReport> {
    let config = load_config(global).await?;
    let verifier = ChecksumVerifier::new(ChecksumTable::reference()?, config.storage_layout());

    info!(
        "Validating artifacts under {}",
        verifier.layout().root().display()
    );
    Ok(verifier.validate_all().await?)
}

/// Handle the config command
pub async fn handle_config(global: &GlobalArgs, args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = load_config(global).await?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        ConfigAction::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => AppConfig::default_config_path()?,
            };

            if path.exists() && !force {
                return Err(AppError::generic(format!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }

            AppConfig::write_default(&path).await?;
            if !global.quiet {
                println!("📁 Created default configuration file:");
                println!("   {}", path.display());
            }
            Ok(())
        }
    }
}

/// Load configuration and apply global overrides
pub async fn load_config(global: &GlobalArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(global.config.clone()).await?;
    global.apply(&mut config);
    Ok(config)
}

/// Human-readable download summary
pub fn render_summary(stats: &RunStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Download Summary:");
    let _ = writeln!(out, "  Accessions: {}", stats.accessions_total);
    let _ = writeln!(out, "  Downloaded: {}", stats.accessions_downloaded);
    let _ = writeln!(out, "  Already valid: {}", stats.accessions_skipped);
    let _ = writeln!(out, "  Markers written: {}", stats.markers_written);
    let _ = writeln!(
        out,
        "  Accession list downloads: {}",
        stats.accession_download_attempts
    );
    let _ = write!(
        out,
        "  Total time: {}s",
        stats.summary().runtime_duration_in_seconds
    );
    out
}

/// Human-readable validation table
pub fn render_validation_table(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {}", "ARTIFACT", "STATUS");
    let _ = writeln!(out, "{:<16} {}", "accessions", status_label(report.accession));
    for (id, valid) in &report.markers {
        let _ = writeln!(out, "{:<16} {}", id, status_label(*valid));
    }
    let _ = writeln!(
        out,
        "\n{}/{} marker files valid",
        report.valid_count(),
        report.markers.len()
    );
    out
}

fn status_label(valid: bool) -> &'static str {
    if valid {
        "✅ valid"
    } else {
        "❌ missing or invalid"
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::generic(format!("Failed to render JSON output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_validation_table() {
        let mut markers = BTreeMap::new();
        markers.insert("NC_000001.10".to_string(), true);
        markers.insert("NC_000002.11".to_string(), false);
        let report = ValidationReport {
            accession: true,
            markers,
        };

        let table = render_validation_table(&report);
        assert!(table.contains("accessions       ✅ valid"));
        assert!(table.contains("NC_000002.11     ❌ missing or invalid"));
        assert!(table.contains("1/2 marker files valid"));
    }

    #[test]
    fn test_render_summary() {
        let stats = RunStats {
            session_duration: Duration::from_millis(61_500),
            accession_download_attempts: 1,
            accessions_total: 25,
            accessions_skipped: 24,
            accessions_downloaded: 1,
            markers_written: 42,
            ..Default::default()
        };

        let summary = render_summary(&stats);
        assert!(summary.contains("Downloaded: 1"));
        assert!(summary.contains("Already valid: 24"));
        assert!(summary.contains("Markers written: 42"));
        assert!(summary.contains("Total time: 61s"));
    }
}
