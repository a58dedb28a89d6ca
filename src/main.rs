//! gtm-audit main entry point
//!
//! This is the command-line interface for auditing GTM container performance.

use anyhow::Context;
use clap::Parser;
use gtm_audit::audit::{AuditRunner, EtaEstimator, HttpAuditService};
use gtm_audit::config::{load_config, Config};
use gtm_audit::output::{
    generate_markdown_report, print_summary, write_csv_export, CsvQuoting,
};
use gtm_audit::state::format_eta;
use gtm_audit::url::validate_urls;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// gtm-audit: Google Tag Manager performance auditing
///
/// Reads URLs (one per line), audits each through the configured audit
/// backend one at a time, prints a summary and exports the results as a
/// dated CSV file.
#[derive(Parser, Debug)]
#[command(name = "gtm-audit")]
#[command(version)]
#[command(about = "Audit GTM container CPU and script time", long_about = None)]
struct Cli {
    /// File with one URL per line; reads stdin when absent or "-"
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the CSV export (overrides output.directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Escape quotes and delimiters in the CSV export (RFC 4180)
    #[arg(long)]
    strict_csv: bool,

    /// Also write a markdown report to this path
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Skip writing the CSV export
    #[arg(long)]
    no_export: bool,

    /// Validate input and show what would be audited without auditing
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    let raw = read_input(cli.input.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config, &raw);
        return Ok(());
    }

    handle_audit(&cli, config, &raw).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gtm_audit=info,warn"),
            1 => EnvFilter::new("gtm_audit=debug,info"),
            2 => EnvFilter::new("gtm_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Reads the raw URL list from a file, or stdin for `None` / `-`
fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read URL list {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read URL list from stdin")?;
            Ok(raw)
        }
    }
}

/// Handles the --dry-run mode: validates input and shows what would be audited
fn handle_dry_run(config: &Config, raw: &str) {
    let validation = validate_urls(raw);

    println!("=== gtm-audit Dry Run ===\n");

    println!("Audit Service:");
    println!("  Endpoint: {}", config.service.endpoint);
    println!("  Request timeout: {}s", config.service.request_timeout);
    match config.runner.item_timeout {
        Some(timeout) => println!("  Item timeout: {}s", timeout),
        None => println!("  Item timeout: none"),
    }

    println!("\nURLs ({}):", validation.urls.len());
    for url in &validation.urls {
        println!("  - {}", url);
    }

    if validation.rejected > 0 {
        println!("\n✗ {} invalid URLs would be removed", validation.rejected);
    }

    let estimate =
        EtaEstimator::start(validation.urls.len(), config.runner.initial_seconds_per_url)
            .estimate_remaining();
    println!(
        "\n✓ Would audit {} URLs (initial estimate {})",
        validation.urls.len(),
        format_eta(estimate)
    );
}

/// Handles the main audit operation
async fn handle_audit(cli: &Cli, config: Config, raw: &str) -> anyhow::Result<()> {
    let service = HttpAuditService::from_config(&config.service, &config.user_agent)
        .context("Failed to build HTTP client")?;
    tracing::info!("Auditing through {}", service.endpoint());

    let runner = Arc::new(AuditRunner::new(Arc::new(service), &config.runner));

    // Log each progress snapshot as the batch advances
    let mut progress = runner.subscribe();
    let progress_task = tokio::spawn(async move {
        let mut last_index = 0;
        while progress.changed().await.is_ok() {
            let snapshot = progress.borrow_and_update().clone();
            if snapshot.is_active() && snapshot.current_index != last_index {
                last_index = snapshot.current_index;
                tracing::info!(
                    "[{}/{}] Auditing {} (ETA {})",
                    snapshot.current_index,
                    snapshot.total_urls,
                    snapshot.current_url,
                    format_eta(snapshot.estimated_seconds_remaining)
                );
            }
        }
    });

    // Ctrl-C stops the batch after the URL in flight
    let cancel = runner.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current URL");
            cancel.cancel();
        }
    });

    let outcome = runner.start_batch(raw).await?;
    progress_task.abort();

    if let Some(warning) = &outcome.warning {
        eprintln!("⚠ {}", warning);
    }

    if outcome.cancelled {
        tracing::warn!("Batch was cancelled; unaudited URLs are recorded as errors");
    }

    if !cli.quiet {
        print_summary(&outcome.summary);
    }

    if !cli.no_export {
        let directory = cli
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.directory));
        let quoting = if cli.strict_csv {
            CsvQuoting::Strict
        } else {
            config.output.csv_quoting
        };

        let path = write_csv_export(
            &outcome.results,
            &directory,
            &config.output.file_prefix,
            quoting,
        )?;
        if !cli.quiet {
            println!("\n✓ Results exported to: {}", path.display());
        }
    }

    let report_path = cli
        .report
        .clone()
        .or_else(|| config.output.report_path.as_ref().map(PathBuf::from));
    if let Some(path) = report_path {
        generate_markdown_report(&outcome.results, &outcome.summary, &path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        if !cli.quiet {
            println!("✓ Report written to: {}", path.display());
        }
    }

    Ok(())
}
