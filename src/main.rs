use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use healthflow::{
    init_remote, init_tracing, AssumeYes, InteractivePrompt, Pipeline, RuntimeConfig, SyncOutcome,
};
use healthflow_generator::parse_date;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// Synthetic hospital appointment generator and bronze layer sync
#[derive(Parser)]
#[command(name = "healthflow")]
#[command(version)]
#[command(about = "Generate synthetic hospital appointments and sync them to object storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Suppress per-operation storage logging
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one day of appointments into the partitioned bronze root
    Generate {
        /// Execution date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        date: NaiveDate,

        /// Records to generate (defaults to generator.records_per_run)
        #[arg(long, value_name = "N")]
        records: Option<usize>,
    },
    /// Generate a historical range, one partition per day
    Backfill {
        #[arg(long, value_name = "N")]
        records: usize,

        /// First date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        start: NaiveDate,

        /// Last date, inclusive (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        end: NaiveDate,
    },
    /// Upload every local partition file to the remote store
    Sync {
        /// Local partition root (defaults to bronze.generated_path)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Exit with status 1 if any file fails to upload
        #[arg(long)]
        fail_on_error: bool,
    },
    /// Ad hoc operations against the remote store
    Remote {
        #[command(subcommand)]
        op: RemoteCommand,
    },
}

#[derive(Subcommand)]
enum RemoteCommand {
    /// Print whether an object exists
    Exists { key: String },
    /// Upload a local file to a key
    Upload { path: PathBuf, key: String },
    /// Download a key to a local file
    Download { key: String, path: PathBuf },
    /// List keys under a prefix
    List {
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Delete an object
    Delete { key: String },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load().context("Failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);
    init_tracing(&config.logging);
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    match cli.command {
        Commands::Generate { date, .. } => {
            let report = Pipeline::new(config).run_incremental(date)?;
            println!(
                "Wrote {} records to {}",
                report.partition.rows,
                report.partition.path.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Backfill {
            records,
            start,
            end,
        } => {
            let report = Pipeline::new(config).run_backfill(records, start, end)?;
            println!(
                "Wrote {} records across {} partitions",
                report.rows,
                report.partitions.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sync {
            root,
            yes,
            fail_on_error,
        } => run_async(run_sync(config, root, yes, fail_on_error)),
        Commands::Remote { op } => run_async(run_remote(config, op)),
    }
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.quiet {
        config.logging.quiet = true;
    }
    if let Commands::Generate {
        records: Some(records),
        ..
    } = &cli.command
    {
        config.generator.records_per_run = *records;
    }
}

fn run_async<F>(future: F) -> Result<ExitCode>
where
    F: std::future::Future<Output = Result<ExitCode>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(future)
}

async fn run_sync(
    config: RuntimeConfig,
    root: Option<PathBuf>,
    yes: bool,
    fail_on_error: bool,
) -> Result<ExitCode> {
    let store = init_remote(&config.remote)?;
    let root = root.unwrap_or_else(|| PathBuf::from(&config.bronze.generated_path));
    let pipeline = Pipeline::new(config);

    let outcome = if yes {
        pipeline.sync(&store, &root, &AssumeYes).await?
    } else {
        pipeline.sync(&store, &root, &InteractivePrompt).await?
    };

    match outcome {
        SyncOutcome::Declined => {
            println!("Aborted.");
            Ok(ExitCode::SUCCESS)
        }
        SyncOutcome::Completed(report) => {
            println!(
                "Uploaded {} files ({} bytes), {} failed",
                report.uploaded, report.bytes, report.failed
            );
            if fail_on_error && !report.is_complete() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn run_remote(config: RuntimeConfig, op: RemoteCommand) -> Result<ExitCode> {
    let store = init_remote(&config.remote)?;
    info!(store = store.label(), "Running remote operation");

    match op {
        RemoteCommand::Exists { key } => {
            println!("{}", store.exists(&key).await);
        }
        RemoteCommand::Upload { path, key } => {
            let bytes = store.upload(&path, &key).await?;
            println!("Uploaded {} bytes to {}", bytes, key);
        }
        RemoteCommand::Download { key, path } => {
            let bytes = store.download(&key, &path).await?;
            println!("Downloaded {} bytes to {}", bytes, path.display());
        }
        RemoteCommand::List { prefix } => {
            for key in store.list(&prefix).await? {
                println!("{}", key);
            }
        }
        RemoteCommand::Delete { key } => {
            store.delete(&key).await?;
            println!("Deleted {}", key);
        }
    }

    Ok(ExitCode::SUCCESS)
}
