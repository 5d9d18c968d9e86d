mod cli;
mod output;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use apkscope::{Config, Inspector, ScanExecutor, server};
use apkscope_archive::ArchiveHandle;
use clap::Parser;
use serde::Serialize;
use tabled::Table;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::cli::{App, Commands};
use crate::output::EntryRow;

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "apkscope=info",
        1 => "apkscope=debug",
        _ => "apkscope=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print<T: Serialize>(json: bool, value: &T, table: impl FnOnce(&T) -> Table) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", table(value));
    }
    Ok(())
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

async fn run(app: App, config: Config) -> Result<()> {
    let inspector = Arc::new(Inspector::from_config(&config, ScanExecutor::current()));
    tracing::debug!(?config, "configuration loaded");

    match app.cmd {
        Commands::Extract { package } => {
            let path = inspector.extract_package(&package)?;
            if app.json {
                println!("{}", serde_json::to_string(&path)?);
            } else {
                println!("{}", path.display());
            }
        }
        Commands::Metadata { file } => {
            let metadata = inspector.package_metadata(&path_arg(&file))?;
            print(app.json, &metadata, output::metadata)?;
        }
        Commands::Endpoints { file } => {
            let urls = inspector.endpoints(&path_arg(&file)).await?;
            print(app.json, &urls, output::endpoints)?;
        }
        Commands::Entropy { file } => {
            let verdict = inspector.obfuscation(&path_arg(&file)).await?;
            print(app.json, &verdict, output::verdict)?;
        }
        Commands::Entries { file } => {
            let rows = ScanExecutor::current()
                .submit("entries", move || -> apkscope_archive::Result<Vec<EntryRow>> {
                    let mut handle = ArchiveHandle::open(&file)?;
                    Ok(handle.entries()?.into_iter().map(EntryRow::from).collect())
                })
                .await??;
            print(app.json, &rows, |rows| output::entries(rows))?;
        }
        Commands::Serve => {
            tracing::info!(
                package_root = %config.package_root.display(),
                workers = config.scan_workers,
                "serving on stdin"
            );
            let input = BufReader::new(tokio::io::stdin());
            server::serve(inspector, input, tokio::io::stdout())
                .await
                .context("method-call stream failed")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let app = App::parse();
    init_logging(app.verbose);

    let config = Config::load(app.config.as_deref()).context("failed to load configuration")?;

    // stdin and stdout each pin a blocking thread while serving
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.scan_workers)
        .max_blocking_threads(config.scan_workers + 2)
        .thread_name("apkscope-worker")
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(run(app, config))
}
