use anyhow::Context;
use clap::Parser;
use roster_sync::{
    format_list_table, BaselineStore, CliArgs, ListDirectory, ListTarget, ListingConfig,
    MailchimpClient, ReconciliationEngine, RosterSource, RunMode, Scheduler, SheetsRosterSource,
    ShutdownSignal, SyncConfig,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse CLI arguments and environment
    let args = CliArgs::parse();
    let mode = args.into_run_mode().context("Invalid configuration")?;

    match mode {
        RunMode::ListLists(config) => list_lists(config).await,
        RunMode::Sync(config) => run_sync(config).await,
    }
}

/// Print every available list, then exit with status 1
async fn list_lists(config: ListingConfig) -> anyhow::Result<ExitCode> {
    let client = MailchimpClient::new(config.mailchimp, config.http_timeout)?;
    let lists = client
        .enumerate_lists()
        .await
        .context("Failed to enumerate Mailchimp lists")?;

    println!("No MAILCHIMP_LIST_ID specified, please choose a list ID");
    print!("{}", format_list_table(&lists));

    Ok(ExitCode::FAILURE)
}

async fn run_sync(config: SyncConfig) -> anyhow::Result<ExitCode> {
    let source: Arc<dyn RosterSource> =
        Arc::new(SheetsRosterSource::new(config.sheets, config.http_timeout)?);

    let client = MailchimpClient::new(config.mailchimp, config.http_timeout)?;
    let targets: Vec<Arc<dyn ListTarget>> = config
        .list_ids
        .iter()
        .map(|id| Arc::new(client.list(id.clone())) as Arc<dyn ListTarget>)
        .collect();

    let store = BaselineStore::new(config.baseline_path);
    info!(
        lists = ?config.list_ids,
        baseline = %store.path().display(),
        "Starting roster sync"
    );

    let engine = ReconciliationEngine::new(source, targets, store);
    let scheduler = Scheduler::new(engine, config.interval);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = watch::channel(ShutdownSignal::None);
    tokio::spawn(async move {
        wait_for_termination().await;
        info!("Received shutdown signal, stopping after the current tick...");
        if shutdown_tx.send(ShutdownSignal::Shutdown).is_err() {
            warn!("Scheduler already stopped");
        }
    });

    scheduler.run(shutdown_rx).await;

    info!("Roster sync stopped");
    Ok(ExitCode::SUCCESS)
}

async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await;
    }
}

/// Resolves on Ctrl-C only; a handler that cannot be installed never resolves
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
