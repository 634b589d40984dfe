//! C8 — Scheduler.
//!
//! Drives the periodic, cancellable crawl cycle: opens a fresh output
//! file, fans out one stream driver per discovered endpoint, and barriers
//! on completion before sleeping (or returning, in one-pass mode).

use std::fs::OpenOptions;
use std::path::PathBuf;

use chrono::Utc;
use futures::future::join_all;
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::CrawlConfig;
use crate::cursor::{self, CursorStoreHandle};
use crate::directory;
use crate::error::{Error, Result};
use crate::internal::new_http_client;
use crate::stream;

const NAME_CHANNEL_CAPACITY: usize = 1000;

/// Run crawl cycles until cancelled, or exactly once in one-pass mode.
pub async fn run(config: CrawlConfig, cancel: CancellationToken) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| Error::FileIO(config.output_dir.clone(), e))?;

    let cursor_store = cursor::spawn(config.cursor_path())?;
    let client = new_http_client(config.disable_api_cert_validation, crate::endpoint::REQUEST_TIMEOUT)?;

    loop {
        if cancel.is_cancelled() {
            return Ok(());
        }

        if let Err(e) = run_cycle(&config, &cursor_store, &client, &cancel).await {
            error!("crawl cycle failed: {}", e);
        }

        if config.one_pass {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(config.cycle_delay) => {}
            _ = cancel.cancelled() => {
                info!("cancelled during sleep, exiting");
                return Ok(());
            }
        }
    }
}

async fn run_cycle(
    config: &CrawlConfig,
    cursor_store: &CursorStoreHandle,
    client: &reqwest::Client,
    cancel: &CancellationToken,
) -> Result<()> {
    info!("acquiring list of CT log servers");
    let urls = directory::fetch_log_urls(config.disable_api_cert_validation).await?;
    info!("discovered {} CT log endpoints", urls.len());

    run_cycle_with_urls(config, cursor_store, client, cancel, urls).await?;
    Ok(())
}

/// The body of one crawl cycle against an explicit endpoint list, split out
/// from [`run_cycle`] so tests can supply endpoints (e.g. a local mock
/// server) without going through the real log directory. Returns the
/// number of unique hostnames written.
async fn run_cycle_with_urls(
    config: &CrawlConfig,
    cursor_store: &CursorStoreHandle,
    client: &reqwest::Client,
    cancel: &CancellationToken,
    urls: Vec<String>,
) -> Result<usize> {
    let output_path = open_output_path(&config.output_dir);
    info!("preparing output file {}", output_path.display());
    let file = open_output_file(&output_path)?;

    let (names_tx, names_rx) = mpsc::channel(NAME_CHANNEL_CAPACITY);
    let writer_handle = tokio::spawn(crate::writer::run(names_rx, file));

    let mut driver_handles = Vec::with_capacity(urls.len());
    for url in urls {
        let client = client.clone();
        let cursor_store = cursor_store.clone();
        let names_tx = names_tx.clone();
        let cancel = cancel.clone();
        let start_current = config.start_current;
        driver_handles.push(tokio::spawn(async move {
            stream::run(client, url, cursor_store, names_tx, start_current, cancel).await;
        }));
    }
    // Drop our own sender so the channel closes once every driver's clone
    // has also been dropped (i.e. every driver has finished).
    drop(names_tx);

    for result in join_all(driver_handles).await {
        if let Err(e) = result {
            warn!("a stream driver task panicked: {}", e);
        }
    }

    match writer_handle.await {
        Ok(Ok(written)) => {
            info!("cycle complete, wrote {} hostnames to {}", written, output_path.display());
            Ok(written)
        }
        Ok(Err(e)) => {
            warn!("writer task failed: {}", e);
            Ok(0)
        }
        Err(e) => {
            warn!("writer task panicked: {}", e);
            Ok(0)
        }
    }
}

fn open_output_path(output_dir: &std::path::Path) -> PathBuf {
    let filename = Utc::now().format("ct_log_%Y.%m.%d_%H.%M.%S.txt").to_string();
    output_dir.join(filename)
}

fn open_output_file(path: &std::path::Path) -> Result<std::fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path).map_err(|e| Error::FileIO(path.to_path_buf(), e))
}
