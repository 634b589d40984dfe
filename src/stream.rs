//! C4 — Stream driver.
//!
//! Drives one endpoint from its stored cursor up to its current tree size,
//! emitting hostnames to the writer channel. Pagination is server-driven:
//! the driver never picks its own page size, it only re-requests from the
//! new cursor until caught up, since a log is free to truncate any single
//! response well below the requested range.
//!
//! State machine: `Init -> HeadFetched -> {Streaming <-> Persisting} ->
//! Done | Aborted`. `Aborted` is non-fatal for the cycle; other drivers
//! continue.

use log::{info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cursor::CursorStoreHandle;
use crate::endpoint;
use crate::error::Error;
use crate::leaf;
use crate::sanitize::Hostname;

/// Drive one endpoint for one cycle. Never returns an error: request
/// failures and cancellation both end the driver quietly without aborting
/// the rest of the cycle — other endpoints keep going.
pub async fn run(
    client: reqwest::Client,
    url: String,
    cursor_store: CursorStoreHandle,
    names_tx: mpsc::Sender<Hostname>,
    start_current: bool,
    cancel: CancellationToken,
) {
    let live = match endpoint::fetch_endpoint(&client, &url, &cancel).await {
        Ok(ep) => ep,
        Err(Error::Cancelled) => {
            info!("{}: cancelled while fetching tree head", url);
            return;
        }
        Err(e) => {
            warn!("{}: failed to fetch tree head: {}", url, e);
            return;
        }
    };

    let mut cursor = cursor_store.get(&url).await;

    if start_current && cursor.tree_size == 0 {
        info!("{}: start-current baseline at tree_size={}", url, live.tree_size);
        if let Err(e) = cursor_store.update(&url, live.tree_size).await {
            warn!("{}: failed to persist start-current baseline: {}", url, e);
            return;
        }
        return;
    }

    // get-entries' end index is inclusive; the server errors on an index
    // equal to tree_size, so the last valid index is tree_size - 1. The
    // loop itself must compare against tree_size (exclusive), not target:
    // comparing against target would skip the final entry whenever exactly
    // one new leaf is pending (cursor.tree_size == target already).
    let target = live.tree_size.saturating_sub(1);

    while cursor.tree_size < live.tree_size {
        if cancel.is_cancelled() {
            info!("{}: cancelled, stopping without persisting a partial batch", url);
            return;
        }

        let fetched = endpoint::get_entries(&client, &live.download_url, cursor.tree_size, target, &cancel).await;
        let entries = match fetched {
            Ok(entries) => entries,
            Err(Error::Cancelled) => {
                info!("{}: cancelled mid-request", url);
                return;
            }
            Err(e) => {
                warn!("{}: get-entries failed: {}", url, e);
                return;
            }
        };

        let n = entries.len() as u64;
        for entry in entries {
            match leaf::decode_leaf(&entry.leaf_input) {
                Ok(hostnames) => {
                    for name in hostnames {
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => {
                                info!("{}: cancelled while forwarding hostnames", url);
                                return;
                            }
                            r = names_tx.send(name) => {
                                if r.is_err() {
                                    // Writer is gone; nothing left to do this cycle.
                                    return;
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    log::debug!("{}: skipping undecodable leaf: {}", url, e);
                }
            }
        }

        cursor.tree_size += n;
        if let Err(e) = cursor_store.update(&url, cursor.tree_size).await {
            warn!("{}: failed to persist cursor: {}", url, e);
            return;
        }
    }

    info!("{}: caught up to tree_size={}", url, cursor.tree_size);
}
